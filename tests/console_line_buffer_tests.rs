//! Line buffer tests

use clock_timer_emulator::config::LINE_CAPACITY;
use clock_timer_emulator::console::LineBuffer;

#[test]
fn test_push_and_read() {
    let mut buf = LineBuffer::new();

    for &b in b"freq 440" {
        assert!(buf.push(b));
    }

    assert_eq!(buf.as_str(), "freq 440");
    assert_eq!(buf.len(), 8);
    assert!(!buf.is_empty());
}

#[test]
fn test_overflow_drops_bytes() {
    let mut buf = LineBuffer::new();

    for _ in 0..LINE_CAPACITY {
        assert!(buf.push(b'a'));
    }
    assert!(buf.is_full());

    for _ in 0..5 {
        assert!(!buf.push(b'b'));
    }
    assert_eq!(buf.len(), LINE_CAPACITY);
    assert!(buf.as_bytes().iter().all(|&b| b == b'a'));
}

#[test]
fn test_backspace() {
    let mut buf = LineBuffer::new();

    assert!(!buf.backspace());

    buf.push(b'o');
    buf.push(b'k');
    assert!(buf.backspace());
    assert_eq!(buf.as_str(), "o");
    assert!(buf.backspace());
    assert!(!buf.backspace());
    assert!(buf.is_empty());
}

#[test]
fn test_clear() {
    let mut buf = LineBuffer::default();

    buf.push(b'x');
    buf.clear();

    assert!(buf.is_empty());
    assert_eq!(buf.as_str(), "");
}
