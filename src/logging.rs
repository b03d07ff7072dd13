//! Lock-free diagnostic logging.
//!
//! ```text
//! button ISR ─┐
//! pulse loop ─┼──▶ LogRing ──▶ log drain thread ──▶ UART1
//! sampler    ─┤    (MPSC)
//! console    ─┘
//! ```
//!
//! `push` never blocks and never allocates, so it is usable from the GPIO
//! interrupt and between pulse edges. When the ring is full the message is
//! dropped and counted.
//!
//! This is not the console: the console protocol carries only command
//! responses for the operator.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log ring size (number of entries).
pub const LOG_RING_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds since boot.
    pub timestamp_us: i64,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text (lossy: invalid UTF-8 yields a placeholder).
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Multi-producer, single-consumer log ring.
///
/// Producers claim a slot with a CAS on `write_idx` and mark it committed
/// once copied; the consumer only reads committed slots.
pub struct LogRing<const N: usize = LOG_RING_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    committed: [AtomicBool; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: A slot is written by exactly one producer (the one whose CAS
// claimed it) and read by the single consumer only after `committed` is
// set with Release ordering.
unsafe impl<const N: usize> Sync for LogRing<N> {}
unsafe impl<const N: usize> Send for LogRing<N> {}

impl<const N: usize> LogRing<N> {
    const MASK: usize = N - 1;

    /// Create a new empty ring.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log ring size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            committed: [const { AtomicBool::new(false) }; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if queued, `false` if dropped (ring full).
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let mut write = self.write_idx.load(Ordering::Relaxed);
        loop {
            let read = self.read_idx.load(Ordering::Acquire);
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let idx = (write as usize) & Self::MASK;
        let len = utf8_floor(msg, MAX_MSG_LEN);

        // SAFETY: slot `idx` was claimed by the CAS above and is not
        // committed, so neither another producer nor the consumer touches it.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }

        self.committed[idx].store(true, Ordering::Release);
        true
    }

    /// Take the oldest committed entry (single consumer only).
    ///
    /// Returns `None` if the ring is empty or the oldest slot is still
    /// being written.
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let idx = (read as usize) & Self::MASK;

        if !self.committed[idx].load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: committed slot, owned by the consumer until released below.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.committed[idx].store(false, Ordering::Relaxed);
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Number of claimed entries not yet drained.
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest length `<= max` that does not split a UTF-8 sequence in `msg`.
#[inline]
fn utf8_floor(msg: &[u8], max: usize) -> usize {
    if msg.len() <= max {
        return msg.len();
    }
    let mut len = max;
    // Back off over continuation bytes (0b10xx_xxxx)
    while len > 0 && msg[len] & 0xC0 == 0x80 {
        len -= 1;
    }
    len
}

/// Format a message into a buffer, truncating on overflow.
///
/// Returns the number of bytes written.
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = SliceWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// `core::fmt::Write` over a byte slice; silently truncates.
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl core::fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let mut to_write = bytes.len().min(self.buf.len() - self.pos);
        while !s.is_char_boundary(to_write) {
            to_write -= 1;
        }
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Non-blocking log macro.
///
/// ```ignore
/// ring_log!(LogLevel::Info, LOG_RING, now_us, "mode -> {:?}", mode);
/// ```
#[macro_export]
macro_rules! ring_log {
    ($level:expr, $ring:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $ring.push($timestamp, $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! ring_info {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ring_log!($crate::logging::LogLevel::Info, $ring, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! ring_warn {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ring_log!($crate::logging::LogLevel::Warn, $ring, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! ring_error {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ring_log!($crate::logging::LogLevel::Error, $ring, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! ring_debug {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::ring_log!($crate::logging::LogLevel::Debug, $ring, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_ring_basic() {
        let ring = LogRing::<16>::new();

        assert!(ring.push(1000, LogLevel::Info, b"mode -> Monostable"));
        assert_eq!(ring.pending(), 1);

        let entry = ring.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "mode -> Monostable");

        assert!(ring.drain().is_none());
        assert_eq!(ring.pending(), 0);
    }

    #[test]
    fn test_log_ring_full_drops() {
        let ring = LogRing::<4>::new();

        for i in 0..4 {
            assert!(ring.push(i, LogLevel::Debug, b"x"));
        }
        assert!(!ring.push(5, LogLevel::Debug, b"dropped"));
        assert_eq!(ring.dropped(), 1);

        // Dropping must not leave a hole the consumer waits on
        assert_eq!(ring.drain().unwrap().timestamp_us, 0);
        assert!(ring.push(6, LogLevel::Debug, b"y"));
        let order: Vec<i64> = core::iter::from_fn(|| ring.drain())
            .map(|e| e.timestamp_us)
            .collect();
        assert_eq!(order, vec![1, 2, 3, 6]);

        ring.reset_dropped();
        assert_eq!(ring.dropped(), 0);
    }

    #[test]
    fn test_long_message_truncated() {
        let ring = LogRing::<4>::new();
        let long = [b'a'; MAX_MSG_LEN + 30];

        ring.push(0, LogLevel::Warn, &long);
        assert_eq!(ring.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_truncation_keeps_whole_chars() {
        let ring = LogRing::<4>::new();
        // 119 ASCII bytes, then a 2-byte char straddling the limit
        let mut msg = std::vec![b'a'; MAX_MSG_LEN - 1];
        msg.extend_from_slice("é tail".as_bytes());

        ring.push(0, LogLevel::Info, &msg);
        let entry = ring.drain().unwrap();
        assert_eq!(entry.len as usize, MAX_MSG_LEN - 1);
        assert_eq!(entry.message(), "a".repeat(MAX_MSG_LEN - 1));
    }

    #[test]
    fn test_slice_writer_keeps_whole_chars() {
        let mut buf = [0u8; 4];
        let n = format_to_buffer(&mut buf, format_args!("ab{}", "€"));
        assert_eq!(n, 2);
        assert_eq!(core::str::from_utf8(&buf[..n]), Ok("ab"));
    }

    #[test]
    fn test_ring_macro() {
        let ring = LogRing::<4>::new();
        crate::ring_info!(ring, 7, "freq {} Hz", 440);
        let entry = ring.drain().unwrap();
        assert_eq!(entry.message(), "freq 440 Hz");
        assert_eq!(entry.level, LogLevel::Info);
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 42));
        assert_eq!(&buf[..len], b"Hell");
    }

    #[test]
    fn test_multiple_producers() {
        use std::sync::Arc;
        use std::thread;

        let ring = Arc::new(LogRing::<256>::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for j in 0..10 {
                        let msg = format!("T{} {}", t, j);
                        ring.push(j, LogLevel::Info, msg.as_bytes());
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let mut count = 0;
        while ring.drain().is_some() {
            count += 1;
        }
        assert_eq!(count, 40);
    }
}
