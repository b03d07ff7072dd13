//! Module: config
//!
//! Purpose: Board wiring, timing intervals and limits for the clock/timer.
//!
//! Build-time options:
//! - `CLOCK_FREQ=<hz>` (environment, read by build.rs): fixed output
//!   frequency, disables the potentiometer sampler
//! - feature `pwm-timer`: PWM timer kind (duty cycle editable)
//! - feature `trace-cycles`: log every generator cycle
//!
//! Safety: Safe. Constants only.

use crate::state::{Defaults, Mode, TimerKind};

// --- Pins (ESP32-S3 GPIO numbers) ---
//
// `main` takes the typed peripherals (`pins.gpioN`) for everything except
// the button ISR, which uses MODE_PIN and STEP_PIN directly. Keep both in
// sync when rewiring.

/// MODE button (active low, pull-up).
pub const MODE_PIN: i32 = 14;
/// STEP button (active low, pull-up).
pub const STEP_PIN: i32 = 15;
/// Status LED, mirrors the clock output (`pins.gpio16`).
pub const PULSE_LED_PIN: i32 = 16;
/// Clock output (`pins.gpio17`).
pub const CLOCK_PIN: i32 = 17;
/// Potentiometer, ADC1 channel 0 (`pins.gpio1`).
pub const POTENTIOMETER_PIN: i32 = 1;
/// Console UART0 pins (`pins.gpio43` / `pins.gpio44`).
pub const CONSOLE_TX_PIN: i32 = 43;
pub const CONSOLE_RX_PIN: i32 = 44;
/// Diagnostic log UART1 TX pin, `pins.gpio6` (Quad flash boards only).
pub const LOG_TX_PIN: i32 = 6;

pub const CONSOLE_BAUD: u32 = 115_200;
pub const LOG_BAUD: u32 = 115_200;

// --- Timing ---

/// Console poll interval.
pub const CONSOLE_POLL_MS: u64 = 50;
/// Button debounce window.
pub const DEBOUNCE_MS: u32 = 200;
/// ADC readings averaged per frequency update.
pub const ADC_SAMPLES: u32 = 64;
/// Delay between two ADC readings.
pub const ADC_SAMPLE_SPACING_MS: u32 = 10;
/// Pause between two frequency updates.
pub const ADC_PERIOD_MS: u32 = 1000;
/// Full-scale raw ADC value (12 bit).
pub const ADC_FULL_SCALE: u32 = 4095;
/// Wait for the sampler thread before the first cycle.
pub const STARTUP_SETTLE_MS: u32 = 1000;

// --- Limits ---

pub const MAX_FREQUENCY_HZ: u32 = 125_000_000;
pub const MAX_DUTY_CYCLE: u8 = 100;
/// Range produced by the potentiometer.
pub const SAMPLED_MIN_HZ: u32 = 1;
pub const SAMPLED_MAX_HZ: u32 = 1000;

// --- Console ---

/// Maximum bytes in one command line.
pub const LINE_CAPACITY: usize = 255;
pub const PROMPT: &str = ">>> ";

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Fixed output frequency from `CLOCK_FREQ`, if set and non-zero.
pub const FIXED_FREQUENCY_HZ: Option<u32> = parse_hz(env!("CLOCK_FREQ_HZ"));

pub const TRACE_CYCLES: bool = cfg!(feature = "trace-cycles");

pub const DEFAULT_TIMER_KIND: TimerKind = if cfg!(feature = "pwm-timer") {
    TimerKind::Pwm
} else {
    TimerKind::Repeating
};

/// Power-on state of the generator.
pub const DEFAULTS: Defaults = Defaults {
    frequency_hz: match FIXED_FREQUENCY_HZ {
        Some(hz) => hz,
        None => SAMPLED_MIN_HZ,
    },
    duty_cycle: 50,
    mode: Mode::Astable,
    pulse_enabled: true,
    timer_kind: DEFAULT_TIMER_KIND,
};

/// Parse a decimal frequency at compile time.
///
/// Empty, zero, non-numeric or above [`MAX_FREQUENCY_HZ`] yields `None`.
pub const fn parse_hz(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            return None;
        }
        value = value * 10 + (b - b'0') as u64;
        if value > MAX_FREQUENCY_HZ as u64 {
            return None;
        }
        i += 1;
    }
    if value == 0 {
        None
    } else {
        Some(value as u32)
    }
}
