//! # ClockTimerEmulator
//!
//! Square-wave clock/timer with Astable and Monostable modes and a serial
//! console.
//!
//! ## Architecture
//!
//! All contexts meet in [`GeneratorState`], a set of per-field atomics:
//! - Button ISR toggles mode / arms steps ([`input`])
//! - Sampler thread on core 1 writes the frequency ([`sampler`])
//! - Main task runs the pulse loop ([`pulse`])
//! - Console timer polls the UART and runs commands ([`console`])
//!
//! No mutexes. Control logic is `no_std` and host-testable; ESP-IDF glue
//! lives in [`hal`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod error;
pub mod hal;
pub mod input;
pub mod log_drain;
pub mod logging;
pub mod pulse;
pub mod sampler;
pub mod state;

pub use error::ClockError;
pub use input::{Button, ButtonAction, Buttons};
pub use logging::LogRing;
pub use pulse::{Cycle, PulseEngine, PulseTiming};
pub use state::{GeneratorState, Mode, TimerKind};

/// Generator state shared by every context.
pub static STATE: GeneratorState = GeneratorState::new(config::DEFAULTS);

/// Debounce clocks, written only from the button ISR.
pub static BUTTONS: Buttons = Buttons::new();

/// Diagnostic log ring, drained by the log thread.
pub static LOG_RING: LogRing = LogRing::new();
