//! Hardware Abstraction Layer for the clock/timer.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.
//! Only compiled for `target_os = "espidf"`.

#[cfg(target_os = "espidf")]
pub mod adc;
#[cfg(target_os = "espidf")]
pub mod gpio;
#[cfg(target_os = "espidf")]
pub mod system;
#[cfg(target_os = "espidf")]
pub mod uart;

#[cfg(target_os = "espidf")]
pub use adc::Potentiometer;
#[cfg(target_os = "espidf")]
pub use gpio::{button_input, install_button_interrupts, pulse_output, PulsePin};
#[cfg(target_os = "espidf")]
pub use system::{now_ms, now_us, EspSystem};
#[cfg(target_os = "espidf")]
pub use uart::UartConsole;
