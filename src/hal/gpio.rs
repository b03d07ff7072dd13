//! GPIO HAL: clock/LED outputs and button interrupts.

use core::ffi::c_void;

use esp_idf_svc::hal::gpio::{AnyOutputPin, Input, InputPin, Output, OutputPin, PinDriver, Pull};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::{self as esp_idf_sys, esp, EspError};

use super::system::{now_ms, now_us};
use crate::config::{MODE_PIN, STEP_PIN};
use crate::input::{handle_edge, Button, ButtonAction};
use crate::{ring_debug, BUTTONS, LOG_RING, STATE};

/// Output pin type shared by the clock output and the LED.
pub type PulsePin<'d> = PinDriver<'d, AnyOutputPin, Output>;

/// Configure an output driven low.
///
/// Callers pass `pins.gpioN.downgrade_output()` so both outputs share one type.
pub fn pulse_output<'d>(pin: AnyOutputPin) -> Result<PulsePin<'d>, EspError> {
    let mut driver = PinDriver::output(pin)?;
    driver.set_low()?;
    Ok(driver)
}

/// Configure a button input with pull-up.
pub fn button_input<'d, P: InputPin + OutputPin>(
    pin: impl Peripheral<P = P> + 'd,
) -> Result<PinDriver<'d, P, Input>, EspError> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

/// GPIO ISR: `arg` carries the [`Button`] discriminant.
unsafe extern "C" fn button_isr(arg: *mut c_void) {
    let button = Button::from_u8(arg as usize as u8);

    match handle_edge(&STATE, &BUTTONS, button, now_ms()) {
        Some(ButtonAction::ModeChanged(mode)) => {
            ring_debug!(LOG_RING, now_us(), "mode -> {}", mode.as_str());
        }
        Some(ButtonAction::StepArmed) => {
            ring_debug!(LOG_RING, now_us(), "step armed");
        }
        Some(ButtonAction::Ignored) | None => {}
    }
}

/// Attach falling-edge interrupts to MODE and STEP.
///
/// The button pins must already be configured (see [`button_input`]) and
/// stay alive for as long as interrupts are wanted.
pub fn install_button_interrupts() -> Result<(), EspError> {
    unsafe {
        esp!(esp_idf_sys::gpio_install_isr_service(0))?;

        for (pin, button) in [(MODE_PIN, Button::Mode), (STEP_PIN, Button::Step)] {
            esp!(esp_idf_sys::gpio_set_intr_type(
                pin,
                esp_idf_sys::gpio_int_type_t_GPIO_INTR_NEGEDGE
            ))?;
            esp!(esp_idf_sys::gpio_isr_handler_add(
                pin,
                Some(button_isr),
                button as u8 as usize as *mut c_void
            ))?;
            esp!(esp_idf_sys::gpio_intr_enable(pin))?;
        }
    }
    Ok(())
}
