//! Console on UART0.

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use crate::config::CONSOLE_BAUD;
use crate::console::SerialPort;

/// Console serial port with non-blocking reads.
pub struct UartConsole<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartConsole<'d> {
    pub fn new(
        uart: impl Peripheral<P = uart::UART0> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    ) -> Result<Self, EspError> {
        let config = uart::config::Config::default().baudrate(Hertz(CONSOLE_BAUD));

        let uart = UartDriver::new(
            uart,
            tx_pin,
            rx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &config,
        )?;

        Ok(Self { uart })
    }
}

impl core::fmt::Write for UartConsole<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        // Terminals expect CRLF
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.uart.write(b"\r\n").map_err(|_| core::fmt::Error)?;
            }
            self.uart.write(part.as_bytes()).map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}

impl SerialPort for UartConsole<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}
