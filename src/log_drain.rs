//! Log output on UART1 TX.
//!
//! Drains [`LOG_RING`](crate::LOG_RING) and writes one line per entry.
//! Requires an external USB-UART adapter on [`LOG_TX_PIN`](crate::config::LOG_TX_PIN).
//!
//! Line format: `[timestamp_us] LEVEL: message`

use core::fmt::Write;

use crate::logging::{LogEntry, LogRing};

/// Report dropped messages at most this often.
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// Format one entry as a log line (with trailing newline).
pub fn write_entry(out: &mut dyn Write, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Drain state: remembers when drops were last reported.
pub struct LogDrain {
    last_dropped_report_us: i64,
}

impl LogDrain {
    pub const fn new() -> Self {
        Self { last_dropped_report_us: 0 }
    }

    /// Write every pending entry; report drops every 10 s.
    ///
    /// Returns the number of entries written.
    pub fn drain_into<const N: usize>(
        &mut self,
        ring: &LogRing<N>,
        now_us: i64,
        out: &mut dyn Write,
    ) -> usize {
        let mut written = 0;
        while let Some(entry) = ring.drain() {
            let _ = write_entry(out, &entry);
            written += 1;
        }

        if now_us - self.last_dropped_report_us >= DROPPED_REPORT_INTERVAL_US {
            let dropped = ring.dropped();
            if dropped > 0 {
                let _ = writeln!(out, "[{:10}] WARN: dropped {} log messages", now_us, dropped);
                ring.reset_dropped();
            }
            self.last_dropped_report_us = now_us;
        }

        written
    }
}

impl Default for LogDrain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
pub use target::{init_log_uart, log_drain_task};

#[cfg(target_os = "espidf")]
mod target {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use super::LogDrain;
    use crate::config::LOG_BAUD;
    use crate::LOG_RING;

    /// `core::fmt::Write` adapter over the TX driver.
    struct TxWriter<'a, 'd>(&'a mut UartTxDriver<'d>);

    impl core::fmt::Write for TxWriter<'_, '_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            self.0.write(s.as_bytes()).map(|_| ()).map_err(|_| core::fmt::Error)
        }
    }

    /// Initialize UART1 TX-only for log output.
    pub fn init_log_uart<'d>(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    ) -> Result<UartTxDriver<'d>, EspError> {
        let config = uart::config::Config::default().baudrate(Hertz(LOG_BAUD));

        UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &config,
        )
    }

    /// Log drain loop (low priority thread).
    pub fn log_drain_task(uart: &mut UartTxDriver<'_>) -> ! {
        let mut drain = LogDrain::new();

        loop {
            let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
            let written = drain.drain_into(&LOG_RING, now, &mut TxWriter(uart));

            if written == 0 {
                unsafe {
                    esp_idf_svc::sys::vTaskDelay(10);
                }
            }
        }
    }
}
