//! Platform boundary used by the console.

use core::fmt::Write;

/// Console byte stream.
pub trait SerialPort: Write {
    /// Non-blocking read of one byte. `None` means no data pending.
    fn read_byte(&mut self) -> Option<u8>;
}

/// System services the interpreter can request.
pub trait System {
    /// Core clock in Hz, shown in the status block.
    fn sys_clock_hz(&self) -> u32;

    /// Reboot into the ROM firmware-update (download) mode.
    ///
    /// Does not return on hardware.
    fn enter_download_mode(&mut self);
}
