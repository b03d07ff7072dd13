//! Clock queries, monotonic time and download-mode reboot.

use esp_idf_svc::sys as esp_idf_sys;

use crate::console::System;

/// Microseconds since boot.
#[inline]
pub fn now_us() -> i64 {
    unsafe { esp_idf_sys::esp_timer_get_time() }
}

/// Milliseconds since boot, wrapping after ~49 days.
#[inline]
pub fn now_ms() -> u32 {
    (now_us() / 1000) as u32
}

/// ESP32-S3 system services.
pub struct EspSystem;

impl System for EspSystem {
    fn sys_clock_hz(&self) -> u32 {
        unsafe { esp_idf_sys::ets_get_cpu_frequency() * 1_000_000 }
    }

    fn enter_download_mode(&mut self) {
        // ESP32-S3 supports forcing download boot via RTC register
        // REG_WRITE(RTC_CNTL_OPTION1_REG, RTC_CNTL_FORCE_DOWNLOAD_BOOT)
        // See: https://docs.espressif.com/projects/esptool/en/latest/esp32s3/advanced-topics/boot-mode-selection.html
        const RTC_CNTL_OPTION1_REG: u32 = 0x6000_8128;
        const RTC_CNTL_FORCE_DOWNLOAD_BOOT: u32 = 1;

        unsafe {
            core::ptr::write_volatile(RTC_CNTL_OPTION1_REG as *mut u32, RTC_CNTL_FORCE_DOWNLOAD_BOOT);
            esp_idf_sys::esp_restart();
        }
    }
}
