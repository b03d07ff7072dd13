//! Banner, status block and help text.

use core::fmt::Write;

use super::commands::COMMANDS;
use crate::state::{StateSnapshot, TimerKind};

/// ANSI: clear screen, cursor home.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";
const BOLD: &str = "\x1b[1m";
const RESET_BOLD: &str = "\x1b[0m";

pub const TITLE: &str = "Pico Clock/Timer Emulator";

/// Divider/wrap pair of a PWM slice running at the output frequency.
///
/// Informational: the divider is the smallest integer in `1..=255` that keeps
/// `wrap` within 16 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmSettings {
    pub divider: u16,
    pub wrap: u16,
}

impl PwmSettings {
    pub fn for_frequency(sys_clock_hz: u32, frequency_hz: u32) -> Self {
        let frequency_hz = frequency_hz.max(1) as u64;
        let sys = sys_clock_hz as u64;
        let counts = sys / frequency_hz;

        let divider = counts.div_ceil(1 << 16).clamp(1, 255);
        let wrap = (sys / (divider * frequency_hz)).saturating_sub(1).min(u16::MAX as u64);

        Self {
            divider: divider as u16,
            wrap: wrap as u16,
        }
    }
}

/// Print the status block.
pub fn print_status(out: &mut dyn Write, snap: &StateSnapshot, sys_clock_hz: u32) {
    let _ = writeln!(out);
    let _ = writeln!(out, "Sys Clock:\t{} Hz", sys_clock_hz);
    let _ = writeln!(out, "Out Clock:\t{} Hz", snap.frequency_hz);
    let _ = writeln!(out, "Mode:\t\t{}", snap.mode.as_str());
    let _ = writeln!(out, "Timer:\t\t{}", snap.timer_kind.as_str());

    if snap.timer_kind == TimerKind::Pwm {
        let pwm = PwmSettings::for_frequency(sys_clock_hz, snap.frequency_hz);
        let _ = writeln!(out, "Divider:\t{}", pwm.divider);
        let _ = writeln!(out, "Wrap:\t{}", pwm.wrap);
    }

    let _ = writeln!(out, "Duty Cycle:\t{}%", snap.duty_cycle);
    let _ = writeln!(out, "Pulse:\t\t{}", if snap.pulse_enabled { "On" } else { "Off" });
    let _ = writeln!(out);
}

/// Print the boot banner (also used by `reset` and `clear`).
pub fn print_banner(out: &mut dyn Write, snap: &StateSnapshot, sys_clock_hz: u32) {
    let _ = write!(out, "{}", CLEAR_SCREEN);
    let _ = writeln!(out, "{}{}{}", BOLD, TITLE, RESET_BOLD);
    print_status(out, snap, sys_clock_hz);
    let _ = writeln!(out, "Type '?' for help");
    let _ = writeln!(out);
}

/// Print the command list.
pub fn print_help(out: &mut dyn Write) {
    let _ = writeln!(out);
    for c in COMMANDS {
        let tabs = if c.usage.len() < 8 { "\t\t" } else { "\t" };
        let _ = writeln!(out, "{}{}{}", c.usage, tabs, c.brief);
    }
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwm_settings_low_frequency() {
        // 240 MHz / 1 Hz needs the largest divider, wrap saturates
        let pwm = PwmSettings::for_frequency(240_000_000, 1);
        assert_eq!(pwm.divider, 255);
        assert_eq!(pwm.wrap, u16::MAX);
    }

    #[test]
    fn test_pwm_settings_fits_16_bits() {
        // 125 MHz / 1 kHz = 125_000 counts -> divider 2, wrap 62_499
        let pwm = PwmSettings::for_frequency(125_000_000, 1000);
        assert_eq!(pwm.divider, 2);
        assert_eq!(pwm.wrap, 62_499);
    }

    #[test]
    fn test_pwm_settings_high_frequency() {
        let pwm = PwmSettings::for_frequency(125_000_000, 125_000_000);
        assert_eq!(pwm.divider, 1);
        assert_eq!(pwm.wrap, 0);
    }
}
