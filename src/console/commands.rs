//! Command handlers

use core::fmt::Write;

use super::io::System;
use super::parser::Command;
use super::report::{print_banner, print_help, print_status};
use crate::error::ClockError;
use crate::state::{GeneratorState, Mode, TimerKind};

/// Hint printed after stepping.
pub const STEP_HINT: &str =
    "* Monostable mode: press `enter` to step, type `exit` to stop stepping";

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    /// Name plus argument placeholder, as shown in help
    pub usage: &'static str,
    pub brief: &'static str,
}

/// All named commands, in match priority order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "?", usage: "?", brief: "shows this help" },
    CommandDescriptor { name: "start", usage: "start", brief: "starts the clock timer" },
    CommandDescriptor { name: "stop", usage: "stop", brief: "stops the clock timer" },
    CommandDescriptor { name: "step", usage: "step", brief: "steps the clock timer" },
    CommandDescriptor { name: "freq", usage: "freq <hz>", brief: "sets the clock frequency" },
    CommandDescriptor { name: "duty", usage: "duty <percent>", brief: "sets the clock duty cycle" },
    CommandDescriptor { name: "reset", usage: "reset", brief: "resets the clock timer" },
    CommandDescriptor { name: "reboot", usage: "reboot", brief: "reboots to download mode" },
    CommandDescriptor { name: "clear", usage: "clear", brief: "clears the screen" },
    CommandDescriptor { name: "exit", usage: "exit", brief: "stops stepping (Monostable)" },
];

/// Execute a parsed command.
///
/// Validation failures leave `state` untouched and are returned for the
/// session to print.
pub fn execute(
    cmd: &Command,
    state: &GeneratorState,
    system: &mut dyn System,
    out: &mut dyn Write,
) -> Result<(), ClockError> {
    match *cmd {
        Command::Help => print_help(out),

        Command::Start => {
            let _ = writeln!(out, "* Clock started");
            state.set_pulse_enabled(true);
        }

        Command::Stop => {
            let _ = writeln!(out, "* Clock stopped");
            state.set_pulse_enabled(false);
        }

        Command::Step => {
            state.request_step();
            if state.mode() == Mode::Monostable {
                let _ = writeln!(out, "{}", STEP_HINT);
            } else {
                let _ = writeln!(out, "* Stepped");
            }
            print_status(out, &state.snapshot(), system.sys_clock_hz());
        }

        Command::Frequency(hz) => {
            let hz = hz.ok_or(ClockError::InvalidValue)?;
            state.set_frequency(hz)?;
            print_status(out, &state.snapshot(), system.sys_clock_hz());
        }

        Command::DutyCycle(percent) => {
            if state.timer_kind() != TimerKind::Pwm {
                return Err(ClockError::DutyRequiresPwm);
            }
            let percent = percent.ok_or(ClockError::InvalidValue)?;
            state.set_duty_cycle(percent)?;
            print_status(out, &state.snapshot(), system.sys_clock_hz());
        }

        Command::Reset => {
            state.reset();
            print_banner(out, &state.snapshot(), system.sys_clock_hz());
        }

        Command::Reboot => {
            let _ = writeln!(out, "* Rebooting to download mode");
            system.enter_download_mode();
        }

        Command::Clear => print_banner(out, &state.snapshot(), system.sys_clock_hz()),

        Command::Exit => {
            state.disarm();
            print_status(out, &state.snapshot(), system.sys_clock_hz());
        }

        Command::ImplicitStep => {
            let _ = writeln!(out, "...");
            state.arm_step();
        }

        Command::Unknown => return Err(ClockError::UnknownCommand),
    }

    Ok(())
}

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}
