//! Command line parser
//!
//! Case-sensitive, first match wins:
//! `?`, `start`, `stop`, `step`, `freq <n>`, `duty <n>`, `reset`, `reboot`,
//! `clear`, `exit` (Monostable only). Anything else is an implicit step in
//! Monostable and unknown in Astable.

use crate::state::Mode;

/// Numeric argument: `None` when missing, negative or not a number.
pub type NumArg = Option<u32>;

/// Parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Start,
    Stop,
    /// Forced single pulse, any mode.
    Step,
    Frequency(NumArg),
    DutyCycle(NumArg),
    Reset,
    Reboot,
    Clear,
    /// Back to armed-low (Monostable only).
    Exit,
    /// Unmatched line in Monostable.
    ImplicitStep,
    /// Unmatched line in Astable.
    Unknown,
}

/// Parse a command line. `mode` decides `exit` and the fallback.
pub fn parse(line: &str, mode: Mode) -> Command {
    let line = line.trim();

    match line {
        "?" => return Command::Help,
        "start" => return Command::Start,
        "stop" => return Command::Stop,
        "step" => return Command::Step,
        _ => {}
    }

    if let Some(arg) = line.strip_prefix("freq") {
        return Command::Frequency(parse_number(arg));
    }
    if let Some(arg) = line.strip_prefix("duty") {
        return Command::DutyCycle(parse_number(arg));
    }

    match (line, mode) {
        ("reset", _) => Command::Reset,
        ("reboot", _) => Command::Reboot,
        ("clear", _) => Command::Clear,
        ("exit", Mode::Monostable) => Command::Exit,
        (_, Mode::Monostable) => Command::ImplicitStep,
        (_, Mode::Astable) => Command::Unknown,
    }
}

/// Parse the argument following a fixed 4-byte prefix.
///
/// Only non-negative decimal integers are accepted; `-5`, `abc` and an empty
/// argument all yield `None`.
fn parse_number(arg: &str) -> NumArg {
    let arg = arg.trim();
    if arg.starts_with('+') {
        return None;
    }
    arg.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_argument() {
        assert_eq!(parse("freq 440", Mode::Astable), Command::Frequency(Some(440)));
        assert_eq!(parse("freq   7 ", Mode::Astable), Command::Frequency(Some(7)));
        assert_eq!(parse("duty 70", Mode::Astable), Command::DutyCycle(Some(70)));
    }

    #[test]
    fn test_bad_arguments() {
        assert_eq!(parse("freq", Mode::Astable), Command::Frequency(None));
        assert_eq!(parse("freq -5", Mode::Astable), Command::Frequency(None));
        assert_eq!(parse("freq +5", Mode::Astable), Command::Frequency(None));
        assert_eq!(parse("duty abc", Mode::Astable), Command::DutyCycle(None));
        assert_eq!(parse("freq 99999999999", Mode::Astable), Command::Frequency(None));
    }
}
