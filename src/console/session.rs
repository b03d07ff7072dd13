//! Polled console session.
//!
//! [`ConsoleSession::poll`] runs from a 50 ms timer and consumes at most one
//! byte per tick. A completed line is dispatched with the session disarmed;
//! afterwards the session re-arms: prompt, flush of pending input, fresh
//! line. Nothing but [`GeneratorState`] survives from one command to the
//! next.
//!
//! While a pulse half-cycle sleeps on the main task the console keeps
//! polling on its own timer, but a `step` or mode change it issues is only
//! observed by the generator at the next cycle boundary. Command latency is
//! therefore bounded by the pulse period, not by the poll interval.

use core::fmt::Write as _;

use super::commands::execute;
use super::io::{SerialPort, System};
use super::line_buffer::LineBuffer;
use super::parser::{parse, Command};
use super::report::print_banner;
use crate::config::PROMPT;
use crate::error::ClockError;
use crate::state::GeneratorState;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Reading vs. running a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Polling for input.
    Armed,
    /// A command is executing; input is not read.
    Busy,
}

/// Result of one poll tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollEvent {
    /// No byte pending, or session busy.
    Idle,
    /// Byte appended to the line.
    Buffered,
    /// Byte dropped: line full.
    Overflow,
    /// Last byte erased (or nothing to erase).
    Erased,
    /// Line dispatched.
    Dispatched(Command, Result<(), ClockError>),
}

/// Console session state machine
pub struct ConsoleSession {
    line: LineBuffer,
    phase: Phase,
}

impl ConsoleSession {
    /// Create a session; call [`start`](Self::start) before polling.
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            phase: Phase::Busy,
        }
    }

    /// Print the boot banner and arm.
    pub fn start<S: SerialPort>(
        &mut self,
        port: &mut S,
        state: &GeneratorState,
        system: &dyn System,
    ) {
        print_banner(port, &state.snapshot(), system.sys_clock_hz());
        self.rearm(port);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.phase == Phase::Armed
    }

    /// Current partial line.
    pub fn pending_line(&self) -> &str {
        self.line.as_str()
    }

    /// One timer tick: read at most one byte and act on it.
    pub fn poll<S: SerialPort>(
        &mut self,
        port: &mut S,
        state: &GeneratorState,
        system: &mut dyn System,
    ) -> PollEvent {
        if self.phase != Phase::Armed {
            return PollEvent::Idle;
        }

        let Some(byte) = port.read_byte() else {
            return PollEvent::Idle;
        };

        match byte {
            BACKSPACE | DELETE => {
                if self.line.backspace() {
                    let _ = port.write_str(" \x08 \x08");
                } else {
                    // Keep the terminal cursor at the prompt
                    let _ = port.write_str(" ");
                }
                PollEvent::Erased
            }

            b'\r' | b'\n' => {
                let (cmd, result) = self.dispatch(port, state, system);
                PollEvent::Dispatched(cmd, result)
            }

            _ => {
                if self.line.push(byte) {
                    PollEvent::Buffered
                } else {
                    PollEvent::Overflow
                }
            }
        }
    }

    fn dispatch<S: SerialPort>(
        &mut self,
        port: &mut S,
        state: &GeneratorState,
        system: &mut dyn System,
    ) -> (Command, Result<(), ClockError>) {
        self.phase = Phase::Busy;

        let cmd = parse(self.line.as_str(), state.mode());
        let result = execute(&cmd, state, system, port);
        if let Err(e) = result {
            let _ = writeln!(port, "{}", e);
        }

        self.line.clear();
        self.rearm(port);
        (cmd, result)
    }

    /// Prompt, drop input typed during the command (through the next LF), arm.
    fn rearm<S: SerialPort>(&mut self, port: &mut S) {
        let _ = port.write_str(PROMPT);
        while let Some(b) = port.read_byte() {
            if b == b'\n' {
                break;
            }
        }
        self.line.clear();
        self.phase = Phase::Armed;
    }
}

impl Default for ConsoleSession {
    fn default() -> Self {
        Self::new()
    }
}
