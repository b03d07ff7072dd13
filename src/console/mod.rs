//! Serial console for inspection and control
//!
//! Polled from a periodic timer - no dedicated task.
//! Zero heap allocation - all static buffers.

pub mod commands;
pub mod io;
pub mod line_buffer;
pub mod parser;
pub mod report;
pub mod session;

pub use commands::{command_names, execute, COMMANDS};
pub use io::{SerialPort, System};
pub use line_buffer::LineBuffer;
pub use parser::{parse, Command};
pub use session::{ConsoleSession, Phase, PollEvent};
