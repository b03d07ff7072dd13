//! Debounced button handling.
//!
//! The GPIO ISR calls [`handle_edge`] with a monotonic millisecond
//! timestamp. Each button has its own [`Debouncer`]; an edge arriving less
//! than [`DEBOUNCE_MS`](crate::config::DEBOUNCE_MS) after the last accepted
//! edge of the same button is dropped.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::DEBOUNCE_MS;
use crate::state::{GeneratorState, Mode};

/// Logical button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    /// Toggles Astable / Monostable.
    Mode = 0,
    /// Emits one pulse in Monostable.
    Step = 1,
}

impl Button {
    /// Convert from raw u8 value (ISR argument).
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Button::Step,
            _ => Button::Mode,
        }
    }
}

/// What an accepted edge did to the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    /// Mode toggled, new mode attached.
    ModeChanged(Mode),
    /// Monostable pulse armed.
    StepArmed,
    /// Edge accepted but STEP pressed in Astable: no effect.
    Ignored,
}

/// Last accepted edge timestamp of one button.
///
/// Written only from the ISR of that button.
pub struct Debouncer {
    last_accepted_ms: AtomicU32,
    seen: AtomicBool,
    window_ms: u32,
}

impl Debouncer {
    /// Create debouncer with the default 200 ms window.
    pub const fn new() -> Self {
        Self::with_window(DEBOUNCE_MS)
    }

    pub const fn with_window(window_ms: u32) -> Self {
        Self {
            last_accepted_ms: AtomicU32::new(0),
            seen: AtomicBool::new(false),
            window_ms,
        }
    }

    /// Accept the edge at `now_ms` unless it falls inside the window.
    ///
    /// Wrapping arithmetic keeps this correct across the u32 millisecond
    /// rollover (~49 days).
    #[inline]
    pub fn accept(&self, now_ms: u32) -> bool {
        let last = self.last_accepted_ms.load(Ordering::Acquire);
        if self.seen.load(Ordering::Acquire) && now_ms.wrapping_sub(last) < self.window_ms {
            return false;
        }
        self.last_accepted_ms.store(now_ms, Ordering::Release);
        self.seen.store(true, Ordering::Release);
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Debouncers for both buttons.
pub struct Buttons {
    mode: Debouncer,
    step: Debouncer,
}

impl Buttons {
    pub const fn new() -> Self {
        Self {
            mode: Debouncer::new(),
            step: Debouncer::new(),
        }
    }

    pub fn debouncer(&self, button: Button) -> &Debouncer {
        match button {
            Button::Mode => &self.mode,
            Button::Step => &self.step,
        }
    }
}

impl Default for Buttons {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle a falling edge from `button` at `now_ms`.
///
/// Returns `None` when the edge is dropped by the debouncer.
pub fn handle_edge(
    state: &GeneratorState,
    buttons: &Buttons,
    button: Button,
    now_ms: u32,
) -> Option<ButtonAction> {
    if !buttons.debouncer(button).accept(now_ms) {
        return None;
    }

    let action = match button {
        Button::Mode => ButtonAction::ModeChanged(state.toggle_mode()),
        Button::Step => {
            if state.arm_step() {
                ButtonAction::StepArmed
            } else {
                ButtonAction::Ignored
            }
        }
    };
    Some(action)
}
