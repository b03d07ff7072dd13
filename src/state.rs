//! Shared generator state.
//!
//! Touched by three execution contexts without locks:
//!
//! ```text
//! field            writers
//! ───────────────  ─────────────────────────────────────────
//! mode             button ISR, console (reset)
//! pulse_enabled    button ISR, pulse engine, console
//! frequency_hz     sampler thread, console
//! duty_cycle       console
//! timer_kind       console (reset only)
//! step_requested   console (set), pulse engine (take)
//! ```
//!
//! Every field is its own atomic. Fields are updated independently, so a
//! reader may see a mixed combination (new frequency, old duty cycle) for
//! one engine iteration. The engine re-reads on every iteration.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::config::{MAX_DUTY_CYCLE, MAX_FREQUENCY_HZ, SAMPLED_MAX_HZ, SAMPLED_MIN_HZ};
use crate::error::ClockError;

/// Generator timing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Free-running: output alternates high/low indefinitely.
    Astable = 0,
    /// Single step: output rests low until a step is requested.
    Monostable = 1,
}

impl Mode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Mode::Monostable,
            _ => Mode::Astable,
        }
    }

    /// The other mode.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Mode::Astable => Mode::Monostable,
            Mode::Monostable => Mode::Astable,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Astable => "Astable",
            Mode::Monostable => "Monostable",
        }
    }
}

/// Underlying pulse generation strategy.
///
/// Only `Repeating` drives the output; `Pwm` unlocks duty cycle edits and
/// the divider/wrap report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerKind {
    /// Repeating timer ("RPT").
    Repeating = 0,
    /// Hardware PWM slice ("PWM").
    Pwm = 1,
}

impl TimerKind {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => TimerKind::Pwm,
            _ => TimerKind::Repeating,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerKind::Repeating => "RPT",
            TimerKind::Pwm => "PWM",
        }
    }
}

/// Values restored by [`GeneratorState::reset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Defaults {
    pub frequency_hz: u32,
    pub duty_cycle: u8,
    pub mode: Mode,
    pub pulse_enabled: bool,
    pub timer_kind: TimerKind,
}

/// Lock-free generator state.
///
/// # Usage
///
/// ```ignore
/// static STATE: GeneratorState = GeneratorState::new(config::DEFAULTS);
///
/// // Console:
/// STATE.set_frequency(440)?;
///
/// // Button ISR:
/// STATE.toggle_mode();
///
/// // Pulse loop:
/// let snap = STATE.snapshot();
/// ```
pub struct GeneratorState {
    defaults: Defaults,
    mode: AtomicU8,
    pulse_enabled: AtomicBool,
    frequency_hz: AtomicU32,
    duty_cycle: AtomicU8,
    timer_kind: AtomicU8,
    step_requested: AtomicBool,
}

impl GeneratorState {
    /// Create state initialized to `defaults`.
    pub const fn new(defaults: Defaults) -> Self {
        // Zero would make the period computation divide by zero
        let frequency_hz = if defaults.frequency_hz == 0 { 1 } else { defaults.frequency_hz };
        Self {
            defaults: Defaults { frequency_hz, ..defaults },
            mode: AtomicU8::new(defaults.mode as u8),
            pulse_enabled: AtomicBool::new(defaults.pulse_enabled),
            frequency_hz: AtomicU32::new(frequency_hz),
            duty_cycle: AtomicU8::new(defaults.duty_cycle),
            timer_kind: AtomicU8::new(defaults.timer_kind as u8),
            step_requested: AtomicBool::new(false),
        }
    }

    /// Restore power-on defaults in place.
    pub fn reset(&self) {
        let d = self.defaults;
        self.step_requested.store(false, Ordering::Release);
        self.frequency_hz.store(d.frequency_hz, Ordering::Release);
        self.duty_cycle.store(d.duty_cycle, Ordering::Release);
        self.timer_kind.store(d.timer_kind as u8, Ordering::Release);
        self.mode.store(d.mode as u8, Ordering::Release);
        self.pulse_enabled.store(d.pulse_enabled, Ordering::Release);
    }

    /// Defaults this state was created with.
    pub fn defaults(&self) -> Defaults {
        self.defaults
    }

    // --- Frequency ---

    #[inline]
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz.load(Ordering::Acquire)
    }

    /// Set output frequency. Accepts `1..=125_000_000`.
    pub fn set_frequency(&self, hz: u32) -> Result<(), ClockError> {
        if hz > MAX_FREQUENCY_HZ {
            return Err(ClockError::FrequencyTooHigh);
        }
        if hz == 0 {
            return Err(ClockError::FrequencyTooLow);
        }
        self.frequency_hz.store(hz, Ordering::Release);
        Ok(())
    }

    /// Frequency from the potentiometer sampler, clamped to its 1..=1000 Hz range.
    pub fn update_sampled_frequency(&self, hz: u32) {
        self.frequency_hz
            .store(hz.clamp(SAMPLED_MIN_HZ, SAMPLED_MAX_HZ), Ordering::Release);
    }

    // --- Duty cycle ---

    #[inline]
    pub fn duty_cycle(&self) -> u8 {
        self.duty_cycle.load(Ordering::Acquire)
    }

    /// Set duty cycle percent. Only allowed with [`TimerKind::Pwm`].
    pub fn set_duty_cycle(&self, percent: u32) -> Result<(), ClockError> {
        if self.timer_kind() != TimerKind::Pwm {
            return Err(ClockError::DutyRequiresPwm);
        }
        if percent > MAX_DUTY_CYCLE as u32 {
            return Err(ClockError::DutyTooHigh);
        }
        self.duty_cycle.store(percent as u8, Ordering::Release);
        Ok(())
    }

    // --- Timer kind ---

    #[inline]
    pub fn timer_kind(&self) -> TimerKind {
        TimerKind::from_u8(self.timer_kind.load(Ordering::Acquire))
    }

    // --- Mode / pulse ---

    #[inline]
    pub fn mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Acquire))
    }

    #[inline]
    pub fn pulse_enabled(&self) -> bool {
        self.pulse_enabled.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_pulse_enabled(&self, enabled: bool) {
        self.pulse_enabled.store(enabled, Ordering::Release);
    }

    /// Flip between Astable and Monostable.
    ///
    /// Entering Monostable holds the output low until a step; entering
    /// Astable resumes free-running. Returns the new mode.
    pub fn toggle_mode(&self) -> Mode {
        let next = self.mode().toggled();
        self.mode.store(next as u8, Ordering::Release);
        self.pulse_enabled
            .store(next == Mode::Astable, Ordering::Release);
        next
    }

    /// Arm one Monostable pulse (STEP button, implicit console step).
    ///
    /// Returns `false` and does nothing in Astable.
    pub fn arm_step(&self) -> bool {
        if self.mode() != Mode::Monostable {
            return false;
        }
        self.pulse_enabled.store(true, Ordering::Release);
        true
    }

    /// Return to armed-low without stepping.
    #[inline]
    pub fn disarm(&self) {
        self.pulse_enabled.store(false, Ordering::Release);
    }

    /// Force a single pulse on the next engine iteration, whatever the mode.
    #[inline]
    pub fn request_step(&self) {
        self.step_requested.store(true, Ordering::Release);
    }

    /// Consume a pending forced step.
    #[inline]
    pub fn take_step_request(&self) -> bool {
        self.step_requested.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn step_pending(&self) -> bool {
        self.step_requested.load(Ordering::Acquire)
    }

    /// Get a snapshot of the current state.
    ///
    /// Fields are read one by one; see the module docs for consistency.
    #[inline]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            mode: self.mode(),
            pulse_enabled: self.pulse_enabled(),
            frequency_hz: self.frequency_hz(),
            duty_cycle: self.duty_cycle(),
            timer_kind: self.timer_kind(),
        }
    }
}

/// Snapshot of generator state at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateSnapshot {
    pub mode: Mode,
    pub pulse_enabled: bool,
    pub frequency_hz: u32,
    pub duty_cycle: u8,
    pub timer_kind: TimerKind,
}
