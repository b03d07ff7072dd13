//! Pulse-train generator.
//!
//! Pure logic over `embedded-hal` traits: drives the clock output and the
//! status LED from [`GeneratorState`], sleeping with coarse millisecond
//! delays. Fully testable on host with mock pins.
//!
//! # Timing resolution
//!
//! The period is `1000 / frequency_hz` in whole milliseconds. Above 1000 Hz
//! it collapses to 0 ms and the output toggles as fast as the loop runs;
//! the generator does not try to hide this.
//!
//! # Cycle
//!
//! ```text
//!            high_ms          low_ms
//! Astable    ┌────────┐                ┌────
//!          ──┘        └────────────────┘
//!
//! Monostable ┌────────┐
//! (one step) ┘        └──────── (pulse cleared, no low sleep)
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::state::{GeneratorState, Mode};

/// High and low time of one period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseTiming {
    pub period_ms: u32,
    pub high_ms: u32,
    pub low_ms: u32,
}

impl PulseTiming {
    /// Compute timing for a frequency and duty cycle.
    ///
    /// A frequency of 0 is treated as 1 Hz; duty cycle saturates at 100.
    #[inline]
    pub fn compute(frequency_hz: u32, duty_cycle: u8) -> Self {
        let period_ms = 1000 / frequency_hz.max(1);
        let high_ms = period_ms * duty_cycle.min(100) as u32 / 100;
        Self {
            period_ms,
            high_ms,
            low_ms: period_ms - high_ms,
        }
    }
}

/// Outcome of one engine iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// Pulse disabled, nothing emitted, returned without sleeping.
    Idle,
    /// Full Astable period emitted.
    Astable(PulseTiming),
    /// Single Monostable pulse emitted, pulse now disabled.
    Monostable(PulseTiming),
    /// Pulse forced by the `step` command.
    ForcedStep(PulseTiming),
}

impl Cycle {
    /// Whether a high pulse was emitted.
    pub fn emitted(&self) -> bool {
        !matches!(self, Cycle::Idle)
    }

    /// Timing used, `None` when idle.
    pub fn timing(&self) -> Option<PulseTiming> {
        match *self {
            Cycle::Idle => None,
            Cycle::Astable(t) | Cycle::Monostable(t) | Cycle::ForcedStep(t) => Some(t),
        }
    }

    /// Whether the iteration slept at all.
    pub fn slept(&self) -> bool {
        match *self {
            Cycle::Idle => false,
            Cycle::Astable(t) => t.period_ms > 0,
            Cycle::Monostable(t) | Cycle::ForcedStep(t) => t.high_ms > 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cycle::Idle => "idle",
            Cycle::Astable(_) => "astable",
            Cycle::Monostable(_) => "monostable",
            Cycle::ForcedStep(_) => "step",
        }
    }
}

/// Pulse generator.
///
/// # Example
///
/// ```ignore
/// let mut engine = PulseEngine::new(&STATE, clock_pin, led_pin, FreeRtos);
/// loop {
///     match engine.run_once() {
///         Ok(Cycle::Idle) => FreeRtos::delay_ms(1),
///         Ok(_) => {}
///         Err(e) => ring_error!(LOG_RING, now, "pin: {:?}", e),
///     }
/// }
/// ```
pub struct PulseEngine<'a, P, D> {
    state: &'a GeneratorState,
    clock: P,
    led: P,
    delay: D,
}

impl<'a, P, D> PulseEngine<'a, P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(state: &'a GeneratorState, clock: P, led: P, delay: D) -> Self {
        Self { state, clock, led, delay }
    }

    /// Run one iteration: observe state, emit at most one high pulse.
    ///
    /// Frequency and duty are sampled before the pulse. The mode is read
    /// again after it, so a toggle during the high time decides whether the
    /// low time follows.
    pub fn run_once(&mut self) -> Result<Cycle, P::Error> {
        let snap = self.state.snapshot();
        let timing = PulseTiming::compute(snap.frequency_hz, snap.duty_cycle);

        if self.state.take_step_request() {
            self.emit_high(timing.high_ms)?;
            // A running Astable clock still owes its low time
            if self.state.pulse_enabled() && self.state.mode() == Mode::Astable {
                self.delay.delay_ms(timing.low_ms);
            }
            return Ok(Cycle::ForcedStep(timing));
        }

        if !snap.pulse_enabled {
            return Ok(Cycle::Idle);
        }

        self.emit_high(timing.high_ms)?;

        // MODE may have been pressed during the high time
        match self.state.mode() {
            Mode::Astable => {
                self.delay.delay_ms(timing.low_ms);
                Ok(Cycle::Astable(timing))
            }
            Mode::Monostable => {
                // Output already rests low
                self.state.disarm();
                Ok(Cycle::Monostable(timing))
            }
        }
    }

    /// Drive both outputs low, e.g. before handing the pins back.
    pub fn force_low(&mut self) -> Result<(), P::Error> {
        self.clock.set_low()?;
        self.led.set_low()
    }

    pub fn release(self) -> (P, P, D) {
        (self.clock, self.led, self.delay)
    }

    fn emit_high(&mut self, high_ms: u32) -> Result<(), P::Error> {
        self.clock.set_high()?;
        self.led.set_high()?;
        self.delay.delay_ms(high_ms);
        self.led.set_low()?;
        self.clock.set_low()
    }
}
