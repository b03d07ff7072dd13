//! Potentiometer frequency source.
//!
//! Averages [`ADC_SAMPLES`] raw readings spaced [`ADC_SAMPLE_SPACING_MS`]
//! apart and maps the 12-bit average onto 1..=1000 Hz. Runs on its own
//! thread and only ever writes `frequency_hz`.

use embedded_hal::delay::DelayNs;

use crate::config::{
    ADC_FULL_SCALE, ADC_PERIOD_MS, ADC_SAMPLES, ADC_SAMPLE_SPACING_MS, SAMPLED_MAX_HZ,
    SAMPLED_MIN_HZ,
};
use crate::state::GeneratorState;

/// Raw analog input.
pub trait AnalogSource {
    type Error: core::fmt::Debug;

    /// Single raw reading, 0..=4095.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Map a raw average onto the sampled frequency range.
///
/// `0 → 1 Hz`, `4095 → 1000 Hz`.
#[inline]
pub fn raw_to_frequency(raw: u32) -> u32 {
    let raw = raw.min(ADC_FULL_SCALE);
    raw * (SAMPLED_MAX_HZ - SAMPLED_MIN_HZ) / ADC_FULL_SCALE + SAMPLED_MIN_HZ
}

/// Averaging frequency sampler.
pub struct FrequencySampler<A, D> {
    adc: A,
    delay: D,
    samples: u32,
}

impl<A, D> FrequencySampler<A, D>
where
    A: AnalogSource,
    D: DelayNs,
{
    pub fn new(adc: A, delay: D) -> Self {
        Self { adc, delay, samples: ADC_SAMPLES }
    }

    /// Average `samples` readings and return the mapped frequency.
    pub fn measure(&mut self) -> Result<u32, A::Error> {
        let mut sum: u32 = 0;
        for _ in 0..self.samples {
            sum += self.adc.read_raw()? as u32;
            self.delay.delay_ms(ADC_SAMPLE_SPACING_MS);
        }
        Ok(raw_to_frequency(sum / self.samples))
    }

    /// One update round: measure, publish, pause.
    pub fn update(&mut self, state: &GeneratorState) -> Result<u32, A::Error> {
        let result = self.measure();
        if let Ok(hz) = result {
            state.update_sampled_frequency(hz);
        }
        self.delay.delay_ms(ADC_PERIOD_MS);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Defaults, Mode, TimerKind};

    struct FixedAdc(u16);

    impl AnalogSource for FixedAdc {
        type Error = ();
        fn read_raw(&mut self) -> Result<u16, ()> {
            Ok(self.0)
        }
    }

    struct FailingAdc;

    impl AnalogSource for FailingAdc {
        type Error = &'static str;
        fn read_raw(&mut self) -> Result<u16, &'static str> {
            Err("adc busy")
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ms: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns as u64 / 1_000_000;
        }
        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms as u64;
        }
    }

    fn state() -> GeneratorState {
        GeneratorState::new(Defaults {
            frequency_hz: 1,
            duty_cycle: 50,
            mode: Mode::Astable,
            pulse_enabled: true,
            timer_kind: TimerKind::Repeating,
        })
    }

    #[test]
    fn test_raw_to_frequency_endpoints() {
        assert_eq!(raw_to_frequency(0), 1);
        assert_eq!(raw_to_frequency(4095), 1000);
        assert_eq!(raw_to_frequency(9999), 1000);
        assert_eq!(raw_to_frequency(2048), 2048 * 999 / 4095 + 1);
    }

    #[test]
    fn test_update_publishes_frequency() {
        let state = state();
        let mut sampler = FrequencySampler::new(FixedAdc(4095), CountingDelay::default());

        assert_eq!(sampler.update(&state), Ok(1000));
        assert_eq!(state.frequency_hz(), 1000);
        // 64 samples * 10 ms + 1000 ms pause
        assert_eq!(sampler.delay.total_ms, 64 * 10 + 1000);
    }

    #[test]
    fn test_failed_read_keeps_frequency() {
        let state = state();
        state.set_frequency(42).unwrap();
        let mut sampler = FrequencySampler::new(FailingAdc, CountingDelay::default());

        assert_eq!(sampler.update(&state), Err("adc busy"));
        assert_eq!(state.frequency_hz(), 42);
    }
}
