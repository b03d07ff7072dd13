//! Validation errors reported on the console

/// Rejected command or setting. State is never modified when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// Frequency above 125 MHz
    FrequencyTooHigh,
    /// Frequency of 0 Hz
    FrequencyTooLow,
    /// Duty cycle edit while the timer kind is RPT
    DutyRequiresPwm,
    /// Duty cycle above 100 %
    DutyTooHigh,
    /// Argument missing, negative or not a number
    InvalidValue,
    /// No command matched
    UnknownCommand,
}

impl ClockError {
    /// One-line message printed on the console
    pub fn message(&self) -> &'static str {
        match self {
            Self::FrequencyTooHigh => "Frequency cannot be greater than 125000000",
            Self::FrequencyTooLow => "Frequency must be at least 1",
            Self::DutyRequiresPwm => "Duty cycle can only be set in PWM mode",
            Self::DutyTooHigh => "Duty cycle cannot be greater than 100",
            Self::InvalidValue => "Invalid value",
            Self::UnknownCommand => "Unknown command",
        }
    }
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
