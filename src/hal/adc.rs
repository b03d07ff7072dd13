//! Potentiometer on ADC1 channel 0 (GPIO1).

use esp_idf_svc::hal::adc::attenuation::DB_11;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::adc::ADC1;
use esp_idf_svc::hal::gpio::Gpio1;
use esp_idf_svc::sys::EspError;

use crate::sampler::AnalogSource;

/// One-shot 12-bit reads of the tuning potentiometer.
pub struct Potentiometer<'d> {
    channel: AdcChannelDriver<'d, Gpio1, AdcDriver<'d, ADC1>>,
}

impl<'d> Potentiometer<'d> {
    pub fn new(adc1: ADC1, pin: Gpio1) -> Result<Self, EspError> {
        let adc = AdcDriver::new(adc1)?;
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { channel })
    }
}

impl AnalogSource for Potentiometer<'_> {
    type Error = EspError;

    fn read_raw(&mut self) -> Result<u16, EspError> {
        self.channel.read_raw()
    }
}
