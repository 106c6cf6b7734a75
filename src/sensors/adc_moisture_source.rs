use std::borrow::Borrow;

use esp_idf_svc::hal::{
    adc::{
        attenuation,
        oneshot::{config::AdcChannelConfig, AdcChannelDriver, AdcDriver},
        Adc,
    },
    gpio::ADCPin,
};

use crate::error::SensorReadError;

use super::sensor::MoistureSource;

/// One-shot ADC channel wired to the soil probe. 11 dB attenuation, default
/// (12 bit) width, raw counts without eFuse calibration.
pub struct AdcMoistureSource<
    'a,
    ADC: Adc + 'a,
    APin: ADCPin<Adc = ADC>,
    M: Borrow<AdcDriver<'a, ADC>>,
> {
    channel: AdcChannelDriver<'a, APin, M>,
}

impl<'a, ADC: Adc + 'a, APin: ADCPin<Adc = ADC>, M: Borrow<AdcDriver<'a, ADC>>>
    AdcMoistureSource<'a, ADC, APin, M>
{
    pub fn new(adc_driver: M, pin_adc: APin) -> anyhow::Result<Self> {
        Ok(Self {
            channel: AdcChannelDriver::new(
                adc_driver,
                pin_adc,
                &AdcChannelConfig {
                    attenuation: attenuation::DB_11,
                    calibration: false,
                    ..Default::default()
                },
            )?,
        })
    }
}

impl<'a, ADC: Adc + 'a, APin: ADCPin<Adc = ADC>, M: Borrow<AdcDriver<'a, ADC>>> MoistureSource
    for AdcMoistureSource<'a, ADC, APin, M>
{
    fn read_raw(&mut self) -> Result<u16, SensorReadError> {
        self.channel
            .read_raw()
            .map_err(|e| SensorReadError::Adc(e.to_string()))
    }
}
