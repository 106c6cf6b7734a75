use esp_idf_svc::hal::{
    adc::{oneshot::AdcDriver, ADC2},
    gpio::*,
    ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution, LEDC},
    prelude::*,
};

use crate::sensors::adc_moisture_source::AdcMoistureSource;

use super::{buttons::Buttons, pump::LedcPump};

const PUMP_PWM_FREQUENCY_HZ: u32 = 1_000;

pub struct Board<'a> {
    pub moisture: AdcMoistureSource<'a, ADC2, Gpio12, AdcDriver<'a, ADC2>>,
    pub buttons: Buttons<'a>,
    pub pump: LedcPump<'a>,
}

impl<'a> Board<'a> {
    pub fn new(adc_2: ADC2, pins: Pins, ledc: LEDC) -> anyhow::Result<Self> {
        let timer = LedcTimerDriver::new(
            ledc.timer0,
            &TimerConfig::new()
                .frequency(PUMP_PWM_FREQUENCY_HZ.Hz().into())
                .resolution(Resolution::Bits16),
        )?;

        let mut s = Self {
            moisture: AdcMoistureSource::new(AdcDriver::new(adc_2)?, pins.gpio12)?,
            buttons: Buttons {
                left: PinDriver::input(pins.gpio0)?,
                right: PinDriver::input(pins.gpio35)?,
            },
            pump: LedcPump::new(LedcDriver::new(ledc.channel0, timer, pins.gpio13)?),
        };

        // GPIO35 is input-only and relies on the board's external pull-up.
        s.buttons.left.set_pull(Pull::Up)?;
        Ok(s)
    }
}
