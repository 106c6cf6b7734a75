use std::fmt;

use crate::error::{CalibrationError, SensorReadError};

use super::sensor::MoistureSource;

/// Highest value a 12-bit conversion can return.
pub const ADC_FULL_SCALE: u16 = 4095;

/// Raw ADC bounds of the probe: `min_raw` reads as 100 %, `max_raw` as 0 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    min_raw: u16,
    max_raw: u16,
}

impl Calibration {
    /// Capacitive probe powered from 3.3 V, measured through the 11 dB attenuator.
    pub const CAPACITIVE_PROBE: Calibration = Calibration {
        min_raw: 2000,
        max_raw: 3500,
    };

    /// Probe that swings over the whole converter range.
    pub const FULL_SCALE_PROBE: Calibration = Calibration {
        min_raw: 0,
        max_raw: ADC_FULL_SCALE,
    };

    pub fn new(min_raw: u16, max_raw: u16) -> Result<Self, CalibrationError> {
        if max_raw <= min_raw {
            return Err(CalibrationError::EmptyWindow { min_raw, max_raw });
        }

        Ok(Self { min_raw, max_raw })
    }

    pub fn min_raw(&self) -> u16 {
        self.min_raw
    }

    pub fn max_raw(&self) -> u16 {
        self.max_raw
    }

    /// Moisture percentage for a raw sample. Not clamped: samples outside the
    /// window give values below 0 or above 100.
    pub fn percent(&self, raw: u16) -> f32 {
        let max = self.max_raw as f32;
        (max - raw as f32) * 100.0 / (max - self.min_raw as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistureReading {
    pub raw: u16,
    pub percent: f32,
}

impl fmt::Display for MoistureReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} % (raw value: {})", self.percent, self.raw)
    }
}

pub struct MoistureSensor<S: MoistureSource> {
    source: S,
    calibration: Calibration,
}

impl<S: MoistureSource> MoistureSensor<S> {
    pub fn new(source: S, calibration: Calibration) -> Self {
        Self {
            source,
            calibration,
        }
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn sample(&mut self) -> Result<MoistureReading, SensorReadError> {
        let raw = self.source.read_raw()?;

        if raw > ADC_FULL_SCALE {
            return Err(SensorReadError::OutOfRange {
                raw,
                full_scale: ADC_FULL_SCALE,
            });
        }

        Ok(MoistureReading {
            raw,
            percent: self.calibration.percent(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Result<u16, SensorReadError>);

    impl MoistureSource for FixedSource {
        fn read_raw(&mut self) -> Result<u16, SensorReadError> {
            self.0.clone()
        }
    }

    #[test]
    fn window_midpoint_is_half_wet() {
        let calibration = Calibration::new(2000, 3500).unwrap();
        assert_eq!(calibration.percent(2750), 50.0);
    }

    #[test]
    fn window_bounds_are_exact() {
        for calibration in [
            Calibration::CAPACITIVE_PROBE,
            Calibration::FULL_SCALE_PROBE,
            Calibration::new(1, 2).unwrap(),
            Calibration::new(123, 3999).unwrap(),
        ] {
            assert_eq!(calibration.percent(calibration.min_raw()), 100.0);
            assert_eq!(calibration.percent(calibration.max_raw()), 0.0);
        }
    }

    #[test]
    fn percent_decreases_as_raw_rises() {
        let calibration = Calibration::CAPACITIVE_PROBE;
        let mut previous = calibration.percent(calibration.min_raw());

        for raw in calibration.min_raw() + 1..=calibration.max_raw() {
            let current = calibration.percent(raw);
            assert!(current < previous, "raw {raw}: {current} >= {previous}");
            previous = current;
        }
    }

    #[test]
    fn outside_window_is_not_clamped() {
        let calibration = Calibration::CAPACITIVE_PROBE;
        assert!(calibration.percent(1000) > 100.0);
        assert!(calibration.percent(4000) < 0.0);
    }

    #[test]
    fn rejects_empty_window() {
        assert_eq!(
            Calibration::new(3500, 3500),
            Err(CalibrationError::EmptyWindow {
                min_raw: 3500,
                max_raw: 3500
            })
        );
        assert!(Calibration::new(3500, 2000).is_err());
    }

    #[test]
    fn sample_reports_raw_and_percent() {
        let mut sensor = MoistureSensor::new(FixedSource(Ok(2750)), Calibration::CAPACITIVE_PROBE);
        let reading = sensor.sample().unwrap();

        assert_eq!(reading.raw, 2750);
        assert_eq!(reading.percent, 50.0);
        assert_eq!(reading.to_string(), "50.0 % (raw value: 2750)");
    }

    #[test]
    fn sample_rejects_values_above_full_scale() {
        let mut sensor = MoistureSensor::new(FixedSource(Ok(4096)), Calibration::FULL_SCALE_PROBE);

        assert_eq!(
            sensor.sample(),
            Err(SensorReadError::OutOfRange {
                raw: 4096,
                full_scale: ADC_FULL_SCALE
            })
        );
    }

    #[test]
    fn sample_propagates_read_failure() {
        let failure = SensorReadError::Adc("ESP_ERR_TIMEOUT".to_string());
        let mut sensor = MoistureSensor::new(
            FixedSource(Err(failure.clone())),
            Calibration::CAPACITIVE_PROBE,
        );

        assert_eq!(sensor.sample(), Err(failure));
    }
}
