use mutually_exclusive_features::exactly_one_of;

use crate::{error::CalibrationError, sensors::moisture_sensor::Calibration};

exactly_one_of!("capacitive-probe", "full-scale-probe");

#[cfg(feature = "capacitive-probe")]
pub const DEFAULT_CALIBRATION: Calibration = Calibration::CAPACITIVE_PROBE;

#[cfg(feature = "full-scale-probe")]
pub const DEFAULT_CALIBRATION: Calibration = Calibration::FULL_SCALE_PROBE;

pub const DEFAULT_THRESHOLD: f32 = 20.0;
pub const DEFAULT_ACTUATION_WINDOW_MS: u32 = 500;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1_000;

/// Speed argument handed to the pump. 0 is full strength on the inverted stage.
pub const FULL_STRENGTH: f32 = 0.0;

#[derive(Debug, Clone, PartialEq)]
pub struct IrrigationConfig {
    pub calibration: Calibration,
    /// Starting threshold in percent. Never written back.
    pub initial_threshold: f32,
    pub actuation_window_ms: u32,
    pub tick_interval_ms: u32,
    pub pump_speed_percent: f32,
}

impl IrrigationConfig {
    pub fn with_calibration(min_raw: u16, max_raw: u16) -> Result<Self, CalibrationError> {
        Ok(Self {
            calibration: Calibration::new(min_raw, max_raw)?,
            ..Default::default()
        })
    }
}

impl Default for IrrigationConfig {
    fn default() -> Self {
        Self {
            calibration: DEFAULT_CALIBRATION,
            initial_threshold: DEFAULT_THRESHOLD,
            actuation_window_ms: DEFAULT_ACTUATION_WINDOW_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            pump_speed_percent: FULL_STRENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = IrrigationConfig::default();

        assert_eq!(config.calibration, DEFAULT_CALIBRATION);
        assert_eq!(config.initial_threshold, 20.0);
        assert_eq!(config.pump_speed_percent, FULL_STRENGTH);
        assert!(config.actuation_window_ms < config.tick_interval_ms);
    }

    #[cfg(feature = "capacitive-probe")]
    #[test]
    fn capacitive_window() {
        assert_eq!(DEFAULT_CALIBRATION.min_raw(), 2000);
        assert_eq!(DEFAULT_CALIBRATION.max_raw(), 3500);
    }

    #[test]
    fn custom_calibration() {
        let config = IrrigationConfig::with_calibration(0, 4095).unwrap();
        assert_eq!(config.calibration, Calibration::FULL_SCALE_PROBE);
        assert_eq!(config.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);

        assert!(IrrigationConfig::with_calibration(3500, 2000).is_err());
    }
}
