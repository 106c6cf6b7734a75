use std::sync::atomic::{AtomicBool, Ordering};

use esp_idf_svc::nvs::{EspCustomNvsPartition, EspNvs, NvsCustom};

use crate::sensors::moisture_sensor::Calibration;
use crate::string_error::StringError;

use super::main_configuration::IrrigationConfig;

static IS_NVS_TAKEN: AtomicBool = AtomicBool::new(false);

const PARTITION_NAME: &str = "config";
const NAMESPACE: &str = "config";

pub const KEY_MIN_RAW: &str = "MINRAW";
pub const KEY_MAX_RAW: &str = "MAXRAW";
pub const KEY_WINDOW: &str = "WINDOW";
pub const KEY_INTERVAL: &str = "INTERVAL";

/// Read-only view of the `config` NVS partition. The moisture threshold is not
/// stored here and resets to its default on every boot.
pub struct NvsConfiguration {
    nvs: EspNvs<NvsCustom>,
}

impl NvsConfiguration {
    pub fn new() -> Result<Self, StringError> {
        if IS_NVS_TAKEN.load(Ordering::Relaxed) {
            return Err(StringError("NvsConfiguration NVS already taken"));
        }

        IS_NVS_TAKEN.store(true, Ordering::Relaxed);

        let nvs_custom = match EspCustomNvsPartition::take(PARTITION_NAME) {
            Ok(nvs) => nvs,
            Err(_) => return Err(StringError("Fail to take partition")),
        };

        match EspNvs::new(nvs_custom, NAMESPACE, true) {
            Ok(nvs) => Ok(Self { nvs }),
            Err(_) => Err(StringError("Failed to create EspNvs. Bad namespace ?")),
        }
    }

    pub fn get_min_raw(&self, default: u16) -> u16 {
        self.read_u16(KEY_MIN_RAW, default)
    }

    pub fn get_max_raw(&self, default: u16) -> u16 {
        self.read_u16(KEY_MAX_RAW, default)
    }

    pub fn get_actuation_window_ms(&self, default: u32) -> u32 {
        self.read_u32(KEY_WINDOW, default)
    }

    pub fn get_tick_interval_ms(&self, default: u32) -> u32 {
        self.read_u32(KEY_INTERVAL, default)
    }

    /// Compiled-in defaults overlaid with whatever keys the partition holds.
    pub fn load_irrigation_config(&self) -> anyhow::Result<IrrigationConfig> {
        let defaults = IrrigationConfig::default();

        let calibration = Calibration::new(
            self.get_min_raw(defaults.calibration.min_raw()),
            self.get_max_raw(defaults.calibration.max_raw()),
        )?;

        Ok(IrrigationConfig {
            calibration,
            actuation_window_ms: self.get_actuation_window_ms(defaults.actuation_window_ms),
            tick_interval_ms: self.get_tick_interval_ms(defaults.tick_interval_ms),
            ..defaults
        })
    }

    pub fn read_u16(&self, key: &str, default: u16) -> u16 {
        self.nvs.get_u16(key).unwrap_or(None).unwrap_or(default)
    }

    pub fn read_u32(&self, key: &str, default: u32) -> u32 {
        self.nvs.get_u32(key).unwrap_or(None).unwrap_or(default)
    }
}

impl Drop for NvsConfiguration {
    fn drop(&mut self) {
        IS_NVS_TAKEN.store(false, Ordering::Relaxed);
    }
}
