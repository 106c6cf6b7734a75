pub mod moisture_sensor;
pub mod sensor;

#[cfg(target_os = "espidf")]
pub mod adc_moisture_source;
