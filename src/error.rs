use thiserror::Error;

/// Failure to obtain a usable moisture sample.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorReadError {
    /// The ADC driver reported an error
    #[error("analog read failed: {0}")]
    Adc(String),

    /// Sample is outside what the converter can produce
    #[error("raw sample {raw} exceeds ADC full scale {full_scale}")]
    OutOfRange { raw: u16, full_scale: u16 },
}

/// Failure to drive the pump PWM channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCommandError {
    #[error("failed to set PWM duty {duty}: {reason}")]
    SetDuty { duty: u16, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("max_raw ({max_raw}) must be greater than min_raw ({min_raw})")]
    EmptyWindow { min_raw: u16, max_raw: u16 },
}

/// Everything that can end a single control tick early.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrrigationError {
    #[error("sensor: {0}")]
    Sensor(#[from] SensorReadError),

    #[error("actuator: {0}")]
    Actuator(#[from] ActuatorCommandError),
}

pub type Result<T> = std::result::Result<T, IrrigationError>;
