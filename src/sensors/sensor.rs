use crate::error::SensorReadError;

/// Anything that can hand back one raw moisture sample.
pub trait MoistureSource {
    fn read_raw(&mut self) -> Result<u16, SensorReadError>;
}
