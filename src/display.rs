use log::info;

/// Read-only consumer of the latest moisture and threshold. Implementations
/// must not block the control loop.
pub trait StatusDisplay {
    fn show(&mut self, moisture_percent: f32, threshold: f32);
}

/// Mirrors the status on the serial console through the logger.
#[derive(Debug, Default)]
pub struct SerialDisplay;

impl SerialDisplay {
    pub fn format(moisture_percent: f32, threshold: f32) -> String {
        format!("Moisture level: {moisture_percent:.1} % (threshold {threshold:.1} %)")
    }
}

impl StatusDisplay for SerialDisplay {
    fn show(&mut self, moisture_percent: f32, threshold: f32) {
        info!("{}", Self::format(moisture_percent, threshold));
    }
}
