//! Irrigation control loop.
//!
//! Each tick polls the buttons, adjusts the threshold, samples the probe and,
//! when the soil is drier than the threshold, runs the pump for a fixed
//! window. Watering happens in short bursts, one per tick, for as long as the
//! soil stays dry.

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::delay::FreeRtos;
use log::{debug, error, info, warn};
use serde_json::json;

use crate::{
    board::{
        buttons::{ButtonId, ButtonSource, ThresholdInput},
        pump::Actuator,
    },
    configuration::main_configuration::IrrigationConfig,
    display::StatusDisplay,
    error::{ActuatorCommandError, IrrigationError, Result},
    sensors::{
        moisture_sensor::{MoistureReading, MoistureSensor},
        sensor::MoistureSource,
    },
};

/// Blocking wait used for the actuation window and between ticks.
pub trait Sleep {
    fn sleep_ms(&mut self, ms: u32);
}

#[cfg(target_os = "espidf")]
pub struct FreeRtosSleep;

#[cfg(target_os = "espidf")]
impl Sleep for FreeRtosSleep {
    fn sleep_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Watering,
}

/// What a completed tick saw and did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub pressed: Option<ButtonId>,
    pub reading: MoistureReading,
    pub threshold: f32,
    pub watered: bool,
}

impl TickReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "raw": self.reading.raw,
            "moisture": self.reading.percent,
            "threshold": self.threshold,
            "watered": self.watered,
        })
    }
}

/// Holds the pump between engage and disengage. Disengage runs on `release`
/// or, if the guard is dropped early (panic, early return), from `Drop`.
struct PumpRun<'a, A: Actuator> {
    actuator: &'a mut A,
    state: &'a mut ControllerState,
    armed: bool,
}

impl<'a, A: Actuator> PumpRun<'a, A> {
    fn start(actuator: &'a mut A, state: &'a mut ControllerState) -> Self {
        *state = ControllerState::Watering;
        Self {
            actuator,
            state,
            armed: true,
        }
    }

    fn engage(&mut self, speed_percent: f32) -> std::result::Result<(), ActuatorCommandError> {
        self.actuator.engage(speed_percent)
    }

    fn release(mut self) -> std::result::Result<(), ActuatorCommandError> {
        self.armed = false;
        *self.state = ControllerState::Idle;
        self.actuator.disengage()
    }
}

impl<A: Actuator> Drop for PumpRun<'_, A> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        *self.state = ControllerState::Idle;
        if let Err(e) = self.actuator.disengage() {
            error!("Failed to stop the pump: {e}");
        }
    }
}

pub struct IrrigationController<S, B, A, D>
where
    S: MoistureSource,
    B: ButtonSource,
    A: Actuator,
    D: Sleep,
{
    sensor: MoistureSensor<S>,
    input: ThresholdInput<B>,
    actuator: A,
    sleep: D,
    display: Option<Box<dyn StatusDisplay>>,

    threshold: f32,
    state: ControllerState,

    actuation_window_ms: u32,
    tick_interval_ms: u32,
    pump_speed_percent: f32,
}

impl<S, B, A, D> IrrigationController<S, B, A, D>
where
    S: MoistureSource,
    B: ButtonSource,
    A: Actuator,
    D: Sleep,
{
    pub fn new(config: &IrrigationConfig, source: S, buttons: B, actuator: A, sleep: D) -> Self {
        Self {
            sensor: MoistureSensor::new(source, config.calibration),
            input: ThresholdInput::new(buttons),
            actuator,
            sleep,
            display: None,

            threshold: config.initial_threshold,
            state: ControllerState::Idle,

            actuation_window_ms: config.actuation_window_ms,
            tick_interval_ms: config.tick_interval_ms,
            pump_speed_percent: config.pump_speed_percent,
        }
    }

    pub fn with_display(mut self, display: impl StatusDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// One control tick, without the trailing inter-cycle wait.
    ///
    /// A sensor error returns before any actuation decision. An actuator error
    /// is returned only after disengage has been attempted.
    pub fn tick(&mut self) -> Result<TickReport> {
        let pressed = self.input.poll();
        if let Some(button) = pressed {
            self.adjust_threshold(button);
        }

        let reading = self.sensor.sample()?;
        debug!("Moisture level: {reading}");

        let actuation = (reading.percent < self.threshold).then(|| self.water());
        let watered = actuation.is_some();

        if let Some(display) = self.display.as_mut() {
            display.show(reading.percent, self.threshold);
        }

        if let Some(result) = actuation {
            result?;
        }

        Ok(TickReport {
            pressed,
            reading,
            threshold: self.threshold,
            watered,
        })
    }

    /// Tick, report the outcome, then wait for the next cycle. Errors never
    /// escape: the next call runs a fresh tick.
    pub fn step(&mut self) -> Option<TickReport> {
        let report = match self.tick() {
            Ok(report) => {
                debug!("{}", report.to_json());
                Some(report)
            }
            Err(IrrigationError::Sensor(e)) => {
                warn!("Moisture read failed, not watering this tick: {e}");
                None
            }
            Err(e) => {
                error!("Tick aborted: {e}");
                None
            }
        };

        self.sleep.sleep_ms(self.tick_interval_ms);
        report
    }

    pub fn run(&mut self) -> ! {
        let calibration = self.sensor.calibration();
        info!(
            "Irrigation loop started (raw {}..{}, threshold {:.1} %, window {} ms, interval {} ms)",
            calibration.min_raw(),
            calibration.max_raw(),
            self.threshold,
            self.actuation_window_ms,
            self.tick_interval_ms
        );

        loop {
            self.step();
        }
    }

    fn adjust_threshold(&mut self, button: ButtonId) {
        self.threshold += button.threshold_delta();
        info!("{button:?} button: threshold now {:.1} %", self.threshold);

        if !(0.0..=100.0).contains(&self.threshold) {
            warn!("Threshold {:.1} % is outside 0-100 %", self.threshold);
        }
    }

    fn water(&mut self) -> std::result::Result<(), ActuatorCommandError> {
        let mut pump = PumpRun::start(&mut self.actuator, &mut self.state);

        let engaged = pump.engage(self.pump_speed_percent);
        if engaged.is_ok() {
            self.sleep.sleep_ms(self.actuation_window_ms);
        }

        let released = pump.release();
        engaged.and(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorReadError;

    struct Fixed(u16);

    impl MoistureSource for Fixed {
        fn read_raw(&mut self) -> std::result::Result<u16, SensorReadError> {
            Ok(self.0)
        }
    }

    struct NoButtons;

    impl ButtonSource for NoButtons {
        fn is_low(&mut self, _button: ButtonId) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct Calls(Vec<&'static str>);

    impl Actuator for Calls {
        fn engage(&mut self, _speed_percent: f32) -> std::result::Result<(), ActuatorCommandError> {
            self.0.push("engage");
            Ok(())
        }

        fn disengage(&mut self) -> std::result::Result<(), ActuatorCommandError> {
            self.0.push("disengage");
            Ok(())
        }
    }

    struct NoSleep;

    impl Sleep for NoSleep {
        fn sleep_ms(&mut self, _ms: u32) {}
    }

    #[test]
    fn guard_disengages_when_dropped_armed() {
        let mut actuator = Calls::default();
        let mut state = ControllerState::Idle;

        {
            let mut run = PumpRun::start(&mut actuator, &mut state);
            run.engage(0.0).unwrap();
        }

        assert_eq!(state, ControllerState::Idle);
        assert_eq!(actuator.0, vec!["engage", "disengage"]);
    }

    #[test]
    fn guard_release_disengages_once() {
        let mut actuator = Calls::default();
        let mut state = ControllerState::Idle;

        let mut run = PumpRun::start(&mut actuator, &mut state);
        run.engage(0.0).unwrap();
        run.release().unwrap();

        assert_eq!(actuator.0, vec!["engage", "disengage"]);
    }

    #[test]
    fn report_json() {
        let config = IrrigationConfig::with_calibration(2000, 3500).unwrap();
        let mut controller =
            IrrigationController::new(&config, Fixed(3500), NoButtons, Calls::default(), NoSleep);

        let report = controller.tick().unwrap();

        assert_eq!(
            report.to_json(),
            json!({"raw": 3500, "moisture": 0.0, "threshold": 20.0, "watered": true})
        );
        assert_eq!(controller.state(), ControllerState::Idle);
    }
}
