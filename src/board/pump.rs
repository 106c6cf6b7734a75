//! Water pump on a PWM channel.
//!
//! The driver stage is inverted: the pump is idle at `DUTY_MAX` and runs
//! hardest at duty 0.

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::ledc::LedcDriver;
use log::info;

use crate::error::ActuatorCommandError;

/// Full-scale duty (16-bit PWM).
pub const DUTY_MAX: u16 = u16::MAX;

/// Raw duty writer for one PWM output.
pub trait PwmChannel {
    fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorCommandError>;
}

pub trait Actuator {
    fn engage(&mut self, speed_percent: f32) -> Result<(), ActuatorCommandError>;
    fn disengage(&mut self) -> Result<(), ActuatorCommandError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorState {
    Idle,
    Running,
}

/// `floor(speed_percent / 100 * DUTY_MAX)` clamped to `[0, DUTY_MAX]`.
pub fn speed_to_duty(speed_percent: f32) -> u16 {
    let duty = (speed_percent / 100.0 * DUTY_MAX as f32).floor();
    duty.clamp(0.0, DUTY_MAX as f32) as u16
}

pub struct PumpActuator<P: PwmChannel> {
    pwm: P,
    state: ActuatorState,
}

impl<P: PwmChannel> PumpActuator<P> {
    /// Takes the channel and parks it at `DUTY_MAX` so the pump starts stopped.
    pub fn new(pwm: P) -> Result<Self, ActuatorCommandError> {
        let mut s = Self {
            pwm,
            state: ActuatorState::Idle,
        };

        s.pwm.set_duty(DUTY_MAX)?;

        Ok(s)
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }
}

impl<P: PwmChannel> Actuator for PumpActuator<P> {
    /// Writes `speed_to_duty(speed_percent)` as-is. Because of the inverted
    /// stage, 0 means full strength; the irrigation loop always asks for 0.
    fn engage(&mut self, speed_percent: f32) -> Result<(), ActuatorCommandError> {
        let duty = speed_to_duty(speed_percent);
        info!("Starting the pump with speed of {speed_percent} (duty {duty})");

        self.state = ActuatorState::Running;
        self.pwm.set_duty(duty)
    }

    fn disengage(&mut self) -> Result<(), ActuatorCommandError> {
        info!("Stopping the pump");

        self.pwm.set_duty(DUTY_MAX)?;
        self.state = ActuatorState::Idle;
        Ok(())
    }
}

/// LEDC channel scaled from the 16-bit duty span to the timer's resolution.
#[cfg(target_os = "espidf")]
pub struct LedcPump<'a> {
    driver: LedcDriver<'a>,
}

#[cfg(target_os = "espidf")]
impl<'a> LedcPump<'a> {
    pub fn new(driver: LedcDriver<'a>) -> Self {
        Self { driver }
    }
}

#[cfg(target_os = "espidf")]
impl PwmChannel for LedcPump<'_> {
    fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorCommandError> {
        let max_duty = self.driver.get_max_duty() as u64;
        let native = (duty as u64 * max_duty / DUTY_MAX as u64) as u32;

        self.driver
            .set_duty(native)
            .map_err(|e| ActuatorCommandError::SetDuty {
                duty,
                reason: e.to_string(),
            })
    }
}
