#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Left,
    Right,
}

impl ButtonId {
    /// Scan order; the first pressed button wins.
    pub const ALL: [ButtonId; 2] = [ButtonId::Left, ButtonId::Right];

    pub fn threshold_delta(self) -> f32 {
        match self {
            ButtonId::Left => 1.0,
            ButtonId::Right => -1.0,
        }
    }
}

/// Level access to the two operator buttons. Lines are active-low.
pub trait ButtonSource {
    fn is_low(&mut self, button: ButtonId) -> bool;
}

/// Level-triggered button poller. No debounce: a held button is reported on
/// every poll.
pub struct ThresholdInput<B: ButtonSource> {
    buttons: B,
}

impl<B: ButtonSource> ThresholdInput<B> {
    pub fn new(buttons: B) -> Self {
        Self { buttons }
    }

    pub fn poll(&mut self) -> Option<ButtonId> {
        let buttons = &mut self.buttons;
        ButtonId::ALL.into_iter().find(|&button| buttons.is_low(button))
    }
}

#[cfg(target_os = "espidf")]
pub struct Buttons<'a> {
    pub left: PinDriver<'a, Gpio0, Input>,
    pub right: PinDriver<'a, Gpio35, Input>,
}

#[cfg(target_os = "espidf")]
impl ButtonSource for Buttons<'_> {
    fn is_low(&mut self, button: ButtonId) -> bool {
        match button {
            ButtonId::Left => self.left.is_low(),
            ButtonId::Right => self.right.is_low(),
        }
    }
}
