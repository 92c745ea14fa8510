//! The abstracted input the session consumes each tick.
//!
//! Raw device concerns (joystick sampling, shift-register decoding, debouncing, key repeat) stay
//! in the front end. By the time a sample reaches the session, a physical press is exactly one
//! logical press and at most one directional event fires per debounced interval.

/// The four discrete buttons of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Start,
    Select,
}

impl Button {
    fn bit(self) -> u8 {
        match self {
            Button::A => 1,
            Button::B => 1 << 1,
            Button::Start => 1 << 2,
            Button::Select => 1 << 3,
        }
    }
}

/// The set of buttons pressed within a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    pub fn with(self, button: Button) -> Self {
        Buttons(self.0 | button.bit())
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One debounced input sample: an optional movement vector with components in `{-1, 0, 1}`
/// (`(dx, dy)` — columns, then rows) and the buttons pressed this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSample {
    pub movement: Option<(i8, i8)>,
    pub buttons: Buttons,
}

impl InputSample {
    /// A sample carrying nothing. Ticks overwhelmingly see this one.
    pub fn idle() -> Self {
        InputSample::default()
    }

    pub fn movement(dx: i8, dy: i8) -> Self {
        InputSample {
            movement: Some((dx, dy)),
            buttons: Buttons::NONE,
        }
    }

    pub fn button(button: Button) -> Self {
        InputSample {
            movement: None,
            buttons: Buttons::NONE.with(button),
        }
    }

    /// Whether the sample carries any event at all. Anything non-idle resets the start screen's
    /// idle counter.
    pub fn is_idle(&self) -> bool {
        self.movement.is_none() && self.buttons.is_empty()
    }
}

/// The session's input collaborator. Polled exactly once per tick; must never block.
pub trait InputSource {
    fn poll(&mut self) -> InputSample;
}

#[cfg(test)]
mod test {
    use super::{Button, Buttons, InputSample};

    #[test]
    fn a_button_set_holds_independent_buttons() {
        let buttons = Buttons::NONE.with(Button::A).with(Button::Select);

        assert!(buttons.contains(Button::A));
        assert!(buttons.contains(Button::Select));
        assert!(!buttons.contains(Button::B));
        assert!(!buttons.contains(Button::Start));
    }

    #[test]
    fn only_the_empty_sample_counts_as_idle() {
        assert!(InputSample::idle().is_idle());
        assert!(!InputSample::movement(0, 1).is_idle());
        assert!(!InputSample::button(Button::Start).is_idle());
    }
}
