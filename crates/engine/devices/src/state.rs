//! Per-frame input snapshot

use std::collections::BTreeMap;

use crate::button::{Button, ButtonEvent, ButtonState};

/// Raw analog channel values and button states
///
/// Backends write into this; [`crate::Axis`] and the controller read from
/// it. Analog channels hold whatever the device reports (sticks in
/// `[-1, 1]`, accumulated mouse motion, ...); clamping happens when an axis
/// is read.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    analog: BTreeMap<u32, f64>,
    buttons: BTreeMap<Button, ButtonState>,
}

impl InputState {
    /// Create an input state with every channel at rest
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an analog channel's raw value
    pub fn set_analog(&mut self, channel: u32, value: f64) {
        self.analog.insert(channel, value);
    }

    /// Add to an analog channel (relative devices such as a mouse)
    pub fn add_analog(&mut self, channel: u32, delta: f64) {
        *self.analog.entry(channel).or_insert(0.0) += delta;
    }

    /// Raw value of an analog channel; unknown channels read as 0
    pub fn analog(&self, channel: u32) -> f64 {
        self.analog.get(&channel).copied().unwrap_or(0.0)
    }

    /// Record a button press
    pub fn press(&mut self, button: impl Into<Button>) {
        self.buttons.entry(button.into()).or_default().press();
    }

    /// Record a button release
    pub fn release(&mut self, button: impl Into<Button>) {
        self.buttons.entry(button.into()).or_default().release();
    }

    /// Whether a button is currently held
    pub fn is_down(&self, button: impl Into<Button>) -> bool {
        self.buttons
            .get(&button.into())
            .is_some_and(|state| state.pressed)
    }

    /// Consume the pending edge of a button
    ///
    /// Call at most once per tick per button; the edge is cleared.
    pub fn take_button_event(&mut self, button: impl Into<Button>) -> ButtonEvent {
        self.buttons
            .get_mut(&button.into())
            .map(ButtonState::take_event)
            .unwrap_or_default()
    }

    /// Release every button and zero every channel
    pub fn clear(&mut self) {
        self.analog.clear();
        self.buttons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Key;

    #[test]
    fn test_analog_channels() {
        let mut input = InputState::new();
        assert_eq!(input.analog(3), 0.0);

        input.set_analog(3, 0.5);
        input.add_analog(3, 0.25);
        assert_eq!(input.analog(3), 0.75);
    }

    #[test]
    fn test_button_edges_are_consumed_once() {
        let mut input = InputState::new();
        input.press(Key::Space);

        assert!(input.is_down(Key::Space));
        assert_eq!(input.take_button_event(Key::Space), ButtonEvent::Pressed);
        assert_eq!(input.take_button_event(Key::Space), ButtonEvent::None);
        assert!(input.is_down(Key::Space));

        input.release(Key::Space);
        assert_eq!(input.take_button_event(Key::Space), ButtonEvent::Released);
    }

    #[test]
    fn test_unknown_button_has_no_event() {
        let mut input = InputState::new();
        assert_eq!(input.take_button_event(Button::Pad(7)), ButtonEvent::None);
        assert!(!input.is_down(Button::Pad(7)));
    }
}
