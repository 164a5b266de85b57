//! Buttons and their edge events
//!
//! A button remembers whether it is held and whether it changed since the
//! last time its edge was consumed. Consuming the edge once per tick gives
//! the controller exactly one [`ButtonEvent::Pressed`] per physical press.

use serde::{Deserialize, Serialize};

use crate::keyboard::Key;

/// A digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Keyboard key
    Key(Key),
    /// Gamepad button by backend index
    Pad(u8),
}

impl From<Key> for Button {
    fn from(key: Key) -> Self {
        Button::Key(key)
    }
}

/// Edge transition reported once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonEvent {
    Pressed,
    Released,
    #[default]
    None,
}

/// State for a single button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held
    pub pressed: bool,
    /// Whether the button went down since the edge was last consumed
    pub just_pressed: bool,
    /// Whether the button went up since the edge was last consumed
    pub just_released: bool,
}

impl ButtonState {
    /// Create a new released button state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press event
    pub fn press(&mut self) {
        if !self.pressed {
            self.just_pressed = true;
        }
        self.pressed = true;
    }

    /// Record a release event
    pub fn release(&mut self) {
        if self.pressed {
            self.just_released = true;
        }
        self.pressed = false;
    }

    /// Consume the pending edge
    ///
    /// A press and release within the same tick reports the press; the
    /// release is dropped because the button is already up again.
    pub fn take_event(&mut self) -> ButtonEvent {
        let event = if self.just_pressed {
            ButtonEvent::Pressed
        } else if self.just_released {
            ButtonEvent::Released
        } else {
            ButtonEvent::None
        };
        self.just_pressed = false;
        self.just_released = false;
        event
    }
}
