//! Keyboard key codes
//!
//! Platform backends map their native key codes to these values. Keys are
//! used both as buttons (jump) and as digital axis sources (WASD walking).

use serde::{Deserialize, Serialize};

/// Platform-independent key codes
///
/// A minimal set of keys available on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    Q,
    R,
    S,
    W,
    X,
    Z,

    // Navigation
    Up,
    Down,
    Left,
    Right,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    // Special
    Escape,
    Space,
    Enter,
    Tab,
}

impl Key {
    /// Whether this key is a modifier
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::ShiftLeft | Key::ShiftRight | Key::ControlLeft | Key::ControlRight
        )
    }
}
