//! Input device abstractions for meshwalk
//!
//! Devices are reduced to two primitives: continuous axes in `[-1, 1]` that
//! report their change since the last read, and buttons that report
//! pressed/released edges once per tick.
//!
//! # Modules
//!
//! - [`keyboard`]: Platform-independent key codes
//! - [`button`]: Button identifiers, edge tracking and [`ButtonEvent`]
//! - [`axis`]: [`AxisExpr`] combinators and the [`Axis`] reader
//! - [`state`]: [`InputState`], the per-frame snapshot axes and buttons read from
//! - [`backend`]: [`InputBackend`] trait with null and scripted implementations

pub mod axis;
pub mod backend;
pub mod button;
pub mod keyboard;
pub mod state;

// Re-export commonly used types at crate root
pub use axis::{Axis, AxisExpr, AxisReading, AxisSource};
pub use backend::{InputBackend, InputEvent, NullBackend, ScriptedBackend, TimedInput};
pub use button::{Button, ButtonEvent, ButtonState};
pub use keyboard::Key;
pub use state::InputState;
