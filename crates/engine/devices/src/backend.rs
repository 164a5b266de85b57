//! Input backend trait for platform-specific implementations
//!
//! A backend translates whatever its platform delivers (window events, a
//! gamepad library, a recorded script) into changes on an [`InputState`].

use serde::{Deserialize, Serialize};

use crate::button::Button;
use crate::state::InputState;

/// Trait for input backends
///
/// # Example
///
/// ```ignore
/// let mut backend = ScriptedBackend::new(timeline);
/// let mut input = InputState::new();
///
/// // In your game loop:
/// backend.poll(&mut input, total_time);
/// let walk = walk_axis.read(&input);
/// ```
pub trait InputBackend {
    /// Apply every pending input change up to `now` (seconds since start)
    fn poll(&mut self, input: &mut InputState, now: f64);

    /// Whether the backend will ever produce more input
    fn is_finished(&self) -> bool {
        false
    }
}

/// A no-op backend for headless runs
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        Self
    }
}

impl InputBackend for NullBackend {
    fn poll(&mut self, _input: &mut InputState, _now: f64) {}

    fn is_finished(&self) -> bool {
        true
    }
}

/// A single input change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Set an analog channel to a value
    SetAnalog(u32, f64),
    Press(Button),
    Release(Button),
}

impl InputEvent {
    fn apply(self, input: &mut InputState) {
        match self {
            InputEvent::SetAnalog(channel, value) => input.set_analog(channel, value),
            InputEvent::Press(button) => input.press(button),
            InputEvent::Release(button) => input.release(button),
        }
    }
}

/// An input change scheduled at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedInput {
    /// Seconds since the start of the run
    pub time: f64,
    pub event: InputEvent,
}

impl TimedInput {
    pub fn new(time: f64, event: InputEvent) -> Self {
        Self { time, event }
    }
}

/// Replays a fixed timeline of input changes
///
/// Events are applied in time order; events sharing a timestamp keep the
/// order they were given in.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    timeline: Vec<TimedInput>,
    cursor: usize,
}

impl ScriptedBackend {
    pub fn new(mut timeline: Vec<TimedInput>) -> Self {
        timeline.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            timeline,
            cursor: 0,
        }
    }

    /// Number of events not yet applied
    pub fn remaining(&self) -> usize {
        self.timeline.len() - self.cursor
    }

    /// Time of the last scheduled event, or 0 for an empty script
    pub fn duration(&self) -> f64 {
        self.timeline.last().map(|e| e.time).unwrap_or(0.0)
    }
}

impl InputBackend for ScriptedBackend {
    fn poll(&mut self, input: &mut InputState, now: f64) {
        while let Some(next) = self.timeline.get(self.cursor) {
            if next.time > now {
                break;
            }
            tracing::trace!(time = next.time, event = ?next.event, "scripted input");
            next.event.apply(input);
            self.cursor += 1;
        }
    }

    fn is_finished(&self) -> bool {
        self.cursor >= self.timeline.len()
    }
}
