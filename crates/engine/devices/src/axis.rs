//! Continuous input axes
//!
//! An [`AxisExpr`] is a small expression tree over raw input sources. Each
//! combinator is a variant holding its operands and the whole tree is
//! evaluated by [`AxisExpr::eval`]. An [`Axis`] wraps an expression and
//! remembers the last value it reported so callers can ask for the change
//! since the previous read.

use serde::{Deserialize, Serialize};

use crate::keyboard::Key;
use crate::state::InputState;

/// Default deadzone for analog sticks
pub const DEFAULT_DEADZONE: f64 = 0.15;

/// A raw input value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisSource {
    /// Analog channel by backend id
    Analog(u32),
    /// 1.0 while the key is held, 0.0 otherwise
    Key(Key),
}

impl AxisSource {
    fn sample(self, input: &InputState) -> f64 {
        match self {
            AxisSource::Analog(channel) => input.analog(channel),
            AxisSource::Key(key) => {
                if input.is_down(key) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Axis combinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisExpr {
    /// Raw source value
    Source(AxisSource),

    /// Fixed value
    Constant(f64),

    /// Sum of all terms
    Sum(Vec<AxisExpr>),

    /// Product of all factors
    Product(Vec<AxisExpr>),

    /// Operand plus a constant
    Offset { axis: Box<AxisExpr>, by: f64 },

    /// Operand times a constant
    Scale { axis: Box<AxisExpr>, by: f64 },

    /// `1 / operand`, or 0 when the operand is 0
    Reciprocal(Box<AxisExpr>),

    /// Values inside `threshold` read as 0; the rest is rescaled to keep the
    /// full output range
    Deadzone { axis: Box<AxisExpr>, threshold: f64 },

    /// Operand limited to `[min, max]`
    Clamp {
        axis: Box<AxisExpr>,
        min: f64,
        max: f64,
    },
}

impl AxisExpr {
    pub fn analog(channel: u32) -> Self {
        AxisExpr::Source(AxisSource::Analog(channel))
    }

    pub fn key(key: Key) -> Self {
        AxisExpr::Source(AxisSource::Key(key))
    }

    /// Digital axis from two keys: `positive` reads +1, `negative` reads -1,
    /// both held cancel out
    pub fn key_pair(positive: Key, negative: Key) -> Self {
        AxisExpr::Sum(vec![AxisExpr::key(positive), AxisExpr::key(negative).scale(-1.0)])
    }

    pub fn plus(self, other: AxisExpr) -> Self {
        match self {
            AxisExpr::Sum(mut terms) => {
                terms.push(other);
                AxisExpr::Sum(terms)
            }
            expr => AxisExpr::Sum(vec![expr, other]),
        }
    }

    pub fn times(self, other: AxisExpr) -> Self {
        match self {
            AxisExpr::Product(mut factors) => {
                factors.push(other);
                AxisExpr::Product(factors)
            }
            expr => AxisExpr::Product(vec![expr, other]),
        }
    }

    pub fn offset(self, by: f64) -> Self {
        AxisExpr::Offset {
            axis: Box::new(self),
            by,
        }
    }

    pub fn scale(self, by: f64) -> Self {
        AxisExpr::Scale {
            axis: Box::new(self),
            by,
        }
    }

    pub fn reciprocal(self) -> Self {
        AxisExpr::Reciprocal(Box::new(self))
    }

    pub fn deadzone(self, threshold: f64) -> Self {
        AxisExpr::Deadzone {
            axis: Box::new(self),
            threshold,
        }
    }

    pub fn clamp(self, min: f64, max: f64) -> Self {
        AxisExpr::Clamp {
            axis: Box::new(self),
            min,
            max,
        }
    }

    /// Evaluate against the current input snapshot
    pub fn eval(&self, input: &InputState) -> f64 {
        match self {
            AxisExpr::Source(source) => source.sample(input),
            AxisExpr::Constant(value) => *value,
            AxisExpr::Sum(terms) => terms.iter().map(|t| t.eval(input)).sum(),
            AxisExpr::Product(factors) => factors.iter().map(|f| f.eval(input)).product(),
            AxisExpr::Offset { axis, by } => axis.eval(input) + by,
            AxisExpr::Scale { axis, by } => axis.eval(input) * by,
            AxisExpr::Reciprocal(axis) => {
                let value = axis.eval(input);
                if value == 0.0 {
                    0.0
                } else {
                    1.0 / value
                }
            }
            AxisExpr::Deadzone { axis, threshold } => {
                apply_deadzone(axis.eval(input), *threshold)
            }
            AxisExpr::Clamp { axis, min, max } => axis.eval(input).clamp(*min, *max),
        }
    }
}

/// Zero inside the deadzone, renormalized outside so the usable range is 0-1
fn apply_deadzone(raw: f64, deadzone: f64) -> f64 {
    let magnitude = raw.abs();
    if magnitude < deadzone || deadzone >= 1.0 {
        0.0
    } else {
        let adjusted = ((magnitude - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0);
        adjusted.copysign(raw)
    }
}

/// Value returned by [`Axis::read`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisReading {
    /// Current value in `[-1, 1]`
    pub value: f64,
    /// Difference from the previous read
    pub change: f64,
}

/// Bound axis with change tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub expr: AxisExpr,
    #[serde(skip)]
    last: f64,
}

impl Axis {
    pub fn new(expr: AxisExpr) -> Self {
        Self { expr, last: 0.0 }
    }

    /// Read the axis and record the value for the next change query
    ///
    /// Meant to be called once per tick; a second read in the same tick
    /// reports zero change.
    pub fn read(&mut self, input: &InputState) -> AxisReading {
        let value = self.expr.eval(input).clamp(-1.0, 1.0);
        let change = value - self.last;
        self.last = value;
        AxisReading { value, change }
    }

    /// Value reported by the last read
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Forget the last value so the next read reports its full value as change
    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}

impl From<AxisExpr> for Axis {
    fn from(expr: AxisExpr) -> Self {
        Axis::new(expr)
    }
}
