//! Floating-point comparison with combined relative and absolute epsilon
//!
//! State transitions in the physics layer (grounded/airborne, wall and
//! ceiling contact) all compare through these functions so that values
//! sitting exactly on a boundary do not flicker between ticks.

/// Default relative and absolute tolerance
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Check whether two values are equal within [`DEFAULT_EPSILON`]
///
/// Equivalent to `is_close_with(a, b, DEFAULT_EPSILON, DEFAULT_EPSILON)`.
#[inline]
pub fn is_close(a: f64, b: f64) -> bool {
    is_close_with(a, b, DEFAULT_EPSILON, DEFAULT_EPSILON)
}

/// Check whether two values are equal within the given tolerances
///
/// The values are close when `|a - b| <= max(rel_tol * max(|a|, |b|), abs_tol)`.
/// The relative term keeps large magnitudes from producing false negatives,
/// the absolute term handles comparisons against zero.
///
/// # Arguments
/// * `rel_tol` - Tolerance relative to the larger magnitude
/// * `abs_tol` - Minimum absolute tolerance
pub fn is_close_with(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let diff = (a - b).abs();
    diff <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}

/// `a > b`, or `a` close to `b`
#[inline]
pub fn greater_or_close(a: f64, b: f64) -> bool {
    a > b || is_close(a, b)
}

/// `a < b`, or `a` close to `b`
#[inline]
pub fn less_or_close(a: f64, b: f64) -> bool {
    a < b || is_close(a, b)
}
