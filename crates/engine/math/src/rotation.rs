//! Composite-axis rotation
//!
//! A [`Rotation`] is three angles applied as sequential axis rotations: X
//! (roll), then Y (pitch), then Z (yaw). It is not a quaternion, and
//! [`Rotation::rotate`] composes through a reference vector rather than by
//! true rotation composition. Slope handling and child orbiting are written
//! against this exact behavior.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::tolerance::is_close;
use crate::vector::Vector;

/// Three axis angles, each wrapped into `[0, 2π)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Wrap an angle into `[0, 2π)`
fn wrap(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round tiny negative inputs up to exactly TAU
    if wrapped >= TAU || is_close(wrapped, TAU) || is_close(wrapped, 0.0) {
        0.0
    } else {
        wrapped
    }
}

/// Map a wrapped angle into `(-π, π]`
fn signed(angle: f64) -> f64 {
    if angle > PI {
        angle - TAU
    } else {
        angle
    }
}

impl Rotation {
    pub const ZERO: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a rotation from radians, wrapping every component
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: wrap(x),
            y: wrap(y),
            z: wrap(z),
        }
    }

    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Rotation around Z only
    pub fn yaw_only(z: f64) -> Self {
        Self::new(0.0, 0.0, z)
    }

    /// Roll as a signed angle in `(-π, π]`
    pub fn roll(&self) -> f64 {
        signed(self.x)
    }

    /// Pitch as a signed angle in `(-π, π]`
    pub fn pitch(&self) -> f64 {
        signed(self.y)
    }

    /// Yaw as a signed angle in `(-π, π]`
    pub fn yaw(&self) -> f64 {
        signed(self.z)
    }

    /// Copy with the Z component replaced
    pub fn with_z(&self, z: f64) -> Self {
        Self::new(self.x, self.y, z)
    }

    /// Whether X or Y differ from `other`; Z is ignored
    pub fn tilt_differs(&self, other: &Rotation) -> bool {
        !angle_close(self.x, other.x) || !angle_close(self.y, other.y)
    }

    /// Compose `amount` on top of this rotation
    ///
    /// The reference vector `+X` is rotated through `self` and then through
    /// `amount`; yaw and pitch are read back from where it lands. Roll does
    /// not move `+X`, so it is carried over additively. The result is order
    /// dependent and differs from quaternion composition whenever pitch and
    /// roll interact.
    pub fn rotate(&self, amount: Rotation) -> Rotation {
        let v = Vector::X.rotate(*self).rotate(amount);
        let z = v.y.atan2(v.x);
        let y = (-v.z).clamp(-1.0, 1.0).asin();
        Rotation::new(self.x + amount.x, y, z)
    }

    /// Component-wise comparison, treating angles modulo 2π
    pub fn is_close(&self, other: &Rotation) -> bool {
        angle_close(self.x, other.x) && angle_close(self.y, other.y) && angle_close(self.z, other.z)
    }
}

fn angle_close(a: f64, b: f64) -> bool {
    let diff = (a - b).rem_euclid(TAU);
    is_close(diff, 0.0) || is_close(diff, TAU)
}

impl From<[f64; 3]> for Rotation {
    fn from(values: [f64; 3]) -> Self {
        Rotation::new(values[0], values[1], values[2])
    }
}

impl From<Rotation> for [f64; 3] {
    fn from(rotation: Rotation) -> Self {
        [rotation.x, rotation.y, rotation.z]
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}°, {:.2}°, {:.2}°]",
            self.x.to_degrees(),
            self.y.to_degrees(),
            self.z.to_degrees()
        )
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, other: Rotation) -> Rotation {
        Rotation::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Rotation {
    type Output = Rotation;

    fn sub(self, other: Rotation) -> Rotation {
        Rotation::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Rotation {
    type Output = Rotation;

    fn neg(self) -> Rotation {
        Rotation::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_components_wrap() {
        let r = Rotation::new(-FRAC_PI_2, TAU + 1.0, 3.0 * TAU);
        assert!((r.x - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
        assert_eq!(r.z, 0.0);
        assert!(r.x >= 0.0 && r.x < TAU);
    }

    #[test]
    fn test_tiny_negative_wraps_to_zero() {
        let r = Rotation::new(-1e-18, 0.0, 0.0);
        assert_eq!(r.x, 0.0);
    }

    #[test]
    fn test_signed_accessors() {
        let r = Rotation::new(0.0, -0.5, 4.0);
        assert!((r.pitch() + 0.5).abs() < 1e-12);
        assert!((r.yaw() - (4.0 - TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_accumulates_yaw() {
        let r = Rotation::yaw_only(0.5).rotate(Rotation::yaw_only(0.25));
        assert!(r.is_close(&Rotation::yaw_only(0.75)));
    }

    #[test]
    fn test_rotate_preserves_roll_additively() {
        let r = Rotation::new(0.2, 0.0, 0.0).rotate(Rotation::new(0.3, 0.0, 0.0));
        assert!((r.x - 0.5).abs() < 1e-12);
        assert!(r.is_close(&Rotation::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_rotate_pitch_then_yaw() {
        let r = Rotation::new(0.0, 0.4, 0.0).rotate(Rotation::yaw_only(1.0));
        assert!(r.is_close(&Rotation::new(0.0, 0.4, 1.0)));
    }

    #[test]
    fn test_rotate_is_not_commutative_with_roll() {
        // Rolling first then pitching moves +X differently than pitching first
        let a = Rotation::new(FRAC_PI_2, 0.0, 0.0).rotate(Rotation::new(0.0, 0.3, 0.0));
        let b = Rotation::new(0.0, 0.3, 0.0).rotate(Rotation::new(FRAC_PI_2, 0.0, 0.0));
        assert!(!a.is_close(&b));
    }

    #[test]
    fn test_is_close_across_wrap_boundary() {
        let a = Rotation::new(TAU - 1e-12, 0.0, 0.0);
        assert!(a.is_close(&Rotation::ZERO));
    }

    #[test]
    fn test_tilt_differs_ignores_yaw() {
        let a = Rotation::new(0.1, 0.2, 0.0);
        assert!(!a.tilt_differs(&a.with_z(2.0)));
        assert!(a.tilt_differs(&Rotation::new(0.1, 0.3, 0.0)));
    }
}
