//! Double-precision 3D vector
//!
//! Arithmetic is delegated to [`glam::DVec3`]. The wrapper exists to pin down
//! the behaviors the physics layer depends on: normalizing a zero vector is a
//! no-op instead of producing NaN, comparisons go through the shared
//! tolerance, and rotations use the composite-axis [`Rotation`].

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;
use crate::tolerance::{is_close, is_close_with};

/// Immutable triple of `f64` components
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);
    pub const X: Vector = Vector::new(1.0, 0.0, 0.0);
    pub const Y: Vector = Vector::new(0.0, 1.0, 0.0);
    pub const Z: Vector = Vector::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a 2D point onto the plane at height `z`
    pub fn from_2d(point: DVec2, z: f64) -> Self {
        Self::new(point.x, point.y, z)
    }

    #[inline]
    fn dvec(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Projection onto the XY plane
    #[inline]
    pub fn xy(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Copy with the Z component replaced
    pub fn with_z(self, z: f64) -> Self {
        Self::new(self.x, self.y, z)
    }

    /// Copy with the Z component zeroed
    pub fn horizontal(self) -> Self {
        self.with_z(0.0)
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.dvec().dot(other.dvec())
    }

    pub fn cross(self, other: Vector) -> Vector {
        self.dvec().cross(other.dvec()).into()
    }

    pub fn magnitude(self) -> f64 {
        self.dvec().length()
    }

    pub fn magnitude_squared(self) -> f64 {
        self.dvec().length_squared()
    }

    pub fn distance(self, other: Vector) -> f64 {
        (self - other).magnitude()
    }

    /// Unit vector in the same direction
    ///
    /// A zero vector is returned unchanged.
    pub fn normalize(self) -> Vector {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            self
        } else {
            self / magnitude
        }
    }

    /// Vector in the same direction with the given magnitude
    ///
    /// A zero vector has no direction and is returned unchanged.
    pub fn set_magnitude(self, magnitude: f64) -> Vector {
        let current = self.magnitude();
        if current == 0.0 {
            self
        } else {
            self * (magnitude / current)
        }
    }

    /// Linear interpolation, `t = 0` gives `self` and `t = 1` gives `other`
    pub fn lerp(self, other: Vector, t: f64) -> Vector {
        self.dvec().lerp(other.dvec(), t).into()
    }

    /// Rotate around the Z axis by `angle` radians (counterclockwise seen from +Z)
    pub fn rotate_2d(self, angle: f64) -> Vector {
        let (sin, cos) = angle.sin_cos();
        Vector::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    /// Apply the rotation's X, then Y, then Z axis rotations
    pub fn rotate(self, rotation: Rotation) -> Vector {
        let v = DMat3::from_rotation_x(rotation.x) * self.dvec();
        let v = DMat3::from_rotation_y(rotation.y) * v;
        (DMat3::from_rotation_z(rotation.z) * v).into()
    }

    /// Undo [`Vector::rotate`]: apply -Z, then -Y, then -X
    pub fn inverse_rotate(self, rotation: Rotation) -> Vector {
        let v = DMat3::from_rotation_z(-rotation.z) * self.dvec();
        let v = DMat3::from_rotation_y(-rotation.y) * v;
        (DMat3::from_rotation_x(-rotation.x) * v).into()
    }

    /// Component of `self` along `onto`
    ///
    /// Projecting onto a zero vector yields [`Vector::ZERO`].
    pub fn project_onto(self, onto: Vector) -> Vector {
        let denominator = onto.magnitude_squared();
        if denominator == 0.0 {
            return Vector::ZERO;
        }
        onto * (self.dot(onto) / denominator)
    }

    /// Component of `self` lying in the plane with the given normal
    pub fn project_onto_plane(self, normal: Vector) -> Vector {
        self - self.project_onto(normal)
    }

    /// Angle in radians between two vectors, in `[0, π]`
    ///
    /// Near-parallel and near-antiparallel inputs are resolved by comparing
    /// directions so `acos` never sees a value outside `[-1, 1]`. A zero
    /// operand has no direction and yields 0.
    pub fn angle_between(self, other: Vector) -> f64 {
        let a = self.normalize();
        let b = other.normalize();
        if a == Vector::ZERO || b == Vector::ZERO {
            return 0.0;
        }
        if a.is_close(b) {
            return 0.0;
        }
        if a.is_close(-b) {
            return PI;
        }
        let cos = a.dot(b);
        if cos >= 1.0 {
            0.0
        } else if cos <= -1.0 {
            PI
        } else {
            cos.acos()
        }
    }

    /// Component-wise comparison with the default tolerance
    pub fn is_close(self, other: Vector) -> bool {
        is_close(self.x, other.x) && is_close(self.y, other.y) && is_close(self.z, other.z)
    }

    /// Component-wise comparison with explicit tolerances
    pub fn is_close_with(self, other: Vector, rel_tol: f64, abs_tol: f64) -> bool {
        is_close_with(self.x, other.x, rel_tol, abs_tol)
            && is_close_with(self.y, other.y, rel_tol, abs_tol)
            && is_close_with(self.z, other.z, rel_tol, abs_tol)
    }
}

impl From<DVec3> for Vector {
    fn from(v: DVec3) -> Self {
        Vector::new(v.x, v.y, v.z)
    }
}

impl From<Vector> for DVec3 {
    fn from(v: Vector) -> Self {
        v.dvec()
    }
}

impl From<[f64; 3]> for Vector {
    fn from(values: [f64; 3]) -> Self {
        Vector::new(values[0], values[1], values[2])
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        (self.dvec() + other.dvec()).into()
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, other: Vector) {
        *self = *self + other;
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        (self.dvec() - other.dvec()).into()
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, other: Vector) {
        *self = *self - other;
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, scalar: f64) -> Vector {
        (self.dvec() * scalar).into()
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, vector: Vector) -> Vector {
        vector * self
    }
}

/// Component-wise product
impl Mul<Vector> for Vector {
    type Output = Vector;

    fn mul(self, other: Vector) -> Vector {
        (self.dvec() * other.dvec()).into()
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, scalar: f64) -> Vector {
        (self.dvec() / scalar).into()
    }
}

/// Component-wise quotient
impl Div<Vector> for Vector {
    type Output = Vector;

    fn div(self, other: Vector) -> Vector {
        (self.dvec() / other.dvec()).into()
    }
}
