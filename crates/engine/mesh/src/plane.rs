//! Plane equation derived from a face

use math::{is_close, Vector};
use serde::{Deserialize, Serialize};

/// Plane `ax + by + cz + d = 0` with `(a, b, c)` the unit face normal
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector,
    pub d: f64,
}

impl Plane {
    /// Plane through `point` with the given normal
    pub fn from_point_normal(point: Vector, normal: Vector) -> Self {
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Coefficients `(a, b, c, d)`
    pub fn coefficients(&self) -> (f64, f64, f64, f64) {
        (self.normal.x, self.normal.y, self.normal.z, self.d)
    }

    /// Solve the plane for Z at `(x, y)`
    ///
    /// Returns `None` for vertical (or degenerate) planes where Z is not a
    /// function of X and Y.
    pub fn height_at(&self, x: f64, y: f64) -> Option<f64> {
        let (a, b, c, d) = self.coefficients();
        if is_close(c, 0.0) {
            return None;
        }
        Some(-(a * x + b * y + d) / c)
    }

    /// Signed distance of `point` from the plane along the normal
    pub fn signed_distance(&self, point: Vector) -> f64 {
        self.normal.dot(point) + self.d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_of_flat_plane() {
        let plane = Plane::from_point_normal(Vector::new(0.0, 0.0, 3.0), Vector::Z);
        assert_eq!(plane.height_at(10.0, -4.0), Some(3.0));
        assert_eq!(plane.signed_distance(Vector::new(1.0, 1.0, 5.0)), 2.0);
    }

    #[test]
    fn test_height_of_sloped_plane() {
        // 45 degree slope rising along +X through the origin
        let normal = Vector::new(-1.0, 0.0, 1.0).normalize();
        let plane = Plane::from_point_normal(Vector::ZERO, normal);
        let height = plane.height_at(2.0, 7.0).unwrap();
        assert!((height - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_plane_has_no_height() {
        let plane = Plane::from_point_normal(Vector::ZERO, Vector::X);
        assert_eq!(plane.height_at(0.0, 0.0), None);
    }
}
