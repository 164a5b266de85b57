//! Convex mesh primitives
//!
//! All faces are wound counterclockwise seen from outside, so their normals
//! point outward. Corners are given in the mesh's local frame.

use math::Vector;

use crate::error::Result;
use crate::mesh::Mesh;

/// Axis-aligned box spanning `min` to `max`
pub fn cuboid(min: Vector, max: Vector) -> Result<Mesh> {
    let positions = [
        Vector::new(min.x, min.y, min.z),
        Vector::new(max.x, min.y, min.z),
        Vector::new(max.x, max.y, min.z),
        Vector::new(min.x, max.y, min.z),
        Vector::new(min.x, min.y, max.z),
        Vector::new(max.x, min.y, max.z),
        Vector::new(max.x, max.y, max.z),
        Vector::new(min.x, max.y, max.z),
    ];
    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // bottom
        [4, 5, 6, 7], // top
        [0, 1, 5, 4], // -Y
        [3, 7, 6, 2], // +Y
        [0, 4, 7, 3], // -X
        [1, 2, 6, 5], // +X
    ];
    Mesh::from_polygons(&positions, &faces)
}

/// Ramp over the footprint of `min`..`max`, rising along +X
///
/// The low edge at `min.x` sits at `min.z`; the high edge at `max.x` reaches
/// `max.z`. Rotate the owning entity around Z to face the ramp elsewhere.
pub fn wedge(min: Vector, max: Vector) -> Result<Mesh> {
    let positions = [
        Vector::new(min.x, min.y, min.z),
        Vector::new(max.x, min.y, min.z),
        Vector::new(max.x, max.y, min.z),
        Vector::new(min.x, max.y, min.z),
        Vector::new(max.x, min.y, max.z),
        Vector::new(max.x, max.y, max.z),
    ];
    let faces: [&[usize]; 5] = [
        &[0, 3, 2, 1],
        &[0, 4, 5, 3],
        &[1, 2, 5, 4],
        &[0, 1, 4],
        &[3, 5, 2],
    ];
    Mesh::from_polygons(&positions, &faces)
}

/// Two slopes meeting at a ridge line parallel to Y
///
/// The ridge runs along `x = (min.x + max.x) / 2` at height `max.z`; both
/// eaves sit at `min.z`.
pub fn ridge(min: Vector, max: Vector) -> Result<Mesh> {
    let mid = (min.x + max.x) * 0.5;
    let positions = [
        Vector::new(min.x, min.y, min.z),
        Vector::new(max.x, min.y, min.z),
        Vector::new(max.x, max.y, min.z),
        Vector::new(min.x, max.y, min.z),
        Vector::new(mid, min.y, max.z),
        Vector::new(mid, max.y, max.z),
    ];
    let faces: [&[usize]; 5] = [
        &[0, 3, 2, 1],
        &[0, 4, 5, 3],
        &[4, 1, 2, 5],
        &[0, 1, 4],
        &[3, 5, 2],
    ];
    Mesh::from_polygons(&positions, &faces)
}

/// Single upward-facing rectangle at height `z`
///
/// Useful as a thin floor: it has a top face and a hull but no walls.
pub fn floor_plate(min_x: f64, min_y: f64, max_x: f64, max_y: f64, z: f64) -> Result<Mesh> {
    let positions = [
        Vector::new(min_x, min_y, z),
        Vector::new(max_x, min_y, z),
        Vector::new(max_x, max_y, z),
        Vector::new(min_x, max_y, z),
    ];
    Mesh::from_polygons(&positions, &[[0usize, 1, 2, 3]])
}
