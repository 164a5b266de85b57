//! Collision surfaces derived from meshes
//!
//! A surface keeps a 2D hull of its mesh footprint and the mesh faces split
//! into upward-facing (floors) and downward-facing (ceilings) sets. That
//! derived geometry is built with the owning entity's X/Y rotation baked in.
//! Z rotation and translation are applied when a query arrives, so turning
//! or moving an entity never triggers a rebuild.

use std::fmt;

use glam::DVec2;
use math::{is_close, Rotation, Vector};
use mesh::{FaceId, Mesh, Plane};
use serde::{Deserialize, Serialize};
use world::EntityId;

use crate::contact::ContactHandler;
use crate::hull::{polygon_contains, ConvexHull};

/// Stable handle to a surface in a [`crate::PhysicsWorld`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub usize);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Result of a height query, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub height: f64,
    pub normal: Vector,
    pub face: FaceId,
}

/// A mesh face flattened onto the XY plane
#[derive(Debug, Clone)]
struct ProjectedFace {
    face: FaceId,
    /// Counterclockwise seen from above
    polygon: Vec<DVec2>,
    plane: Plane,
}

/// Collision geometry for one entity
pub struct CollisionSurface {
    entity: EntityId,
    mesh: Mesh,
    solid: bool,
    enabled: bool,
    handler: Option<Box<dyn ContactHandler>>,

    position: Vector,
    rotation: Rotation,

    hull: ConvexHull,
    top_faces: Vec<ProjectedFace>,
    bottom_faces: Vec<ProjectedFace>,
    z_range: (f64, f64),
    generation: u64,
}

impl fmt::Debug for CollisionSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionSurface")
            .field("entity", &self.entity)
            .field("solid", &self.solid)
            .field("enabled", &self.enabled)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("hull", &self.hull)
            .field("top_faces", &self.top_faces.len())
            .field("bottom_faces", &self.bottom_faces.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl CollisionSurface {
    /// Build a solid, enabled surface for `mesh` placed by the entity transform
    pub fn new(entity: EntityId, mesh: Mesh, position: Vector, rotation: Rotation) -> Self {
        let mut surface = Self {
            entity,
            mesh,
            solid: true,
            enabled: true,
            handler: None,
            position,
            rotation,
            hull: ConvexHull::default(),
            top_faces: Vec::new(),
            bottom_faces: Vec::new(),
            z_range: (0.0, 0.0),
            generation: 0,
        };
        surface.rebuild();
        surface
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Solid surfaces block bodies; non-solid ones are trigger volumes
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_handler(&mut self, handler: Box<dyn ContactHandler>) {
        self.handler = Some(handler);
    }

    pub fn handler_mut(&mut self) -> Option<&mut (dyn ContactHandler + 'static)> {
        self.handler.as_deref_mut()
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Number of times the derived geometry has been rebuilt
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hull in the surface frame (before Z rotation and translation)
    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }

    pub fn top_face_count(&self) -> usize {
        self.top_faces.len()
    }

    pub fn bottom_face_count(&self) -> usize {
        self.bottom_faces.len()
    }

    /// Lowest and highest vertex height in world space
    pub fn z_range(&self) -> (f64, f64) {
        (self.z_range.0 + self.position.z, self.z_range.1 + self.position.z)
    }

    /// Follow the owning entity's transform
    ///
    /// Only a change of the X or Y rotation rebuilds the derived geometry.
    pub fn set_transform(&mut self, position: Vector, rotation: Rotation) {
        let rebuild = rotation.tilt_differs(&self.rotation);
        self.position = position;
        self.rotation = rotation;
        if rebuild {
            self.rebuild();
        }
    }

    /// Replace the mesh and rebuild
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
        self.rebuild();
    }

    /// Edit the mesh in place and rebuild
    pub fn edit_mesh<R>(&mut self, edit: impl FnOnce(&mut Mesh) -> R) -> R {
        let result = edit(&mut self.mesh);
        self.rebuild();
        result
    }

    fn rebuild(&mut self) {
        let tilt = Rotation::new(self.rotation.x, self.rotation.y, 0.0);

        let tilted: Vec<Vector> = self.mesh.positions().map(|p| p.rotate(tilt)).collect();
        self.hull = ConvexHull::from_points(tilted.iter().map(|p| p.xy()));
        self.z_range = tilted.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p.z), hi.max(p.z)),
        );
        if tilted.is_empty() {
            self.z_range = (0.0, 0.0);
        }

        self.top_faces.clear();
        self.bottom_faces.clear();
        for (id, _) in self.mesh.faces() {
            let (Some(normal), Some(positions)) =
                (self.mesh.face_normal(id), self.mesh.face_positions(id))
            else {
                continue;
            };
            let normal = normal.rotate(tilt);
            let positions: Vec<Vector> = positions.into_iter().map(|p| p.rotate(tilt)).collect();
            let Some(&origin) = positions.first() else {
                continue;
            };
            let mut polygon: Vec<DVec2> = positions.iter().map(|p| p.xy()).collect();
            let plane = Plane::from_point_normal(origin, normal);

            if is_close(normal.z, 0.0) {
                // Vertical or degenerate: neither floor nor ceiling
                continue;
            } else if normal.z > 0.0 {
                self.top_faces.push(ProjectedFace { face: id, polygon, plane });
            } else {
                polygon.reverse();
                self.bottom_faces.push(ProjectedFace { face: id, polygon, plane });
            }
        }

        self.generation += 1;
        tracing::debug!(
            entity = %self.entity,
            generation = self.generation,
            hull = self.hull.len(),
            top = self.top_faces.len(),
            bottom = self.bottom_faces.len(),
            "rebuilt collision surface"
        );
    }

    /// World point to the surface frame
    fn to_local(&self, point: Vector) -> DVec2 {
        (point - self.position).rotate_2d(-self.rotation.z).xy()
    }

    fn to_world_normal(&self, normal: Vector) -> Vector {
        normal.rotate_2d(self.rotation.z)
    }

    /// Inside or on the hull boundary, in world XY
    pub fn is_in_bounds(&self, point: Vector) -> bool {
        self.hull.is_in_bounds(self.to_local(point))
    }

    /// Inside the hull and off its boundary, in world XY
    pub fn is_strictly_in_bounds(&self, point: Vector) -> bool {
        self.hull.is_strictly_in_bounds(self.to_local(point))
    }

    /// Closest point on the hull boundary in world XY, at the query's height
    pub fn nearest_bounds_point(&self, point: Vector) -> Option<Vector> {
        let nearest = self.hull.nearest_bounds_point(self.to_local(point))?;
        let world = Vector::from_2d(nearest, 0.0).rotate_2d(self.rotation.z) + self.position;
        Some(world.with_z(point.z))
    }

    /// Horizontal outward normal of the hull boundary nearest to `point`
    pub fn nearest_bounds_normal(&self, point: Vector) -> Option<Vector> {
        let normal = self.hull.nearest_bounds_normal(self.to_local(point))?;
        Some(self.to_world_normal(Vector::from_2d(normal, 0.0)))
    }

    fn point_on(&self, faces: &[ProjectedFace], point: Vector) -> Option<SurfacePoint> {
        let local = self.to_local(point);
        faces
            .iter()
            .filter(|f| polygon_contains(&f.polygon, local, false))
            .find_map(|f| {
                let height = f.plane.height_at(local.x, local.y)?;
                Some(SurfacePoint {
                    height: height + self.position.z,
                    normal: self.to_world_normal(f.plane.normal),
                    face: f.face,
                })
            })
    }

    fn plane_height(&self, faces: &[ProjectedFace], face: FaceId, point: Vector) -> Option<f64> {
        let local = self.to_local(point);
        let f = faces.iter().find(|f| f.face == face)?;
        f.plane
            .height_at(local.x, local.y)
            .map(|h| h + self.position.z)
    }

    /// Floor under `point`: the first top face containing it
    pub fn top_point_at(&self, point: Vector) -> Option<SurfacePoint> {
        self.point_on(&self.top_faces, point)
    }

    /// Ceiling above `point`: the first bottom face containing it
    pub fn bottom_point_at(&self, point: Vector) -> Option<SurfacePoint> {
        self.point_on(&self.bottom_faces, point)
    }

    /// Height of a top face's plane at `point`, inside the face or not
    pub fn top_plane_height(&self, face: FaceId, point: Vector) -> Option<f64> {
        self.plane_height(&self.top_faces, face, point)
    }

    /// Height of a bottom face's plane at `point`, inside the face or not
    pub fn bottom_plane_height(&self, face: FaceId, point: Vector) -> Option<f64> {
        self.plane_height(&self.bottom_faces, face, point)
    }

    /// Bottom and top of the surface at `point`
    ///
    /// Falls back to the surface's overall Z range where no face covers the
    /// point.
    pub fn height_range_at(&self, point: Vector) -> (f64, f64) {
        let (lo, hi) = self.z_range();
        let bottom = self.bottom_point_at(point).map(|p| p.height).unwrap_or(lo);
        let top = self.top_point_at(point).map(|p| p.height).unwrap_or(hi);
        (bottom, top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh::primitives::{cuboid, floor_plate, wedge};
    use std::f64::consts::FRAC_PI_2;

    fn unit_box_at(position: Vector, rotation: Rotation) -> CollisionSurface {
        let mesh = cuboid(Vector::new(-1.0, -1.0, 0.0), Vector::new(1.0, 1.0, 2.0)).unwrap();
        CollisionSurface::new(EntityId(0), mesh, position, rotation)
    }

    #[test]
    fn test_box_classification() {
        let surface = unit_box_at(Vector::ZERO, Rotation::ZERO);
        assert_eq!(surface.top_face_count(), 1);
        assert_eq!(surface.bottom_face_count(), 1);
        assert_eq!(surface.hull().len(), 4);
        assert_eq!(surface.z_range(), (0.0, 2.0));
        assert_eq!(surface.generation(), 1);
    }

    #[test]
    fn test_height_queries_follow_translation() {
        let surface = unit_box_at(Vector::new(10.0, 0.0, 1.0), Rotation::ZERO);

        let top = surface.top_point_at(Vector::new(10.5, 0.5, 0.0)).unwrap();
        assert_eq!(top.height, 3.0);
        assert!(top.normal.is_close(Vector::Z));

        let bottom = surface.bottom_point_at(Vector::new(10.5, 0.5, 0.0)).unwrap();
        assert_eq!(bottom.height, 1.0);
        assert!(bottom.normal.is_close(-Vector::Z));

        assert!(surface.top_point_at(Vector::new(0.0, 0.0, 0.0)).is_none());
        assert_eq!(surface.height_range_at(Vector::new(10.0, 0.0, 0.0)), (1.0, 3.0));
    }

    #[test]
    fn test_slope_normal_rotates_with_yaw() {
        let mesh = wedge(Vector::ZERO, Vector::new(4.0, 2.0, 4.0)).unwrap();
        let surface = CollisionSurface::new(EntityId(0), mesh, Vector::ZERO, Rotation::yaw_only(FRAC_PI_2));

        // After a quarter turn the ramp rises along +Y
        let top = surface.top_point_at(Vector::new(-1.0, 1.0, 0.0)).unwrap();
        assert!((top.height - 1.0).abs() < 1e-9);
        assert!(top.normal.is_close(Vector::new(0.0, -1.0, 1.0).normalize()));
    }

    #[test]
    fn test_yaw_does_not_rebuild_but_tilt_does() {
        let mut surface = unit_box_at(Vector::ZERO, Rotation::ZERO);
        assert_eq!(surface.generation(), 1);

        surface.set_transform(Vector::new(3.0, 0.0, 0.0), Rotation::yaw_only(1.0));
        assert_eq!(surface.generation(), 1);

        surface.set_transform(Vector::ZERO, Rotation::new(0.3, 0.0, 1.0));
        assert_eq!(surface.generation(), 2);
    }

    #[test]
    fn test_mesh_edit_rebuilds() {
        let mut surface = unit_box_at(Vector::ZERO, Rotation::ZERO);
        let removed = surface.edit_mesh(|mesh| {
            let top = mesh.faces().map(|(id, _)| id).nth(1).unwrap();
            mesh.remove_face(top).is_ok()
        });
        assert!(removed);
        assert_eq!(surface.generation(), 2);
        assert_eq!(surface.top_face_count(), 0);
        // No top face: height range falls back to the vertex range
        assert_eq!(surface.height_range_at(Vector::ZERO), (0.0, 2.0));
    }

    #[test]
    fn test_plate_has_floor_only() {
        let mesh = floor_plate(0.0, 0.0, 10.0, 10.0, 0.0).unwrap();
        let surface = CollisionSurface::new(EntityId(0), mesh, Vector::ZERO, Rotation::ZERO);
        assert_eq!(surface.top_face_count(), 1);
        assert_eq!(surface.bottom_face_count(), 0);
        assert!(surface.bottom_point_at(Vector::new(5.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_plane_extrapolates_outside_face() {
        let mesh = wedge(Vector::ZERO, Vector::new(4.0, 2.0, 4.0)).unwrap();
        let surface = CollisionSurface::new(EntityId(0), mesh, Vector::ZERO, Rotation::ZERO);
        let face = surface.top_point_at(Vector::new(1.0, 1.0, 0.0)).unwrap().face;
        let height = surface.top_plane_height(face, Vector::new(-1.0, 1.0, 0.0)).unwrap();
        assert!((height + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_bounds_in_world_frame() {
        let surface = unit_box_at(Vector::new(5.0, 0.0, 0.0), Rotation::ZERO);
        let p = Vector::new(3.0, 0.0, 1.0);
        assert!(surface.nearest_bounds_point(p).unwrap().is_close(Vector::new(4.0, 0.0, 1.0)));
        assert!(surface.nearest_bounds_normal(p).unwrap().is_close(-Vector::X));
        assert!(!surface.is_in_bounds(p));
        assert!(surface.is_strictly_in_bounds(Vector::new(5.5, 0.0, 0.0)));
    }
}
