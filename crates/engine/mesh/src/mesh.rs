//! Vertex/face arena with back-references and cached face geometry

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use math::Vector;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::plane::Plane;

/// Stable handle to a vertex; never reused within a mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub usize);

/// Stable handle to a face; never reused within a mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// A mesh vertex and the faces that use it
#[derive(Clone, Debug)]
pub struct Vertex {
    position: Vector,
    faces: BTreeSet<FaceId>,
}

impl Vertex {
    pub fn position(&self) -> Vector {
        self.position
    }

    /// Faces whose loop contains this vertex
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

#[derive(Clone, Copy, Debug)]
struct FaceGeometry {
    normal: Vector,
    plane: Plane,
}

/// An ordered vertex loop
///
/// Normal and plane are computed on first use and dropped whenever the loop
/// or any of its vertex positions changes.
#[derive(Clone, Debug)]
pub struct Face {
    vertices: Vec<VertexId>,
    geometry: OnceCell<FaceGeometry>,
}

impl Face {
    fn new(vertices: Vec<VertexId>) -> Self {
        Self {
            vertices,
            geometry: OnceCell::new(),
        }
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn invalidate(&mut self) {
        self.geometry = OnceCell::new();
    }
}

/// Owned collection of vertices and faces
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: BTreeMap<VertexId, Vertex>,
    faces: BTreeMap<FaceId, Face>,
    next_vertex: usize,
    next_face: usize,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from a position list and polygons indexing into it
    ///
    /// # Arguments
    /// * `positions` - Vertex positions
    /// * `polygons` - Face loops as indices into `positions`, counterclockwise
    ///   when viewed from outside
    pub fn from_polygons<P: AsRef<[usize]>>(positions: &[Vector], polygons: &[P]) -> Result<Self> {
        let mut mesh = Mesh::new();
        let ids: Vec<VertexId> = positions.iter().map(|p| mesh.add_vertex(*p)).collect();
        for polygon in polygons {
            let loop_ids = polygon
                .as_ref()
                .iter()
                .map(|&i| ids.get(i).copied().ok_or(MeshError::MissingPosition(i)))
                .collect::<Result<Vec<_>>>()?;
            mesh.add_face(&loop_ids)?;
        }
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(&id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().map(|(id, v)| (*id, v))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces.iter().map(|(id, f)| (*id, f))
    }

    /// Iterate over every vertex position
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.vertices.values().map(|v| v.position)
    }

    /// Add a free-standing vertex
    pub fn add_vertex(&mut self, position: Vector) -> VertexId {
        let id = VertexId(self.next_vertex);
        self.next_vertex += 1;
        self.vertices.insert(
            id,
            Vertex {
                position,
                faces: BTreeSet::new(),
            },
        );
        id
    }

    /// Remove a vertex
    ///
    /// With `remove_faces` every face referencing the vertex is removed
    /// first. Without it, a vertex that is still referenced is refused with
    /// [`MeshError::VertexInUse`].
    pub fn remove_vertex(&mut self, id: VertexId, remove_faces: bool) -> Result<Vertex> {
        let vertex = self.vertices.get(&id).ok_or(MeshError::UnknownVertex(id))?;
        if !vertex.faces.is_empty() {
            if !remove_faces {
                return Err(MeshError::VertexInUse {
                    vertex: id,
                    faces: vertex.faces.len(),
                });
            }
            let referencing: Vec<FaceId> = vertex.faces.iter().copied().collect();
            for face in referencing {
                self.remove_face(face)?;
            }
        }
        self.vertices.remove(&id).ok_or(MeshError::UnknownVertex(id))
    }

    /// Move a vertex, invalidating cached geometry of every face using it
    pub fn set_vertex_position(&mut self, id: VertexId, position: Vector) -> Result<()> {
        let vertex = self.vertices.get_mut(&id).ok_or(MeshError::UnknownVertex(id))?;
        vertex.position = position;
        let dependents: Vec<FaceId> = vertex.faces.iter().copied().collect();
        for face in dependents {
            if let Some(face) = self.faces.get_mut(&face) {
                face.invalidate();
            }
        }
        Ok(())
    }

    pub fn translate_vertex(&mut self, id: VertexId, delta: Vector) -> Result<()> {
        let position = self
            .vertices
            .get(&id)
            .map(|v| v.position)
            .ok_or(MeshError::UnknownVertex(id))?;
        self.set_vertex_position(id, position + delta)
    }

    /// Add a face from an ordered vertex loop
    pub fn add_face(&mut self, vertices: &[VertexId]) -> Result<FaceId> {
        if vertices.len() < 3 {
            return Err(MeshError::TooFewVertices(vertices.len()));
        }
        let mut seen = BTreeSet::new();
        for &v in vertices {
            if !self.vertices.contains_key(&v) {
                return Err(MeshError::UnknownVertex(v));
            }
            if !seen.insert(v) {
                return Err(MeshError::DuplicateVertex(v));
            }
        }

        let id = FaceId(self.next_face);
        self.next_face += 1;
        for v in vertices {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.faces.insert(id);
            }
        }
        self.faces.insert(id, Face::new(vertices.to_vec()));
        Ok(id)
    }

    /// Remove a face and release its vertex back-references
    pub fn remove_face(&mut self, id: FaceId) -> Result<Face> {
        let face = self.faces.remove(&id).ok_or(MeshError::UnknownFace(id))?;
        for v in &face.vertices {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.faces.remove(&id);
            }
        }
        Ok(face)
    }

    /// Insert `vertex` into a face loop before position `index`
    ///
    /// `index == len` appends at the end of the loop.
    pub fn insert_face_vertex(&mut self, face: FaceId, index: usize, vertex: VertexId) -> Result<()> {
        if !self.vertices.contains_key(&vertex) {
            return Err(MeshError::UnknownVertex(vertex));
        }
        let f = self.faces.get_mut(&face).ok_or(MeshError::UnknownFace(face))?;
        if index > f.vertices.len() {
            return Err(MeshError::IndexOutOfRange {
                index,
                len: f.vertices.len(),
            });
        }
        if f.vertices.contains(&vertex) {
            return Err(MeshError::DuplicateVertex(vertex));
        }
        f.vertices.insert(index, vertex);
        f.invalidate();
        if let Some(v) = self.vertices.get_mut(&vertex) {
            v.faces.insert(face);
        }
        Ok(())
    }

    /// Remove the vertex at `index` from a face loop
    ///
    /// The vertex itself stays in the mesh. A face is never reduced below
    /// three vertices.
    pub fn remove_face_vertex(&mut self, face: FaceId, index: usize) -> Result<VertexId> {
        let f = self.faces.get_mut(&face).ok_or(MeshError::UnknownFace(face))?;
        let len = f.vertices.len();
        if index >= len {
            return Err(MeshError::IndexOutOfRange { index, len });
        }
        if len <= 3 {
            return Err(MeshError::TooFewVertices(len - 1));
        }
        let vertex = f.vertices.remove(index);
        f.invalidate();
        if let Some(v) = self.vertices.get_mut(&vertex) {
            v.faces.remove(&face);
        }
        Ok(vertex)
    }

    /// Positions of a face loop in order
    pub fn face_positions(&self, id: FaceId) -> Option<Vec<Vector>> {
        let face = self.faces.get(&id)?;
        face.vertices
            .iter()
            .map(|v| self.vertices.get(v).map(|v| v.position))
            .collect()
    }

    fn geometry(&self, id: FaceId) -> Option<FaceGeometry> {
        let face = self.faces.get(&id)?;
        if let Some(geometry) = face.geometry.get() {
            return Some(*geometry);
        }
        let positions = self.face_positions(id)?;
        Some(*face.geometry.get_or_init(|| compute_geometry(&positions)))
    }

    /// Unit normal from the first three vertices of the loop
    ///
    /// Collinear leading vertices give a zero normal.
    pub fn face_normal(&self, id: FaceId) -> Option<Vector> {
        self.geometry(id).map(|g| g.normal)
    }

    /// Plane equation of a face
    pub fn face_plane(&self, id: FaceId) -> Option<Plane> {
        self.geometry(id).map(|g| g.plane)
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vector, Vector)> {
        let mut positions = self.positions();
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (
                Vector::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Vector::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        }))
    }
}

fn compute_geometry(positions: &[Vector]) -> FaceGeometry {
    let normal = match positions {
        [a, b, c, ..] => (*b - *a).cross(*c - *a).normalize(),
        _ => Vector::ZERO,
    };
    let origin = positions.first().copied().unwrap_or(Vector::ZERO);
    FaceGeometry {
        normal,
        plane: Plane::from_point_normal(origin, normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Mesh, [VertexId; 3], FaceId) {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Vector::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vector::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vector::new(0.0, 1.0, 0.0));
        let face = mesh.add_face(&[a, b, c]).unwrap();
        (mesh, [a, b, c], face)
    }

    #[test]
    fn test_add_face_records_back_references() {
        let (mesh, [a, b, c], face) = triangle();
        for v in [a, b, c] {
            assert_eq!(mesh.vertex(v).unwrap().faces().collect::<Vec<_>>(), vec![face]);
        }
    }

    #[test]
    fn test_face_normal_and_plane() {
        let (mesh, _, face) = triangle();
        assert_eq!(mesh.face_normal(face), Some(Vector::Z));
        let plane = mesh.face_plane(face).unwrap();
        assert_eq!(plane.height_at(0.2, 0.2), Some(0.0));
    }

    #[test]
    fn test_moving_vertex_invalidates_cached_normal() {
        let (mut mesh, [_, b, _], face) = triangle();
        assert_eq!(mesh.face_normal(face), Some(Vector::Z));

        // Lift b so the triangle tilts toward -X
        mesh.set_vertex_position(b, Vector::new(1.0, 0.0, 1.0)).unwrap();
        let normal = mesh.face_normal(face).unwrap();
        assert!(normal.is_close(Vector::new(-1.0, 0.0, 1.0).normalize()));
    }

    #[test]
    fn test_remove_face_releases_vertices() {
        let (mut mesh, [a, b, c], face) = triangle();
        mesh.remove_face(face).unwrap();
        for v in [a, b, c] {
            assert_eq!(mesh.vertex(v).unwrap().face_count(), 0);
        }
        assert_eq!(mesh.remove_face(face).unwrap_err(), MeshError::UnknownFace(face));
    }

    #[test]
    fn test_remove_vertex_in_use() {
        let (mut mesh, [a, _, _], _) = triangle();
        assert!(matches!(
            mesh.remove_vertex(a, false),
            Err(MeshError::VertexInUse { faces: 1, .. })
        ));
    }

    #[test]
    fn test_remove_vertex_cascades_faces() {
        let (mut mesh, [a, b, c], face) = triangle();
        let d = mesh.add_vertex(Vector::new(1.0, 1.0, 0.0));
        let other = mesh.add_face(&[b, d, c]).unwrap();

        mesh.remove_vertex(a, true).unwrap();

        assert!(mesh.face(face).is_none());
        assert!(mesh.face(other).is_some());
        assert_eq!(mesh.vertex(b).unwrap().faces().collect::<Vec<_>>(), vec![other]);
        for (_, f) in mesh.faces() {
            assert!(!f.vertices().contains(&a));
        }
    }

    #[test]
    fn test_add_face_validation() {
        let (mut mesh, [a, b, _], _) = triangle();
        assert_eq!(mesh.add_face(&[a, b]).unwrap_err(), MeshError::TooFewVertices(2));
        assert_eq!(
            mesh.add_face(&[a, b, a]).unwrap_err(),
            MeshError::DuplicateVertex(a)
        );
        assert_eq!(
            mesh.add_face(&[a, b, VertexId(99)]).unwrap_err(),
            MeshError::UnknownVertex(VertexId(99))
        );
    }

    #[test]
    fn test_insert_and_remove_face_vertex() {
        let (mut mesh, [a, b, c], face) = triangle();
        let d = mesh.add_vertex(Vector::new(1.0, 1.0, 0.0));

        mesh.insert_face_vertex(face, 2, d).unwrap();
        assert_eq!(mesh.face(face).unwrap().vertices(), &[a, b, d, c]);
        assert_eq!(mesh.vertex(d).unwrap().face_count(), 1);

        assert_eq!(mesh.remove_face_vertex(face, 2).unwrap(), d);
        assert_eq!(mesh.vertex(d).unwrap().face_count(), 0);
        assert_eq!(
            mesh.remove_face_vertex(face, 0).unwrap_err(),
            MeshError::TooFewVertices(2)
        );
    }

    #[test]
    fn test_from_polygons_and_bounds() {
        let positions = [
            Vector::new(0.0, 0.0, 1.0),
            Vector::new(2.0, 0.0, 1.0),
            Vector::new(2.0, 3.0, 1.0),
        ];
        let mesh = Mesh::from_polygons(&positions, &[[0usize, 1, 2]]).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(
            mesh.bounds(),
            Some((Vector::new(0.0, 0.0, 1.0), Vector::new(2.0, 3.0, 1.0)))
        );

        let err = Mesh::from_polygons(&positions, &[[0usize, 1, 5]]).unwrap_err();
        assert_eq!(err, MeshError::MissingPosition(5));
    }
}
