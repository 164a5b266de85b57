//! Error types for mesh editing

use thiserror::Error;

use crate::mesh::{FaceId, VertexId};

/// Result type for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors raised by structural mesh edits
///
/// Geometric degeneracy (collinear vertices, vertical faces) is never an
/// error; it shows up as a zero normal instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Vertex id not present in this mesh
    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexId),

    /// Face id not present in this mesh
    #[error("Unknown face: {0}")]
    UnknownFace(FaceId),

    /// Vertex removal refused because faces still reference it
    #[error("Vertex {vertex} is still used by {faces} face(s)")]
    VertexInUse { vertex: VertexId, faces: usize },

    /// A face needs at least three vertices
    #[error("Face needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// A vertex may appear only once in a face loop
    #[error("Vertex {0} appears more than once in the face")]
    DuplicateVertex(VertexId),

    /// Face vertex index outside the loop
    #[error("Index {index} out of range for face with {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    /// Polygon list refers to a position that was not supplied
    #[error("Polygon references missing position index {0}")]
    MissingPosition(usize),
}
