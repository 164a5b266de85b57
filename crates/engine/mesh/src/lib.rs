//! Polygon mesh model for meshwalk
//!
//! A [`Mesh`] owns its vertices and faces. Faces are ordered vertex loops,
//! counterclockwise when viewed from outside, and lazily cache their unit
//! normal and [`Plane`]. Collision logic lives in the physics crate; this
//! crate only models geometry and keeps vertex/face references consistent.
//!
//! # Modules
//!
//! - [`mesh`]: [`Mesh`], [`Vertex`], [`Face`] and their ids
//! - [`plane`]: plane equation `ax + by + cz + d = 0`
//! - [`primitives`]: cuboids, ramps, ridges and floor plates
//! - [`error`]: [`MeshError`]

pub mod error;
pub mod mesh;
pub mod plane;
pub mod primitives;

pub use error::{MeshError, Result};
pub use mesh::{Face, FaceId, Mesh, Vertex, VertexId};
pub use plane::Plane;
