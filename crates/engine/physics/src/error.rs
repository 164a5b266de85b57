//! Error types for the physics world

use mesh::MeshError;
use thiserror::Error;
use world::SceneError;

use crate::body::BodyId;
use crate::surface::SurfaceId;

/// Physics world errors
///
/// Geometry that cannot be resolved during a tick is never an error; it
/// reads as "no data" and the surface is skipped.
#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Unknown body: {0}")]
    UnknownBody(BodyId),

    #[error("Unknown surface: {0}")]
    UnknownSurface(SurfaceId),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
