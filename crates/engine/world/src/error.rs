//! Error types for scene operations

use thiserror::Error;

use crate::entity::EntityId;

/// Scene errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Entity {0} cannot be its own parent")]
    SelfParent(EntityId),

    #[error("Attaching {child} under {parent} would create a cycle")]
    Cycle { parent: EntityId, child: EntityId },
}

/// Result type alias for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
