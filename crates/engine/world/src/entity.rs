//! Entities placed in the scene
//!
//! An Entity is a node with a world-space transform and links to its parent
//! and children. Links are managed by [`crate::Scene`]; the transform can be
//! read and written through the [`Object`] trait.

use std::fmt;

use math::{Rotation, Vector};
use serde::{Deserialize, Serialize};

/// Stable handle to a scene entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Base trait for anything with a position and rotation
pub trait Object {
    /// Get the current position
    fn position(&self) -> Vector;

    /// Get the current rotation
    fn rotation(&self) -> Rotation;

    /// Set the position
    fn set_position(&mut self, position: Vector);

    /// Set the rotation
    fn set_rotation(&mut self, rotation: Rotation);
}

/// A node in the scene tree
///
/// Positions are in world space; moving a parent moves its children only
/// when the scene is asked to.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Position in world space
    pub position: Vector,
    /// Orientation in world space
    pub rotation: Rotation,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

impl Entity {
    /// Create a new entity at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity at the given position
    pub fn at_position(position: Vector) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Create a new entity with position and rotation
    pub fn with_transform(position: Vector, rotation: Rotation) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Direct children in attachment order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }
}

impl Object for Entity {
    fn position(&self) -> Vector {
        self.position
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}
