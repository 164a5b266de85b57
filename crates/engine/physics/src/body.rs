//! Physics state of a controlled entity

use std::collections::BTreeSet;
use std::fmt;

use math::{Rotation, Vector};
use serde::{Deserialize, Serialize};
use world::EntityId;

use crate::surface::SurfaceId;

/// Stable handle to a body in a [`crate::PhysicsWorld`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// Point-mass body with a vertical extent
///
/// `position` is at the feet; the body occupies `[z, z + height]`.
/// While grounded, `velocity` lies along the floor plane and
/// `vertical_velocity` is zero. While airborne, `velocity` is horizontal and
/// vertical motion lives in `vertical_velocity`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub entity: EntityId,
    pub position: Vector,
    pub rotation: Rotation,
    pub velocity: Vector,
    pub vertical_velocity: f64,
    pub height: f64,
    /// Floor currently supporting the body
    pub floor: Option<SurfaceId>,
    /// Floor the body jumped from during the current tick
    pub jumped_from: Option<SurfaceId>,
    /// Non-solid surfaces currently overlapped
    pub volumes: BTreeSet<SurfaceId>,
    /// Walls hit during the last tick
    pub walls: BTreeSet<SurfaceId>,
    /// Ceilings hit during the last tick
    pub ceilings: BTreeSet<SurfaceId>,
}

impl PhysicsBody {
    pub fn new(entity: EntityId, position: Vector, height: f64) -> Self {
        Self {
            entity,
            position,
            rotation: Rotation::ZERO,
            velocity: Vector::ZERO,
            vertical_velocity: 0.0,
            height,
            floor: None,
            jumped_from: None,
            volumes: BTreeSet::new(),
            walls: BTreeSet::new(),
            ceilings: BTreeSet::new(),
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.floor.is_some()
    }

    /// Height of the top of the body
    pub fn head(&self) -> f64 {
        self.position.z + self.height
    }

    /// Full 3D velocity including the vertical component
    pub fn total_velocity(&self) -> Vector {
        self.velocity + Vector::Z * self.vertical_velocity
    }
}
