//! Deferred mutations applied during the commit flush

use math::Rotation;

use crate::body::{BodyId, PhysicsBody};
use crate::contact::ContactEvent;

/// A change to the world, queued during a tick and applied at commit
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace a body's state in one step and move its entity (and the
    /// entity's children) to the new position
    CommitBody {
        body: BodyId,
        state: Box<PhysicsBody>,
    },

    /// Turn a body's entity, orbiting its children around it
    Rotate { body: BodyId, delta: Rotation },

    /// Deliver a contact event to the surface's handler
    Notify(ContactEvent),
}

impl Command {
    /// Body the command targets
    pub fn body(&self) -> BodyId {
        match self {
            Command::CommitBody { body, .. } | Command::Rotate { body, .. } => *body,
            Command::Notify(event) => event.body(),
        }
    }
}
