//! Bodies without a controller
//!
//! A passive body keeps whatever velocity it has and is moved only by the
//! integrator: it falls, lands, slides along walls and triggers volumes.

use world::{CommandQueue, Simulated};

use crate::body::BodyId;
use crate::command::Command;
use crate::integrator::Proposal;
use crate::world::PhysicsWorld;

/// Simulated object driving one body with no input
#[derive(Debug, Clone)]
pub struct PassiveBody {
    body: BodyId,
    kill_height: Option<f64>,
    pending: Option<Proposal>,
    removable: bool,
}

impl PassiveBody {
    pub fn new(body: BodyId) -> Self {
        Self {
            body,
            kill_height: None,
            pending: None,
            removable: false,
        }
    }

    /// Mark the body for removal once it falls below `height`
    pub fn with_kill_height(mut self, height: f64) -> Self {
        self.kill_height = Some(height);
        self
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Proposal computed by the last scan, if not yet turned into commands
    pub fn pending(&self) -> Option<&Proposal> {
        self.pending.as_ref()
    }
}

impl Simulated<PhysicsWorld, Command> for PassiveBody {
    fn scan(&mut self, world: &PhysicsWorld, elapsed: f64, _total: f64) {
        let Some(body) = world.body(self.body) else {
            self.pending = None;
            self.removable = true;
            return;
        };
        let proposal = world.integrator().scan(self.body, body, world, elapsed);
        self.removable = self
            .kill_height
            .is_some_and(|kill| proposal.state.position.z < kill);
        self.pending = Some(proposal);
    }

    fn update(&mut self, queue: &mut CommandQueue<Command>) {
        if let Some(proposal) = self.pending.take() {
            queue.extend(proposal.into_commands());
        }
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn ready_to_remove(&self) -> bool {
        self.removable
    }
}
