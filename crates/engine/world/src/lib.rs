//! Scene tree and tick plumbing for meshwalk
//!
//! - [`Scene`] owns entities, their parent/child links and transforms
//! - [`CommandQueue`] collects deferred mutations until the commit phase
//! - [`Simulated`] is the two-phase lifecycle driven once per tick

mod deferred;
mod entity;
mod error;
mod scene;
mod simulated;

pub use deferred::CommandQueue;
pub use entity::{Entity, EntityId, Object};
pub use error::{Result, SceneError};
pub use scene::Scene;
pub use simulated::Simulated;
