//! Character physics over convex mesh collision surfaces
//!
//! Bodies are point masses with a vertical extent. They walk on the top
//! faces of [`CollisionSurface`]s, slide along their hulls and bump into
//! their bottom faces. Every tick is split in two phases: each simulated
//! object scans the world read-only and keeps a [`Proposal`], then the
//! proposals become [`Command`]s that [`PhysicsWorld::apply`] flushes in
//! one pass.
//!
//! # Modules
//!
//! - [`hull`]: gift-wrapped 2D convex hulls and point containment
//! - [`surface`]: [`CollisionSurface`], height and bounds queries
//! - [`body`]: [`PhysicsBody`] state
//! - [`integrator`]: the scan phase
//! - [`world`]: [`PhysicsWorld`] and the commit flush
//! - [`character_controller`]: input-driven bodies
//! - [`passive`]: bodies with no controller

pub mod body;
pub mod character_controller;
pub mod command;
pub mod config;
pub mod contact;
pub mod error;
pub mod hull;
pub mod integrator;
pub mod passive;
pub mod surface;
pub mod world;

pub use body::{BodyId, PhysicsBody};
pub use character_controller::{
    CharacterController, CharacterControllerConfig, ControllerBindings, LookMode,
};
pub use command::Command;
pub use config::{from_toml_str, load_toml, PhysicsConfig, GRAVITY};
pub use contact::{ContactEvent, ContactHandler};
pub use error::{PhysicsError, Result};
pub use hull::{orientation, ConvexHull, Orientation};
pub use integrator::{Integrator, Proposal};
pub use passive::PassiveBody;
pub use surface::{CollisionSurface, SurfaceId, SurfacePoint};
pub use world::{PhysicsWorld, TickReport};

// Re-export for convenience
pub use glam;
