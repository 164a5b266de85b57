//! Vector and rotation algebra for meshwalk
//!
//! Every other meshwalk crate builds on the types in this crate. They are
//! small `Copy` values with pure operations; nothing here allocates or fails.
//!
//! # Modules
//!
//! - [`tolerance`]: shared relative+absolute float comparison
//! - [`vector`]: [`Vector`], a double-precision 3D vector
//! - [`rotation`]: [`Rotation`], three sequential axis rotations

pub mod rotation;
pub mod tolerance;
pub mod vector;

pub use rotation::Rotation;
pub use tolerance::{greater_or_close, is_close, is_close_with, less_or_close, DEFAULT_EPSILON};
pub use vector::Vector;

// Re-export for convenience
pub use glam;
