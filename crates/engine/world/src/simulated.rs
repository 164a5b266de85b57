//! Two-phase per-tick lifecycle
//!
//! A tick runs [`Simulated::scan`] on every object against a shared,
//! read-only world, then [`Simulated::update`] on every object to enqueue
//! the resulting commands. Nothing is mutated until the queue is flushed,
//! so the order objects are scanned in never changes the outcome.

use crate::deferred::CommandQueue;

/// Behavior driven by the tick loop
///
/// `W` is the world read during the scan phase and `C` the command type
/// the world knows how to apply.
pub trait Simulated<W, C> {
    /// Inspect the world and compute a private proposal
    ///
    /// Called once per tick with the time delta and the total simulated
    /// time, both in seconds.
    fn scan(&mut self, world: &W, elapsed: f64, total: f64);

    /// Turn the pending proposal into commands
    ///
    /// Does nothing when no proposal is pending.
    fn update(&mut self, queue: &mut CommandQueue<C>);

    /// Drop the pending proposal without enqueuing anything
    fn cancel(&mut self) {}

    /// Whether the owner may drop this object after the current tick
    fn ready_to_remove(&self) -> bool {
        false
    }
}
