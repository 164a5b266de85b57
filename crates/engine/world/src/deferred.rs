//! Deferred command queue for the commit phase
//!
//! Objects enqueue commands while the shared world is only borrowed for
//! reading. The owner of the world flushes the queue once, applying every
//! command in the order it was pushed.

/// Ordered batch of pending commands
#[derive(Debug, Clone)]
pub struct CommandQueue<C> {
    pending: Vec<C>,
    flushed: usize,
}

impl<C> Default for CommandQueue<C> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            flushed: 0,
        }
    }
}

impl<C> CommandQueue<C> {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the queue has any pending commands
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Get the number of pending commands
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Total number of commands applied by [`CommandQueue::flush`] so far
    pub fn flushed_count(&self) -> usize {
        self.flushed
    }

    /// Add a command to the end of the queue
    pub fn push(&mut self, command: C) {
        self.pending.push(command);
    }

    /// Pending commands in application order
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.pending.iter()
    }

    /// Append every command of `other` after the ones already queued
    pub fn merge(&mut self, other: CommandQueue<C>) {
        self.pending.extend(other.pending);
    }

    /// Drop all pending commands without applying them
    ///
    /// Returns how many commands were discarded.
    pub fn discard(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Apply every pending command in order and empty the queue
    ///
    /// Commands pushed by `apply` itself are not part of this flush.
    pub fn flush<F>(&mut self, mut apply: F) -> usize
    where
        F: FnMut(C),
    {
        let batch = std::mem::take(&mut self.pending);
        let count = batch.len();
        for command in batch {
            apply(command);
        }
        self.flushed += count;
        count
    }
}

impl<C> Extend<C> for CommandQueue<C> {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.pending.extend(iter);
    }
}
