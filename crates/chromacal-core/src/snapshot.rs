//! Snapshot publishing for estimator results.
//!
//! The illuminant estimator and the calibration solver run on trigger
//! events and produce small result records; a later transform pass consumes
//! them. [`EstimateCell`] hands immutable `Arc` snapshots across that
//! producer/consumer boundary: the lock is held only for the pointer swap,
//! never across an image pass, and a reader either sees a complete record
//! or the previous one, never a torn write.
//!
//! # Example
//!
//! ```rust
//! use chromacal_core::EstimateCell;
//!
//! let cell: EstimateCell<(f32, f32)> = EstimateCell::new();
//! cell.publish((0.34567, 0.35850));
//!
//! let latest = cell.latest().unwrap();
//! assert_eq!(*latest, (0.34567, 0.35850));
//! ```

use std::sync::{Arc, Mutex};

/// A single-slot publish/subscribe cell for immutable result snapshots.
#[derive(Debug)]
pub struct EstimateCell<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> EstimateCell<T> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publishes a new snapshot, replacing any previous one.
    ///
    /// Returns the published `Arc` so the producer can keep a handle.
    pub fn publish(&self, value: T) -> Arc<T> {
        let snapshot = Arc::new(value);
        *self.slot.lock().unwrap() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Returns the most recently published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.slot.lock().unwrap().clone()
    }

    /// Removes and returns the current snapshot.
    ///
    /// Consumers that must act on a result exactly once (committing an
    /// estimate into pass parameters) use this instead of [`latest`].
    ///
    /// [`latest`]: EstimateCell::latest
    pub fn take(&self) -> Option<Arc<T>> {
        self.slot.lock().unwrap().take()
    }
}

impl<T> Default for EstimateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
