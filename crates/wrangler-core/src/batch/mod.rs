//! Batch execution: job validation, the background runner, and its events.
//!
//! Items run strictly one after another. Each item's failure is recorded
//! and reported, and the batch moves on; only job validation can stop a
//! batch before it starts.

pub mod events;
pub mod job;
pub mod runner;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use events::{
    dispatch, BatchEvent, ProgressEvent, ProgressObserver, StatusEvent, StatusKind,
};
pub use job::BatchJob;
pub use runner::{BatchHandle, BatchRunner};

/// Cooperative cancellation, checked between items.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
