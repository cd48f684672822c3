//! Batch scheduling, parallel dispatch, and result merging.

mod batch;
mod dispatch;
mod job;

pub use batch::{RunSummary, Scheduler, gen_batch};
pub use dispatch::{Dispatcher, ThreadDispatcher};
pub use job::{ExplorationResult, Job};
