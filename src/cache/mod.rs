//! In-memory caching for recipe fetches
//!
//! This module provides the single-slot batch cache with an injectable clock and
//! the coalescer that collapses concurrent identical requests into one network
//! call. Nothing here is persisted; state lives as long as the owning service.

mod batch;
mod clock;
mod coalesce;

pub use batch::{Batch, BatchCache, CachedBatch};
pub use clock::{Clock, ManualClock, SystemClock};
pub use coalesce::Coalescer;
