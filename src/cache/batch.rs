//! Single-slot cache for the last fetched recipe batch
//!
//! Holds at most one batch plus the time it was cached. A refresh replaces the
//! batch wholesale; nothing is merged or evicted piecemeal. Expired batches are
//! still readable (with `is_expired = true`) so detail lookups can fall back on
//! them when the network is down.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use crate::data::RecipeSummary;

/// An ordered batch of recipe summaries, cheap to clone
pub type Batch = Arc<[RecipeSummary]>;

/// The batch stored in the slot
#[derive(Debug)]
struct CacheEntry {
    batch: Batch,
    cached_at: DateTime<Utc>,
}

/// Result of reading the slot, including freshness metadata
#[derive(Debug, Clone)]
pub struct CachedBatch {
    pub batch: Batch,
    pub cached_at: DateTime<Utc>,
    pub is_expired: bool,
}

/// Cache holding zero or one recipe batch
#[derive(Debug)]
pub struct BatchCache {
    slot: Mutex<Option<CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl BatchCache {
    /// Creates an empty cache using wall-clock time
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache with a custom time source
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reads the slot regardless of freshness
    pub fn read(&self) -> Option<CachedBatch> {
        let slot = self.slot.lock();
        let entry = slot.as_ref()?;
        Some(CachedBatch {
            batch: Arc::clone(&entry.batch),
            cached_at: entry.cached_at,
            is_expired: !self.is_fresh(entry.cached_at),
        })
    }

    /// Returns the batch only while it is inside the freshness window
    pub fn fresh(&self) -> Option<Batch> {
        self.read()
            .filter(|cached| !cached.is_expired)
            .map(|cached| cached.batch)
    }

    /// Replaces the slot with a new batch stamped with the current time
    pub fn write(&self, batch: Batch) {
        let cached_at = self.clock.now();
        debug!(count = batch.len(), %cached_at, "batch cached");
        *self.slot.lock() = Some(CacheEntry { batch, cached_at });
    }

    /// Finds a recipe by id in the slot, fresh or expired
    pub fn find(&self, id: u64) -> Option<RecipeSummary> {
        let slot = self.slot.lock();
        slot.as_ref()?
            .batch
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
    }

    /// Drops the cached batch
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>) -> bool {
        // A clock that moved backwards counts as zero age
        let age = (self.clock.now() - cached_at).to_std().unwrap_or(Duration::ZERO);
        age < self.ttl
    }
}
