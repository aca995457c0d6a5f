// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fetch-once result cache shared by a family of views.
//!
//! [`ResultCache`] is a cheap handle: cloning it yields another handle onto the
//! same slot. The slot holds at most one materialized sequence per generation.
//!
//! # Invariants
//!
//! - Once populated, the stored sequence never changes until [`reset`](ResultCache::reset).
//! - A failed fetch leaves the slot empty; the next call retries.
//! - `reset` drops only the cache's reference. Snapshots already handed out
//!   stay valid for whoever holds them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::RecordSource;

struct CacheSlot<R> {
    items: Option<Arc<[R]>>,
    generation: u64,
    fetches: u64,
}

/// Shared memo of one full materialization of a [`RecordSource`].
pub struct ResultCache<R> {
    slot: Arc<Mutex<CacheSlot<R>>>,
}

impl<R> ResultCache<R> {
    /// Create an empty (unfetched) cache.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(CacheSlot {
                items: None,
                generation: 0,
                fetches: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheSlot<R>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the materialized sequence, enumerating `source` on first use.
    ///
    /// The lock is held across "check empty, enumerate, store", so concurrent
    /// first access enumerates the source once. Source errors are returned
    /// unchanged and nothing is memoized.
    ///
    /// # Errors
    ///
    /// Whatever [`RecordSource::enumerate`] returns. The slot stays empty so
    /// the next call retries.
    pub fn items<S>(&self, source: &S) -> Result<Arc<[R]>, S::Error>
    where
        S: RecordSource<Record = R> + ?Sized,
    {
        let mut slot = self.lock();
        if let Some(items) = &slot.items {
            trace!(generation = slot.generation, "result cache hit");
            return Ok(Arc::clone(items));
        }
        let items: Arc<[R]> = source.enumerate()?.into();
        slot.fetches += 1;
        debug!(
            model = source.model_name(),
            generation = slot.generation,
            records = items.len(),
            "materialized record source"
        );
        slot.items = Some(Arc::clone(&items));
        Ok(items)
    }

    /// Drop the stored sequence; the next [`items`](Self::items) call refetches.
    ///
    /// Affects every handle onto this cache.
    pub fn reset(&self) {
        let mut slot = self.lock();
        let had_items = slot.items.take().is_some();
        slot.generation += 1;
        debug!(generation = slot.generation, had_items, "result cache reset");
    }

    /// Returns `true` if a materialized sequence is currently stored.
    pub fn is_populated(&self) -> bool {
        self.lock().items.is_some()
    }

    /// Number of resets this cache has seen.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Number of successful source enumerations across all generations.
    pub fn fetch_count(&self) -> u64 {
        self.lock().fetches
    }

    /// Returns `true` if both handles refer to the same cache slot.
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<R> Clone for ResultCache<R> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<R> Default for ResultCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for ResultCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.lock();
        f.debug_struct("ResultCache")
            .field("populated", &slot.items.as_ref().map(|items| items.len()))
            .field("generation", &slot.generation)
            .field("fetches", &slot.fetches)
            .finish()
    }
}
