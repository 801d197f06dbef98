//! Per-game async locks for content staging.
//!
//! Staging a game's content into the serving cache must not race: two
//! requests arriving before the first copy completes would interleave
//! filesystem writes. [`KeyedLocks`] hands out one async mutex per game id,
//! created on demand. Entries whose mutex is no longer held anywhere are
//! evicted once the map grows past a threshold, so the map stays bounded by
//! the number of games staging concurrently rather than growing with every
//! game ever served.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use playforge_core::GameId;

/// Map size that triggers an eviction sweep on the next acquire.
const EVICTION_THRESHOLD: usize = 64;

/// A registry of per-game async locks.
#[derive(Default)]
pub struct KeyedLocks {
    inner: Mutex<HashMap<GameId, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyedLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for `game_id`, creating it if absent. The caller holds
    /// the returned `Arc` for as long as it needs the lock; dropping every
    /// clone makes the entry eligible for eviction.
    #[must_use]
    pub fn acquire(&self, game_id: GameId) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if map.len() >= EVICTION_THRESHOLD {
            // Strong count 1 means only the map holds the lock.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        Arc::clone(map.entry(game_id).or_default())
    }

    /// Number of live entries, for diagnostics and tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
