//! Memory Provider Module
//!
//! Process-local tier: a thread-safe expiring key/value store and the
//! provider that adapts it to the [`CacheProvider`] contract.
//!
//! This tier provides latency, not durability; content is lost on
//! process restart. Values are held live (no serialization), so any
//! `Send + Sync` value can pass through it, registered in the
//! serialization contract or not.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::provider::CacheProvider;
use crate::value::CachedValue;

// == Cache Stats ==
/// Hit/miss counters for a memory store.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CacheStats {
    /// Number of successful retrievals
    pub hits: u64,
    /// Number of failed retrievals (absent or expired)
    pub misses: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    /// Calculates hits / (hits + misses), or 0.0 with no requests.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Store Entry ==
/// A single stored value with its optional expiration instant.
#[derive(Debug, Clone)]
struct StoreEntry {
    value: CachedValue,
    expires_at: Option<Instant>,
}

impl StoreEntry {
    fn new(value: CachedValue, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        }
    }

    /// Expired once the current instant is at or past the deadline.
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() >= expires_at,
            None => false,
        }
    }
}

// == Memory Store ==
/// Process-local expiring key/value store.
///
/// Expiration is enforced here, not in the provider: a lookup that finds
/// an entry past its deadline removes it and reports a miss. There is no
/// background sweeper; removal is purely lazy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoreEntry>,
    stats: CacheStats,
}

/// Shared handle to a [`MemoryStore`], cloneable across tasks.
pub type SharedMemoryStore = Arc<RwLock<MemoryStore>>;

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store behind a shared handle.
    pub fn shared() -> SharedMemoryStore {
        Arc::new(RwLock::new(Self::new()))
    }

    // == Get ==
    /// Looks up a live value; self-evicts an entry found past its TTL.
    pub fn get(&mut self, key: &str) -> Option<CachedValue> {
        let live = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.value.clone()),
        };
        match live {
            Some(value) => {
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                // Found past its deadline: self-evict and report a miss
                self.entries.remove(key);
                self.stats.misses += 1;
                None
            }
        }
    }

    // == Insert ==
    /// Inserts or overwrites a value. A `ttl` becomes the entry's
    /// absolute expiration measured from now; without one the entry has
    /// no explicit expiration.
    pub fn insert(&mut self, key: String, value: CachedValue, ttl: Option<Duration>) {
        self.entries.insert(key, StoreEntry::new(value, ttl));
    }

    // == Remove ==
    /// Removes an entry; returns whether one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Stats ==
    /// Current counters, with the live entry count filled in.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats
    }

    // == Length ==
    /// Number of entries currently held (expired ones included until
    /// their next lookup).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Memory Provider ==
/// [`CacheProvider`] over a shared [`MemoryStore`].
///
/// The provider performs no expiration check of its own; it trusts the
/// wrapped store to report expired entries as misses.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    store: SharedMemoryStore,
}

impl MemoryProvider {
    // == Constructor ==
    /// Wraps an existing shared store.
    pub fn new(store: SharedMemoryStore) -> Self {
        Self { store }
    }

    /// Creates a provider over a fresh, private store.
    pub fn standalone() -> Self {
        Self::new(MemoryStore::shared())
    }

    /// Handle to the wrapped store.
    pub fn store(&self) -> SharedMemoryStore {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl CacheProvider for MemoryProvider {
    async fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: CachedValue, ttl: Option<Duration>) -> Result<()> {
        self.store.write().await.insert(key.to_string(), value, ttl);
        debug!(key, ttl = ?ttl, "memory cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.write().await.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
