//! Cache Provider Module
//!
//! Capability contract implemented by each backing tier, plus the two
//! shipped backends: a process-local memory tier and a durable
//! one-file-per-key tier.
//!
//! Providers know nothing about tiering policy; ordering and fan-out
//! live in [`crate::service::CacheService`].

mod file;
mod memory;


pub use file::FileProvider;
pub use memory::{CacheStats, MemoryProvider, MemoryStore, SharedMemoryStore};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::value::CachedValue;

// == Cache Provider Trait ==
/// Uniform contract over the backing tiers.
///
/// - `get` never faults for "not found": a miss is `Ok(None)`. Faults
///   are reserved for serialization and I/O problems.
/// - `set` completes fully or faults; a half-written entry must never
///   be observable to a concurrent reader.
/// - `delete` is idempotent; deleting an absent key is not a fault.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Looks up a live entry. Expired entries read as misses.
    async fn get(&self, key: &str) -> Result<Option<CachedValue>>;

    /// Inserts or overwrites an entry. `ttl`, when given, becomes the
    /// entry's absolute expiration measured from the call time.
    async fn set(&self, key: &str, value: CachedValue, ttl: Option<Duration>) -> Result<()>;

    /// Removes an entry if present.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Short identifier for logging (e.g. "memory", "file").
    fn name(&self) -> &'static str;
}
