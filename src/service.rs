//! Cache Service Module
//!
//! Single entry point the rest of the system memoizes expensive calls
//! through. Owns an ordered sequence of providers (fast volatile tiers
//! first, durable tiers after) and implements the read-through /
//! write-through fan-out across them.
//!
//! Tiers are allowed to disagree: after a restart the memory tier is
//! empty while the file tier still holds a live entry, and a lookup
//! simply falls through. A hit found in a slow tier is deliberately not
//! promoted into the faster tiers; callers that want warming re-set the
//! value themselves.
//!
//! Provider faults are not caught here: any error during a lookup,
//! write, or delete aborts the operation and reaches the caller as-is.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::CacheConfig;
use crate::contract::SerializationContract;
use crate::error::{CacheError, Result};
use crate::provider::{CacheProvider, FileProvider, MemoryProvider, SharedMemoryStore};
use crate::value::CachedValue;

// == Cache Service ==
/// Read-through/write-through orchestrator over ordered cache tiers.
#[derive(Debug, Clone)]
pub struct CacheService {
    providers: Vec<Arc<dyn CacheProvider>>,
}

impl CacheService {
    // == Constructors ==
    /// Builds a service over an explicit ordered provider list,
    /// queried fastest-first.
    pub fn new(providers: Vec<Arc<dyn CacheProvider>>) -> Self {
        Self { providers }
    }

    /// Convenience path: a single memory-only pipeline over a supplied
    /// in-memory store.
    pub fn with_memory(store: SharedMemoryStore) -> Self {
        Self::new(vec![Arc::new(MemoryProvider::new(store))])
    }

    /// Builds the standard pipeline from configuration: a memory tier,
    /// backed by a file tier when a cache directory is configured.
    pub fn from_config(config: &CacheConfig, contract: Arc<SerializationContract>) -> Self {
        let mut providers: Vec<Arc<dyn CacheProvider>> =
            vec![Arc::new(MemoryProvider::standalone())];
        if let Some(dir) = &config.cache_dir {
            providers.push(Arc::new(FileProvider::new(dir, contract)));
        }
        Self::new(providers)
    }

    /// The configured providers, in query order.
    pub fn providers(&self) -> &[Arc<dyn CacheProvider>] {
        &self.providers
    }

    // == Get ==
    /// Queries providers in order and returns the first hit, without
    /// consulting the remaining tiers. A miss in every tier is
    /// `Ok(None)`.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        for provider in &self.providers {
            if let Some(value) = provider.get(key).await? {
                debug!(provider = provider.name(), key, "cache hit");
                return match value.downcast_ref::<T>() {
                    Some(value) => Ok(Some(value.clone())),
                    None => Err(CacheError::TypeMismatch {
                        key: key.to_string(),
                        expected: std::any::type_name::<T>(),
                        found: value.type_name(),
                    }),
                };
            }
        }
        debug!(key, "cache miss in all tiers");
        Ok(None)
    }

    // == Set ==
    /// Writes the value to every configured provider. `None` is a
    /// no-op: it neither creates nor clears an entry.
    pub async fn set<T>(&self, key: &str, value: Option<T>, ttl: Option<Duration>) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        let Some(value) = value else {
            return Ok(());
        };

        let value = CachedValue::new(value);
        for provider in &self.providers {
            provider.set(key, value.clone(), ttl).await?;
        }
        Ok(())
    }

    // == Delete ==
    /// Deletes the key from every configured provider. Idempotent.
    pub async fn delete(&self, key: &str) -> Result<()> {
        for provider in &self.providers {
            provider.delete(key).await?;
        }
        Ok(())
    }

    // == Scoped View ==
    /// View of this service with every key prefixed by a logical group,
    /// so unrelated callers sharing one physical store cannot collide.
    /// Pure string composition; the storage layer is unaware of groups.
    pub fn scoped(&self, group: impl Into<String>) -> ScopedCache {
        ScopedCache {
            service: self.clone(),
            group: group.into(),
        }
    }
}

// == Scoped Cache ==
/// Group-namespaced view over a [`CacheService`].
#[derive(Debug, Clone)]
pub struct ScopedCache {
    service: CacheService,
    group: String,
}

impl ScopedCache {
    fn qualified(&self, key: &str) -> String {
        format!("{}_{}", self.group, key)
    }

    /// See [`CacheService::get`].
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.service.get(&self.qualified(key)).await
    }

    /// See [`CacheService::set`].
    pub async fn set<T>(&self, key: &str, value: Option<T>, ttl: Option<Duration>) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        self.service.set(&self.qualified(key), value, ttl).await
    }

    /// See [`CacheService::delete`].
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.service.delete(&self.qualified(key)).await
    }
}
