//! Tiercache - a tiered read-through/write-through cache
//!
//! Avoids redundant round trips to slow remote APIs by layering an
//! ordered list of cache tiers behind one service: fast volatile tiers
//! are queried first on reads, every tier is written on writes.
//!
//! Two tiers ship with the crate: a process-local expiring memory store
//! and a durable one-file-per-key store whose payloads round-trip
//! through a closed [`contract::SerializationContract`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tiercache::{CacheService, FileProvider, MemoryProvider, SerializationContract};
//!
//! let contract = Arc::new(SerializationContract::with_defaults());
//! let cache = CacheService::new(vec![
//!     Arc::new(MemoryProvider::standalone()),
//!     Arc::new(FileProvider::new("/var/cache/mytool", contract)),
//! ]);
//!
//! let services = cache.scoped("search_services");
//! services
//!     .set("sub123", Some(vec!["svcA".into(), "svcB".into()]), Some(Duration::from_secs(3600)))
//!     .await?;
//! let names: Option<Vec<String>> = services.get("sub123").await?;
//! ```

pub mod config;
pub mod contract;
pub mod envelope;
pub mod error;
pub mod provider;
pub mod service;
pub mod value;

pub use config::CacheConfig;
pub use contract::{ContractBuilder, SerializationContract};
pub use envelope::Envelope;
pub use error::{CacheError, Result};
pub use provider::{CacheProvider, CacheStats, FileProvider, MemoryProvider, MemoryStore, SharedMemoryStore};
pub use service::{CacheService, ScopedCache};
pub use value::CachedValue;
