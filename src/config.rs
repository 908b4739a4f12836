//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.
//!
//! The cache directory is an explicit, injected value rather than a
//! process-wide ambient; `from_env` exists only as a convenience for
//! binaries that wire the standard pipeline.

use std::env;
use std::path::PathBuf;

/// Cache pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Directory for the durable file tier; `None` disables it and the
    /// pipeline stays memory-only
    pub cache_dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment
    /// variables.
    ///
    /// # Environment Variables
    /// - `TIERCACHE_DIR` - File tier directory (default: unset, memory-only)
    pub fn from_env() -> Self {
        Self {
            cache_dir: env::var_os("TIERCACHE_DIR").map(PathBuf::from),
        }
    }

    /// Sets the file tier directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}
