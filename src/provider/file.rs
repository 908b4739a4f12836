//! File Provider Module
//!
//! Durable, single-node tier: exactly one file per key under an injected
//! cache directory. Entries survive process restart, bounded by their
//! absolute expiration.
//!
//! # Layout
//!
//! - Filename: URL-safe base64 (no padding) of the UTF-8 key bytes, so
//!   arbitrary key strings (including path-unsafe ones) map to valid
//!   filenames with no collisions between distinct keys.
//! - Content: the JSON [`Envelope`] wrapping a contract-encoded payload.
//!
//! # Failure model
//!
//! A missing file is a miss. An empty or unparsable file is also read as
//! a miss (partially initialized state), with a warning. An entry found
//! at or past its absolute expiration is deleted and reported as a miss.
//! Everything else (locked file, permission denied, disk full) is an
//! I/O fault propagated unfiltered; this provider never retries or backs
//! off, and takes no lock of its own. Racing operations on one key are
//! resolved by the filesystem: the last completed write wins and the
//! losing side of an open conflict sees the fault.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use tracing::{debug, warn};

use crate::contract::SerializationContract;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::provider::CacheProvider;
use crate::value::CachedValue;

/// Distinguishes concurrent writers' temp files within one process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

// == File Provider ==
/// [`CacheProvider`] persisting one envelope file per key.
#[derive(Debug)]
pub struct FileProvider {
    dir: PathBuf,
    contract: Arc<SerializationContract>,
}

impl FileProvider {
    // == Constructor ==
    /// Creates a provider over `dir`, routing payloads through
    /// `contract`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, contract: Arc<SerializationContract>) -> Self {
        Self {
            dir: dir.into(),
            contract,
        }
    }

    /// The cache directory this provider writes under.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The serialization contract gating this provider.
    pub fn contract(&self) -> Arc<SerializationContract> {
        Arc::clone(&self.contract)
    }

    // == Key To Path ==
    /// Deterministic, collision-safe key-to-filename mapping.
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(URL_SAFE_NO_PAD.encode(key.as_bytes()))
    }

    /// Sibling temp path unique to this write.
    fn tmp_path_for(&self, path: &Path) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.{}.tmp", std::process::id(), seq));
        path.with_file_name(name)
    }
}

#[async_trait]
impl CacheProvider for FileProvider {
    async fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        let path = self.path_for(key);

        // Absent file is a miss, not a fault; other read errors propagate
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        // An empty or unparsable file is partially initialized state:
        // read it as a miss rather than a fault
        if bytes.is_empty() {
            warn!(key, path = %path.display(), "empty cache file treated as miss");
            return Ok(None);
        }
        let envelope: Envelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(key, path = %path.display(), error = %err, "unparsable cache file treated as miss");
                return Ok(None);
            }
        };

        // Expired entry: lazy cleanup, then miss
        if envelope.is_expired(Utc::now()) {
            debug!(key, path = %path.display(), "expired cache file removed");
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                // A concurrent reader may have cleaned it up first
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
            return Ok(None);
        }

        let value = self.contract.decode(&envelope.value)?;
        debug!(key, "file cache hit");
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: CachedValue, ttl: Option<Duration>) -> Result<()> {
        // Contract check runs before any file I/O, so a rejected value
        // leaves nothing on disk
        let payload = self.contract.encode(&value)?;
        let envelope = Envelope::new(payload, ttl);
        let bytes = serde_json::to_vec(&envelope)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        // Write to a temp file and rename into place so a concurrent
        // reader can never observe a half-written envelope
        let path = self.path_for(key);
        let tmp = self.tmp_path_for(&path);
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            // A failed publish must not leave the temp file behind
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        debug!(key, path = %path.display(), ttl = ?ttl, "file cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
