//! Error types for the cache subsystem
//!
//! Provides unified error handling using thiserror.
//!
//! A cache miss is not an error: lookups return `Ok(None)`. The variants
//! here cover the faults that abort a cache operation: contract
//! violations, payload codec failures, and I/O problems. Faults are never
//! swallowed or translated; they propagate to the caller as-is.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache subsystem.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value type was never registered in the serialization contract
    #[error("type {0} is not registered in the serialization contract")]
    UnregisteredType(&'static str),

    /// Persisted payload carries a shape tag no codec is registered for
    #[error("no codec registered for payload shape `{0}`")]
    UnknownShape(String),

    /// A cached value was requested as a different type than was stored
    #[error("cached value for `{key}` has type {found}, expected {expected}")]
    TypeMismatch {
        /// Fully-qualified cache key
        key: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Type actually held by the entry
        found: &'static str,
    },

    /// A codec was invoked with a value it cannot handle
    #[error("payload codec failure: {0}")]
    Codec(String),

    /// Envelope or payload (de)serialization failed
    #[error("envelope serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// File locked, permission denied, disk full, or similar
    #[error("cache I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::UnregisteredType("my::Type");
        assert!(err.to_string().contains("my::Type"));

        let err = CacheError::UnknownShape("blob".to_string());
        assert!(err.to_string().contains("blob"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io(_)));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = CacheError::TypeMismatch {
            key: "k1".to_string(),
            expected: "alloc::string::String",
            found: "alloc::vec::Vec<alloc::string::String>",
        };
        let message = err.to_string();
        assert!(message.contains("k1"));
        assert!(message.contains("expected"));
    }
}
