//! Cached Value Module
//!
//! Type-erased handle for values moving through the provider contract.
//!
//! Providers are trait objects, so they cannot be generic over the value
//! type. `CachedValue` erases the type while keeping enough metadata
//! (TypeId via `Any`, plus the Rust type name for diagnostics) for the
//! service to downcast hits and for the serialization contract to pick
//! the right codec. Cloning is cheap: the payload is behind an `Arc`.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

// == Cached Value ==
/// A cacheable value with its concrete type erased.
///
/// The memory tier stores these live, with no serialization involved.
/// The file tier hands them to the serialization contract, which
/// dispatches on the erased type.
#[derive(Clone)]
pub struct CachedValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl CachedValue {
    // == Constructor ==
    /// Wraps a value for storage, capturing its type name.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    // == Downcast ==
    /// Borrows the value as `T`, or None if the entry holds another type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    // == Type Name ==
    /// Rust type name of the wrapped value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    // == Type Id ==
    /// TypeId of the wrapped value, used for codec dispatch.
    pub(crate) fn type_id_of_value(&self) -> TypeId {
        (*self.inner).type_id()
    }
}

impl fmt::Debug for CachedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CachedValue<{}>", self.type_name)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_matching_type() {
        let value = CachedValue::new("hello".to_string());

        assert_eq!(value.downcast_ref::<String>().unwrap(), "hello");
    }

    #[test]
    fn test_downcast_wrong_type() {
        let value = CachedValue::new("hello".to_string());

        assert!(value.downcast_ref::<Vec<String>>().is_none());
    }

    #[test]
    fn test_type_name_captured() {
        let value = CachedValue::new(vec!["a".to_string()]);

        assert!(value.type_name().contains("Vec"));
    }

    #[test]
    fn test_clone_shares_payload() {
        let value = CachedValue::new("shared".to_string());
        let clone = value.clone();

        assert_eq!(
            value.downcast_ref::<String>().unwrap(),
            clone.downcast_ref::<String>().unwrap()
        );
    }

    #[test]
    fn test_type_id_matches_concrete_type() {
        let value = CachedValue::new(42u64);

        assert_eq!(value.type_id_of_value(), TypeId::of::<u64>());
    }
}
