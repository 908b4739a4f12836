//! Serialization Contract Module
//!
//! Closed, statically declared registry mapping value types to their
//! serialize/deserialize logic. The persistent tier routes every payload
//! through this table; a type that was never registered is a fail-fast
//! configuration error, never a silent fallback.
//!
//! Payload wire form is a tagged object:
//!
//! ```json
//! { "shape": "text_list", "data": ["svcA", "svcB"] }
//! ```
//!
//! The tag lets the file tier decode a payload read back from disk
//! without compile-time knowledge of the stored type.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CacheError, Result};
use crate::value::CachedValue;

type EncodeFn = fn(&CachedValue) -> Result<JsonValue>;
type DecodeFn = fn(&JsonValue) -> Result<CachedValue>;

// == Codec ==
/// Serialize/deserialize function pair for one registered type.
#[derive(Clone, Copy)]
struct Codec {
    shape: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
}

// == Tagged Payload ==
/// Wire form of a contract-encoded payload.
#[derive(Serialize, Deserialize)]
struct TaggedPayload {
    shape: String,
    data: JsonValue,
}

// == Contract Builder ==
/// Builder for a [`SerializationContract`].
///
/// Registration happens once, at construction; the built contract is
/// immutable, which is what makes the registry a closed set.
#[derive(Default)]
pub struct ContractBuilder {
    by_type: HashMap<TypeId, Codec>,
    by_shape: HashMap<&'static str, Codec>,
}

impl ContractBuilder {
    // == Register ==
    /// Registers `T` under a stable shape tag.
    ///
    /// The tag is what gets persisted, so it must stay stable across
    /// releases for on-disk entries to remain readable.
    pub fn register<T>(mut self, shape: &'static str) -> Self
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let codec = Codec {
            shape,
            encode: encode_as::<T>,
            decode: decode_as::<T>,
        };
        self.by_type.insert(TypeId::of::<T>(), codec);
        self.by_shape.insert(shape, codec);
        self
    }

    // == Build ==
    /// Finalizes the registry.
    pub fn build(self) -> SerializationContract {
        SerializationContract {
            by_type: self.by_type,
            by_shape: self.by_shape,
        }
    }
}

// == Serialization Contract ==
/// The closed set of shapes the persistent tier can round-trip.
pub struct SerializationContract {
    by_type: HashMap<TypeId, Codec>,
    by_shape: HashMap<&'static str, Codec>,
}

impl SerializationContract {
    // == Builder ==
    /// Starts an empty registry.
    pub fn builder() -> ContractBuilder {
        ContractBuilder::default()
    }

    // == Defaults ==
    /// Registry covering the value shapes used across the codebase:
    /// strings, lists of strings, and small string-keyed records.
    pub fn with_defaults() -> Self {
        Self::builder()
            .register::<String>("text")
            .register::<Vec<String>>("text_list")
            .register::<BTreeMap<String, String>>("record")
            .build()
    }

    // == Is Registered ==
    /// Whether `T` has a codec in this registry.
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    // == Encode ==
    /// Serializes a value into its tagged payload form.
    ///
    /// Fails with [`CacheError::UnregisteredType`] if the value's type
    /// has no codec. Runs before any file is touched, so a rejected
    /// value leaves no trace on disk.
    pub fn encode(&self, value: &CachedValue) -> Result<JsonValue> {
        let codec = self
            .by_type
            .get(&value.type_id_of_value())
            .ok_or(CacheError::UnregisteredType(value.type_name()))?;
        let data = (codec.encode)(value)?;
        Ok(serde_json::to_value(TaggedPayload {
            shape: codec.shape.to_string(),
            data,
        })?)
    }

    // == Decode ==
    /// Reconstructs a value from its tagged payload form.
    ///
    /// The shape tag selects the codec; an unknown tag fails with
    /// [`CacheError::UnknownShape`].
    pub fn decode(&self, payload: &JsonValue) -> Result<CachedValue> {
        let tagged: TaggedPayload = serde_json::from_value(payload.clone())?;
        let codec = self
            .by_shape
            .get(tagged.shape.as_str())
            .ok_or_else(|| CacheError::UnknownShape(tagged.shape.clone()))?;
        (codec.decode)(&tagged.data)
    }
}

impl std::fmt::Debug for SerializationContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shapes: Vec<_> = self.by_shape.keys().collect();
        shapes.sort();
        f.debug_struct("SerializationContract")
            .field("shapes", &shapes)
            .finish()
    }
}

// == Codec Functions ==

fn encode_as<T: Serialize + 'static>(value: &CachedValue) -> Result<JsonValue> {
    let value = value.downcast_ref::<T>().ok_or_else(|| {
        CacheError::Codec(format!(
            "codec for {} received a {}",
            std::any::type_name::<T>(),
            value.type_name()
        ))
    })?;
    Ok(serde_json::to_value(value)?)
}

fn decode_as<T: DeserializeOwned + Send + Sync + 'static>(data: &JsonValue) -> Result<CachedValue> {
    let value: T = serde_json::from_value(data.clone())?;
    Ok(CachedValue::new(value))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shapes_registered() {
        let contract = SerializationContract::with_defaults();

        assert!(contract.is_registered::<String>());
        assert!(contract.is_registered::<Vec<String>>());
        assert!(contract.is_registered::<BTreeMap<String, String>>());
        assert!(!contract.is_registered::<u64>());
    }

    #[test]
    fn test_encode_decode_roundtrip_string() {
        let contract = SerializationContract::with_defaults();

        let payload = contract
            .encode(&CachedValue::new("hello".to_string()))
            .unwrap();
        let decoded = contract.decode(&payload).unwrap();

        assert_eq!(decoded.downcast_ref::<String>().unwrap(), "hello");
    }

    #[test]
    fn test_encode_decode_roundtrip_string_list() {
        let contract = SerializationContract::with_defaults();
        let list = vec!["svcA".to_string(), "svcB".to_string()];

        let payload = contract.encode(&CachedValue::new(list.clone())).unwrap();
        let decoded = contract.decode(&payload).unwrap();

        assert_eq!(decoded.downcast_ref::<Vec<String>>().unwrap(), &list);
    }

    #[test]
    fn test_encode_unregistered_type_fails() {
        let contract = SerializationContract::with_defaults();

        let result = contract.encode(&CachedValue::new(42u64));
        assert!(matches!(result, Err(CacheError::UnregisteredType(_))));
    }

    #[test]
    fn test_decode_unknown_shape_fails() {
        let contract = SerializationContract::with_defaults();
        let payload = serde_json::json!({ "shape": "blob", "data": null });

        let result = contract.decode(&payload);
        assert!(matches!(result, Err(CacheError::UnknownShape(tag)) if tag == "blob"));
    }

    #[test]
    fn test_decode_malformed_payload_fails() {
        let contract = SerializationContract::with_defaults();
        let payload = serde_json::json!(["not", "a", "tagged", "payload"]);

        assert!(matches!(
            contract.decode(&payload),
            Err(CacheError::Serde(_))
        ));
    }

    #[test]
    fn test_custom_registration() {
        #[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
        struct Endpoint {
            host: String,
            port: u16,
        }

        let contract = SerializationContract::builder()
            .register::<Endpoint>("endpoint")
            .build();

        let original = Endpoint {
            host: "example.net".to_string(),
            port: 8443,
        };
        let payload = contract.encode(&CachedValue::new(original.clone())).unwrap();
        let decoded = contract.decode(&payload).unwrap();

        assert_eq!(decoded.downcast_ref::<Endpoint>().unwrap(), &original);
    }

    #[test]
    fn test_payload_carries_shape_tag() {
        let contract = SerializationContract::with_defaults();

        let payload = contract
            .encode(&CachedValue::new(vec!["x".to_string()]))
            .unwrap();

        assert_eq!(payload["shape"], "text_list");
        assert!(payload["data"].is_array());
    }
}
