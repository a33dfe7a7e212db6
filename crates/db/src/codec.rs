//! Conversion between typed models and stored documents.
//!
//! Documents are the serde JSON form of a model. Enums serialize to their
//! primitive values, decimals to strings and dates to ISO 8601, so the same
//! representation is used for storage, filtering and cache keys.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dao::{DaoError, DaoResult};
use crate::store::Document;

/// Serializes `value` into a document.
pub fn encode<T: Serialize>(collection: &str, value: &T) -> DaoResult<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(DaoError::Encode(format!(
            "{collection}: expected an object, got {}",
            kind(&other)
        ))),
        Err(e) => Err(DaoError::Encode(format!("{collection}: {e}"))),
    }
}

/// Deserializes a stored document.
pub fn decode<T: DeserializeOwned>(collection: &str, document: Document) -> DaoResult<T> {
    serde_json::from_value(Value::Object(document)).map_err(|source| DaoError::Decode {
        collection: collection.to_string(),
        source,
    })
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
