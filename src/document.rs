//! Shared JSON-object document under one store key.
//!
//! The settings key holds a single object that several independent records
//! write into (app settings, theme preferences). Each writer loads the whole
//! object, replaces only its own fields and writes it back, so fields owned by
//! another record survive.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::storage::KeyValueStore;

pub type Document = Map<String, Value>;

/// Load the object stored under `key`.
///
/// Store failures propagate. A missing key yields an empty object; a value
/// that is not a JSON object is logged and treated as empty.
pub async fn load_document<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Document> {
    let Some(raw) = store.get(key).await? else {
        return Ok(Document::new());
    };
    Ok(parse_document(key, &raw))
}

/// Serialize and store `document` under `key`
pub async fn save_document<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    document: &Document,
) -> Result<()> {
    let json = serde_json::to_string(document)?;
    store.set(key, json).await
}

/// Decode one field, `None` when absent or of the wrong shape
pub fn field<T: DeserializeOwned>(document: &Document, name: &str) -> Option<T> {
    let value = document.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::debug!(field = name, error = %err, "ignoring malformed field");
            None
        }
    }
}

fn parse_document(key: &str, raw: &str) -> Document {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(
                key,
                kind = value_kind(&other),
                "expected JSON object, ignoring stored value"
            );
            Document::new()
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "corrupt document, ignoring stored value");
            Document::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_missing_and_corrupt_are_empty() {
        let store = MemoryStore::new();
        assert!(load_document(&store, "k").await.unwrap().is_empty());

        store.raw_insert("k", "[1,2]").await;
        assert!(load_document(&store, "k").await.unwrap().is_empty());

        store.raw_insert("k", "{oops").await;
        assert!(load_document(&store, "k").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        assert!(load_document(&store, "k").await.is_err());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut doc = Document::new();
        doc.insert("theme".to_string(), Value::from("dark"));
        save_document(&store, "k", &doc).await.unwrap();

        let loaded = load_document(&store, "k").await.unwrap();
        assert_eq!(field::<String>(&loaded, "theme").as_deref(), Some("dark"));
        assert_eq!(field::<bool>(&loaded, "theme"), None);
        assert_eq!(field::<bool>(&loaded, "missing"), None);
    }
}
