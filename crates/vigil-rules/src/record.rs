//! # Data Records
//!
//! The flat (optionally nested) key/value projection of an entity that
//! rule conditions are evaluated against. Produced only by the preparers
//! in [`crate::prepare`]; the evaluator never sees a raw entity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An entity's prepared data: a JSON object with dotted-path lookup.
///
/// Nested objects are addressable with dot-separated paths
/// (`behavioral.tx_count_24h`). A missing path resolves to `None`, which
/// the condition evaluator treats as JSON null — lookups never fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRecord(Map<String, Value>);

impl DataRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a top-level field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert a nested object under `key`.
    pub fn insert_nested(&mut self, key: impl Into<String>, nested: DataRecord) {
        self.0.insert(key.into(), Value::Object(nested.0));
    }

    /// Resolve a dot-separated path against the record.
    ///
    /// Traversal stops (returning `None`) at the first segment that is
    /// missing or whose parent is not an object.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// The record as a JSON value, for audit snapshots.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<DataRecord> for Value {
    fn from(record: DataRecord) -> Self {
        Value::Object(record.0)
    }
}
