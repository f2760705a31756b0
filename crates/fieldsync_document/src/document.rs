//! Flat key/value document records.

use crate::value::{FieldValue, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known field keys shared by every document type.
pub mod keys {
    /// Record identifier.
    pub const ID: &str = "id";
    /// Stability flag: the remote side's consumers read this as
    /// "this record is stable".
    pub const SYNCHRO: &str = "synchro";
    /// Last-modified timestamp, used for advisory conflict comparison.
    pub const LAST_MODIFIED: &str = "last_modified";
}

/// A schemaless remote-store record.
///
/// Keys are kept sorted so serialized output is deterministic, which keeps
/// the push-idempotence property observable in tests and logs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the raw value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Returns true if the key is present, even with a null value.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns true if the key is present and non-null.
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Lenient typed extraction. The remote store is schemaless and
    // multi-writer, so numeric fields may arrive as integers, floats, or
    // numeric text depending on which client wrote them.

    /// Extracts a signed integer.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FieldValue::as_i64)
    }

    /// Extracts a float.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_f64)
    }

    /// Extracts a boolean. Missing or unparseable values read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_bool).unwrap_or(false)
    }

    /// Extracts a text value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    /// Extracts a timestamp.
    pub fn get_datetime(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key).and_then(FieldValue::as_datetime)
    }

    /// Extracts a geographic point.
    pub fn get_geo_point(&self, key: &str) -> Option<GeoPoint> {
        self.get(key).and_then(FieldValue::as_geo_point)
    }

    /// Extracts the record identifier.
    pub fn id(&self) -> Option<i64> {
        self.get_i64(keys::ID)
    }

    /// Sets the record identifier.
    pub fn set_id(&mut self, id: i64) {
        self.set(keys::ID, id);
    }

    /// Reads the stability flag. Absent reads as `false`.
    pub fn synchro(&self) -> bool {
        self.get_bool(keys::SYNCHRO)
    }

    /// Extracts the last-modified timestamp.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.get_datetime(keys::LAST_MODIFIED)
    }
}

impl FromIterator<(String, FieldValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
