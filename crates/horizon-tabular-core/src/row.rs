//! Row abstraction.
//!
//! The engine treats rows as opaque: the only things it ever asks of a row are
//! its stable identifier and the value of a named field. Screens implement
//! [`Row`] for their own record types, or use the map-backed [`Record`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Stable unique identifier of a row.
///
/// Identifiers coming from the remote service may be numeric or textual; both
/// are normalized to their string form so the selection set has one key type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RowId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<u32> for RowId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

/// A record the engine can filter, sort, select and export.
///
/// # Example
///
/// ```
/// use horizon_tabular_core::{FieldValue, Row, RowId};
///
/// struct Account {
///     id: u64,
///     owner: String,
///     balance: Option<f64>,
/// }
///
/// impl Row for Account {
///     fn id(&self) -> RowId {
///         RowId::from(self.id)
///     }
///
///     fn field(&self, key: &str) -> FieldValue {
///         match key {
///             "owner" => FieldValue::from(self.owner.as_str()),
///             "balance" => FieldValue::from(self.balance),
///             _ => FieldValue::Null,
///         }
///     }
/// }
/// ```
pub trait Row {
    /// Returns the stable identifier of this row.
    fn id(&self) -> RowId;

    /// Returns the value of a field, or [`FieldValue::Null`] if the row has no
    /// such field.
    fn field(&self, key: &str) -> FieldValue;
}

impl<T: Row + ?Sized> Row for Arc<T> {
    fn id(&self) -> RowId {
        (**self).id()
    }

    fn field(&self, key: &str) -> FieldValue {
        (**self).field(key)
    }
}

impl<T: Row + ?Sized> Row for Box<T> {
    fn id(&self) -> RowId {
        (**self).id()
    }

    fn field(&self, key: &str) -> FieldValue {
        (**self).field(key)
    }
}

/// A generic, map-backed row.
///
/// Useful when the records arrive as loosely typed JSON objects from the
/// remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RowId,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record with the given identifier.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field (builder style).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns a reference to a field value, if present.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Returns an iterator over `(key, value)` pairs in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds a record from a JSON object.
    ///
    /// Returns `None` if `value` is not an object or if its `id_key` member is
    /// missing or null. Every member, including the identifier, is kept as a
    /// field.
    pub fn from_json(value: &serde_json::Value, id_key: &str) -> Option<Self> {
        let object = value.as_object()?;
        let id = match object.get(id_key)? {
            serde_json::Value::Null => return None,
            serde_json::Value::String(s) => RowId::new(s.clone()),
            other => RowId::new(other.to_string()),
        };

        let fields = object
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::from(v)))
            .collect();

        Some(Self { id, fields })
    }
}

impl Row for Record {
    fn id(&self) -> RowId {
        self.id.clone()
    }

    fn field(&self, key: &str) -> FieldValue {
        self.fields.get(key).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id_conversions() {
        assert_eq!(RowId::from(42i64).as_str(), "42");
        assert_eq!(RowId::from("abc").as_str(), "abc");
        assert_eq!(RowId::from(7u32), RowId::new("7"));
    }

    #[test]
    fn test_record_missing_field_is_null() {
        let record = Record::new(1).with_field("name", "Alice");
        assert_eq!(record.field("name"), FieldValue::from("Alice"));
        assert!(record.field("email").is_null());
    }

    #[test]
    fn test_record_from_json() {
        let json = serde_json::json!({
            "id": 99999999999999i64,
            "name": "Ledger",
            "phone": "201234567890",
            "closed": null,
        });

        let record = Record::from_json(&json, "id").unwrap();
        assert_eq!(record.id().as_str(), "99999999999999");
        assert_eq!(record.field("name"), FieldValue::from("Ledger"));
        assert!(record.field("closed").is_null());
        assert_eq!(record.field("id"), FieldValue::Int(99999999999999));
    }

    #[test]
    fn test_record_from_json_requires_id() {
        let json = serde_json::json!({ "name": "orphan" });
        assert!(Record::from_json(&json, "id").is_none());

        let json = serde_json::json!({ "id": null });
        assert!(Record::from_json(&json, "id").is_none());

        let json = serde_json::json!([1, 2, 3]);
        assert!(Record::from_json(&json, "id").is_none());
    }

    #[test]
    fn test_string_id_is_not_quoted() {
        let json = serde_json::json!({ "uuid": "a-b-c" });
        let record = Record::from_json(&json, "uuid").unwrap();
        assert_eq!(record.id().as_str(), "a-b-c");
    }
}
