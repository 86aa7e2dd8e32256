//! Field values handed out by rows.
//!
//! [`FieldValue`] is the type-erased value a [`Row`](crate::Row) returns for a
//! field key. Filtering, sorting and export all operate on this representation,
//! so the engine never needs to know the caller's record shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The broad kind of a [`FieldValue`], used for comparator dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Missing or explicit null.
    Null,
    /// Boolean.
    Bool,
    /// Integer or floating point number.
    Number,
    /// Text.
    Text,
}

/// A single field value of a row.
///
/// # Example
///
/// ```
/// use horizon_tabular_core::FieldValue;
///
/// let value = FieldValue::from("Hello");
/// assert_eq!(value.as_text(), Some("Hello"));
///
/// let value = FieldValue::from(42);
/// assert_eq!(value.display_string(), "42");
///
/// assert_eq!(FieldValue::Null.display_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Returns `true` if this is `FieldValue::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Null => ValueKind::Null,
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Int(_) | FieldValue::Float(_) => ValueKind::Number,
            FieldValue::Text(_) => ValueKind::Text,
        }
    }

    /// Attempts to get the value as a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a number, widening integers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders the value the way a plain string coercion would.
    ///
    /// Integral floats render without a fractional part and `Null` renders
    /// as the empty string.
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(n) => format_float(*n),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Returns the text used for substring matching, or `None` for nulls.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(s.clone()),
            other => Some(other.display_string()),
        }
    }
}

fn format_float(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(n as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Int(n as i64)
    }
}

/// Values above `i64::MAX` become [`FieldValue::Text`] so every digit
/// survives; a float would round them.
impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => FieldValue::Int(n),
            Err(_) => FieldValue::Text(n.to_string()),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<f32> for FieldValue {
    fn from(n: f32) -> Self {
        FieldValue::Float(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::from(u)
                } else {
                    n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null)
                }
            }
            Value::String(s) => FieldValue::Text(s.clone()),
            // Nested structures take part through their string coercion.
            other => FieldValue::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string() {
        assert_eq!(FieldValue::Null.display_string(), "");
        assert_eq!(FieldValue::from(true).display_string(), "true");
        assert_eq!(FieldValue::from(-17).display_string(), "-17");
        assert_eq!(FieldValue::from(2.5).display_string(), "2.5");
        assert_eq!(FieldValue::from(3.0).display_string(), "3");
        assert_eq!(FieldValue::from(-0.0).display_string(), "0");
        assert_eq!(FieldValue::from("abc").display_string(), "abc");
    }

    #[test]
    fn test_kind() {
        assert_eq!(FieldValue::Null.kind(), ValueKind::Null);
        assert_eq!(FieldValue::from(1).kind(), ValueKind::Number);
        assert_eq!(FieldValue::from(1.5).kind(), ValueKind::Number);
        assert_eq!(FieldValue::from("x").kind(), ValueKind::Text);
        assert_eq!(FieldValue::from(false).kind(), ValueKind::Bool);
    }

    #[test]
    fn test_search_text_skips_null() {
        assert!(FieldValue::Null.search_text().is_none());
        assert_eq!(FieldValue::from(12).search_text().as_deref(), Some("12"));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "a": null,
            "b": 7,
            "c": 1.25,
            "d": "text",
            "e": [1, 2],
            "f": 18446744073709551615u64,
        });

        assert_eq!(FieldValue::from(&json["a"]), FieldValue::Null);
        assert_eq!(FieldValue::from(&json["b"]), FieldValue::Int(7));
        assert_eq!(FieldValue::from(&json["c"]), FieldValue::Float(1.25));
        assert_eq!(FieldValue::from(&json["d"]), FieldValue::from("text"));
        assert_eq!(FieldValue::from(&json["e"]), FieldValue::from("[1,2]"));
        assert_eq!(FieldValue::from(&json["f"]), FieldValue::from("18446744073709551615"));
    }

    #[test]
    fn test_large_u64_keeps_every_digit() {
        assert_eq!(FieldValue::from(42u64), FieldValue::Int(42));
        assert_eq!(FieldValue::from(i64::MAX as u64), FieldValue::Int(i64::MAX));

        let id = FieldValue::from(i64::MAX as u64 + 1);
        assert_eq!(id.kind(), ValueKind::Text);
        assert_eq!(id.display_string(), "9223372036854775808");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::from("x"));
    }
}
