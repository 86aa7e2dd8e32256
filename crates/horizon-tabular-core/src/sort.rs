//! Stable, type-dispatching sorting.
//!
//! [`SortEngine`] orders rows by a single [`SortKey`]. The comparator policy is
//! fixed:
//!
//! - Null values sort after every non-null value, in both directions.
//! - Text against text uses locale-aware collation ([`Collation`]).
//! - Numbers against numbers compare numerically.
//! - Any other or mixed column falls back to comparing the string forms with
//!   the collator.
//!
//! The direction flips the order of non-null values only, and the sort is
//! stable: rows that compare equal keep their input order.
//!
//! # Example
//!
//! ```
//! use horizon_tabular_core::{Record, SortEngine, SortKey};
//!
//! let rows = vec![
//!     Record::new(1).with_field("balance", 250),
//!     Record::new(2),
//!     Record::new(3).with_field("balance", 10),
//! ];
//!
//! let engine = SortEngine::default();
//! let sorted = engine.sort(&rows, Some(&SortKey::descending("balance")));
//! let balances: Vec<_> = sorted.iter().map(|r| r.get("balance").cloned()).collect();
//! assert_eq!(balances.len(), 3);
//! assert!(balances[2].is_none()); // null stays last
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logging::targets;
use crate::row::Row;
use crate::value::{FieldValue, ValueKind};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Applies the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// The active sort: one field key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Field key to sort on.
    pub key: String,
    /// Direction of the non-null values.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates a sort key.
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Creates an ascending sort key.
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    /// Creates a descending sort key.
    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// Returns the same key with the direction flipped.
    pub fn toggled(&self) -> Self {
        Self::new(self.key.clone(), self.direction.toggled())
    }
}

/// Locale-aware string comparison.
///
/// With the `localization` feature this wraps an ICU4X collator for the
/// requested locale. Otherwise, or if no collation data exists for the locale,
/// strings compare case-insensitively with lowercase winning ties.
pub struct Collation {
    locale: String,
    #[cfg(feature = "localization")]
    collator: Option<icu::collator::CollatorBorrowed<'static>>,
}

impl Collation {
    /// Creates a collation for a BCP 47 locale identifier (e.g. "de-DE").
    #[cfg(feature = "localization")]
    pub fn new(locale: &str) -> Self {
        use icu::collator::Collator;
        use icu::collator::options::CollatorOptions;
        use icu::locale::Locale;

        let collator = match locale.parse::<Locale>() {
            Ok(parsed) => match Collator::try_new(parsed.into(), CollatorOptions::default()) {
                Ok(collator) => Some(collator),
                Err(err) => {
                    tracing::warn!(
                        target: targets::SORT,
                        locale,
                        error = %err,
                        "no collation data for locale, using fallback comparison"
                    );
                    None
                }
            },
            Err(err) => {
                tracing::warn!(
                    target: targets::SORT,
                    locale,
                    error = %err,
                    "invalid locale identifier, using fallback comparison"
                );
                None
            }
        };

        Self {
            locale: locale.to_string(),
            collator,
        }
    }

    /// Creates a collation for a BCP 47 locale identifier (e.g. "de-DE").
    #[cfg(not(feature = "localization"))]
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    /// Creates a collation for the current system locale.
    pub fn system() -> Self {
        Self::new(&system_locale())
    }

    /// Returns the locale identifier this collation was created for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Compares two strings.
    #[cfg(feature = "localization")]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => fallback_compare(a, b),
        }
    }

    /// Compares two strings.
    #[cfg(not(feature = "localization"))]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        fallback_compare(a, b)
    }
}

impl Default for Collation {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Collation");
        s.field("locale", &self.locale);
        #[cfg(feature = "localization")]
        s.field("icu", &self.collator.is_some());
        s.finish()
    }
}

/// Returns the system locale, or "en-US" when it cannot be determined.
#[cfg(feature = "localization")]
pub fn system_locale() -> String {
    sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string())
}

/// Returns the system locale, or "en-US" when it cannot be determined.
#[cfg(not(feature = "localization"))]
pub fn system_locale() -> String {
    "en-US".to_string()
}

fn fallback_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Orders rows by a [`SortKey`].
#[derive(Debug, Default)]
pub struct SortEngine {
    collation: Collation,
}

impl SortEngine {
    /// Creates a sort engine with the given collation.
    pub fn new(collation: Collation) -> Self {
        Self { collation }
    }

    /// Creates a sort engine for a locale.
    pub fn with_locale(locale: &str) -> Self {
        Self::new(Collation::new(locale))
    }

    /// Returns the collation in use.
    pub fn collation(&self) -> &Collation {
        &self.collation
    }

    /// Compares two values under the null-last policy.
    ///
    /// Both values are expected to come from the same column. Mixed columns are
    /// normalized to text by [`SortEngine::sort_indices`] before comparison.
    pub fn compare_values(
        &self,
        a: &FieldValue,
        b: &FieldValue,
        direction: SortDirection,
    ) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => direction.apply(self.compare_present(a, b)),
        }
    }

    fn compare_present(&self, a: &FieldValue, b: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (a, b) {
            (Text(x), Text(y)) => self.collation.compare(x, y),
            (Int(x), Int(y)) => x.cmp(y),
            (Float(x), Float(y)) => compare_floats(*x, *y),
            (Int(x), Float(y)) => compare_int_float(*x, *y),
            (Float(x), Int(y)) => compare_int_float(*y, *x).reverse(),
            _ => self
                .collation
                .compare(&a.display_string(), &b.display_string()),
        }
    }

    /// Reorders `indices` (positions into `rows`) by `key`.
    ///
    /// Returns `indices` unchanged when `key` is `None`.
    pub fn sort_indices<R: Row>(
        &self,
        rows: &[R],
        mut indices: Vec<usize>,
        key: Option<&SortKey>,
    ) -> Vec<usize> {
        let Some(key) = key else {
            return indices;
        };

        let values = column_values(rows, &indices, &key.key);
        let mut order: Vec<usize> = (0..indices.len()).collect();
        order.sort_by(|&a, &b| self.compare_values(&values[a], &values[b], key.direction));
        indices = order.into_iter().map(|i| indices[i]).collect();

        tracing::trace!(
            target: targets::SORT,
            key = %key.key,
            direction = ?key.direction,
            rows = indices.len(),
            "sorted rows"
        );
        indices
    }

    /// Returns references to `rows` ordered by `key`.
    pub fn sort<'a, R: Row>(&self, rows: &'a [R], key: Option<&SortKey>) -> Vec<&'a R> {
        self.sort_indices(rows, (0..rows.len()).collect(), key)
            .into_iter()
            .map(|i| &rows[i])
            .collect()
    }
}

/// Extracts the sort column, coercing it to text when it is not homogeneous.
///
/// A column is compared natively only when all of its non-null values are
/// text or all are numbers. Anything else compares by string form, which keeps
/// the comparator a total order over the whole column.
fn column_values<R: Row>(rows: &[R], indices: &[usize], key: &str) -> Vec<FieldValue> {
    let values: Vec<FieldValue> = indices.iter().map(|&i| rows[i].field(key)).collect();

    let mut kinds = values.iter().map(FieldValue::kind).filter(|k| *k != ValueKind::Null);
    let homogeneous = match kinds.next() {
        None => true,
        Some(first @ (ValueKind::Text | ValueKind::Number)) => kinds.all(|k| k == first),
        Some(_) => false,
    };

    if homogeneous {
        return values;
    }

    values
        .into_iter()
        .map(|v| match v {
            FieldValue::Null => FieldValue::Null,
            other => FieldValue::Text(other.display_string()),
        })
        .collect()
}

/// Numeric order with NaN after every number.
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer against a float.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    // 2^63 as f64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return Ordering::Less;
    }
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }

    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => compare_floats(0.0, f - whole),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Record;

    fn engine() -> SortEngine {
        SortEngine::with_locale("en-US")
    }

    fn ids(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_no_key_preserves_order() {
        let rows = vec![Record::new(3), Record::new(1), Record::new(2)];
        let sorted = engine().sort(&rows, None);
        assert_eq!(ids(&sorted), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_numeric_sort() {
        let rows = vec![
            Record::new("a").with_field("n", 10),
            Record::new("b").with_field("n", 9),
            Record::new("c").with_field("n", 100),
        ];
        let sorted = engine().sort(&rows, Some(&SortKey::ascending("n")));
        assert_eq!(ids(&sorted), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_mixed_int_and_float_compare_numerically() {
        let rows = vec![
            Record::new("a").with_field("n", 2),
            Record::new("b").with_field("n", 1.5),
            Record::new("c").with_field("n", -3),
        ];
        let sorted = engine().sort(&rows, Some(&SortKey::ascending("n")));
        assert_eq!(ids(&sorted), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let rows = vec![
            Record::new("null1"),
            Record::new("x").with_field("name", "Beta"),
            Record::new("null2"),
            Record::new("y").with_field("name", "alpha"),
        ];
        let engine = engine();

        let asc = engine.sort(&rows, Some(&SortKey::ascending("name")));
        assert_eq!(ids(&asc), vec!["y", "x", "null1", "null2"]);

        let desc = engine.sort(&rows, Some(&SortKey::descending("name")));
        assert_eq!(ids(&desc), vec!["x", "y", "null1", "null2"]);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let rows = vec![
            Record::new(1).with_field("city", "Oslo"),
            Record::new(2).with_field("city", "Lima"),
            Record::new(3).with_field("city", "Oslo"),
            Record::new(4).with_field("city", "Lima"),
        ];
        let engine = engine();

        let asc = engine.sort(&rows, Some(&SortKey::ascending("city")));
        assert_eq!(ids(&asc), vec!["2", "4", "1", "3"]);

        let desc = engine.sort(&rows, Some(&SortKey::descending("city")));
        assert_eq!(ids(&desc), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_mixed_column_coerces_to_text() {
        let rows = vec![
            Record::new("a").with_field("v", "b-side"),
            Record::new("b").with_field("v", 10),
            Record::new("c").with_field("v", true),
        ];
        let sorted = engine().sort(&rows, Some(&SortKey::ascending("v")));
        // "10" < "b-side" < "true"
        assert_eq!(ids(&sorted), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        let rows = vec![
            Record::new("nan").with_field("v", f64::NAN),
            Record::new("one").with_field("v", 1),
            Record::new("big").with_field("v", f64::INFINITY),
        ];
        let sorted = engine().sort(&rows, Some(&SortKey::ascending("v")));
        assert_eq!(ids(&sorted), vec!["one", "big", "nan"]);
    }

    #[test]
    fn test_compare_int_float_exact() {
        assert_eq!(compare_int_float(3, 3.0), Ordering::Equal);
        assert_eq!(compare_int_float(3, 3.5), Ordering::Less);
        assert_eq!(compare_int_float(-3, -3.5), Ordering::Greater);
        assert_eq!(compare_int_float(i64::MAX, 1e19), Ordering::Less);
        assert_eq!(compare_int_float(i64::MIN, -1e19), Ordering::Greater);
        assert_eq!(compare_int_float(0, -0.0), Ordering::Equal);
    }

    #[test]
    fn test_direction_toggle() {
        let key = SortKey::ascending("name");
        assert_eq!(key.toggled().direction, SortDirection::Descending);
        assert_eq!(key.toggled().toggled(), key);
    }

    #[test]
    fn test_fallback_compare() {
        assert_eq!(fallback_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(fallback_compare("a", "A"), Ordering::Less);
        assert_eq!(fallback_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_direction_serde_aliases() {
        let d: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(d, SortDirection::Descending);
        let d: SortDirection = serde_json::from_str("\"ascending\"").unwrap();
        assert_eq!(d, SortDirection::Ascending);
    }
}
