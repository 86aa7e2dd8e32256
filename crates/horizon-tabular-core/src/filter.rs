//! Substring filtering over a configurable field set.
//!
//! [`FilterEngine`] is the predicate half of the view pipeline: it selects the
//! rows where **any** configured field contains the query, ignoring case.
//!
//! # Example
//!
//! ```
//! use horizon_tabular_core::{FilterEngine, Record};
//!
//! let rows = vec![
//!     Record::new(1).with_field("name", "Harbor Office"),
//!     Record::new(2).with_field("name", "Depot"),
//! ];
//!
//! let engine = FilterEngine::new(["name"]);
//! let matches = engine.filter(&rows, "HARBOR");
//! assert_eq!(matches.len(), 1);
//! ```

use crate::logging::targets;
use crate::row::Row;

/// Case-insensitive substring filter over a set of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEngine {
    fields: Vec<String>,
}

impl FilterEngine {
    /// Creates a filter over the given field keys.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the field keys the filter inspects.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns `true` if `query` filters nothing out.
    ///
    /// Empty and whitespace-only queries are inactive.
    pub fn is_inactive(query: &str) -> bool {
        query.trim().is_empty()
    }

    /// Returns `true` if `row` passes the filter for `query`.
    ///
    /// The query itself is matched untrimmed; only its blankness is judged on
    /// the trimmed form.
    pub fn matches<R: Row + ?Sized>(&self, row: &R, query: &str) -> bool {
        if Self::is_inactive(query) {
            return true;
        }
        let needle = query.to_lowercase();
        self.matches_folded(row, &needle)
    }

    fn matches_folded<R: Row + ?Sized>(&self, row: &R, needle: &str) -> bool {
        self.fields.iter().any(|key| {
            row.field(key)
                .search_text()
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }

    /// Returns the positions of the rows that pass the filter, in input order.
    pub fn filter_indices<R: Row>(&self, rows: &[R], query: &str) -> Vec<usize> {
        if Self::is_inactive(query) {
            return (0..rows.len()).collect();
        }

        let needle = query.to_lowercase();
        let indices: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.matches_folded(*row, &needle))
            .map(|(i, _)| i)
            .collect();

        tracing::trace!(
            target: targets::FILTER,
            input = rows.len(),
            retained = indices.len(),
            "filtered rows"
        );
        indices
    }

    /// Returns references to the rows that pass the filter, in input order.
    pub fn filter<'a, R: Row>(&self, rows: &'a [R], query: &str) -> Vec<&'a R> {
        self.filter_indices(rows, query)
            .into_iter()
            .map(|i| &rows[i])
            .collect()
    }
}
