//! Export projection: the visible columns of a snapshot, normalized.
//!
//! Column visibility is applied here, once. Renderers receive only the
//! visible columns and never look at visibility again.

use horizon_tabular_core::{Row, TableSnapshot};

use crate::error::{ExportError, Result};
use crate::logging::targets;
use crate::normalize::normalize_value;

/// An ordered list of rows reduced to `label -> normalized value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProjection {
    labels: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ExportProjection {
    /// Projects a snapshot onto its visible columns.
    ///
    /// Fails with [`ExportError::NoVisibleColumns`] if every column is hidden.
    pub fn build<R: Row>(snapshot: &TableSnapshot<R>) -> Result<Self> {
        let columns: Vec<_> = snapshot.columns().visible().collect();
        if columns.is_empty() {
            return Err(ExportError::NoVisibleColumns);
        }

        let phone: Vec<bool> = columns.iter().map(|c| c.is_phone()).collect();
        let labels = columns.iter().map(|c| c.label.clone()).collect();
        let rows: Vec<Vec<String>> = snapshot
            .rows()
            .map(|row| {
                columns
                    .iter()
                    .zip(&phone)
                    .map(|(column, &is_phone)| normalize_value(&row.field(&column.key), is_phone))
                    .collect()
            })
            .collect();

        tracing::debug!(
            target: targets::PROJECTION,
            columns = columns.len(),
            rows = rows.len(),
            "built export projection"
        );
        Ok(Self { labels, rows })
    }

    /// Creates a projection from already normalized parts.
    ///
    /// Fails if there are no labels. Rows are padded or truncated to the
    /// label count.
    pub fn from_parts(labels: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if labels.is_empty() {
            return Err(ExportError::NoVisibleColumns);
        }
        let width = labels.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Ok(Self { labels, rows })
    }

    /// Returns the column labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the rows; each has one value per label.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns row `index` as `(label, value)` pairs in column order.
    pub fn pairs(&self, index: usize) -> Option<impl Iterator<Item = (&str, &str)>> {
        let row = self.rows.get(index)?;
        Some(
            self.labels
                .iter()
                .zip(row)
                .map(|(label, value)| (label.as_str(), value.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_tabular_core::{ColumnDescriptor, Record};

    fn snapshot() -> TableSnapshot<Record> {
        TableSnapshot::from_rows(
            vec![
                Record::new(1)
                    .with_field("id", 99_999_999_999_999i64)
                    .with_field("name", "Ledger")
                    .with_field("mobile", "201234567890")
                    .with_field("secret", "x"),
                Record::new(2).with_field("id", 2).with_field("name", "Depot"),
            ],
            vec![
                ColumnDescriptor::new("id", "ID"),
                ColumnDescriptor::new("secret", "Secret").with_visible(false),
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("mobile", "Mobile"),
            ],
        )
    }

    #[test]
    fn test_visible_columns_only_in_order() {
        let projection = ExportProjection::build(&snapshot()).unwrap();
        assert_eq!(projection.labels(), &["ID", "Name", "Mobile"]);
        assert_eq!(
            projection.rows()[0],
            vec!["99999999999999", "Ledger", "+201234567890"]
        );
        assert_eq!(projection.rows()[1], vec!["2", "Depot", ""]);
    }

    #[test]
    fn test_pairs() {
        let projection = ExportProjection::build(&snapshot()).unwrap();
        let pairs: Vec<_> = projection.pairs(1).unwrap().collect();
        assert_eq!(pairs, vec![("ID", "2"), ("Name", "Depot"), ("Mobile", "")]);
        assert!(projection.pairs(2).is_none());
    }

    #[test]
    fn test_no_visible_columns() {
        let snapshot = TableSnapshot::from_rows(
            vec![Record::new(1)],
            vec![ColumnDescriptor::new("id", "ID").with_visible(false)],
        );
        assert!(matches!(
            ExportProjection::build(&snapshot),
            Err(ExportError::NoVisibleColumns)
        ));
    }

    #[test]
    fn test_from_parts_pads_rows() {
        let projection = ExportProjection::from_parts(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into()]],
        )
        .unwrap();
        assert_eq!(projection.rows()[0], vec!["1", ""]);
        assert_eq!(projection.rows()[1], vec!["1", "2"]);
    }
}
