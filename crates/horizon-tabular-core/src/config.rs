//! Per-screen table configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnDescriptor, ColumnSet};
use crate::error::{Result, TableConfigError};
use crate::sort::SortKey;

/// What the "select all" checkbox selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAllScope {
    /// Every row that passes the current filter, across all pages.
    #[default]
    FilteredSet,
    /// Only the rows on the current page.
    ///
    /// An explicit per-screen override; bulk actions then act on what the
    /// user can see.
    CurrentPage,
}

/// Configuration of one list screen's table.
///
/// # Example
///
/// ```
/// use horizon_tabular_core::{ColumnDescriptor, SortKey, TableConfig};
///
/// let config = TableConfig::new(["name", "email"])
///     .with_page_size(25)
///     .with_default_sort(SortKey::ascending("name"))
///     .with_columns(vec![
///         ColumnDescriptor::new("name", "Name"),
///         ColumnDescriptor::new("email", "Email"),
///     ]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Field keys the filter query is matched against.
    pub filter_fields: Vec<String>,
    /// Rows per page.
    pub page_size: usize,
    /// Sort applied before the user picks one.
    pub default_sort: Option<SortKey>,
    /// Columns, in display and export order.
    pub columns: ColumnSet,
    /// BCP 47 locale for string collation. `None` uses the system locale.
    pub locale: Option<String>,
    /// Scope of "select all".
    pub select_all_scope: SelectAllScope,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            filter_fields: Vec::new(),
            page_size: 10,
            default_sort: None,
            columns: ColumnSet::default(),
            locale: None,
            select_all_scope: SelectAllScope::default(),
        }
    }
}

impl TableConfig {
    /// Creates a configuration filtering on `filter_fields`.
    pub fn new<I, S>(filter_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_fields: filter_fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the default sort.
    pub fn with_default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Sets the columns.
    pub fn with_columns(mut self, columns: impl Into<ColumnSet>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Adds one column.
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        let mut columns = self.columns.all().to_vec();
        columns.push(column);
        self.columns = ColumnSet::new(columns);
        self
    }

    /// Sets the collation locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the "select all" scope.
    pub fn with_select_all_scope(mut self, scope: SelectAllScope) -> Self {
        self.select_all_scope = scope;
        self
    }

    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(TableConfigError::ZeroPageSize);
        }

        if self.filter_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(TableConfigError::EmptyFilterField);
        }

        if let Some(sort) = &self.default_sort {
            if sort.key.trim().is_empty() {
                return Err(TableConfigError::EmptySortKey);
            }
        }

        let mut seen = HashSet::new();
        for column in self.columns.all() {
            if column.key.is_empty() {
                return Err(TableConfigError::EmptyColumnKey);
            }
            if !seen.insert(column.key.as_str()) {
                return Err(TableConfigError::DuplicateColumn(column.key.clone()));
            }
        }

        Ok(())
    }
}
