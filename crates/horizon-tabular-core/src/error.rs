//! Error types for the tabular core.

use thiserror::Error;

/// A result type using [`TableConfigError`].
pub type Result<T> = std::result::Result<T, TableConfigError>;

/// Errors raised when a [`TableConfig`](crate::TableConfig) is rejected.
///
/// Filtering, sorting and paging themselves cannot fail; only the
/// configuration they are built from can be invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableConfigError {
    /// Page size of zero.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// Two columns share a key.
    #[error("duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// A column has an empty key.
    #[error("column key must not be empty")]
    EmptyColumnKey,

    /// A filter field name is empty or blank.
    #[error("filter field name must not be empty")]
    EmptyFilterField,

    /// The default sort refers to an empty key.
    #[error("default sort key must not be empty")]
    EmptySortKey,
}
