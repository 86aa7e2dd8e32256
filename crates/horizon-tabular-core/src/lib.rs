//! Core systems for Horizon Tabular.
//!
//! This crate provides the shared engine behind every list screen of an
//! administrative console:
//!
//! - **Row model**: [`Row`], [`FieldValue`], [`RowId`] and the immutable, shared
//!   [`Collection`] that is swapped wholesale on every refresh
//! - **Filtering**: [`FilterEngine`], a case-folded substring predicate over a
//!   configurable field set
//! - **Sorting**: [`SortEngine`], a stable, type-dispatching comparator with a
//!   nulls-last policy
//! - **Paging**: [`PageWindow`] and [`paginate`], with clamping after every
//!   recomputation
//! - **Selection**: [`SelectionTracker`], a set of row identifiers that is
//!   reconciled against the live collection
//! - **Composition**: [`TableEngine`], which wires the pieces together for one
//!   screen and memoizes the filtered and sorted view
//!
//! # Example
//!
//! ```
//! use horizon_tabular_core::{Record, TableConfig, TableEngine};
//!
//! let rows = vec![
//!     Record::new(1).with_field("name", "Alice").with_field("city", "Oslo"),
//!     Record::new(2).with_field("name", "Bob").with_field("city", "Lima"),
//!     Record::new(3).with_field("name", "Carol").with_field("city", "Oslo"),
//! ];
//!
//! let config = TableConfig::new(["name", "city"]).with_page_size(2);
//! let mut engine = TableEngine::new(rows, config).unwrap();
//!
//! engine.set_query("oslo");
//! let page = engine.page();
//! assert_eq!(page.total_items, 2);
//! assert_eq!(page.total_pages, 1);
//! ```

mod collection;
pub mod column;
mod config;
mod error;
pub mod filter;
pub mod logging;
pub mod paginate;
mod row;
pub mod selection;
pub mod signal;
pub mod sort;
pub mod table;
mod value;

pub use collection::Collection;
pub use column::{ColumnDescriptor, ColumnKind, ColumnSet};
pub use config::{SelectAllScope, TableConfig};
pub use error::{Result, TableConfigError};
pub use filter::FilterEngine;
pub use logging::PerfSpan;
pub use paginate::{Page, PageWindow, paginate};
pub use row::{Record, Row, RowId};
pub use selection::{BulkPlan, SelectionChange, SelectionTracker};
pub use signal::{BlockGuard, ConnectionId, Signal};
pub use sort::{Collation, SortDirection, SortEngine, SortKey};
pub use table::{PageView, TableEngine, TableSnapshot};
pub use value::{FieldValue, ValueKind};
