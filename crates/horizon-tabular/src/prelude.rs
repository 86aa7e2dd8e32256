//! Prelude module for Horizon Tabular.
//!
//! ```ignore
//! use horizon_tabular::prelude::*;
//! ```
//!
//! This provides access to:
//! - Rows and values (`Record`, `Row`, `RowId`, `FieldValue`)
//! - Table configuration and the engine (`TableConfig`, `TableEngine`)
//! - Sorting and paging (`SortKey`, `SortDirection`, `PageWindow`)
//! - Exports (`ExportFormat`, `ExportPipeline`, `ExportArtifact`)
//! - Screens (`ListScreen`, `ScreenSettings`)

// ============================================================================
// Rows
// ============================================================================

pub use crate::{Collection, FieldValue, Record, Row, RowId};

// ============================================================================
// Table engine
// ============================================================================

pub use crate::{
    ColumnDescriptor, ColumnKind, ColumnSet, SelectAllScope, TableConfig, TableEngine,
    TableSnapshot,
};
pub use crate::{PageWindow, SortDirection, SortKey};
pub use crate::{SelectionTracker, Signal};

// ============================================================================
// Export
// ============================================================================

pub use crate::export::{
    ExportArtifact, ExportFormat, ExportNotice, ExportPipeline, ExportRequest, ReportGeometry,
};

// ============================================================================
// Screens
// ============================================================================

pub use crate::{BulkOutcome, ListScreen, ScreenSettings};
