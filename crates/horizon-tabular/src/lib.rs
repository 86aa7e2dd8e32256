//! Horizon Tabular - the shared engine behind administrative list screens.
//!
//! This is the umbrella crate. It re-exports the core engine
//! ([`horizon_tabular_core`]) at the root, the export pipeline under
//! [`export`], and adds the pieces that tie one screen together:
//!
//! - [`ScreenSettings`]: table and export configuration loaded from TOML or
//!   JSON
//! - [`ListScreen`]: a table engine plus an export pipeline, with bulk actions
//!   over the reconciled selection
//!
//! # Example
//!
//! ```
//! use horizon_tabular::prelude::*;
//!
//! let settings = ScreenSettings::from_json_str(r#"{
//!     "table": {
//!         "filter_fields": ["owner"],
//!         "page_size": 2,
//!         "columns": [{ "key": "owner", "label": "Owner" }]
//!     }
//! }"#).unwrap();
//!
//! let rows: Vec<Record> = (1..=5)
//!     .map(|i: i64| Record::new(i).with_field("owner", format!("Owner {i}")))
//!     .collect();
//! let mut screen = ListScreen::new(rows, settings).unwrap();
//!
//! assert_eq!(screen.engine().page().total_pages, 3);
//! screen.engine_mut().select_all(true);
//! let outcome = screen.run_bulk(|_id| Ok::<_, std::io::Error>(())).unwrap();
//! assert_eq!(outcome.applied.len(), 5);
//! ```
//!
//! # Features
//!
//! - `localization` (default): locale-aware string collation
//! - `networking`: report header images fetched over HTTP

pub use horizon_tabular_core::*;

/// Export pipeline: delimited text and paginated reports.
pub mod export {
    pub use horizon_tabular_export::*;
}

pub mod prelude;
mod screen;
mod settings;

pub use horizon_tabular_export::{ExportArtifact, ExportFormat, ExportNotice, ExportRequest};
pub use screen::{BulkFailure, BulkOutcome, ListScreen};
pub use settings::{
    ExportSettings, HeaderImageSetting, ScreenSettings, SettingsError, SettingsResult,
};
