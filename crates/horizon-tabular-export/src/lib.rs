//! Export pipeline for Horizon Tabular.
//!
//! Turns a [`TableSnapshot`](horizon_tabular_core::TableSnapshot) of the
//! filtered and sorted view into a downloadable document:
//!
//! - **Projection**: [`ExportProjection`] keeps the visible columns, in order,
//!   and normalizes every value ([`normalize_value`])
//! - **Delimited text**: [`DelimitedTextRenderer`] writes CSV
//! - **Report**: [`PaginatedReportRenderer`] lays the projection out on fixed
//!   landscape pages and writes a PDF, with an optional header image loaded
//!   under a timeout
//! - **Pipeline**: [`ExportPipeline`] ties it together and guarantees that a
//!   failed export produces no artifact
//!
//! # Example
//!
//! ```
//! use horizon_tabular_core::{ColumnDescriptor, Record, TableSnapshot};
//! use horizon_tabular_export::{ExportFormat, ExportPipeline, ExportRequest};
//!
//! let snapshot = TableSnapshot::from_rows(
//!     vec![
//!         Record::new(1).with_field("name", "Depot").with_field("phone", "201234567890"),
//!     ],
//!     vec![
//!         ColumnDescriptor::new("name", "Name"),
//!         ColumnDescriptor::new("phone", "Phone"),
//!     ],
//! );
//!
//! let pipeline = ExportPipeline::default();
//! let artifact = pipeline
//!     .export(&snapshot, &ExportRequest::new(ExportFormat::DelimitedText, "sites.csv"))
//!     .unwrap();
//! assert_eq!(artifact.bytes, b"Name,Phone\nDepot,+201234567890\n");
//! ```
//!
//! # Features
//!
//! - `networking`: enables [`UrlImageSource`] for header images fetched over
//!   HTTP.

mod delimited;
mod error;
pub mod header_image;
pub mod logging;
pub mod normalize;
mod pipeline;
mod projection;
pub mod report;

pub use delimited::DelimitedTextRenderer;
pub use error::{ExportError, ImageLoadError, Result};
#[cfg(feature = "networking")]
pub use header_image::UrlImageSource;
pub use header_image::{
    BytesImageSource, FileImageSource, HeaderImage, HeaderImageOutcome, HeaderImageSource,
    load_header_image,
};
pub use normalize::normalize_value;
pub use pipeline::{
    ExportArtifact, ExportFormat, ExportNotice, ExportPipeline, ExportRequest, validate_filename,
};
pub use projection::ExportProjection;
pub use report::{PaginatedReportRenderer, RenderedReport, ReportGeometry};
