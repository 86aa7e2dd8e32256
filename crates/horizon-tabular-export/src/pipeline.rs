//! The export pipeline: snapshot in, downloadable artifact out.
//!
//! [`ExportPipeline::export`] is the fallible core. [`ExportPipeline::run`]
//! is the boundary a UI calls: it never returns an error or unwinds, reports
//! the outcome on [`ExportPipeline::notifications`], and only hands out an
//! artifact when the whole document was produced.

use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use horizon_tabular_core::logging::span_names;
use horizon_tabular_core::{PerfSpan, Row, Signal, TableSnapshot};
use serde::{Deserialize, Serialize};

use crate::delimited::DelimitedTextRenderer;
use crate::error::{ExportError, Result};
use crate::logging::targets;
use crate::projection::ExportProjection;
use crate::report::PaginatedReportRenderer;

/// Downloadable document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values.
    #[serde(alias = "csv")]
    DelimitedText,
    /// Paginated PDF report.
    #[serde(alias = "pdf")]
    Report,
}

impl ExportFormat {
    /// Returns the conventional file extension, without a dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::DelimitedText => "csv",
            Self::Report => "pdf",
        }
    }

    /// Returns the MIME type of the document.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::DelimitedText => "text/csv; charset=utf-8",
            Self::Report => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DelimitedText => write!(f, "delimited text"),
            Self::Report => write!(f, "report"),
        }
    }
}

/// What to export and under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Document format.
    pub format: ExportFormat,
    /// Filename of the artifact, used as given.
    pub filename: String,
    /// Timestamp printed on reports. `None` means the local time at export.
    pub generated_at: Option<NaiveDateTime>,
}

impl ExportRequest {
    /// Creates a request for `filename`.
    pub fn new(format: ExportFormat, filename: impl Into<String>) -> Self {
        Self {
            format,
            filename: filename.into(),
            generated_at: None,
        }
    }

    /// Creates a request named `stem` plus the format's extension.
    pub fn with_stem(format: ExportFormat, stem: &str) -> Self {
        Self::new(format, format!("{stem}.{}", format.extension()))
    }

    /// Fixes the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// A complete exported document.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Filename as requested.
    pub filename: String,
    /// Document format.
    pub format: ExportFormat,
    /// Document bytes.
    pub bytes: Vec<u8>,
    /// Number of data rows in the document.
    pub row_count: usize,
    /// Number of pages, for reports.
    pub page_count: Option<usize>,
}

impl ExportArtifact {
    /// Returns the MIME type of the document.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Writes the artifact into `dir` under its filename.
    ///
    /// The bytes go to a temporary file in `dir` that is then renamed into
    /// place, so the destination never holds a partial document. A filename
    /// that [`validate_filename`] rejects is refused before anything is
    /// written.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        validate_filename(&self.filename)?;
        let dir = dir.as_ref();
        let path = dir.join(&self.filename);

        let mut temp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| ExportError::save(&path, e))?;
        temp.write_all(&self.bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| ExportError::save(&path, e))?;
        temp.persist(&path).map_err(|e| ExportError::save(&path, e.error))?;

        tracing::info!(
            target: targets::PIPELINE,
            path = %path.display(),
            bytes = self.bytes.len(),
            "saved export"
        );
        Ok(path)
    }
}

impl fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("filename", &self.filename)
            .field("format", &self.format)
            .field("bytes", &self.bytes.len())
            .field("row_count", &self.row_count)
            .field("page_count", &self.page_count)
            .finish()
    }
}

/// Outcome of [`ExportPipeline::run`], for transient user notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    /// The document was produced.
    Completed {
        /// Filename of the artifact.
        filename: String,
        /// Document format.
        format: ExportFormat,
        /// Number of data rows.
        rows: usize,
    },
    /// No document was produced.
    Failed {
        /// Requested filename.
        filename: String,
        /// Document format.
        format: ExportFormat,
        /// Human-readable reason.
        message: String,
    },
}

impl ExportNotice {
    /// Returns `true` for [`ExportNotice::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Renders table snapshots into downloadable documents.
///
/// # Example
///
/// ```
/// use horizon_tabular_core::{ColumnDescriptor, Record, TableSnapshot};
/// use horizon_tabular_export::{ExportFormat, ExportPipeline, ExportRequest};
///
/// let snapshot = TableSnapshot::from_rows(
///     vec![Record::new(1).with_field("id", 99_999_999_999_999i64)],
///     vec![ColumnDescriptor::new("id", "ID")],
/// );
///
/// let pipeline = ExportPipeline::default();
/// let request = ExportRequest::new(ExportFormat::DelimitedText, "ids.csv");
/// let artifact = pipeline.run(&snapshot, &request).unwrap();
/// assert_eq!(artifact.bytes, b"ID\n99999999999999\n");
/// ```
pub struct ExportPipeline {
    delimited: DelimitedTextRenderer,
    report: PaginatedReportRenderer,
    /// Emitted once per [`run`](Self::run).
    pub notifications: Signal<ExportNotice>,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(DelimitedTextRenderer::default(), PaginatedReportRenderer::new("Export"))
    }
}

impl ExportPipeline {
    /// Creates a pipeline from its two renderers.
    pub fn new(delimited: DelimitedTextRenderer, report: PaginatedReportRenderer) -> Self {
        Self {
            delimited,
            report,
            notifications: Signal::new(),
        }
    }

    /// Returns the delimited text renderer.
    pub fn delimited(&self) -> &DelimitedTextRenderer {
        &self.delimited
    }

    /// Returns the report renderer.
    pub fn report(&self) -> &PaginatedReportRenderer {
        &self.report
    }

    /// Produces the requested document from `snapshot`.
    #[tracing::instrument(
        target = "horizon_tabular_export::pipeline",
        skip_all,
        fields(format = %request.format, filename = %request.filename, rows = snapshot.len())
    )]
    pub fn export<R: Row>(
        &self,
        snapshot: &TableSnapshot<R>,
        request: &ExportRequest,
    ) -> Result<ExportArtifact> {
        let _span = PerfSpan::new(span_names::EXPORT);
        validate_filename(&request.filename)?;

        let projection = ExportProjection::build(snapshot)?;
        let (bytes, page_count) = match request.format {
            ExportFormat::DelimitedText => (self.delimited.render(&projection)?, None),
            ExportFormat::Report => {
                let generated_at = request
                    .generated_at
                    .unwrap_or_else(|| chrono::Local::now().naive_local());
                let report = self.report.render(&projection, generated_at)?;
                let pages = report.layout.page_count();
                (report.bytes, Some(pages))
            }
        };

        Ok(ExportArtifact {
            filename: request.filename.clone(),
            format: request.format,
            bytes,
            row_count: projection.row_count(),
            page_count,
        })
    }

    /// Produces the requested document, containing every failure.
    ///
    /// Errors and panics are caught here: the result is `None` and an
    /// [`ExportNotice::Failed`] is emitted. On success an
    /// [`ExportNotice::Completed`] is emitted and the artifact returned.
    pub fn run<R: Row>(
        &self,
        snapshot: &TableSnapshot<R>,
        request: &ExportRequest,
    ) -> Option<ExportArtifact> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.export(snapshot, request)))
            .unwrap_or_else(|payload| Err(ExportError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(artifact) => {
                tracing::info!(
                    target: targets::PIPELINE,
                    filename = %artifact.filename,
                    format = %artifact.format,
                    rows = artifact.row_count,
                    "export completed"
                );
                self.notifications.emit(ExportNotice::Completed {
                    filename: artifact.filename.clone(),
                    format: artifact.format,
                    rows: artifact.row_count,
                });
                Some(artifact)
            }
            Err(error) => {
                tracing::warn!(
                    target: targets::PIPELINE,
                    filename = %request.filename,
                    format = %request.format,
                    error = %error,
                    "export failed"
                );
                self.notifications.emit(ExportNotice::Failed {
                    filename: request.filename.clone(),
                    format: request.format,
                    message: error.to_string(),
                });
                None
            }
        }
    }
}

impl fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("delimited", &self.delimited)
            .field("report", &self.report)
            .finish()
    }
}

/// Checks that `filename` names a single file.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(ExportError::invalid_filename(filename, "must not be empty"));
    }
    if filename.contains(['/', '\\']) {
        return Err(ExportError::invalid_filename(
            filename,
            "must not contain path separators",
        ));
    }
    if filename == "." || filename == ".." {
        return Err(ExportError::invalid_filename(filename, "must name a file"));
    }
    if filename.chars().any(char::is_control) {
        return Err(ExportError::invalid_filename(
            filename,
            "must not contain control characters",
        ));
    }
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
