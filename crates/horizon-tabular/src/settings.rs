//! Screen settings loaded from TOML or JSON.
//!
//! ```toml
//! [table]
//! filter_fields = ["owner", "status"]
//! page_size = 25
//! locale = "en-US"
//! default_sort = { key = "owner", direction = "asc" }
//!
//! [[table.columns]]
//! key = "owner"
//! label = "Owner"
//!
//! [[table.columns]]
//! key = "mobile"
//! label = "Mobile"
//! kind = "phone"
//!
//! [export]
//! filename = "accounts"
//! title = "Accounts"
//! delimiter = ";"
//! header_image = { path = "assets/logo.png" }
//! image_timeout_ms = 3000
//!
//! [export.geometry]
//! max_rows_per_page = 30
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use horizon_tabular_core::{TableConfig, TableConfigError};
use horizon_tabular_export::report::{PaginatedReportRenderer, ReportGeometry};
use horizon_tabular_export::{
    DelimitedTextRenderer, ExportFormat, ExportPipeline, ExportRequest, FileImageSource,
    HeaderImageSource, validate_filename,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or has the wrong shape.
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document is malformed or has the wrong shape.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings could not be written as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported settings file {0}: expected .toml or .json")]
    UnsupportedFormat(PathBuf),

    /// The table section is invalid.
    #[error(transparent)]
    Table(#[from] TableConfigError),

    /// The export section is invalid.
    #[error("invalid export settings: {0}")]
    Export(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Where the report header image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderImageSetting {
    /// A local file.
    Path(PathBuf),
    /// An HTTP(S) URL. Needs the `networking` feature.
    Url(String),
}

/// Export section of [`ScreenSettings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Filename stem; the format's extension is appended.
    pub filename: String,
    /// Report title.
    pub title: String,
    /// Delimited text field separator. Must be ASCII.
    pub delimiter: char,
    /// Whether delimited text starts with a UTF-8 byte order mark.
    pub bom: bool,
    /// Optional report header image.
    pub header_image: Option<HeaderImageSetting>,
    /// How long a report waits for the header image, in milliseconds.
    pub image_timeout_ms: u64,
    /// Report page geometry.
    pub geometry: ReportGeometry,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: "export".to_string(),
            title: "Export".to_string(),
            delimiter: ',',
            bom: false,
            header_image: None,
            image_timeout_ms: 5000,
            geometry: ReportGeometry::default(),
        }
    }
}

impl ExportSettings {
    /// Returns the header image timeout.
    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    /// Checks the settings for values the renderers cannot use.
    pub fn validate(&self) -> SettingsResult<()> {
        validate_filename(&self.filename).map_err(|e| SettingsError::Export(e.to_string()))?;
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(SettingsError::Export(format!(
                "delimiter {:?} must be an ASCII character other than a quote or line break",
                self.delimiter
            )));
        }
        if self.image_timeout_ms == 0 {
            return Err(SettingsError::Export(
                "image_timeout_ms must be positive".to_string(),
            ));
        }
        self.geometry
            .validate()
            .map_err(|e| SettingsError::Export(e.to_string()))?;
        if matches!(self.header_image, Some(HeaderImageSetting::Url(_)))
            && !cfg!(feature = "networking")
        {
            return Err(SettingsError::Export(
                "URL header images need the `networking` feature".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the header image source, if one is configured.
    pub fn header_image_source(&self) -> Option<Arc<dyn HeaderImageSource>> {
        let source: Arc<dyn HeaderImageSource> = match self.header_image.as_ref()? {
            HeaderImageSetting::Path(path) => Arc::new(FileImageSource::new(path.clone())),
            #[cfg(feature = "networking")]
            HeaderImageSetting::Url(url) => Arc::new(
                horizon_tabular_export::UrlImageSource::new(url.clone())
                    .with_request_timeout(self.image_timeout()),
            ),
            #[cfg(not(feature = "networking"))]
            HeaderImageSetting::Url(url) => {
                tracing::warn!(
                    target: "horizon_tabular::settings",
                    url = %url,
                    "URL header image ignored without the networking feature"
                );
                return None;
            }
        };
        Some(source)
    }

    /// Builds an export pipeline from the settings.
    pub fn build_pipeline(&self) -> SettingsResult<ExportPipeline> {
        self.validate()?;

        let delimited = DelimitedTextRenderer::new()
            .delimiter(self.delimiter as u8)
            .bom(self.bom);
        let mut report = PaginatedReportRenderer::new(self.title.clone())
            .with_geometry(self.geometry.clone())
            .with_image_timeout(self.image_timeout());
        if let Some(source) = self.header_image_source() {
            report = report.with_header_image(source);
        }

        Ok(ExportPipeline::new(delimited, report))
    }

    /// Returns the request for exporting in `format`.
    pub fn request(&self, format: ExportFormat) -> ExportRequest {
        ExportRequest::with_stem(format, &self.filename)
    }
}

/// Everything one list screen needs: its table and its exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    /// Filtering, sorting, paging and columns.
    pub table: TableConfig,
    /// Export documents.
    pub export: ExportSettings,
}

impl ScreenSettings {
    /// Parses and validates TOML settings.
    pub fn from_toml_str(s: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses and validates JSON settings.
    pub fn from_json_str(s: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> SettingsResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = parse(&content)?;
        tracing::debug!(
            target: "horizon_tabular::settings",
            path = %path.display(),
            columns = settings.table.columns.len(),
            "loaded screen settings"
        );
        Ok(settings)
    }

    /// Validates both sections.
    pub fn validate(&self) -> SettingsResult<()> {
        self.table.validate()?;
        self.export.validate()
    }

    /// Serializes the settings as TOML.
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
