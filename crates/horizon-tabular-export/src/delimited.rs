//! Delimited text (CSV) rendering.
//!
//! One header line of column labels, then one line per row, UTF-8 encoded.
//! Fields containing the delimiter, quotes or line breaks are quoted.

use crate::error::{ExportError, Result};
use crate::logging::targets;
use crate::projection::ExportProjection;

/// The UTF-8 byte order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Renders an [`ExportProjection`] as delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedTextRenderer {
    /// Field delimiter (default: comma)
    delimiter: u8,
    /// Whether to prefix a UTF-8 byte order mark (default: false)
    bom: bool,
}

impl Default for DelimitedTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimitedTextRenderer {
    /// Creates a comma-delimited renderer without BOM.
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            bom: false,
        }
    }

    /// Sets the field delimiter.
    ///
    /// Common values:
    /// - `b','` - Comma (default)
    /// - `b';'` - Semicolon (spreadsheets in European locales)
    /// - `b'\t'` - Tab
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to prefix a UTF-8 byte order mark.
    ///
    /// Some spreadsheet applications need it to detect UTF-8.
    pub fn bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Returns the field delimiter.
    pub fn field_delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Returns whether output starts with a byte order mark.
    pub fn writes_bom(&self) -> bool {
        self.bom
    }

    /// Renders the projection.
    pub fn render(&self, projection: &ExportProjection) -> Result<Vec<u8>> {
        if projection.column_count() == 0 {
            return Err(ExportError::NoVisibleColumns);
        }

        let mut buffer = Vec::new();
        if self.bom {
            buffer.extend_from_slice(UTF8_BOM);
        }

        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.delimiter)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut buffer);

            writer.write_record(projection.labels())?;
            for row in projection.rows() {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }

        tracing::debug!(
            target: targets::DELIMITED,
            rows = projection.row_count(),
            bytes = buffer.len(),
            "rendered delimited text"
        );
        Ok(buffer)
    }
}
