//! Fixed page geometry of the report.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Average glyph advance of Helvetica as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

/// Page geometry and typography of a report, in PDF points (1/72 inch).
///
/// The default is A4 landscape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportGeometry {
    /// Page width.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Margin on all four sides.
    pub margin: f32,
    /// Height of one data row.
    pub row_height: f32,
    /// Height of the shaded header band.
    pub header_height: f32,
    /// Horizontal padding inside each cell.
    pub cell_padding: f32,
    /// Font size of the title.
    pub title_font_size: f32,
    /// Font size of the generation date and row-count caption.
    pub caption_font_size: f32,
    /// Font size of table cells and labels.
    pub body_font_size: f32,
    /// Height reserved for the header image when one is configured.
    pub image_height: f32,
    /// Maximum width of the header image.
    pub image_max_width: f32,
    /// Height reserved at the bottom of each page for the page footer.
    pub footer_height: f32,
    /// Optional cap on data rows per page, on top of what fits.
    pub max_rows_per_page: Option<usize>,
}

impl Default for ReportGeometry {
    fn default() -> Self {
        Self {
            page_width: 841.89,
            page_height: 595.28,
            margin: 36.0,
            row_height: 18.0,
            header_height: 22.0,
            cell_padding: 4.0,
            title_font_size: 16.0,
            caption_font_size: 9.0,
            body_font_size: 8.0,
            image_height: 40.0,
            image_max_width: 160.0,
            footer_height: 16.0,
            max_rows_per_page: None,
        }
    }
}

impl ReportGeometry {
    /// A4 landscape.
    pub fn a4_landscape() -> Self {
        Self::default()
    }

    /// US Letter landscape.
    pub fn letter_landscape() -> Self {
        Self {
            page_width: 792.0,
            page_height: 612.0,
            ..Self::default()
        }
    }

    /// Caps the number of data rows per page.
    pub fn with_max_rows_per_page(mut self, rows: usize) -> Self {
        self.max_rows_per_page = Some(rows);
        self
    }

    /// Returns `W - 2M`.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Returns the y coordinate (from the top) data rows must not cross.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin - self.footer_height
    }

    /// Returns the equal width of each of `columns` columns.
    pub fn column_width(&self, columns: usize) -> f32 {
        self.content_width() / columns.max(1) as f32
    }

    /// Returns how many characters fit in one cell of a table with `columns`
    /// columns. Never less than one.
    pub fn char_budget(&self, columns: usize) -> usize {
        let usable = self.column_width(columns) - 2.0 * self.cell_padding;
        let per_char = self.body_font_size * AVERAGE_GLYPH_WIDTH;
        if usable <= 0.0 || per_char <= 0.0 {
            return 1;
        }
        ((usable / per_char).floor() as usize).max(1)
    }

    /// Checks that the geometry leaves room for a header band and one row.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("row_height", self.row_height),
            ("header_height", self.header_height),
            ("body_font_size", self.body_font_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ExportError::InvalidGeometry(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("margin", self.margin),
            ("cell_padding", self.cell_padding),
            ("title_font_size", self.title_font_size),
            ("caption_font_size", self.caption_font_size),
            ("image_height", self.image_height),
            ("image_max_width", self.image_max_width),
            ("footer_height", self.footer_height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ExportError::InvalidGeometry(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.content_width() <= 0.0 {
            return Err(ExportError::InvalidGeometry(
                "margins leave no horizontal space".to_string(),
            ));
        }
        if self.max_rows_per_page == Some(0) {
            return Err(ExportError::InvalidGeometry(
                "max_rows_per_page must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
