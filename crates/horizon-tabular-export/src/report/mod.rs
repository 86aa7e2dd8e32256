//! Paginated PDF report rendering.
//!
//! Rendering runs in three steps:
//!
//! 1. The optional header image is loaded under a timeout
//!    ([`load_header_image`]).
//! 2. The projection is laid out into pages ([`ReportLayout`]).
//! 3. The layout is encoded as PDF.
//!
//! ```
//! use chrono::NaiveDate;
//! use horizon_tabular_export::ExportProjection;
//! use horizon_tabular_export::report::{PaginatedReportRenderer, ReportGeometry};
//!
//! let projection = ExportProjection::from_parts(
//!     vec!["ID".into(), "Name".into()],
//!     (0..25).map(|i| vec![i.to_string(), format!("Site {i}")]).collect(),
//! )
//! .unwrap();
//!
//! let renderer = PaginatedReportRenderer::new("Sites")
//!     .with_geometry(ReportGeometry::default().with_max_rows_per_page(10));
//! let generated_at = NaiveDate::from_ymd_opt(2024, 5, 1)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//! let report = renderer.render(&projection, generated_at).unwrap();
//!
//! assert_eq!(report.layout.page_count(), 3);
//! assert!(report.bytes.starts_with(b"%PDF-"));
//! ```

mod geometry;
mod layout;
mod pdf;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;

pub use geometry::ReportGeometry;
pub use layout::{
    DrawOp, ELLIPSIS, FontFace, ImageSlot, ReportLayout, ReportMeta, ReportPage, Shade,
    truncate_cell,
};
pub use pdf::encode_pdf;

use crate::error::Result;
use crate::header_image::{
    DEFAULT_IMAGE_TIMEOUT, HeaderImageOutcome, HeaderImageSource, load_header_image,
};
use crate::logging::targets;
use crate::projection::ExportProjection;

/// A rendered report together with the layout it was encoded from.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// The PDF document.
    pub bytes: Vec<u8>,
    /// The page layout.
    pub layout: ReportLayout,
    /// What happened to the header image, if one is configured.
    pub image: Option<HeaderImageOutcome>,
}

/// Renders projections as paginated PDF reports.
///
/// Text is set in the standard Helvetica fonts with WinAnsi encoding, so only
/// Latin-1 characters print. Anything else, such as Arabic or CJK cell text,
/// is drawn as `?` and a warning under the report target records how many
/// characters were replaced. Use the delimited text format when that data
/// must survive.
#[derive(Clone)]
pub struct PaginatedReportRenderer {
    title: String,
    geometry: ReportGeometry,
    header_image: Option<Arc<dyn HeaderImageSource>>,
    image_timeout: Duration,
}

impl PaginatedReportRenderer {
    /// Creates a renderer with the default geometry and no header image.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            geometry: ReportGeometry::default(),
            header_image: None,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }

    /// Sets the page geometry.
    pub fn with_geometry(mut self, geometry: ReportGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the header image source.
    pub fn with_header_image(mut self, source: Arc<dyn HeaderImageSource>) -> Self {
        self.header_image = Some(source);
        self
    }

    /// Sets how long rendering waits for the header image.
    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    /// Returns the report title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the page geometry.
    pub fn geometry(&self) -> &ReportGeometry {
        &self.geometry
    }

    /// Returns how long rendering waits for the header image.
    pub fn image_timeout(&self) -> Duration {
        self.image_timeout
    }

    /// Renders `projection`, stamping it with `generated_at`.
    ///
    /// Header image problems never fail rendering; see
    /// [`RenderedReport::image`].
    #[tracing::instrument(
        target = "horizon_tabular_export::report",
        skip_all,
        fields(rows = projection.row_count())
    )]
    pub fn render(
        &self,
        projection: &ExportProjection,
        generated_at: NaiveDateTime,
    ) -> Result<RenderedReport> {
        self.geometry.validate()?;

        let outcome = self
            .header_image
            .as_ref()
            .map(|source| load_header_image(Arc::clone(source), self.image_timeout));
        let slot = match &outcome {
            None => ImageSlot::None,
            Some(HeaderImageOutcome::Loaded(image)) => ImageSlot::Loaded {
                width: image.width,
                height: image.height,
            },
            Some(HeaderImageOutcome::Skipped(_)) => ImageSlot::Reserved,
        };

        let meta = ReportMeta {
            title: self.title.clone(),
            generated_at,
        };
        let layout = ReportLayout::compute(projection, &self.geometry, &meta, slot)?;
        let bytes = encode_pdf(&layout, outcome.as_ref().and_then(HeaderImageOutcome::image))?;

        tracing::debug!(
            target: targets::REPORT,
            pages = layout.page_count(),
            image = ?slot,
            "rendered report"
        );
        Ok(RenderedReport {
            bytes,
            layout,
            image: outcome,
        })
    }
}

impl fmt::Debug for PaginatedReportRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedReportRenderer")
            .field("title", &self.title)
            .field("geometry", &self.geometry)
            .field(
                "header_image",
                &self.header_image.as_ref().map(|s| s.describe()),
            )
            .field("image_timeout", &self.image_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageLoadError;
    use crate::header_image::tests::png_bytes;
    use crate::header_image::{BytesImageSource, FileImageSource};
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn projection(rows: usize) -> ExportProjection {
        ExportProjection::from_parts(
            vec!["ID".into()],
            (0..rows).map(|i| vec![i.to_string()]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_without_image() {
        let report = PaginatedReportRenderer::new("Plain")
            .render(&projection(5), generated_at())
            .unwrap();
        assert!(report.image.is_none());
        assert_eq!(report.layout.image(), ImageSlot::None);
    }

    #[test]
    fn test_loaded_image_is_drawn_on_every_page() {
        let renderer = PaginatedReportRenderer::new("Logo")
            .with_geometry(ReportGeometry::default().with_max_rows_per_page(4))
            .with_header_image(Arc::new(BytesImageSource::new(png_bytes(
                8,
                4,
                [200, 0, 0, 255],
            ))));
        let report = renderer.render(&projection(10), generated_at()).unwrap();

        assert!(report.image.as_ref().is_some_and(HeaderImageOutcome::is_loaded));
        assert_eq!(report.layout.page_count(), 3);
        assert!(report.layout.pages().iter().all(ReportPage::has_image));
    }

    #[test]
    fn test_missing_image_reserves_space() {
        let renderer = PaginatedReportRenderer::new("Logo")
            .with_header_image(Arc::new(FileImageSource::new("/no/such/logo.png")));
        let report = renderer.render(&projection(3), generated_at()).unwrap();

        assert!(matches!(
            report.image,
            Some(HeaderImageOutcome::Skipped(ImageLoadError::Read { .. }))
        ));
        assert_eq!(report.layout.image(), ImageSlot::Reserved);
        assert!(report.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_invalid_geometry_fails() {
        let renderer = PaginatedReportRenderer::new("Broken").with_geometry(ReportGeometry {
            row_height: 0.0,
            ..ReportGeometry::default()
        });
        assert!(renderer.render(&projection(1), generated_at()).is_err());
    }
}
