//! Report layout: projection rows placed onto fixed-geometry pages.
//!
//! Layout is computed into plain draw operations before anything is encoded,
//! so page breaks can be inspected and tested without parsing a PDF.
//! Coordinates are in points with the origin at the **top-left** corner of
//! the page; the PDF backend flips them.
//!
//! Every page starts with the header image area (when an image is
//! configured) and the shaded header band. The first page additionally
//! carries the title, the generation date and the row-count caption. A footer
//! "Page i of N" closes every page.

use std::ops::Range;

use chrono::NaiveDateTime;

use crate::error::{ExportError, Result};
use crate::logging::targets;
use crate::projection::ExportProjection;
use crate::report::geometry::ReportGeometry;

/// Marker appended to truncated cell text.
pub const ELLIPSIS: &str = "...";

/// Vertical gap between preamble blocks.
const BLOCK_GAP: f32 = 6.0;

/// Text fixed for one rendering of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    /// Report title.
    pub title: String,
    /// Generation timestamp printed under the title.
    pub generated_at: NaiveDateTime,
}

/// Header image state as far as layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    /// No image configured; no space reserved.
    None,
    /// An image is configured but unavailable; its space stays reserved.
    Reserved,
    /// An image of the given pixel size is drawn.
    Loaded {
        /// Pixel width.
        width: u32,
        /// Pixel height.
        height: u32,
    },
}

/// Font face of a text operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

/// Fill color of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    /// Header band.
    Header,
    /// Alternate-row background.
    Stripe,
}

/// One drawing operation in top-left page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// The header image, scaled into the box.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// A single line of text; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        face: FontFace,
        text: String,
    },
    /// A filled rectangle.
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        shade: Shade,
    },
    /// A rectangle outline.
    Stroke {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// A straight line.
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    /// 1-based page number.
    pub number: usize,
    /// Projection rows placed on this page.
    pub rows: Range<usize>,
    /// Drawing operations in paint order.
    pub ops: Vec<DrawOp>,
}

impl ReportPage {
    /// Returns the number of shaded header bands on the page.
    pub fn header_bands(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { shade: Shade::Header, .. }))
            .count()
    }

    /// Returns `true` if the page draws the header image.
    pub fn has_image(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Image { .. }))
    }

    /// Returns every text drawn on the page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A fully laid-out report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    geometry: ReportGeometry,
    image: ImageSlot,
    pages: Vec<ReportPage>,
}

impl ReportLayout {
    /// Lays out `projection` on pages of `geometry`.
    ///
    /// The result depends only on the arguments.
    pub fn compute(
        projection: &ExportProjection,
        geometry: &ReportGeometry,
        meta: &ReportMeta,
        image: ImageSlot,
    ) -> Result<Self> {
        geometry.validate()?;
        let columns = projection.column_count();
        if columns == 0 {
            return Err(ExportError::NoVisibleColumns);
        }

        let painter = Painter {
            geometry,
            labels: projection.labels(),
            column_width: geometry.column_width(columns),
            budget: geometry.char_budget(columns),
            image,
        };

        let mut pages = Vec::new();
        let (mut page, mut cursor) = painter.start_page(1, 0, Some((meta, projection.row_count())));

        for (index, row) in projection.rows().iter().enumerate() {
            let on_page = index - page.rows.start;
            let capped = geometry.max_rows_per_page.is_some_and(|cap| on_page >= cap);
            let overflows = cursor + geometry.row_height > geometry.content_bottom();

            if capped || overflows {
                if on_page == 0 {
                    return Err(ExportError::InvalidGeometry(
                        "a data row does not fit below the page header".to_string(),
                    ));
                }
                pages.push(page);
                (page, cursor) = painter.start_page(pages.len() + 1, index, None);
            }

            painter.draw_row(&mut page.ops, cursor, index, row);
            cursor += geometry.row_height;
            page.rows.end = index + 1;
        }
        pages.push(page);

        let total = pages.len();
        for page in &mut pages {
            painter.draw_footer(&mut page.ops, page.number, total);
        }

        tracing::debug!(
            target: targets::REPORT,
            rows = projection.row_count(),
            columns,
            pages = total,
            "laid out report"
        );

        Ok(Self {
            geometry: geometry.clone(),
            image,
            pages,
        })
    }

    /// Returns the geometry the layout was computed for.
    pub fn geometry(&self) -> &ReportGeometry {
        &self.geometry
    }

    /// Returns the header image slot.
    pub fn image(&self) -> ImageSlot {
        self.image
    }

    /// Returns the pages.
    pub fn pages(&self) -> &[ReportPage] {
        &self.pages
    }

    /// Returns the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Shared drawing state of one layout pass.
struct Painter<'a> {
    geometry: &'a ReportGeometry,
    labels: &'a [String],
    column_width: f32,
    budget: usize,
    image: ImageSlot,
}

impl Painter<'_> {
    /// Opens a page and draws its preamble. Returns the page and the y
    /// coordinate where data rows begin.
    fn start_page(
        &self,
        number: usize,
        first_row: usize,
        title: Option<(&ReportMeta, usize)>,
    ) -> (ReportPage, f32) {
        let g = self.geometry;
        let mut ops = Vec::new();
        let mut cursor = g.margin;

        match self.image {
            ImageSlot::None => {}
            ImageSlot::Reserved => cursor += g.image_height + BLOCK_GAP,
            ImageSlot::Loaded { width, height } => {
                let (w, h) = fit_box(width, height, g.image_max_width, g.image_height);
                ops.push(DrawOp::Image {
                    x: g.margin,
                    y: cursor,
                    width: w,
                    height: h,
                });
                cursor += g.image_height + BLOCK_GAP;
            }
        }

        if let Some((meta, row_count)) = title {
            cursor += g.title_font_size;
            ops.push(DrawOp::Text {
                x: g.margin,
                y: cursor,
                size: g.title_font_size,
                face: FontFace::Bold,
                text: meta.title.clone(),
            });
            cursor += g.title_font_size * 0.5;

            let captions = [
                format!("Generated: {}", meta.generated_at.format("%Y-%m-%d %H:%M")),
                row_count_caption(row_count),
            ];
            for caption in captions {
                cursor += g.caption_font_size * 1.5;
                ops.push(DrawOp::Text {
                    x: g.margin,
                    y: cursor,
                    size: g.caption_font_size,
                    face: FontFace::Regular,
                    text: caption,
                });
            }
            cursor += BLOCK_GAP * 2.0;
        }

        self.draw_header_band(&mut ops, cursor);
        cursor += g.header_height;

        let page = ReportPage {
            number,
            rows: first_row..first_row,
            ops,
        };
        (page, cursor)
    }

    fn draw_header_band(&self, ops: &mut Vec<DrawOp>, top: f32) {
        let g = self.geometry;
        ops.push(DrawOp::Fill {
            x: g.margin,
            y: top,
            width: g.content_width(),
            height: g.header_height,
            shade: Shade::Header,
        });
        ops.push(DrawOp::Stroke {
            x: g.margin,
            y: top,
            width: g.content_width(),
            height: g.header_height,
        });
        self.draw_cells(ops, top, g.header_height, FontFace::Bold, self.labels);
    }

    fn draw_row(&self, ops: &mut Vec<DrawOp>, top: f32, index: usize, values: &[String]) {
        let g = self.geometry;
        if index % 2 == 1 {
            ops.push(DrawOp::Fill {
                x: g.margin,
                y: top,
                width: g.content_width(),
                height: g.row_height,
                shade: Shade::Stripe,
            });
        }
        ops.push(DrawOp::Stroke {
            x: g.margin,
            y: top,
            width: g.content_width(),
            height: g.row_height,
        });
        self.draw_cells(ops, top, g.row_height, FontFace::Regular, values);
    }

    /// Draws one text per column plus the vertical separators between them.
    fn draw_cells(
        &self,
        ops: &mut Vec<DrawOp>,
        top: f32,
        height: f32,
        face: FontFace,
        values: &[String],
    ) {
        let g = self.geometry;
        let baseline = top + height / 2.0 + g.body_font_size * 0.35;

        for (column, value) in values.iter().enumerate() {
            let left = g.margin + column as f32 * self.column_width;
            if column > 0 {
                ops.push(DrawOp::Line {
                    x1: left,
                    y1: top,
                    x2: left,
                    y2: top + height,
                });
            }
            let text = truncate_cell(value, self.budget);
            if !text.is_empty() {
                ops.push(DrawOp::Text {
                    x: left + g.cell_padding,
                    y: baseline,
                    size: g.body_font_size,
                    face,
                    text,
                });
            }
        }
    }

    fn draw_footer(&self, ops: &mut Vec<DrawOp>, number: usize, total: usize) {
        let g = self.geometry;
        ops.push(DrawOp::Text {
            x: g.margin,
            y: g.page_height - g.margin,
            size: g.caption_font_size,
            face: FontFace::Regular,
            text: format!("Page {number} of {total}"),
        });
    }
}

fn row_count_caption(rows: usize) -> String {
    match rows {
        1 => "1 row".to_string(),
        n => format!("{n} rows"),
    }
}

/// Scales a `width` x `height` pixel image to fit the box, keeping its aspect
/// ratio.
fn fit_box(width: u32, height: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (0.0, 0.0);
    }
    let (w, h) = (width as f32, height as f32);
    let scale = (max_width / w).min(max_height / h);
    (w * scale, h * scale)
}

/// Fits `text` into `budget` characters on one line.
///
/// Line breaks and tabs become spaces. Text longer than the budget is cut and
/// ends with [`ELLIPSIS`].
pub fn truncate_cell(text: &str, budget: usize) -> String {
    let single_line: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if single_line.chars().count() <= budget {
        return single_line;
    }

    let keep = budget.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = single_line.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated.chars().take(budget).collect()
}
