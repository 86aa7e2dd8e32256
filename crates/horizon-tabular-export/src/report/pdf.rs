//! PDF encoding of a [`ReportLayout`].
//!
//! Uses the standard Type 1 fonts Helvetica and Helvetica-Bold, so no font
//! data is embedded. Text is encoded as WinAnsi; characters outside Latin-1
//! are replaced with `?` and counted in a single warning per document.
//! Content streams and image data are Flate compressed.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Result;
use crate::header_image::HeaderImage;
use crate::logging::targets;
use crate::report::layout::{DrawOp, FontFace, ReportLayout, Shade};

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");
const HEADER_IMAGE: Name<'static> = Name(b"Im1");

const HEADER_FILL: (f32, f32, f32) = (0.82, 0.85, 0.90);
const STRIPE_FILL: (f32, f32, f32) = (0.95, 0.96, 0.98);
const BORDER: (f32, f32, f32) = (0.55, 0.58, 0.62);
const TEXT: (f32, f32, f32) = (0.10, 0.10, 0.12);

/// Allocates sequential object references.
struct RefAllocator(i32);

impl RefAllocator {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Encodes `layout` as a PDF document.
///
/// `image` supplies the pixels for the layout's image operations. When it is
/// `None` image operations are skipped.
pub fn encode_pdf(layout: &ReportLayout, image: Option<&HeaderImage>) -> Result<Vec<u8>> {
    let geometry = layout.geometry();
    let mut refs = RefAllocator(0);
    let catalog_id = refs.next();
    let tree_id = refs.next();
    let regular_id = refs.next();
    let bold_id = refs.next();
    let image_id = image.map(|_| refs.next());

    let page_ids: Vec<(Ref, Ref)> = layout
        .pages()
        .iter()
        .map(|_| (refs.next(), refs.next()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    if let (Some(image), Some(id)) = (image, image_id) {
        let data = compress(&image.rgb)?;
        let mut xobject = pdf.image_xobject(id, &data);
        xobject.filter(Filter::FlateDecode);
        xobject.width(image.width as i32);
        xobject.height(image.height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
    }

    let mut replaced = 0;
    for (report_page, &(page_id, content_id)) in layout.pages().iter().zip(&page_ids) {
        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height));
            page.parent(tree_id);
            page.contents(content_id);

            let mut resources = page.resources();
            resources
                .fonts()
                .pair(REGULAR_FONT, regular_id)
                .pair(BOLD_FONT, bold_id);
            if let Some(id) = image_id {
                resources.x_objects().pair(HEADER_IMAGE, id);
            }
        }

        let (content, page_replaced) =
            paint(&report_page.ops, geometry.page_height, image_id.is_some());
        replaced += page_replaced;
        let data = compress(&content)?;
        pdf.stream(content_id, &data).filter(Filter::FlateDecode);
    }

    if replaced > 0 {
        tracing::warn!(
            target: targets::REPORT,
            replaced,
            "characters outside Latin-1 were replaced with '?'"
        );
    }

    let bytes = pdf.finish();
    tracing::debug!(
        target: targets::REPORT,
        pages = page_ids.len(),
        bytes = bytes.len(),
        "encoded report PDF"
    );
    Ok(bytes)
}

/// Converts draw operations into a content stream. Also returns how many
/// characters could not be encoded.
fn paint(ops: &[DrawOp], page_height: f32, has_image: bool) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let flip = |y: f32| page_height - y;
    let mut content = Content::new();
    content.set_line_width(0.5);
    content.set_stroke_rgb(BORDER.0, BORDER.1, BORDER.2);

    for op in ops {
        match op {
            DrawOp::Image {
                x,
                y,
                width,
                height,
            } => {
                if has_image {
                    content.save_state();
                    content.transform([*width, 0.0, 0.0, *height, *x, flip(y + height)]);
                    content.x_object(HEADER_IMAGE);
                    content.restore_state();
                }
            }
            DrawOp::Text {
                x,
                y,
                size,
                face,
                text,
            } => {
                let font = match face {
                    FontFace::Regular => REGULAR_FONT,
                    FontFace::Bold => BOLD_FONT,
                };
                let (encoded, missing) = encode_win_ansi(text);
                replaced += missing;
                content.set_fill_rgb(TEXT.0, TEXT.1, TEXT.2);
                content.begin_text();
                content.set_font(font, *size);
                content.next_line(*x, flip(*y));
                content.show(Str(&encoded));
                content.end_text();
            }
            DrawOp::Fill {
                x,
                y,
                width,
                height,
                shade,
            } => {
                let (r, g, b) = match shade {
                    Shade::Header => HEADER_FILL,
                    Shade::Stripe => STRIPE_FILL,
                };
                content.set_fill_rgb(r, g, b);
                content.rect(*x, flip(y + height), *width, *height);
                content.fill_nonzero();
            }
            DrawOp::Stroke {
                x,
                y,
                width,
                height,
            } => {
                content.rect(*x, flip(y + height), *width, *height);
                content.stroke();
            }
            DrawOp::Line { x1, y1, x2, y2 } => {
                content.move_to(*x1, flip(*y1));
                content.line_to(*x2, flip(*y2));
                content.stroke();
            }
        }
    }

    (content.finish().to_vec(), replaced)
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Encodes text for a WinAnsi font. Latin-1 maps directly; anything else,
/// and the C1 control range, becomes `?`. The count is the number of
/// replaced characters.
fn encode_win_ansi(text: &str) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let bytes = text
        .chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => {
                replaced += 1;
                b'?'
            }
        })
        .collect();
    (bytes, replaced)
}
