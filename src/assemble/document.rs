use std::io::Cursor;

use anyhow::Context;
use lopdf::{
    Dictionary, Document, Object, ObjectId, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    assemble::{Artifact, RenderEntry, finish, sanitize_title},
    foundation::core::{PLACEHOLDER_GRAY, Rect, WHITE},
    foundation::error::{ExportError, ExportResult},
    foundation::math::{fingerprint_of, mul_div255_u8, px_at_least_one},
    layout::geometry::FALLBACK_INVERSE_RATIO,
    model::config::DocumentConfig,
    render::surface::Surface,
    text::measure::FontSpec,
    text::raster::{TextRasterizer, TextStyle},
    render::overlay::truncate_to_width,
    text::wrap::{WrappedText, wrap},
};

pub(crate) const PDF_MEDIA_TYPE: &str = "application/pdf";
pub(crate) const FILE_SUFFIX: &str = "_Storyboard.pdf";

/// Narrative blocks never take more than this share of the page's content height.
pub const NARRATIVE_MAX_SHARE: f64 = 0.35;

/// Geometry of one document page, in points, y growing downward from the top edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PageLayout {
    /// Page width.
    pub page_width: f64,
    /// Page height.
    pub page_height: f64,
    /// Title block.
    pub title: Rect,
    /// Wrapped title lines (sizes in points).
    pub title_text: WrappedText,
    /// Space left for the image between the title and narrative blocks.
    pub image_budget: Rect,
    /// Contain-fitted image, centered horizontally in the budget.
    pub image: Rect,
    /// Narrative block, anchored to the bottom margin.
    pub narrative: Rect,
    /// Wrapped narrative lines (sizes in points).
    pub narrative_text: WrappedText,
}

impl PageLayout {
    /// Stable hash of the geometry.
    pub fn fingerprint(&self) -> ExportResult<u64> {
        fingerprint_of(self)
    }
}

/// Title font for document pages.
pub fn title_font(config: &DocumentConfig) -> FontSpec {
    FontSpec::new(config.title_font_pt).bold()
}

/// Narrative font for document pages.
pub fn narrative_font(config: &DocumentConfig) -> FontSpec {
    FontSpec::new(config.narrative_font_pt)
}

/// Lay out one page: title on top, narrative at the bottom, image contain-fitted between them.
///
/// `native_ratio` is the image's width / height; unknown ratios fall back to 4:3.
pub fn plan_page(
    title: &str,
    narrative: &str,
    native_ratio: Option<f64>,
    config: &DocumentConfig,
) -> PageLayout {
    let m = config.margin_pt;
    let content_w = config.content_width_pt();
    let (page_w, page_h) = (config.page_width_pt, config.page_height_pt);

    let title_text = wrap(title, content_w as f32, title_font(config));
    let narrative_text = cap_lines(
        wrap(narrative.trim(), content_w as f32, narrative_font(config)),
        (page_h - 2.0 * m) * NARRATIVE_MAX_SHARE,
        content_w as f32,
        narrative_font(config),
    );
    let title_h = f64::from(title_text.height);
    let narrative_h = f64::from(narrative_text.height);

    let title_rect = Rect::new(m, m, m + content_w, m + title_h);
    let narrative_rect = Rect::new(m, page_h - m - narrative_h, m + content_w, page_h - m);

    let budget_h =
        (page_h - 2.0 * m - title_h - narrative_h - 2.0 * config.block_gap_pt).max(0.0);
    let budget_top = title_rect.y1 + config.block_gap_pt;
    let image_budget = Rect::new(m, budget_top, m + content_w, budget_top + budget_h);

    PageLayout {
        page_width: page_w,
        page_height: page_h,
        title: title_rect,
        title_text,
        image_budget,
        image: contain(image_budget, native_ratio),
        narrative: narrative_rect,
        narrative_text,
    }
}

/// Keep as many lines as fit in `max_height`; a cut block ends with an ellipsis.
fn cap_lines(mut block: WrappedText, max_height: f64, width: f32, font: FontSpec) -> WrappedText {
    if block.line_height <= 0.0 || f64::from(block.height) <= max_height {
        return block;
    }
    let max_lines = ((max_height / f64::from(block.line_height)).floor() as usize).max(1);
    block.lines.truncate(max_lines);
    if let Some(last) = block.lines.last_mut() {
        *last = truncate_to_width(&format!("{last}…"), width, font);
    }
    block.height = block.lines.len() as f32 * block.line_height;
    block
}

/// Largest rect of the given width/height ratio inside `budget`, centered horizontally and
/// top-aligned.
fn contain(budget: Rect, native_ratio: Option<f64>) -> Rect {
    let ratio = match native_ratio {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => 1.0 / FALLBACK_INVERSE_RATIO,
    };
    let mut w = budget.width();
    let mut h = w / ratio;
    if h > budget.height() {
        h = budget.height();
        w = h * ratio;
    }
    let x = budget.x0 + (budget.width() - w) / 2.0;
    Rect::new(x, budget.y0, x + w, budget.y0 + h)
}

/// Page title for an entry.
pub fn page_title(title: &str, ordinal: usize) -> String {
    let title = title.trim();
    if title.is_empty() {
        format!("Scene {ordinal}")
    } else {
        format!("{title} · Scene {ordinal}")
    }
}

/// Build a landscape PDF with one page per entry.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn assemble_document(
    entries: &[RenderEntry<'_>],
    title: &str,
    config: &DocumentConfig,
    text: &TextRasterizer,
) -> Artifact {
    let file_name = format!("{}{FILE_SUFFIX}", sanitize_title(title));
    if entries.is_empty() {
        tracing::warn!("no renderable scenes, producing empty document");
        return Artifact::empty(file_name, PDF_MEDIA_TYPE);
    }
    finish(file_name, PDF_MEDIA_TYPE, build_pdf(entries, title, config, text))
}

fn build_pdf(
    entries: &[RenderEntry<'_>],
    title: &str,
    config: &DocumentConfig,
    text: &TextRasterizer,
) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(entries.len());
    for entry in entries {
        let layout = plan_page(
            &page_title(title, entry.ordinal),
            &entry.scene.narrative,
            entry.image.native_ratio(),
            config,
        );
        tracing::debug!(
            ordinal = entry.ordinal,
            image_w = layout.image.width(),
            image_h = layout.image.height(),
            "document page planned"
        );
        let page_id = add_page(&mut doc, pages_id, entry, &layout, config, text)?;
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut Cursor::new(&mut buf))
        .context("serialize pdf document")?;
    Ok(buf)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    entry: &RenderEntry<'_>,
    layout: &PageLayout,
    config: &DocumentConfig,
    text: &TextRasterizer,
) -> ExportResult<ObjectId> {
    let mut ops = Vec::new();
    let mut xobjects = Dictionary::new();

    let blocks = [
        ("T", &layout.title_text, layout.title, title_font(config)),
        ("N", &layout.narrative_text, layout.narrative, narrative_font(config)),
    ];
    for (name, block, rect, font) in blocks {
        if block.is_empty() {
            continue;
        }
        let stream = text_image(block, rect, font, config, text)?;
        xobjects.set(name, doc.add_object(stream));
        ops.extend(place_xobject(name, rect, layout.page_height));
    }

    if layout.image.width() > 0.0 && layout.image.height() > 0.0 {
        match entry.image.pixels() {
            Some(px) => {
                let stream = jpeg_image(px, config.jpeg_quality)?;
                xobjects.set("Im", doc.add_object(stream));
                ops.extend(place_xobject("Im", layout.image, layout.page_height));
            }
            None => ops.extend(placeholder_ops(layout.image, layout.page_height)),
        }
    }

    let content = Content { operations: ops };
    let encoded = content
        .encode()
        .map_err(|e| ExportError::encode(format!("pdf content encode failed: {e}")))?;
    let mut content_stream = Stream::new(dictionary! {}, encoded);
    content_stream
        .compress()
        .map_err(|e| ExportError::encode(format!("pdf content compression failed: {e}")))?;
    let content_id = doc.add_object(content_stream);

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(layout.page_width as f32),
            Object::Real(layout.page_height as f32),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! { "XObject" => xobjects },
    }))
}

/// Draw `name` scaled into `rect` (top-down page coordinates).
fn place_xobject(name: &str, rect: Rect, page_height: f64) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(rect.width() as f32),
                0.into(),
                0.into(),
                Object::Real(rect.height() as f32),
                Object::Real(rect.x0 as f32),
                Object::Real((page_height - rect.y1) as f32),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

fn placeholder_ops(rect: Rect, page_height: f64) -> Vec<Operation> {
    let [r, g, b, _] = PLACEHOLDER_GRAY.map(|c| Object::Real(f32::from(c) / 255.0));
    vec![
        Operation::new("q", vec![]),
        Operation::new("rg", vec![r, g, b]),
        Operation::new(
            "re",
            vec![
                Object::Real(rect.x0 as f32),
                Object::Real((page_height - rect.y1) as f32),
                Object::Real(rect.width() as f32),
                Object::Real(rect.height() as f32),
            ],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

/// Rasterize a text block on white at `raster_scale` pixels per point.
fn text_image(
    block: &WrappedText,
    rect: Rect,
    font: FontSpec,
    config: &DocumentConfig,
    text: &TextRasterizer,
) -> ExportResult<Stream> {
    let scale = config.raster_scale;
    let w = px_at_least_one(rect.width() * f64::from(scale));
    let h = px_at_least_one(rect.height() * f64::from(scale));
    let mut surface = Surface::new(w, h)?;
    surface.fill(WHITE);

    let scaled_font = FontSpec {
        size_px: font.size_px * scale,
        ..font
    };
    let scaled = WrappedText {
        lines: block.lines.clone(),
        line_height: block.line_height * scale,
        height: block.height * scale,
    };
    text.draw_block(
        &mut surface,
        &scaled,
        0.0,
        0.0,
        &TextStyle::new(scaled_font, config.text_color),
    )?;

    let rgb = flatten_on_white(&surface.to_image()?);
    let mut stream = Stream::new(image_dict(w, h, None), rgb.into_raw());
    stream
        .compress()
        .map_err(|e| ExportError::encode(format!("pdf image compression failed: {e}")))?;
    Ok(stream)
}

/// Flatten onto white and embed as a DCT-encoded image.
fn jpeg_image(pixels: &image::RgbaImage, quality: u8) -> ExportResult<Stream> {
    let (w, h) = pixels.dimensions();
    let rgb = flatten_on_white(pixels);

    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| ExportError::encode(format!("jpeg encode failed: {e}")))?;

    Ok(Stream::new(image_dict(w, h, Some("DCTDecode")), jpeg).with_compression(false))
}

pub(crate) fn flatten_on_white(pixels: &image::RgbaImage) -> image::RgbImage {
    let (w, h) = pixels.dimensions();
    image::RgbImage::from_fn(w, h, |x, y| {
        let [r, g, b, a] = pixels.get_pixel(x, y).0;
        let a = u16::from(a);
        let inv = 255 - a;
        image::Rgb([r, g, b].map(|c| mul_div255_u8(u16::from(c), a) + mul_div255_u8(255, inv)))
    })
}

fn image_dict(width: u32, height: u32, filter: Option<&str>) -> Dictionary {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    if let Some(filter) = filter {
        dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    }
    dict
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/document.rs"]
mod tests;
