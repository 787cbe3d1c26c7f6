use crate::{
    assemble::{
        Artifact, PNG_MEDIA_TYPE, RenderEntry, draw_guides, draw_scene_image, encode_png, finish,
        sanitize_title,
    },
    foundation::core::{CanvasSize, Edges, PixelRect},
    foundation::error::ExportResult,
    foundation::math::fingerprint_of,
    layout::geometry::panel_height,
    layout::grid::{GridItem, GridLayout, GridSpec, layout_grid},
    model::config::{AspectRatioPolicy, StripConfig},
    render::surface::Surface,
    text::measure::FontSpec,
    text::raster::{TextAlign, TextRasterizer, TextStyle},
    text::wrap::{WrappedText, wrap},
};

pub(crate) const FILE_SUFFIX: &str = "_LongImage.png";

/// Complete geometry of a long strip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StripPlan {
    /// Canvas size.
    pub canvas: CanvasSize,
    /// Title band; zero height when the title is blank.
    pub title_band: PixelRect,
    /// Wrapped title.
    pub title: WrappedText,
    /// Single-column placement of images and captions.
    pub grid: GridLayout,
    /// Detached caption text per image.
    pub captions: Vec<Option<WrappedText>>,
}

impl StripPlan {
    /// Stable hash of the geometry.
    pub fn fingerprint(&self) -> ExportResult<u64> {
        fingerprint_of(self)
    }
}

/// Plan a single-column strip: title band, then every image at full width with its caption.
pub fn plan_strip(
    entries: &[RenderEntry<'_>],
    title: &str,
    config: &StripConfig,
) -> ExportResult<StripPlan> {
    let width = config.width;
    let title_pad = config.title_padding;
    let title_font = FontSpec::new(config.title_font_size).bold();
    let title_text = wrap(
        title.trim(),
        width.saturating_sub(title_pad.saturating_mul(2)).max(1) as f32,
        title_font,
    );
    let band_h = if title_text.is_empty() {
        0
    } else {
        title_text.height_px().saturating_add(title_pad.saturating_mul(2))
    };

    let cap_pad = config.caption_padding;
    let cap_font = FontSpec::new(config.caption_font_size);
    let cap_width = width.saturating_sub(cap_pad.saturating_mul(2)).max(1) as f32;
    let captions: Vec<Option<WrappedText>> = entries
        .iter()
        .map(|e| e.detached_caption().map(|t| wrap(t, cap_width, cap_font)))
        .collect();

    let items: Vec<GridItem> = entries
        .iter()
        .zip(&captions)
        .map(|(e, caption)| GridItem {
            panel_height: panel_height(width, AspectRatioPolicy::Auto, e.image.native_ratio()),
            caption_extent: caption.as_ref().map_or(0, |c| {
                c.height_px().saturating_add(cap_pad.saturating_mul(2))
            }),
        })
        .collect();
    let spec = GridSpec {
        canvas_width: width,
        columns: 1,
        margins: Edges {
            top: band_h,
            ..Edges::default()
        },
        spacing: 0,
        uniform_height: false,
    };
    let grid = layout_grid(&items, &spec)?;

    Ok(StripPlan {
        canvas: CanvasSize::new(width, grid.total_height)?,
        title_band: PixelRect::new(0, 0, width, band_h),
        title: title_text,
        grid,
        captions,
    })
}

/// Render a long strip PNG.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn assemble_strip(
    entries: &[RenderEntry<'_>],
    title: &str,
    config: &StripConfig,
    debug_guides: bool,
    text: &TextRasterizer,
) -> Artifact {
    let file_name = format!("{}{FILE_SUFFIX}", sanitize_title(title));
    if entries.is_empty() {
        tracing::warn!("no renderable scenes, producing empty strip");
        return Artifact::empty(file_name, PNG_MEDIA_TYPE);
    }
    let result = plan_strip(entries, title, config)
        .and_then(|plan| render_strip(entries, &plan, config, debug_guides, text));
    finish(file_name, PNG_MEDIA_TYPE, result)
}

fn render_strip(
    entries: &[RenderEntry<'_>],
    plan: &StripPlan,
    config: &StripConfig,
    debug_guides: bool,
    text: &TextRasterizer,
) -> ExportResult<Vec<u8>> {
    tracing::debug!(
        width = plan.canvas.width,
        height = plan.canvas.height,
        "rendering long strip"
    );
    let mut surface = Surface::new(plan.canvas.width, plan.canvas.height)?;
    surface.fill(config.background);

    if !plan.title.is_empty() {
        let style = TextStyle::new(FontSpec::new(config.title_font_size).bold(), config.title_color)
            .aligned(TextAlign::Center);
        text.draw_block(
            &mut surface,
            &plan.title,
            plan.canvas.width as f32 / 2.0,
            config.title_padding as f32,
            &style,
        )?;
    }

    let caption_style = TextStyle::new(FontSpec::new(config.caption_font_size), config.caption_color);
    for (entry, cell) in entries.iter().zip(&plan.grid.cells) {
        draw_scene_image(&mut surface, entry, cell.panel.to_rect(), config.background)?;
        if let (Some(caption), Some(block)) = (cell.caption, &plan.captions[cell.index]) {
            let pad = config.caption_padding;
            text.draw_block(
                &mut surface,
                block,
                pad as f32,
                caption.y.saturating_add(pad) as f32,
                &caption_style,
            )?;
        }
    }

    if debug_guides {
        draw_guides(&mut surface, &plan.grid, Edges {
            top: plan.title_band.height,
            ..Edges::default()
        });
    }
    encode_png(&surface.to_image()?)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/strip.rs"]
mod tests;
