use crate::{
    assemble::{
        Artifact, PNG_MEDIA_TYPE, RenderEntry, draw_guides, draw_scene_image, encode_png,
        finish, sanitize_title,
    },
    foundation::core::{CanvasSize, Edges, PixelRect, Point, Rgba8},
    foundation::error::ExportResult,
    foundation::math::fingerprint_of,
    layout::geometry::panel_height,
    layout::grid::{GridItem, GridLayout, GridSpec, layout_grid},
    model::config::{AspectRatioPolicy, BorderStyle, CaptionPlacement, SheetConfig},
    model::scene::GenerationMode,
    render::bubble::{BubbleLayout, draw_bubble, layout_bubble},
    render::overlay::truncate_to_width,
    render::surface::Surface,
    text::measure::FontSpec,
    text::raster::{TextAlign, TextRasterizer, TextStyle},
    text::wrap::{WrappedText, wrap},
};

pub(crate) const FILE_SUFFIX: &str = "_ComicPage.png";

/// Share of the header band above the title's line box.
const TITLE_TOP_SHARE: f32 = 0.18;
const META_GAP: f32 = 12.0;
const META_ALPHA: u8 = 170;

/// Complete geometry of a comic sheet.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SheetPlan {
    /// Canvas size.
    pub canvas: CanvasSize,
    /// Header band holding title and metadata line.
    pub header: PixelRect,
    /// Title, truncated to the content width.
    pub title_line: String,
    /// Metadata line, e.g. `5 PANELS · COMIC · 4:3`.
    pub meta_line: String,
    /// Panel ratio policy in effect.
    pub aspect_ratio: AspectRatioPolicy,
    /// Panel placement.
    pub grid: GridLayout,
    /// Detached caption text per panel.
    pub captions: Vec<Option<WrappedText>>,
    /// Caption bubbles per panel.
    pub bubbles: Vec<Option<BubbleLayout>>,
}

impl SheetPlan {
    /// Stable hash of the geometry.
    pub fn fingerprint(&self) -> ExportResult<u64> {
        fingerprint_of(self)
    }
}

fn title_font(config: &SheetConfig) -> FontSpec {
    FontSpec::new(config.title_font_size).bold()
}

fn caption_font(config: &SheetConfig) -> FontSpec {
    FontSpec::new(config.panel.caption_font_size)
}

/// Plan a multi-panel sheet for `entries`.
///
/// Detached captions wrap at the panel width and extend their row; with
/// [`CaptionPlacement::Bubble`] they are placed inside the panel instead.
pub fn plan_sheet(
    entries: &[RenderEntry<'_>],
    title: &str,
    mode: GenerationMode,
    config: &SheetConfig,
) -> ExportResult<SheetPlan> {
    let panel_cfg = &config.panel;
    let policy = panel_cfg.aspect_ratio_for(mode);
    let header = PixelRect::new(
        0,
        panel_cfg.margins.top,
        config.canvas_width,
        config.header_height,
    );
    let spec = GridSpec {
        canvas_width: config.canvas_width,
        columns: panel_cfg.columns,
        margins: Edges {
            top: header.bottom(),
            ..panel_cfg.margins
        },
        spacing: panel_cfg.spacing,
        uniform_height: panel_cfg.uniform_row_height,
    };
    let panel_w = spec.panel_width();
    let font = caption_font(config);

    let below = panel_cfg.caption_placement == CaptionPlacement::Below;
    let captions: Vec<Option<WrappedText>> = entries
        .iter()
        .map(|e| {
            e.detached_caption()
                .filter(|_| below)
                .map(|text| wrap(text, panel_w as f32, font))
        })
        .collect();
    let items: Vec<GridItem> = entries
        .iter()
        .zip(&captions)
        .map(|(e, caption)| GridItem {
            panel_height: panel_height(panel_w, e.panel_policy(policy), e.image.native_ratio()),
            caption_extent: caption.as_ref().map_or(0, |c| {
                panel_cfg.caption_gap.saturating_add(c.height_px())
            }),
        })
        .collect();
    let grid = layout_grid(&items, &spec)?;

    let bubbles = entries
        .iter()
        .zip(&grid.cells)
        .map(|(e, cell)| {
            e.detached_caption()
                .filter(|_| !below)
                .map(|text| layout_bubble(text, cell.panel, &config.bubble))
        })
        .collect();

    let content_w = config.canvas_width.saturating_sub(panel_cfg.margins.horizontal());
    Ok(SheetPlan {
        canvas: CanvasSize::new(config.canvas_width, grid.total_height)?,
        header,
        title_line: truncate_to_width(title, content_w as f32, title_font(config)),
        meta_line: format!(
            "{} PANELS · {} · {}",
            entries.len(),
            mode.label(),
            policy.label()
        ),
        aspect_ratio: policy,
        grid,
        captions,
        bubbles,
    })
}

/// Render a comic sheet PNG.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn assemble_sheet(
    entries: &[RenderEntry<'_>],
    title: &str,
    mode: GenerationMode,
    config: &SheetConfig,
    debug_guides: bool,
    text: &TextRasterizer,
) -> Artifact {
    let file_name = format!("{}{FILE_SUFFIX}", sanitize_title(title));
    if entries.is_empty() {
        tracing::warn!("no renderable scenes, producing empty sheet");
        return Artifact::empty(file_name, PNG_MEDIA_TYPE);
    }
    let result = plan_sheet(entries, title, mode, config)
        .and_then(|plan| render_sheet(entries, &plan, config, debug_guides, text));
    finish(file_name, PNG_MEDIA_TYPE, result)
}

fn render_sheet(
    entries: &[RenderEntry<'_>],
    plan: &SheetPlan,
    config: &SheetConfig,
    debug_guides: bool,
    text: &TextRasterizer,
) -> ExportResult<Vec<u8>> {
    tracing::debug!(
        width = plan.canvas.width,
        height = plan.canvas.height,
        rows = plan.grid.rows(),
        "rendering comic sheet"
    );
    let mut surface = Surface::new(plan.canvas.width, plan.canvas.height)?;
    surface.fill(config.background);

    draw_header(&mut surface, plan, config, text)?;
    for (entry, cell) in entries.iter().zip(&plan.grid.cells) {
        draw_panel(&mut surface, entry, cell.panel, config, text)?;
        if let (Some(caption), Some(block)) = (cell.caption, &plan.captions[cell.index]) {
            let style = TextStyle::new(caption_font(config), config.ink);
            let top = caption.y.saturating_add(config.panel.caption_gap);
            text.draw_block(&mut surface, block, caption.x as f32, top as f32, &style)?;
        }
        if let Some(bubble) = &plan.bubbles[cell.index] {
            draw_bubble(&mut surface, bubble, &config.bubble, text)?;
        }
    }

    if debug_guides {
        let margins = Edges {
            top: plan.header.bottom(),
            ..config.panel.margins
        };
        draw_guides(&mut surface, &plan.grid, margins);
    }
    encode_png(&surface.to_image()?)
}

fn draw_header(
    surface: &mut Surface,
    plan: &SheetPlan,
    config: &SheetConfig,
    text: &TextRasterizer,
) -> ExportResult<()> {
    let center_x = plan.canvas.width as f32 / 2.0;
    let title_font = title_font(config);
    let title_top = plan.header.y as f32 + plan.header.height as f32 * TITLE_TOP_SHARE;
    let title_style = TextStyle::new(title_font, config.ink).aligned(TextAlign::Center);
    text.draw_line(surface, &plan.title_line, center_x, title_top, &title_style)?;

    let meta_top = title_top + title_font.line_height() + META_GAP;
    let meta_color: Rgba8 = [config.ink[0], config.ink[1], config.ink[2], META_ALPHA];
    let meta_style = TextStyle::new(FontSpec::new(config.meta_font_size), meta_color)
        .aligned(TextAlign::Center);
    text.draw_line(surface, &plan.meta_line, center_x, meta_top, &meta_style)
}

fn draw_panel(
    surface: &mut Surface,
    entry: &RenderEntry<'_>,
    panel: PixelRect,
    config: &SheetConfig,
    text: &TextRasterizer,
) -> ExportResult<()> {
    let rect = panel.to_rect();
    if config.shadow_offset > 0 {
        let off = f64::from(config.shadow_offset);
        surface.fill_rect(rect + kurbo::Vec2::new(off, off), config.shadow_color);
    }
    draw_scene_image(surface, entry, rect, config.ink)?;

    let bw = config.panel.border_width as f32;
    match config.panel.border {
        BorderStyle::None => {}
        BorderStyle::Solid => surface.stroke_rect(rect, bw, config.ink, None),
        BorderStyle::Dashed => surface.stroke_rect(rect, bw, config.ink, Some([bw * 3.0, bw * 2.0])),
    }

    if config.panel.show_numbers && config.badge_radius > 0.0 {
        draw_badge(surface, entry.ordinal, Point::new(rect.x0, rect.y0), config, text)?;
    }
    Ok(())
}

/// Circular ordinal badge centered on the panel's top-left corner.
fn draw_badge(
    surface: &mut Surface,
    ordinal: usize,
    center: Point,
    config: &SheetConfig,
    text: &TextRasterizer,
) -> ExportResult<()> {
    let r = f64::from(config.badge_radius);
    surface.fill_circle(center, r, config.ink);

    let font = FontSpec::new(config.badge_radius).bold();
    let style = TextStyle::new(font, config.background).aligned(TextAlign::Center);
    let top = center.y as f32 - font.line_height() / 2.0;
    text.draw_line(surface, &ordinal.to_string(), center.x as f32, top, &style)
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/sheet.rs"]
mod tests;
