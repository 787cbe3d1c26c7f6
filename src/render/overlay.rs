use crate::{
    assets::decode::LoadedImage,
    foundation::core::{BLACK, Rect, WHITE},
    foundation::error::ExportResult,
    model::scene::GenerationMode,
    render::surface::Surface,
    text::measure::{FontSpec, char_width, measure},
    text::raster::{TextAlign, TextRasterizer, TextShadow, TextStyle},
    text::wrap::wrap,
};

/// Minimum height of the comic caption bar.
pub const MIN_CAPTION_BAR: u32 = 60;
/// Comic caption bar height as a share of image height.
pub const CAPTION_BAR_SHARE: f64 = 0.15;
/// Thickness of the line separating the caption bar from the picture.
pub const CAPTION_BAR_BORDER: u32 = 3;
/// Share of image height covered by the cinematic gradient.
pub const GRADIENT_SHARE: f64 = 0.25;
/// Opacity reached by the gradient at the bottom edge.
pub const GRADIENT_MAX_OPACITY: f32 = 0.9;

const CAPTION_FONT_SHARE: f32 = 0.4;
const CAPTION_WIDTH_SHARE: f32 = 0.9;
const SUBTITLE_WIDTH_SHARE: f32 = 0.8;
const SUBTITLE_FONT_SHARE: f32 = 0.035;
const SUBTITLE_MIN_FONT: f32 = 16.0;
const SUBTITLE_MARGIN_SHARE: f64 = 0.05;
const SUBTITLE_SHADOW: [u8; 4] = [0, 0, 0, 200];
const ELLIPSIS: char = '…';

/// Bake `text` into a copy of `image` using the treatment for `mode`.
///
/// Blank text and unavailable images return the input unchanged; a compositing failure is logged
/// and also returns the input.
pub fn composite(
    image: &LoadedImage,
    text: &str,
    mode: GenerationMode,
    raster: &TextRasterizer,
) -> LoadedImage {
    bake_text(image, text, mode, raster).unwrap_or_else(|| image.clone())
}

/// Like [`composite`], but `None` when nothing was baked in.
pub(crate) fn bake_text(
    image: &LoadedImage,
    text: &str,
    mode: GenerationMode,
    raster: &TextRasterizer,
) -> Option<LoadedImage> {
    if text.trim().is_empty() {
        return None;
    }
    let pixels = image.pixels()?;

    let drawn = Surface::from_image(pixels).and_then(|mut surface| {
        match mode {
            GenerationMode::Comic => draw_caption_bar(&mut surface, text, raster)?,
            GenerationMode::Storyboard => draw_subtitles(&mut surface, text, raster)?,
        }
        surface.to_image()
    });
    match drawn {
        Ok(out) => Some(LoadedImage::from_pixels(out)),
        Err(e) => {
            tracing::warn!(error = %e, ?mode, "text overlay failed, keeping original image");
            None
        }
    }
}

/// Height of the comic caption bar for an image `height` pixels tall.
pub fn caption_bar_height(height: u32) -> u32 {
    let share = (f64::from(height) * CAPTION_BAR_SHARE).round() as u32;
    share.max(MIN_CAPTION_BAR).min(height)
}

fn draw_caption_bar(
    surface: &mut Surface,
    text: &str,
    raster: &TextRasterizer,
) -> ExportResult<()> {
    let (w, h) = (surface.width(), surface.height());
    let bar_h = caption_bar_height(h);
    let bar_top = h - bar_h;
    let (wf, bar_top_f) = (f64::from(w), f64::from(bar_top));

    surface.fill_rect(Rect::new(0.0, bar_top_f, wf, f64::from(h)), WHITE);
    let border = f64::from(CAPTION_BAR_BORDER.min(bar_h));
    surface.fill_rect(Rect::new(0.0, bar_top_f, wf, bar_top_f + border), BLACK);

    let font = FontSpec::new(bar_h as f32 * CAPTION_FONT_SHARE);
    let line = truncate_to_width(text, w as f32 * CAPTION_WIDTH_SHARE, font);
    let inner = (bar_h as f32 - border as f32).max(0.0);
    let top = bar_top as f32 + border as f32 + (inner - font.line_height()) / 2.0;

    let style = TextStyle::new(font, BLACK).aligned(TextAlign::Center);
    raster.draw_line(surface, &line, w as f32 / 2.0, top, &style)
}

fn draw_subtitles(surface: &mut Surface, text: &str, raster: &TextRasterizer) -> ExportResult<()> {
    let (w, h) = (surface.width(), surface.height());
    let band = (f64::from(h) * GRADIENT_SHARE).round() as u32;
    surface.fade_to_bottom(h - band.min(h), BLACK, GRADIENT_MAX_OPACITY)?;

    let font = FontSpec::new((w as f32 * SUBTITLE_FONT_SHARE).round().max(SUBTITLE_MIN_FONT));
    let block = wrap(text, w as f32 * SUBTITLE_WIDTH_SHARE, font);
    let margin = (f64::from(h) * SUBTITLE_MARGIN_SHARE).round() as f32;
    let bottom = h as f32 - margin;

    let style = TextStyle::new(font, WHITE)
        .aligned(TextAlign::Center)
        .with_shadow(TextShadow {
            offset: (font.size_px * 0.06).max(1.0),
            color: SUBTITLE_SHADOW,
        });
    let n = block.lines.len();
    for (i, line) in block.lines.iter().enumerate() {
        let top = bottom - (n - i) as f32 * block.line_height;
        raster.draw_line(surface, line, w as f32 / 2.0, top, &style)?;
    }
    Ok(())
}

/// Cut `text` to fit `max_width`, ending with an ellipsis when anything was dropped.
pub(crate) fn truncate_to_width(text: &str, max_width: f32, font: FontSpec) -> String {
    let text = text.trim();
    if measure(text, font) <= max_width {
        return text.to_string();
    }

    let budget = max_width - char_width(ELLIPSIS, font);
    let mut out = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let cw = char_width(ch, font);
        if width + cw > budget {
            break;
        }
        width += cw;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
