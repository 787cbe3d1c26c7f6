use crate::{
    foundation::core::{BezPath, PixelRect, Point, Rect},
    foundation::error::ExportResult,
    model::config::{BubbleConfig, BubblePosition, BubbleStyle},
    render::surface::Surface,
    text::measure::FontSpec,
    text::raster::{TextRasterizer, TextStyle},
    text::wrap::{WrappedText, wrap},
};

/// Gap between a bubble and the panel edges it is anchored to.
pub const BUBBLE_MARGIN: f64 = 10.0;
/// Bubbles never grow wider than this share of the panel.
pub const MAX_WIDTH_SHARE: f64 = 0.85;
/// Taller bubbles are centered instead of anchored top-left under `Auto`.
pub const CENTER_HEIGHT_SHARE: f64 = 0.6;

const SHADOW_OFFSET: (f64, f64) = (4.0, 4.0);
const SHADOW_COLOR: [u8; 4] = [0, 0, 0, 77];

// Tail of the american variant, relative to the bubble's bottom-left corner.
const TAIL_BASE_START: f64 = 20.0;
const TAIL_BASE_END: f64 = 40.0;
const TAIL_TIP: (f64, f64) = (12.0, 18.0);

/// Resolved bubble footprint and its text.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BubbleLayout {
    /// Bubble box in canvas coordinates (tail excluded).
    pub rect: Rect,
    /// Wrapped text lines.
    pub text: WrappedText,
}

/// Size and place a bubble for `text` inside `panel`.
pub fn layout_bubble(text: &str, panel: PixelRect, config: &BubbleConfig) -> BubbleLayout {
    let font = FontSpec::new(config.font_size);
    let padding = f64::from(config.padding);
    let panel_rect = panel.to_rect();
    let max_width = panel_rect.width() * MAX_WIDTH_SHARE;

    let wrap_width = (max_width - 2.0 * padding).max(1.0) as f32;
    let wrapped = wrap(text, wrap_width, font);

    let width = (f64::from(wrapped.max_line_width(font)) + 2.0 * padding).min(max_width);
    let height = f64::from(wrapped.height) + 2.0 * padding;
    let origin = anchor(panel_rect, width, height, config.position);

    BubbleLayout {
        rect: Rect::from_origin_size(origin, (width, height)),
        text: wrapped,
    }
}

fn anchor(panel: Rect, w: f64, h: f64, position: BubblePosition) -> Point {
    let centered = Point::new(
        panel.x0 + (panel.width() - w) / 2.0,
        panel.y0 + (panel.height() - h) / 2.0,
    );
    let left = panel.x0 + BUBBLE_MARGIN;
    let right = panel.x1 - BUBBLE_MARGIN - w;
    let top = panel.y0 + BUBBLE_MARGIN;
    let bottom = panel.y1 - BUBBLE_MARGIN - h;

    match position {
        BubblePosition::Auto => {
            if h > panel.height() * CENTER_HEIGHT_SHARE {
                centered
            } else {
                Point::new(left, top)
            }
        }
        BubblePosition::TopLeft => Point::new(left, top),
        BubblePosition::TopRight => Point::new(right, top),
        BubblePosition::BottomLeft => Point::new(left, bottom),
        BubblePosition::BottomRight => Point::new(right, bottom),
        BubblePosition::Center => centered,
    }
}

/// Outline of the bubble shape (american tail included).
pub fn bubble_path(rect: Rect, config: &BubbleConfig) -> BezPath {
    use kurbo::Shape;

    match config.style {
        BubbleStyle::Modern | BubbleStyle::Japanese => {
            kurbo::RoundedRect::from_rect(rect, f64::from(config.corner_radius)).to_path(0.1)
        }
        BubbleStyle::American => {
            let mut path = BezPath::new();
            path.move_to((rect.x0, rect.y0));
            path.line_to((rect.x1, rect.y0));
            path.line_to((rect.x1, rect.y1));
            path.line_to((rect.x0 + TAIL_BASE_END, rect.y1));
            path.line_to((rect.x0 + TAIL_TIP.0, rect.y1 + TAIL_TIP.1));
            path.line_to((rect.x0 + TAIL_BASE_START, rect.y1));
            path.line_to((rect.x0, rect.y1));
            path.close_path();
            path
        }
    }
}

/// Draw shadow, shape, border and text.
pub fn draw_bubble(
    surface: &mut Surface,
    layout: &BubbleLayout,
    config: &BubbleConfig,
    text: &TextRasterizer,
) -> ExportResult<()> {
    if config.shadow {
        let shadow_rect = layout.rect + kurbo::Vec2::new(SHADOW_OFFSET.0, SHADOW_OFFSET.1);
        surface.fill_path(&bubble_path(shadow_rect, config), SHADOW_COLOR);
    }

    let outline = bubble_path(layout.rect, config);
    surface.fill_path(&outline, config.fill_color);
    if config.border_width > 0.0 {
        surface.stroke_path(&outline, config.border_width, config.border_color, None);
    }

    let style = TextStyle::new(FontSpec::new(config.font_size), config.text_color);
    text.draw_block(
        surface,
        &layout.text,
        (layout.rect.x0 + f64::from(config.padding)) as f32,
        (layout.rect.y0 + f64::from(config.padding)) as f32,
        &style,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/bubble.rs"]
mod tests;
