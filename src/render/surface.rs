use anyhow::Context;
use kurbo::{PathEl, Shape};
use resvg::tiny_skia;

use crate::{
    foundation::core::{BezPath, Point, Rect, Rgba8},
    foundation::error::{ExportError, ExportResult},
    render::composite::{self, FadeBand},
};

/// Largest accepted surface allocation in bytes.
pub const MAX_BYTES: u64 = 1 << 30;

/// How an image is mapped into a destination box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFit {
    /// Scale to the box, ignoring aspect ratio.
    Stretch,
    /// Scale to fit inside the box, centered, preserving aspect ratio.
    Contain,
    /// Scale to cover the box, centered and cropped, preserving aspect ratio.
    Cover,
}

/// Drawing surface owned by a single export call.
///
/// Pixels are premultiplied RGBA8; conversion to straight alpha happens on readback.
pub struct Surface {
    pixmap: tiny_skia::Pixmap,
}

impl Surface {
    /// Allocate a transparent surface.
    ///
    /// Fails (instead of panicking) on zero or oversized dimensions so assemblers can degrade to
    /// an empty artifact.
    pub fn new(width: u32, height: u32) -> ExportResult<Self> {
        check_dims(width, height)?;
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            ExportError::layout(format!("failed to allocate {width}x{height} surface"))
        })?;
        Ok(Self { pixmap })
    }

    /// Copy a straight-alpha image into a new surface.
    pub fn from_image(image: &image::RgbaImage) -> ExportResult<Self> {
        let (width, height) = image.dimensions();
        check_dims(width, height)?;
        let mut data = image.as_raw().clone();
        composite::premultiply_in_place(&mut data);
        let size = tiny_skia::IntSize::from_wh(width, height)
            .ok_or_else(|| ExportError::layout("image has zero dimensions"))?;
        let pixmap = tiny_skia::Pixmap::from_vec(data, size)
            .ok_or_else(|| ExportError::layout("image byte length mismatch"))?;
        Ok(Self { pixmap })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut tiny_skia::Pixmap {
        &mut self.pixmap
    }

    /// Read back as a straight-alpha image.
    pub fn to_image(&self) -> ExportResult<image::RgbaImage> {
        let mut data = self.pixmap.data().to_vec();
        composite::demultiply_in_place(&mut data);
        image::RgbaImage::from_raw(self.width(), self.height(), data)
            .context("surface readback")
            .map_err(ExportError::from)
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color[0], color[1], color[2], color[3],
        ));
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        let Some(r) = skia_rect(rect) else {
            return;
        };
        self.pixmap.fill_rect(
            r,
            &solid_paint(color),
            tiny_skia::Transform::identity(),
            None,
        );
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        let path = kurbo::Circle::new(center, radius).to_path(0.1);
        self.fill_path(&path, color);
    }

    /// Fill an arbitrary path (non-zero winding).
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let Some(p) = bezpath_to_skia(path) else {
            return;
        };
        self.pixmap.fill_path(
            &p,
            &solid_paint(color),
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    /// Stroke an arbitrary path; `dash` is an `[on, off]` pattern in pixels.
    pub fn stroke_path(&mut self, path: &BezPath, width: f32, color: Rgba8, dash: Option<[f32; 2]>) {
        if width <= 0.0 {
            return;
        }
        let Some(p) = bezpath_to_skia(path) else {
            return;
        };
        let stroke = tiny_skia::Stroke {
            width,
            line_join: tiny_skia::LineJoin::Miter,
            dash: dash.and_then(|[on, off]| tiny_skia::StrokeDash::new(vec![on, off], 0.0)),
            ..tiny_skia::Stroke::default()
        };
        self.pixmap.stroke_path(
            &p,
            &solid_paint(color),
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    /// Stroke a rectangle outline centered on its edges.
    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Rgba8, dash: Option<[f32; 2]>) {
        let path = rect.to_path(0.1);
        self.stroke_path(&path, width, color, dash);
    }

    /// Draw a straight-alpha image into `dest`.
    pub fn draw_image(
        &mut self,
        image: &image::RgbaImage,
        dest: Rect,
        fit: ImageFit,
    ) -> ExportResult<()> {
        let (iw, ih) = image.dimensions();
        let Some((drawn, clip)) = fit_rects(iw, ih, dest, fit) else {
            return Ok(());
        };
        let Some(clip) = skia_rect(clip) else {
            return Ok(());
        };

        let src = Surface::from_image(image)?;
        let transform = tiny_skia::Transform::from_row(
            (drawn.width() / f64::from(iw)) as f32,
            0.0,
            0.0,
            (drawn.height() / f64::from(ih)) as f32,
            drawn.x0 as f32,
            drawn.y0 as f32,
        );
        let paint = tiny_skia::Paint {
            shader: tiny_skia::Pattern::new(
                src.pixmap.as_ref(),
                tiny_skia::SpreadMode::Pad,
                tiny_skia::FilterQuality::Bicubic,
                1.0,
                transform,
            ),
            anti_alias: false,
            ..tiny_skia::Paint::default()
        };
        self.pixmap
            .fill_rect(clip, &paint, tiny_skia::Transform::identity(), None);
        Ok(())
    }

    /// Blend a vertical ramp of `color` from transparent at `y_start` to `max_opacity` at the
    /// bottom edge.
    pub fn fade_to_bottom(&mut self, y_start: u32, color: Rgba8, max_opacity: f32) -> ExportResult<()> {
        let (width, height) = (self.width(), self.height());
        composite::fade_rows_in_place(
            self.pixmap.data_mut(),
            FadeBand {
                width,
                height,
                y_start,
                color,
                max_opacity,
            },
        )
    }
}

/// Compute the drawn image rectangle and the visible clip for a fit mode.
///
/// Returns `None` for degenerate inputs.
pub fn fit_rects(src_w: u32, src_h: u32, dest: Rect, fit: ImageFit) -> Option<(Rect, Rect)> {
    if src_w == 0 || src_h == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
        return None;
    }
    let (sw, sh) = (f64::from(src_w), f64::from(src_h));
    let scale = match fit {
        ImageFit::Stretch => return Some((dest, dest)),
        ImageFit::Contain => (dest.width() / sw).min(dest.height() / sh),
        ImageFit::Cover => (dest.width() / sw).max(dest.height() / sh),
    };
    let (w, h) = (sw * scale, sh * scale);
    let center = dest.center();
    let drawn = Rect::from_center_size(center, (w, h));
    let clip = match fit {
        ImageFit::Contain => drawn,
        _ => dest,
    };
    Some((drawn, clip))
}

fn check_dims(width: u32, height: u32) -> ExportResult<()> {
    if width == 0 || height == 0 {
        return Err(ExportError::layout(format!(
            "surface dimensions must be >= 1 (got {width}x{height})"
        )));
    }
    if u64::from(width) * u64::from(height) * 4 > MAX_BYTES {
        return Err(ExportError::layout(format!(
            "surface allocation too large: {width}x{height}"
        )));
    }
    Ok(())
}

fn solid_paint(color: Rgba8) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}

fn bezpath_to_skia(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
