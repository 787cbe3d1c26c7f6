use crate::foundation::core::{Rgba8, premul};
use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Vertical band parameters for [`fade_rows_in_place`].
#[derive(Clone, Copy, Debug)]
pub struct FadeBand {
    pub width: u32,
    pub height: u32,
    /// First row of the band (inclusive).
    pub y_start: u32,
    /// Straight-alpha color reached at the bottom row.
    pub color: Rgba8,
    /// Opacity at the last row; the first row is fully transparent.
    pub max_opacity: f32,
}

/// Blend a top-to-bottom linear ramp of `color` over rows `y_start..height`.
pub fn fade_rows_in_place(dst: &mut [u8], band: FadeBand) -> ExportResult<()> {
    let FadeBand {
        width,
        height,
        y_start,
        color,
        max_opacity,
    } = band;
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ExportError::layout("fade buffer size overflow"))?;
    if dst.len() != expected_len {
        return Err(ExportError::layout(
            "fade_rows_in_place expects a buffer matching width*height*4",
        ));
    }
    if y_start >= height {
        return Ok(());
    }

    let src = premul(color);
    let span = (height - y_start) as f32;
    let row_len = width as usize * 4;
    for y in y_start..height {
        let t = ((y - y_start) as f32 + 0.5) / span;
        let opacity = max_opacity.clamp(0.0, 1.0) * t;
        let row = &mut dst[y as usize * row_len..(y as usize + 1) * row_len];
        for px in row.chunks_exact_mut(4) {
            let out = over([px[0], px[1], px[2], px[3]], src, opacity);
            px.copy_from_slice(&out);
        }
    }
    Ok(())
}

pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn demultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
