use crate::foundation::error::{ExportError, ExportResult};

pub use kurbo::{BezPath, Point, Rect};

/// Straight-alpha RGBA8 color as used in configuration files.
pub type Rgba8 = [u8; 4];

/// Opaque white.
pub const WHITE: Rgba8 = [255, 255, 255, 255];
/// Opaque black.
pub const BLACK: Rgba8 = [0, 0, 0, 255];
/// Flat fill used in place of images that failed to load.
pub const PLACEHOLDER_GRAY: Rgba8 = [204, 204, 204, 255];

/// Integer canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a validated size; both dimensions must be >= 1.
    pub fn new(width: u32, height: u32) -> ExportResult<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::layout(format!(
                "canvas dimensions must be >= 1 (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Axis-aligned integer rectangle in canvas pixel space (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Construct a rectangle from its origin and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Convert to floating-point geometry for drawing.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// Margin edges in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Top margin.
    #[serde(default)]
    pub top: u32,
    /// Left margin.
    #[serde(default)]
    pub left: u32,
    /// Right margin.
    #[serde(default)]
    pub right: u32,
    /// Bottom margin.
    #[serde(default)]
    pub bottom: u32,
}

impl Edges {
    /// Same margin on every edge.
    pub fn uniform(v: u32) -> Self {
        Self {
            top: v,
            left: v,
            right: v,
            bottom: v,
        }
    }

    /// Sum of left and right margins.
    pub fn horizontal(self) -> u32 {
        self.left.saturating_add(self.right)
    }
}

/// Multiply a straight-alpha color's channels by its alpha.
pub fn premul(c: Rgba8) -> Rgba8 {
    fn premul_channel(c: u8, a: u8) -> u8 {
        let c = u16::from(c);
        let a = u16::from(a);
        (((c * a) + 127) / 255) as u8
    }

    [
        premul_channel(c[0], c[3]),
        premul_channel(c[1], c[3]),
        premul_channel(c[2], c[3]),
        c[3],
    ]
}

/// Lowercase `#rrggbb` representation, alpha dropped.
pub fn hex_rgb(c: Rgba8) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
