use std::sync::Arc;

use crate::foundation::error::{ExportError, ExportResult};

/// Decode encoded image bytes (any format the `image` crate reads) into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> ExportResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ExportError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::decode("decoded image has zero dimensions"));
    }
    Ok(rgba)
}

/// Outcome of loading one scene image.
///
/// Loading never fails outright: anything that cannot be resolved or decoded becomes
/// [`LoadedImage::Unavailable`] and is rendered as a placeholder downstream.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadedImage {
    /// Decoded pixels.
    Decoded {
        /// Straight-alpha RGBA8 pixels.
        pixels: Arc<image::RgbaImage>,
        /// The bytes the pixels were decoded from; `None` once the pixels were modified.
        encoded: Option<Arc<[u8]>>,
    },
    /// The reference could not be resolved or decoded.
    Unavailable,
}

impl LoadedImage {
    /// Decode `bytes`, keeping them for pass-through export.
    pub fn decode(bytes: Vec<u8>) -> ExportResult<Self> {
        let pixels = decode_image(&bytes)?;
        Ok(Self::Decoded {
            pixels: Arc::new(pixels),
            encoded: Some(Arc::from(bytes)),
        })
    }

    /// Wrap freshly rendered pixels.
    pub fn from_pixels(pixels: image::RgbaImage) -> Self {
        Self::Decoded {
            pixels: Arc::new(pixels),
            encoded: None,
        }
    }

    /// Decoded pixels, if any.
    pub fn pixels(&self) -> Option<&image::RgbaImage> {
        match self {
            Self::Decoded { pixels, .. } => Some(pixels),
            Self::Unavailable => None,
        }
    }

    /// Original encoded bytes when the pixels are untouched.
    pub fn encoded(&self) -> Option<&[u8]> {
        match self {
            Self::Decoded { encoded, .. } => encoded.as_deref(),
            Self::Unavailable => None,
        }
    }

    /// Return `true` for decoded images.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Decoded { .. })
    }

    /// Width / height, or `None` when unavailable.
    pub fn native_ratio(&self) -> Option<f64> {
        let px = self.pixels()?;
        let (w, h) = px.dimensions();
        (w > 0 && h > 0).then(|| f64::from(w) / f64::from(h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
