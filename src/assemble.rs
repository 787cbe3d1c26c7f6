//! Format-specific artifact assembly.
//!
//! Every assembler takes the loaded (and possibly text-baked) scenes in export order and
//! returns an [`Artifact`]. Failures never propagate: an empty entry list or a drawing surface
//! that cannot be allocated produce an artifact with no bytes, logged at `warn`.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::LoadedImage,
    foundation::core::{Edges, PLACEHOLDER_GRAY, Rect, Rgba8},
    foundation::error::{ExportError, ExportResult},
    layout::grid::GridLayout,
    model::config::{AspectRatioPolicy, ExportFormat},
    model::scene::{GenerationMode, Scene},
    render::surface::{ImageFit, Surface},
};

pub(crate) mod bundle;
pub(crate) mod document;
pub(crate) mod sheet;
pub(crate) mod strip;

/// A named, encoded export result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// File name including extension.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub media_type: &'static str,
    /// Encoded content; empty when assembly degraded.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Artifact with the given content.
    pub fn new(file_name: impl Into<String>, media_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        }
    }

    /// Artifact with no content.
    pub fn empty(file_name: impl Into<String>, media_type: &'static str) -> Self {
        Self::new(file_name, media_type, Vec::new())
    }

    /// Return `true` when assembly produced no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact into `dir` (created if missing) and return the written path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> ExportResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write artifact '{}'", path.display()))?;
        Ok(path)
    }
}

/// One exported scene, ready for assembly.
#[derive(Clone, Debug)]
pub struct RenderEntry<'a> {
    /// 1-based position among exported scenes.
    pub ordinal: usize,
    /// Source scene.
    pub scene: &'a Scene,
    /// Loaded pixels, possibly with the narrative baked in.
    pub image: LoadedImage,
    /// The narrative is already drawn into `image`.
    pub text_baked: bool,
}

impl RenderEntry<'_> {
    /// Narrative to draw as a detached caption, if any.
    pub fn detached_caption(&self) -> Option<&str> {
        let text = self.scene.narrative.trim();
        (!self.text_baked && !text.is_empty()).then_some(text)
    }

    /// Panel ratio for this entry; baked images keep their native ratio so no text is cropped.
    pub fn panel_policy(&self, policy: AspectRatioPolicy) -> AspectRatioPolicy {
        if self.text_baked && self.image.is_available() {
            AspectRatioPolicy::Auto
        } else {
            policy
        }
    }
}

/// File name of the artifact `export` produces for `title`.
pub fn artifact_name(title: &str, format: ExportFormat, mode: GenerationMode) -> String {
    let suffix = match (format, mode) {
        (ExportFormat::Document, _) => document::FILE_SUFFIX,
        (ExportFormat::Bundle, _) => bundle::FILE_SUFFIX,
        (ExportFormat::CompositeRaster, GenerationMode::Comic) => sheet::FILE_SUFFIX,
        (ExportFormat::CompositeRaster, GenerationMode::Storyboard) => strip::FILE_SUFFIX,
    };
    format!("{}{suffix}", sanitize_title(title))
}

/// Replace whitespace runs with `_` so the title can be used in a file name.
pub fn sanitize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("_")
}

pub(crate) const PNG_MEDIA_TYPE: &str = "image/png";

pub(crate) fn encode_png(image: &image::RgbaImage) -> ExportResult<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExportError::encode(format!("png encode failed: {e}")))?;
    Ok(buf)
}

/// Draw an entry's image into `rect`, or the flat placeholder when it is unavailable.
///
/// Images with baked text are contain-fitted over `matte` so none of the text is cropped; the
/// rest cover the box.
pub(crate) fn draw_scene_image(
    surface: &mut Surface,
    entry: &RenderEntry<'_>,
    rect: Rect,
    matte: Rgba8,
) -> ExportResult<()> {
    let Some(px) = entry.image.pixels() else {
        surface.fill_rect(rect, PLACEHOLDER_GRAY);
        return Ok(());
    };
    if entry.text_baked {
        surface.fill_rect(rect, matte);
        surface.draw_image(px, rect, ImageFit::Contain)
    } else {
        surface.draw_image(px, rect, ImageFit::Cover)
    }
}

const GUIDE_PANEL: Rgba8 = [255, 0, 255, 255];
const GUIDE_MARGIN: Rgba8 = [0, 160, 255, 255];

/// Outline every panel, caption box and the margin box.
pub(crate) fn draw_guides(surface: &mut Surface, grid: &GridLayout, margins: Edges) {
    for cell in &grid.cells {
        surface.stroke_rect(cell.panel.to_rect(), 2.0, GUIDE_PANEL, None);
        if let Some(caption) = cell.caption {
            surface.stroke_rect(caption.to_rect(), 1.0, GUIDE_PANEL, Some([6.0, 4.0]));
        }
    }
    let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
    let content = Rect::new(
        f64::from(margins.left),
        f64::from(margins.top),
        w - f64::from(margins.right),
        h - f64::from(margins.bottom),
    );
    surface.stroke_rect(content, 2.0, GUIDE_MARGIN, Some([12.0, 8.0]));
}

/// Log and degrade an assembly failure to an empty artifact.
pub(crate) fn finish(
    file_name: String,
    media_type: &'static str,
    result: ExportResult<Vec<u8>>,
) -> Artifact {
    match result {
        Ok(bytes) => Artifact::new(file_name, media_type, bytes),
        Err(e) => {
            tracing::warn!(file = %file_name, error = %e, "assembly failed, producing empty artifact");
            Artifact::empty(file_name, media_type)
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/assemble/artifact.rs"]
mod tests;
