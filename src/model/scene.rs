/// Opaque image reference carried by a scene.
///
/// The export core accepts `data:<mime>;base64,<payload>` URLs and resolver-relative paths; how a
/// reference turns into bytes is decided by the [`crate::ImageResolver`] passed to the export.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    /// Wrap a raw reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `true` for inline `data:` URLs.
    pub fn is_data_url(&self) -> bool {
        self.0.trim_start().starts_with("data:")
    }

    /// Return `true` when the reference is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// One narrative beat with its generated image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Stable ordinal assigned by the producer.
    pub id: u32,
    /// Narrative text (captions, manifest, document body).
    #[serde(default)]
    pub narrative: String,
    /// Prompt used to generate the image.
    #[serde(default, alias = "visualPrompt")]
    pub visual_prompt: String,
    /// Image reference; scenes without one are skipped by every export format.
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// Character names appearing in the scene.
    #[serde(default)]
    pub characters: Vec<String>,
}

impl Scene {
    /// Build a scene with an image reference and no characters.
    pub fn new(
        id: u32,
        narrative: impl Into<String>,
        visual_prompt: impl Into<String>,
        image: Option<ImageRef>,
    ) -> Self {
        Self {
            id,
            narrative: narrative.into(),
            visual_prompt: visual_prompt.into(),
            image,
            characters: Vec::new(),
        }
    }

    /// Return `true` when the scene carries a usable image reference.
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|r| !r.is_blank())
    }
}

/// Generation mode chosen by the editor; selects overlay treatment and raster layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Cinematic storyboard: gradient subtitles, long-strip raster.
    #[default]
    Storyboard,
    /// Comic page: caption bars, multi-panel sheet raster.
    Comic,
}

impl GenerationMode {
    /// Uppercase label used in rendered metadata lines.
    pub fn label(self) -> &'static str {
        match self {
            GenerationMode::Storyboard => "STORYBOARD",
            GenerationMode::Comic => "COMIC",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/scene.rs"]
mod tests;
