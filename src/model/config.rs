use std::path::PathBuf;

use crate::{
    foundation::core::{BLACK, Edges, Rgba8, WHITE},
    foundation::error::{ExportError, ExportResult},
    model::scene::GenerationMode,
};

/// Artifact family produced by an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Paginated landscape PDF, one page per scene.
    Document,
    /// ZIP archive of per-scene images plus `script.txt`.
    Bundle,
    /// Single PNG: comic sheet or long strip depending on [`GenerationMode`].
    CompositeRaster,
}

/// User-chosen export configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    /// Output format.
    pub format: ExportFormat,
    /// Bake narrative text into every image before assembly.
    #[serde(default, alias = "withText")]
    pub with_text: bool,
    /// Layout and rendering knobs; every field has a documented default.
    #[serde(default)]
    pub options: ExportOptions,
}

impl ExportConfig {
    /// Config with default options.
    pub fn new(format: ExportFormat, with_text: bool) -> Self {
        Self {
            format,
            with_text,
            options: ExportOptions::default(),
        }
    }

    /// Validate every nested option block.
    pub fn validate(&self) -> ExportResult<()> {
        self.options.validate()
    }
}

/// Nested option blocks, one per assembler plus shared concerns.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Comic sheet raster.
    pub sheet: SheetConfig,
    /// Long strip raster.
    pub strip: StripConfig,
    /// Paginated document.
    pub document: DocumentConfig,
    /// Font lookup for rasterized text.
    pub fonts: FontConfig,
    /// Image decode and overlay fan-out.
    pub threading: ExportThreading,
    /// Outline panels and margins on raster outputs.
    pub debug_guides: bool,
}

impl ExportOptions {
    /// Validate every nested option block.
    pub fn validate(&self) -> ExportResult<()> {
        self.sheet.validate()?;
        self.strip.validate()?;
        self.document.validate()?;
        self.threading.validate()?;
        Ok(())
    }
}

/// Panel aspect-ratio policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatioPolicy {
    /// 1:1.
    #[serde(rename = "1:1")]
    Square,
    /// 4:3.
    #[serde(rename = "4:3")]
    Landscape4x3,
    /// 16:9.
    #[serde(rename = "16:9")]
    Widescreen16x9,
    /// 3:4.
    #[serde(rename = "3:4")]
    Portrait3x4,
    /// 9:16.
    #[serde(rename = "9:16")]
    Tall9x16,
    /// Use each image's native ratio (4:3 when unknown).
    #[serde(rename = "auto")]
    Auto,
}

impl AspectRatioPolicy {
    /// Default panel ratio for a generation mode.
    pub fn default_for(mode: GenerationMode) -> Self {
        match mode {
            GenerationMode::Comic => AspectRatioPolicy::Landscape4x3,
            GenerationMode::Storyboard => AspectRatioPolicy::Widescreen16x9,
        }
    }

    /// Short label, e.g. `16:9`.
    pub fn label(self) -> &'static str {
        match self {
            AspectRatioPolicy::Square => "1:1",
            AspectRatioPolicy::Landscape4x3 => "4:3",
            AspectRatioPolicy::Widescreen16x9 => "16:9",
            AspectRatioPolicy::Portrait3x4 => "3:4",
            AspectRatioPolicy::Tall9x16 => "9:16",
            AspectRatioPolicy::Auto => "auto",
        }
    }
}

/// Panel border style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    /// No border.
    None,
    /// Continuous stroke.
    #[default]
    Solid,
    /// Dashed stroke.
    Dashed,
}

/// Where detached narrative text goes on a comic sheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPlacement {
    /// Wrapped text block directly below the panel.
    #[default]
    Below,
    /// Speech bubble inside the panel.
    Bubble,
}

/// Grid layout knobs for multi-panel rasters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PanelLayoutConfig {
    /// Column count (>= 1).
    pub columns: u32,
    /// Page margins. The sheet header band sits above `margins.top`.
    pub margins: Edges,
    /// Gap between panels, both axes.
    pub spacing: u32,
    /// Panel ratio; `None` uses the generation mode's default.
    pub aspect_ratio: Option<AspectRatioPolicy>,
    /// Stretch every panel in a row to the row's tallest panel.
    pub uniform_row_height: bool,
    /// Panel border style.
    pub border: BorderStyle,
    /// Panel border width in pixels.
    pub border_width: u32,
    /// Draw circular ordinal badges.
    pub show_numbers: bool,
    /// Detached caption font size in pixels.
    pub caption_font_size: f32,
    /// Gap between a panel and its detached caption.
    pub caption_gap: u32,
    /// Detached caption placement.
    pub caption_placement: CaptionPlacement,
}

impl Default for PanelLayoutConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            margins: Edges {
                top: 60,
                left: 100,
                right: 100,
                bottom: 100,
            },
            spacing: 48,
            aspect_ratio: None,
            uniform_row_height: false,
            border: BorderStyle::Solid,
            border_width: 6,
            show_numbers: true,
            caption_font_size: 30.0,
            caption_gap: 16,
            caption_placement: CaptionPlacement::Below,
        }
    }
}

impl PanelLayoutConfig {
    /// Resolve the ratio policy for a mode.
    pub fn aspect_ratio_for(&self, mode: GenerationMode) -> AspectRatioPolicy {
        self.aspect_ratio
            .unwrap_or_else(|| AspectRatioPolicy::default_for(mode))
    }

    fn validate(&self) -> ExportResult<()> {
        if self.columns == 0 {
            return Err(ExportError::validation("panel columns must be >= 1"));
        }
        validate_font_size("panel caption_font_size", self.caption_font_size)
    }
}

/// Bubble anchor policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubblePosition {
    /// Center tall bubbles, otherwise top-left.
    #[default]
    Auto,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Panel center.
    Center,
}

/// Bubble shape variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleStyle {
    /// Rounded rectangle.
    #[default]
    Modern,
    /// Rounded rectangle.
    Japanese,
    /// Square-cornered rectangle with a small triangular tail.
    American,
}

/// Speech bubble appearance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    /// Anchor policy.
    pub position: BubblePosition,
    /// Shape variant.
    pub style: BubbleStyle,
    /// Font size in pixels.
    pub font_size: f32,
    /// Inner padding in pixels.
    pub padding: f32,
    /// Corner radius for rounded variants.
    pub corner_radius: f32,
    /// Border width; 0 disables the border.
    pub border_width: f32,
    /// Border color.
    pub border_color: Rgba8,
    /// Fill color.
    pub fill_color: Rgba8,
    /// Text color.
    pub text_color: Rgba8,
    /// Draw an offset drop shadow under the shape.
    pub shadow: bool,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            position: BubblePosition::Auto,
            style: BubbleStyle::Modern,
            font_size: 24.0,
            padding: 14.0,
            corner_radius: 16.0,
            border_width: 3.0,
            border_color: BLACK,
            fill_color: WHITE,
            text_color: BLACK,
            shadow: true,
        }
    }
}

impl BubbleConfig {
    fn validate(&self) -> ExportResult<()> {
        validate_font_size("bubble font_size", self.font_size)?;
        for (name, v) in [
            ("bubble padding", self.padding),
            ("bubble corner_radius", self.corner_radius),
            ("bubble border_width", self.border_width),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ExportError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Comic sheet canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Canvas width in pixels (A4 at 300 dpi by default).
    pub canvas_width: u32,
    /// Header band height holding the title and metadata line.
    pub header_height: u32,
    /// Title font size.
    pub title_font_size: f32,
    /// Metadata line font size.
    pub meta_font_size: f32,
    /// Canvas background.
    pub background: Rgba8,
    /// Borders, header text and caption text.
    pub ink: Rgba8,
    /// Panel drop-shadow offset; 0 disables the shadow.
    pub shadow_offset: u32,
    /// Panel drop-shadow color.
    pub shadow_color: Rgba8,
    /// Ordinal badge radius.
    pub badge_radius: f32,
    /// Grid layout.
    pub panel: PanelLayoutConfig,
    /// Bubble appearance for [`CaptionPlacement::Bubble`].
    pub bubble: BubbleConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            canvas_width: 2480,
            header_height: 220,
            title_font_size: 72.0,
            meta_font_size: 32.0,
            background: WHITE,
            ink: BLACK,
            shadow_offset: 12,
            shadow_color: [0, 0, 0, 70],
            badge_radius: 30.0,
            panel: PanelLayoutConfig::default(),
            bubble: BubbleConfig::default(),
        }
    }
}

impl SheetConfig {
    fn validate(&self) -> ExportResult<()> {
        if self.canvas_width == 0 {
            return Err(ExportError::validation("sheet canvas_width must be >= 1"));
        }
        validate_font_size("sheet title_font_size", self.title_font_size)?;
        validate_font_size("sheet meta_font_size", self.meta_font_size)?;
        if !self.badge_radius.is_finite() || self.badge_radius < 0.0 {
            return Err(ExportError::validation(
                "sheet badge_radius must be finite and >= 0",
            ));
        }
        self.panel.validate()?;
        self.bubble.validate()
    }
}

/// Long strip canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Canvas width in pixels; every image is scaled to this width.
    pub width: u32,
    /// Title font size.
    pub title_font_size: f32,
    /// Padding around the title band.
    pub title_padding: u32,
    /// Detached caption font size.
    pub caption_font_size: f32,
    /// Padding around each detached caption.
    pub caption_padding: u32,
    /// Canvas background.
    pub background: Rgba8,
    /// Title color.
    pub title_color: Rgba8,
    /// Caption color.
    pub caption_color: Rgba8,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            title_font_size: 48.0,
            title_padding: 40,
            caption_font_size: 32.0,
            caption_padding: 24,
            background: WHITE,
            title_color: BLACK,
            caption_color: [34, 34, 34, 255],
        }
    }
}

impl StripConfig {
    fn validate(&self) -> ExportResult<()> {
        if self.width == 0 {
            return Err(ExportError::validation("strip width must be >= 1"));
        }
        if self.caption_padding.saturating_mul(2) >= self.width {
            return Err(ExportError::validation(
                "strip caption_padding leaves no room for text",
            ));
        }
        validate_font_size("strip title_font_size", self.title_font_size)?;
        validate_font_size("strip caption_font_size", self.caption_font_size)
    }
}

/// Paginated document geometry, in PDF points (1/72 inch).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Page width (landscape A4 by default).
    pub page_width_pt: f64,
    /// Page height.
    pub page_height_pt: f64,
    /// Margin on every edge.
    pub margin_pt: f64,
    /// Title block font size.
    pub title_font_pt: f32,
    /// Narrative block font size.
    pub narrative_font_pt: f32,
    /// Vertical gap between blocks.
    pub block_gap_pt: f64,
    /// Pixels per point for rasterized text blocks.
    pub raster_scale: f32,
    /// JPEG quality for embedded scene images.
    pub jpeg_quality: u8,
    /// Text color.
    pub text_color: Rgba8,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            page_width_pt: 842.0,
            page_height_pt: 595.0,
            margin_pt: 36.0,
            title_font_pt: 20.0,
            narrative_font_pt: 12.0,
            block_gap_pt: 12.0,
            raster_scale: 2.0,
            jpeg_quality: 88,
            text_color: BLACK,
        }
    }
}

impl DocumentConfig {
    /// Width available to blocks between the side margins.
    pub fn content_width_pt(&self) -> f64 {
        self.page_width_pt - 2.0 * self.margin_pt
    }

    fn validate(&self) -> ExportResult<()> {
        if !(self.page_width_pt.is_finite() && self.page_height_pt.is_finite())
            || self.page_width_pt <= 0.0
            || self.page_height_pt <= 0.0
        {
            return Err(ExportError::validation(
                "document page size must be finite and > 0",
            ));
        }
        if !self.margin_pt.is_finite()
            || self.margin_pt < 0.0
            || 2.0 * self.margin_pt >= self.page_width_pt.min(self.page_height_pt)
        {
            return Err(ExportError::validation(
                "document margin_pt must be >= 0 and leave room for content",
            ));
        }
        if !self.block_gap_pt.is_finite() || self.block_gap_pt < 0.0 {
            return Err(ExportError::validation(
                "document block_gap_pt must be finite and >= 0",
            ));
        }
        if !self.raster_scale.is_finite() || self.raster_scale <= 0.0 {
            return Err(ExportError::validation(
                "document raster_scale must be finite and > 0",
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ExportError::validation(
                "document jpeg_quality must be in 1..=100",
            ));
        }
        validate_font_size("document title_font_pt", self.title_font_pt)?;
        validate_font_size("document narrative_font_pt", self.narrative_font_pt)
    }
}

/// Font lookup for rasterized text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Preferred families, first match wins.
    pub families: Vec<String>,
    /// Extra font files loaded before rendering.
    pub font_files: Vec<PathBuf>,
    /// Extra font directories loaded before rendering.
    pub font_dirs: Vec<PathBuf>,
    /// Also load the platform's installed fonts.
    pub load_system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            families: [
                "Noto Sans CJK SC",
                "Source Han Sans SC",
                "PingFang SC",
                "Microsoft YaHei",
                "sans-serif",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            font_files: Vec::new(),
            font_dirs: Vec::new(),
            load_system_fonts: true,
        }
    }
}

/// Fan-out settings for image decode and overlay tasks.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportThreading {
    /// Run per-scene tasks on a call-local rayon pool.
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for ExportThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

impl ExportThreading {
    pub(crate) fn validate(&self) -> ExportResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ExportError::validation(
                "export threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

fn validate_font_size(name: &str, v: f32) -> ExportResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ExportError::validation(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/config.rs"]
mod tests;
