//! scenepress turns an ordered list of illustrated narrative scenes into distributable artifacts.
//!
//! # Pipeline overview
//!
//! 1. **Select**: scenes without an image reference are dropped; nothing left means no artifact.
//! 2. **Load**: every image reference is resolved and decoded as an independent task
//!    ([`ImageResolver`], [`LoadedImage`]). Failures become placeholders.
//! 3. **Bake** (optional): the narrative is drawn into each image, as a comic caption bar or a
//!    cinematic subtitle over a gradient ([`composite`]).
//! 4. **Assemble**: one of four formats is produced as an [`Artifact`]:
//!    a landscape PDF storyboard, a ZIP bundle with a text manifest, a multi-panel comic sheet
//!    PNG or a single-column long strip PNG.
//!
//! Text layout uses fixed-width character classes (see [`measure`] and [`wrap`]), so geometry
//! never depends on installed fonts. Every plan (`GridLayout`, `PageLayout`, `SheetPlan`,
//! `StripPlan`) is serializable and fingerprintable, which makes repeated exports comparable.
//!
//! # Getting started
//!
//! ```no_run
//! use scenepress::{ExportConfig, ExportFormat, GenerationMode, ImageRef, LocalResolver, Scene, export};
//!
//! let scenes = vec![Scene::new(0, "She opens the door.", "a door at night", Some(ImageRef::new("door.png")))];
//! let config = ExportConfig::new(ExportFormat::CompositeRaster, true);
//! let resolver = LocalResolver::new("assets");
//! if let Some(artifact) = export(&scenes, &config, "My Story", GenerationMode::Comic, &resolver)? {
//!     artifact.write_to_dir("out")?;
//! }
//! # Ok::<(), scenepress::ExportError>(())
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assemble;
mod assets;
mod export;
mod foundation;
mod layout;
mod model;
mod render;
mod text;

pub use assemble::bundle::{MANIFEST_DELIMITER, MANIFEST_NAME, assemble_bundle, entry_file_name, manifest};
pub use assemble::document::{PageLayout, assemble_document, page_title, plan_page};
pub use assemble::sheet::{SheetPlan, assemble_sheet, plan_sheet};
pub use assemble::strip::{StripPlan, assemble_strip, plan_strip};
pub use assemble::{Artifact, RenderEntry, artifact_name, sanitize_title};
pub use assets::batch::load_scene_images;
pub use assets::decode::{LoadedImage, decode_image};
pub use assets::resolve::{
    ImageResolver, LocalResolver, MemoryResolver, decode_data_url, encode_data_url,
};
pub use export::{ExportPlan, LayoutPlan, export, plan_export};
pub use foundation::core::{
    BLACK, BezPath, CanvasSize, Edges, PLACEHOLDER_GRAY, PixelRect, Point, Rect, Rgba8, WHITE,
};
pub use foundation::error::{ExportError, ExportResult};
pub use layout::geometry::{FALLBACK_INVERSE_RATIO, inverse_ratio, panel_height};
pub use layout::grid::{GridCell, GridItem, GridLayout, GridSpec, layout_grid};
pub use model::config::{
    AspectRatioPolicy, BorderStyle, BubbleConfig, BubblePosition, BubbleStyle, CaptionPlacement,
    DocumentConfig, ExportConfig, ExportFormat, ExportOptions, ExportThreading, FontConfig,
    PanelLayoutConfig, SheetConfig, StripConfig,
};
pub use model::scene::{GenerationMode, ImageRef, Scene};
pub use render::bubble::{BUBBLE_MARGIN, BubbleLayout, bubble_path, draw_bubble, layout_bubble};
pub use render::overlay::{caption_bar_height, composite};
pub use render::surface::{ImageFit, Surface};
pub use text::measure::{FontSpec, LINE_HEIGHT_FACTOR, char_width, measure};
pub use text::raster::{TextAlign, TextRasterizer, TextShadow, TextStyle};
pub use text::wrap::{WrappedText, wrap};
