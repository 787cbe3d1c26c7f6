//! Export orchestration: scene filtering, image loading, text baking and format dispatch.

use crate::{
    assemble::{
        Artifact, RenderEntry, artifact_name,
        bundle::{MANIFEST_NAME, assemble_bundle, entry_file_name},
        document::{PageLayout, assemble_document, page_title, plan_page},
        sheet::{SheetPlan, assemble_sheet, plan_sheet},
        strip::{StripPlan, assemble_strip, plan_strip},
    },
    assets::{
        batch::{fan_out, load_scene_images},
        decode::LoadedImage,
        resolve::ImageResolver,
    },
    foundation::error::ExportResult,
    foundation::math::fingerprint_of,
    model::config::{ExportConfig, ExportFormat},
    model::scene::{GenerationMode, Scene},
    render::overlay::bake_text,
    text::raster::TextRasterizer,
};

/// Export `scenes` into a single artifact.
///
/// Scenes without an image reference are skipped; when none remain the call is a no-op and
/// returns `Ok(None)`. Image and drawing failures degrade the artifact instead of failing the
/// call, so only invalid configuration is reported as an error.
#[tracing::instrument(
    skip(scenes, config, resolver),
    fields(scenes = scenes.len(), format = ?config.format, with_text = config.with_text)
)]
pub fn export(
    scenes: &[Scene],
    config: &ExportConfig,
    title: &str,
    mode: GenerationMode,
    resolver: &dyn ImageResolver,
) -> ExportResult<Option<Artifact>> {
    config.validate()?;
    let selected = select_scenes(scenes);
    if selected.is_empty() {
        tracing::info!("no scenes with images, nothing to export");
        return Ok(None);
    }

    let text = TextRasterizer::new(&config.options.fonts);
    let entries = prepare_entries(&selected, config, mode, resolver, &text)?;
    let options = &config.options;

    let artifact = match config.format {
        ExportFormat::Document => assemble_document(&entries, title, &options.document, &text),
        ExportFormat::Bundle => assemble_bundle(&entries, title),
        ExportFormat::CompositeRaster => match mode {
            GenerationMode::Comic => assemble_sheet(
                &entries,
                title,
                mode,
                &options.sheet,
                options.debug_guides,
                &text,
            ),
            GenerationMode::Storyboard => {
                assemble_strip(&entries, title, &options.strip, options.debug_guides, &text)
            }
        },
    };

    tracing::info!(
        file = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "export finished"
    );
    Ok(Some(artifact))
}

/// Layout an export would produce, without assembling the artifact.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportPlan {
    /// Name of the artifact `export` would return.
    pub file_name: String,
    /// Number of exported scenes.
    pub scenes: usize,
    /// Format-specific geometry.
    pub layout: LayoutPlan,
}

/// Format-specific part of an [`ExportPlan`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutPlan {
    /// One page per scene.
    Document {
        /// Page geometry in points.
        pages: Vec<PageLayout>,
    },
    /// Archive contents.
    Bundle {
        /// Entry names, manifest last.
        files: Vec<String>,
    },
    /// Comic sheet.
    Sheet(SheetPlan),
    /// Long strip.
    Strip(StripPlan),
}

impl ExportPlan {
    /// Stable hash of the plan.
    pub fn fingerprint(&self) -> ExportResult<u64> {
        fingerprint_of(self)
    }
}

/// Run every step of [`export`] up to, but excluding, artifact assembly.
///
/// Images are still loaded (panel sizes depend on their ratios) and text is still baked (it
/// decides between baked and detached captions).
#[tracing::instrument(skip(scenes, config, resolver), fields(scenes = scenes.len()))]
pub fn plan_export(
    scenes: &[Scene],
    config: &ExportConfig,
    title: &str,
    mode: GenerationMode,
    resolver: &dyn ImageResolver,
) -> ExportResult<Option<ExportPlan>> {
    config.validate()?;
    let selected = select_scenes(scenes);
    if selected.is_empty() {
        return Ok(None);
    }

    let text = TextRasterizer::new(&config.options.fonts);
    let entries = prepare_entries(&selected, config, mode, resolver, &text)?;
    let options = &config.options;

    let layout = match config.format {
        ExportFormat::Document => LayoutPlan::Document {
            pages: entries
                .iter()
                .map(|e| {
                    plan_page(
                        &page_title(title, e.ordinal),
                        &e.scene.narrative,
                        e.image.native_ratio(),
                        &options.document,
                    )
                })
                .collect(),
        },
        ExportFormat::Bundle => LayoutPlan::Bundle {
            files: entries
                .iter()
                .map(entry_file_name)
                .chain(std::iter::once(
                    MANIFEST_NAME.to_string(),
                ))
                .collect(),
        },
        ExportFormat::CompositeRaster => match mode {
            GenerationMode::Comic => {
                LayoutPlan::Sheet(plan_sheet(&entries, title, mode, &options.sheet)?)
            }
            GenerationMode::Storyboard => {
                LayoutPlan::Strip(plan_strip(&entries, title, &options.strip)?)
            }
        },
    };

    Ok(Some(ExportPlan {
        file_name: artifact_name(title, config.format, mode),
        scenes: entries.len(),
        layout,
    }))
}

fn select_scenes(scenes: &[Scene]) -> Vec<&Scene> {
    let selected: Vec<&Scene> = scenes.iter().filter(|s| s.has_image()).collect();
    if selected.len() < scenes.len() {
        tracing::debug!(
            skipped = scenes.len() - selected.len(),
            "skipping scenes without an image"
        );
    }
    selected
}

/// Load images (fan-out/fan-in), bake narratives when requested and number the survivors.
fn prepare_entries<'a>(
    selected: &[&'a Scene],
    config: &ExportConfig,
    mode: GenerationMode,
    resolver: &dyn ImageResolver,
    text: &TextRasterizer,
) -> ExportResult<Vec<RenderEntry<'a>>> {
    let threading = &config.options.threading;
    let images = load_scene_images(selected, resolver, threading)?;

    let prepared: Vec<(LoadedImage, bool)> = if config.with_text {
        fan_out(&images, threading, |i, image| {
            match bake_text(image, &selected[i].narrative, mode, text) {
                Some(baked) => (baked, true),
                None => (image.clone(), false),
            }
        })?
    } else {
        images.into_iter().map(|image| (image, false)).collect()
    };

    Ok(selected
        .iter()
        .zip(prepared)
        .enumerate()
        .map(|(i, (&scene, (image, text_baked)))| RenderEntry {
            ordinal: i + 1,
            scene,
            image,
            text_baked,
        })
        .collect())
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
