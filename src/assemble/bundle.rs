use std::io::{Cursor, Write};

use anyhow::Context;
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

use crate::{
    assemble::{Artifact, RenderEntry, encode_png, finish, sanitize_title},
    foundation::core::PLACEHOLDER_GRAY,
    foundation::error::ExportResult,
};

pub(crate) const ZIP_MEDIA_TYPE: &str = "application/zip";
pub(crate) const FILE_SUFFIX: &str = "_Assets.zip";

/// Name of the manifest file inside the bundle.
pub const MANIFEST_NAME: &str = "script.txt";
/// Line closing every manifest entry.
pub const MANIFEST_DELIMITER: &str = "-------------------";

const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);

/// Build a ZIP with one `Scene_NN.<ext>` image per entry and the text manifest.
#[tracing::instrument(skip_all, fields(entries = entries.len()))]
pub fn assemble_bundle(entries: &[RenderEntry<'_>], title: &str) -> Artifact {
    let file_name = format!("{}{FILE_SUFFIX}", sanitize_title(title));
    if entries.is_empty() {
        tracing::warn!("no renderable scenes, producing empty bundle");
        return Artifact::empty(file_name, ZIP_MEDIA_TYPE);
    }
    finish(file_name, ZIP_MEDIA_TYPE, build_zip(entries))
}

fn build_zip(entries: &[RenderEntry<'_>]) -> ExportResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        let name = entry_file_name(entry);
        let bytes = entry_bytes(entry)?;
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("start bundle entry '{name}'"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("write bundle entry '{name}'"))?;
    }

    zip.start_file(MANIFEST_NAME, options)
        .context("start bundle manifest")?;
    zip.write_all(manifest(entries).as_bytes())
        .context("write bundle manifest")?;

    let cursor = zip.finish().context("finish bundle archive")?;
    Ok(cursor.into_inner())
}

/// Manifest text: ordinal, visual prompt and narrative per entry, each closed by the delimiter.
pub fn manifest(entries: &[RenderEntry<'_>]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "SCENE {}\nVISUAL: {}\nNARRATIVE: {}\n{MANIFEST_DELIMITER}\n",
                e.ordinal, e.scene.visual_prompt, e.scene.narrative
            )
        })
        .collect()
}

/// `Scene_NN.<ext>` name of an entry's image inside the bundle.
pub fn entry_file_name(entry: &RenderEntry<'_>) -> String {
    let ext = entry
        .image
        .encoded()
        .and_then(passthrough_extension)
        .unwrap_or("png");
    format!("Scene_{:02}.{ext}", entry.ordinal)
}

/// Untouched images keep their original bytes; redrawn or missing ones are written as PNG.
fn entry_bytes(entry: &RenderEntry<'_>) -> ExportResult<Vec<u8>> {
    if let Some(bytes) = entry.image.encoded()
        && passthrough_extension(bytes).is_some()
    {
        return Ok(bytes.to_vec());
    }
    match entry.image.pixels() {
        Some(px) => encode_png(px),
        None => {
            let (w, h) = PLACEHOLDER_SIZE;
            encode_png(&image::RgbaImage::from_pixel(w, h, image::Rgba(PLACEHOLDER_GRAY)))
        }
    }
}

fn passthrough_extension(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => Some("png"),
        image::ImageFormat::Jpeg => Some("jpg"),
        image::ImageFormat::WebP => Some("webp"),
        image::ImageFormat::Gif => Some("gif"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/bundle.rs"]
mod tests;
