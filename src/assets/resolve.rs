use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    foundation::error::{ExportError, ExportResult},
    model::scene::ImageRef,
};

/// Turns an [`ImageRef`] into encoded image bytes.
///
/// Implementations are shared across the decode workers of a single export, hence `Send + Sync`.
pub trait ImageResolver: Send + Sync {
    /// Fetch the encoded bytes behind `image`.
    fn resolve(&self, image: &ImageRef) -> ExportResult<Vec<u8>>;
}

/// Resolves inline data URLs and paths relative to a root directory.
#[derive(Clone, Debug)]
pub struct LocalResolver {
    root: PathBuf,
}

impl LocalResolver {
    /// Resolve relative references against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory references are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageResolver for LocalResolver {
    fn resolve(&self, image: &ImageRef) -> ExportResult<Vec<u8>> {
        if image.is_data_url() {
            return decode_data_url(image.as_str());
        }
        let raw = image.as_str().trim();
        if raw.contains("://") {
            return Err(ExportError::decode(format!(
                "unsupported image reference scheme: '{}'",
                scheme_of(raw)
            )));
        }

        let rel = normalize_rel_path(raw)?;
        let path = self.root.join(&rel);
        let bytes = std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// In-memory resolver keyed by the exact reference string; data URLs resolve without an entry.
#[derive(Clone, Debug, Default)]
pub struct MemoryResolver {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes for a reference, replacing any previous entry.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), bytes);
    }

    /// Builder-style [`MemoryResolver::insert`].
    pub fn with(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }
}

impl ImageResolver for MemoryResolver {
    fn resolve(&self, image: &ImageRef) -> ExportResult<Vec<u8>> {
        if let Some(bytes) = self.entries.get(image.as_str()) {
            return Ok(bytes.clone());
        }
        if image.is_data_url() {
            return decode_data_url(image.as_str());
        }
        Err(ExportError::decode("no image registered for reference"))
    }
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> ExportResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::decode("not a data url"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::decode("data url is missing its ',' separator"))?;

    if !header.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(ExportError::decode(
            "only base64-encoded data urls are supported",
        ));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ExportError::decode(format!("invalid base64 payload: {e}")))
}

/// Encode bytes as a base64 data URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Normalize a relative reference into a `/`-separated path without `.` or `..` segments.
pub(crate) fn normalize_rel_path(source: &str) -> ExportResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') || has_drive_prefix(&s) {
        return Err(ExportError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(ExportError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ExportError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ExportError::validation(
            "image path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

fn has_drive_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 2 && b[0].is_ascii_alphabetic() && b[1] == b':'
}

fn scheme_of(raw: &str) -> &str {
    raw.split_once("://").map_or("", |(scheme, _)| scheme)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
