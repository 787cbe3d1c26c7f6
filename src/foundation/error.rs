/// Convenience result type used across scenepress.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error taxonomy used by export APIs.
///
/// Most runtime failures (undecodable images, failed overlays, unallocatable surfaces) are
/// absorbed by the export pipeline and degrade the artifact instead of surfacing here.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes could not be resolved or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Geometry or drawing-surface failures.
    #[error("layout error: {0}")]
    Layout(String),

    /// Artifact encoding failures (PNG, JPEG, PDF, ZIP).
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Build an [`ExportError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ExportError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`ExportError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build an [`ExportError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`ExportError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
