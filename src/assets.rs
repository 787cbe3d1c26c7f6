//! Resolving scene image references into decoded pixels.

pub(crate) mod batch;
pub(crate) mod decode;
pub(crate) mod resolve;
