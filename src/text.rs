pub(crate) mod measure;
pub(crate) mod raster;
pub(crate) mod wrap;
