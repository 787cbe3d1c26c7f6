pub(crate) mod bubble;
pub(crate) mod composite;
pub(crate) mod overlay;
pub(crate) mod surface;
