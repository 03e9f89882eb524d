//! CLI command implementations.

pub(crate) mod browse;
pub(crate) mod render;

pub(crate) use browse::BrowseArgs;
pub(crate) use render::RenderArgs;
