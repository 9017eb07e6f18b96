pub mod compositor;
pub(crate) mod cpu;
pub mod decor;
pub mod output;
mod ritual;
pub mod surface;

pub use compositor::{ArtInput, CardCompositor, CardRaster, LayoutReport, RenderedCard};
