//! Azoth card renderer.
//!
//! Turns card records plus provided or procedurally synthesized artwork into
//! print-ready rasters, and composes rendered cards into grid and fan images.
//!
//! - Describe a card with a [`CardRecord`]
//! - Build a [`CardCompositor`] from a [`RenderConfig`]
//! - Render to disk, or to memory with [`CardCompositor::render_raster`]
//! - Tile or fan many cards with [`layout::render_grid`] and [`layout::render_fan`]
#![forbid(unsafe_code)]

pub mod art;
pub mod assets;
pub mod config;
pub mod foundation;
pub mod layout;
pub mod model;
pub mod palette;
pub mod render;
pub mod text;
pub mod texture;

pub use crate::config::{RenderConfig, Thresholds};
pub use crate::foundation::core::{PixelRect, PixelSize, Rgba8, slug};
pub use crate::foundation::error::{AssetKind, AzothError, AzothResult};
pub use crate::foundation::rng::Rng64;
pub use crate::layout::{FanSpec, GridSpec, RenderCache};
pub use crate::model::{CardRecord, Renderable};
pub use crate::palette::{Category, PaletteMode, PaletteSet};
pub use crate::render::{ArtInput, CardCompositor, CardRaster, LayoutReport, RenderedCard};
pub use crate::texture::{
    basis::{BasisRegistry, BasisSet},
    synth::{GeneratedTextureParams, TextureSynthesizer},
};
