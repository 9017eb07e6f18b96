//! Multi-card composites built from rendered card images.

pub mod cache;
pub mod fan;
pub mod grid;

pub use cache::RenderCache;
pub use fan::{FanLayout, FanSpec, compose_fan, render_fan};
pub use grid::{GridChoice, GridLayout, GridSpec, choose_grid, compose_grid, render_grid};
