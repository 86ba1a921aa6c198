//! The seam to the external renderer and the standalone tile renderer.

pub mod rasterizer;
pub mod tile_renderer;

// Re-export main types
pub use rasterizer::{LayerImage, RasterRequest, Rasterizer};
pub use tile_renderer::TileRenderer;
