use crate::{
    core::{bounds::Extent, geo::TileCoord},
    data::feature::Feature,
    layers::base::LayerKey,
    Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// One tile's worth of features, in paint order
#[derive(Debug, Clone)]
pub struct RasterRequest<'a> {
    pub tile: TileCoord,
    /// Projected area the image covers
    pub extent: Extent,
    /// Map units per pixel
    pub resolution: f64,
    pub features: Vec<&'a Feature>,
}

impl<'a> RasterRequest<'a> {
    pub fn new(tile: TileCoord, features: Vec<&'a Feature>) -> Self {
        Self {
            tile,
            extent: tile.extent(),
            resolution: tile.resolution(),
            features,
        }
    }
}

/// The external renderer: turns styled features into an encoded tile image.
///
/// Returning an empty vector means the features produced no pixels.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, request: RasterRequest<'_>) -> Result<Vec<u8>>;
}

/// A layer's image for one tile of a render pass
#[derive(Debug, Clone)]
pub struct LayerImage {
    pub key: LayerKey,
    pub name: String,
    pub image: Arc<Vec<u8>>,
}
