//! Offline tile generation over a fixed set of map objects.
//!
//! A [`TileRenderer`] is built once per object set and never changes
//! afterwards, so tile renders and queries can run concurrently. To render a
//! different set, build a new renderer.

use crate::{
    core::{bounds::Extent, coordinates::Wgs84Coordinate, geo::TileCoord},
    data::feature::{to_features, Feature},
    layers::{
        base::rasterize_features,
        handler::VisibilityFilter,
        performance::{FilteredIndexedProvider, RasterizingLayer},
    },
    objects::MapObject,
    rendering::rasterizer::Rasterizer,
    MapError, Result,
};
use futures::future::try_join_all;
use log::debug;
use std::sync::Arc;

pub struct TileRenderer {
    layer: RasterizingLayer,
    rasterizer: Arc<dyn Rasterizer>,
}

impl TileRenderer {
    pub fn new(
        objects: &[Arc<MapObject>],
        filter: Option<VisibilityFilter>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> std::result::Result<Self, MapError> {
        let mut provider = FilteredIndexedProvider::new(to_features(objects)?, 0);
        provider.set_filter(filter);
        debug!("tile renderer built over {} objects", provider.len());

        Ok(Self {
            layer: RasterizingLayer::new(provider, crate::constants::DEFAULT_TILE_CACHE_CAPACITY),
            rasterizer,
        })
    }

    /// Image for the tile at `col`/`row`/`level`. An empty vector means the
    /// tile has no content.
    pub async fn render_tile(&self, col: u32, row: u32, level: u8) -> Result<Vec<u8>> {
        let tile = checked_tile(col, row, level)?;
        let image = self.layer.render_tile(tile, self.rasterizer.as_ref()).await?;
        Ok(image.map(|image| image.as_ref().clone()).unwrap_or_default())
    }

    /// Renders several tiles concurrently, results in input order
    pub async fn render_tiles(&self, tiles: &[TileCoord]) -> Result<Vec<Vec<u8>>> {
        try_join_all(
            tiles
                .iter()
                .map(|tile| self.render_tile(tile.col, tile.row, tile.level)),
        )
        .await
    }

    /// Objects touching the box spanned by two WGS84 corners that are
    /// visible at `resolution`, in paint order.
    pub async fn query(
        &self,
        top_left: Wgs84Coordinate,
        bottom_right: Wgs84Coordinate,
        resolution: f64,
    ) -> Vec<Arc<MapObject>> {
        let extent = Extent::new(
            top_left.to_web_mercator().to_point(),
            bottom_right.to_web_mercator().to_point(),
        );

        self.layer
            .provider()
            .fetch(&extent, resolution)
            .into_iter()
            .map(|f| Arc::clone(f.map_object()))
            .collect()
    }

    /// Renders `objects` into one tile without keeping a renderer around.
    pub async fn render_once(
        objects: &[Arc<MapObject>],
        col: u32,
        row: u32,
        level: u8,
        rasterizer: &dyn Rasterizer,
    ) -> Result<Vec<u8>> {
        let tile = checked_tile(col, row, level)?;
        let mut features = to_features(objects)?;
        features.sort_by_key(Feature::rendering_order);

        let extent = tile.fetch_extent();
        let visible = features
            .iter()
            .filter(|f| f.extent().is_some_and(|e| e.intersects(&extent)))
            .collect();

        Ok(rasterize_features(tile, visible, rasterizer).await?.unwrap_or_default())
    }
}

fn checked_tile(col: u32, row: u32, level: u8) -> std::result::Result<TileCoord, MapError> {
    let tile = TileCoord::new(col, row, level);
    if tile.is_valid() {
        Ok(tile)
    } else {
        Err(MapError::Tile(format!("tile {level}/{col}/{row} is outside the pyramid")))
    }
}
