//! Large user layers: an R-tree backed feature provider wrapped by a layer
//! that rasterizes tiles on demand and caches them.
//!
//! Nothing here is edited in place. Any change to the feature set builds a
//! new provider and a new tile cache.

use crate::{
    core::{bounds::Extent, constants::DEFAULT_TILE_CACHE_CAPACITY, geo::TileCoord},
    data::feature::Feature,
    layers::{
        base::{rasterize_features, Layer, LayerContent},
        handler::{HandlerKind, LayerHandler, VisibilityFilter},
    },
    objects::MapObject,
    rendering::rasterizer::Rasterizer,
    spatial::index::{SpatialIndex, SpatialItem},
    tiles::cache::TileCache,
    Result,
};
use log::debug;
use std::sync::Arc;

/// Spatially indexed features with an optional visibility filter hook
pub struct FilteredIndexedProvider {
    z_index: i32,
    features: Vec<Feature>,
    /// Positions into `features`
    index: SpatialIndex<usize>,
    filter: Option<VisibilityFilter>,
}

impl FilteredIndexedProvider {
    pub fn new(features: Vec<Feature>, z_index: i32) -> Self {
        let items = features
            .iter()
            .enumerate()
            .filter_map(|(seq, f)| f.extent().map(|extent| SpatialItem::new(extent, seq)))
            .collect();

        let index = SpatialIndex::bulk_load(items);
        if index.len() < features.len() {
            debug!(
                "user_{z_index}: {} of {} features have no extent and are never drawn",
                features.len() - index.len(),
                features.len()
            );
        }

        Self {
            z_index,
            index,
            features,
            filter: None,
        }
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Extent covering every indexed feature
    pub fn extent(&self) -> Option<Extent> {
        self.index.bounds()
    }

    pub fn set_filter(&mut self, filter: Option<VisibilityFilter>) {
        self.filter = filter;
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Features touching `extent` that pass the filter, ordered by rendering
    /// order and then by insertion order.
    pub fn fetch(&self, extent: &Extent, resolution: f64) -> Vec<&Feature> {
        let mut hits: Vec<usize> = self
            .index
            .query(extent)
            .into_iter()
            .map(|item| item.data)
            .filter(|&seq| match &self.filter {
                Some(filter) => filter(self.features[seq].map_object(), resolution),
                None => true,
            })
            .collect();

        hits.sort_by_key(|&seq| (self.features[seq].rendering_order(), seq));
        hits.into_iter().map(|seq| &self.features[seq]).collect()
    }
}

/// Renders its provider into tiles, caching each rendered tile
pub struct RasterizingLayer {
    provider: FilteredIndexedProvider,
    cache: TileCache,
}

impl RasterizingLayer {
    pub fn new(provider: FilteredIndexedProvider, cache_capacity: usize) -> Self {
        Self {
            provider,
            cache: TileCache::new(cache_capacity),
        }
    }

    pub fn provider(&self) -> &FilteredIndexedProvider {
        &self.provider
    }

    pub fn len(&self) -> usize {
        self.provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_empty()
    }

    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    /// Replaces the filter and drops every tile rendered under the old one
    pub fn set_filter(&mut self, filter: Option<VisibilityFilter>) {
        self.provider.set_filter(filter);
        self.cache.clear();
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub async fn render_tile(
        &self,
        tile: TileCoord,
        rasterizer: &dyn Rasterizer,
    ) -> Result<Option<Arc<Vec<u8>>>> {
        if let Some(image) = self.cache.get(&tile) {
            return Ok(Some(image));
        }

        let features = self.provider.fetch(&tile.fetch_extent(), tile.resolution());
        let image = rasterize_features(tile, features, rasterizer).await?;
        Ok(image.map(|image| self.cache.insert(tile, image)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PerformanceHandler {
    cache_capacity: usize,
}

impl PerformanceHandler {
    pub fn new(cache_capacity: usize) -> Self {
        Self { cache_capacity }
    }

    fn rasterizing<'a>(&self, layer: &'a Layer) -> Option<&'a RasterizingLayer> {
        if !self.can_handle(layer) {
            return None;
        }
        match layer.content() {
            LayerContent::Rasterizing(rasterizing) => Some(rasterizing),
            _ => None,
        }
    }
}

impl Default for PerformanceHandler {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_CACHE_CAPACITY)
    }
}

impl LayerHandler for PerformanceHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Performance
    }

    fn create_layer(&self, features: Vec<Feature>, z_index: i32) -> Layer {
        debug!("indexing {} features for user_{}", features.len(), z_index);
        let provider = FilteredIndexedProvider::new(features, z_index);
        Layer::user(
            z_index,
            HandlerKind::Performance,
            LayerContent::Rasterizing(RasterizingLayer::new(provider, self.cache_capacity)),
        )
    }

    fn try_remove(&self, layer: &Layer, object: &MapObject) -> Option<Vec<Feature>> {
        let features = self.rasterizing(layer)?.provider().features();
        if !features.iter().any(|f| f.originates_from(object)) {
            return None;
        }

        Some(
            features
                .iter()
                .filter(|f| !f.originates_from(object))
                .cloned()
                .collect(),
        )
    }

    fn features(&self, layer: &Layer) -> Vec<Feature> {
        self.rasterizing(layer)
            .map(|rasterizing| rasterizing.provider().features().to_vec())
            .unwrap_or_default()
    }

    fn apply_filter(&self, layer: &mut Layer, filter: VisibilityFilter) {
        if !self.can_handle(layer) {
            return;
        }
        if let LayerContent::Rasterizing(rasterizing) = layer.content_mut() {
            debug!("filter set on indexed provider of user_{}", rasterizing.provider().z_index());
            rasterizing.set_filter(Some(filter));
        }
    }
}
