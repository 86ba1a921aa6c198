use crate::{
    core::geo::TileCoord,
    tiles::{cache::TileCache, source::ExternalTileSource},
    Result,
};
use log::debug;
use std::sync::Arc;

/// External imagery drawn from a tile source through an LRU cache
pub struct TileLayer {
    source: ExternalTileSource,
    cache: TileCache,
}

impl TileLayer {
    pub fn new(source: ExternalTileSource, cache_capacity: usize) -> Self {
        Self {
            source,
            cache: TileCache::new(cache_capacity),
        }
    }

    /// Cached imagery for `tile`, fetched from the source on a miss.
    /// `None` when the source has nothing for the tile.
    pub async fn fetch(&self, tile: TileCoord) -> Result<Option<Arc<Vec<u8>>>> {
        if let Some(bytes) = self.cache.get(&tile) {
            return Ok(Some(bytes));
        }

        let fetched = self.source.fetch(tile).await?;
        Ok(fetched.map(|bytes| self.cache.insert(tile, bytes)))
    }

    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        debug!("dropping {} cached tiles", self.cache.len());
        self.cache.clear();
    }
}
