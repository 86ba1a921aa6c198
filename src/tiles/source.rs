use crate::{core::geo::TileCoord, tiles::metadata::TileMetadata, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can produce imagery for a tile: a slippy-map server, an
/// MBTiles file, a test double.
#[async_trait]
pub trait TileProvider: Send + Sync {
    /// Image bytes for the tile. An empty vector means there is no imagery.
    async fn get_tile(&self, tile: &TileMetadata) -> Result<Vec<u8>>;
}

/// Adapts a [`TileProvider`] to the engine's tile addressing
#[derive(Clone)]
pub struct ExternalTileSource {
    provider: Arc<dyn TileProvider>,
}

impl ExternalTileSource {
    pub fn new(provider: Arc<dyn TileProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch(&self, tile: TileCoord) -> Result<Option<Vec<u8>>> {
        let metadata = TileMetadata::from_tile(tile)?;
        let bytes = self.provider.get_tile(&metadata).await?;
        Ok(if bytes.is_empty() { None } else { Some(bytes) })
    }
}

impl std::fmt::Debug for ExternalTileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalTileSource").finish_non_exhaustive()
    }
}
