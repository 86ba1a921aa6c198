use crate::{
    core::geo::TileCoord,
    data::feature::Feature,
    layers::{
        handler::HandlerKind, marker::LocationMarker, ordinary::MemoryLayer,
        performance::RasterizingLayer, tile::TileLayer,
    },
    rendering::rasterizer::{RasterRequest, Rasterizer},
    MapError, Result,
};
use std::{cmp::Ordering, fmt, sync::Arc};

/// Band a layer is drawn in. Bands are drawn in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerRole {
    /// Fixed system layers drawn first, such as the base map
    Bottom,
    /// External imagery overlays
    Tile,
    /// Caller-managed object layers
    User,
    /// Fixed system layers drawn last, such as the location marker
    Top,
}

/// Logical identity of a layer.
///
/// Tile and user layers carry their z-index. System layers carry none and
/// keep the order they were added in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerKey {
    pub role: LayerRole,
    pub index: Option<i32>,
}

impl LayerKey {
    pub fn system_bottom() -> Self {
        Self { role: LayerRole::Bottom, index: None }
    }

    pub fn system_top() -> Self {
        Self { role: LayerRole::Top, index: None }
    }

    pub fn tile(z_index: i32) -> Self {
        Self { role: LayerRole::Tile, index: Some(z_index) }
    }

    pub fn user(z_index: i32) -> Self {
        Self { role: LayerRole::User, index: Some(z_index) }
    }

    /// Whether a layer with this key is drawn before a newly inserted layer
    /// with key `other`. Between system layers of the same band the existing
    /// one always comes first.
    pub fn sorts_before(&self, other: &LayerKey) -> bool {
        match self.role.cmp(&other.role) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match (self.index, other.index) {
                (Some(a), Some(b)) => a < b,
                _ => true,
            },
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.role {
            LayerRole::Bottom => "sys_bottom",
            LayerRole::Tile => "tile",
            LayerRole::User => "user",
            LayerRole::Top => "sys_top",
        };
        match self.index {
            Some(index) => write!(f, "{prefix}_{index}"),
            None => f.write_str(prefix),
        }
    }
}

/// What a layer draws
pub enum LayerContent {
    Empty,
    Tiles(TileLayer),
    Marker(LocationMarker),
    Memory(MemoryLayer),
    Rasterizing(RasterizingLayer),
}

impl fmt::Debug for LayerContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerContent::Empty => f.write_str("Empty"),
            LayerContent::Tiles(_) => f.write_str("Tiles"),
            LayerContent::Marker(marker) => f.debug_tuple("Marker").field(marker).finish(),
            LayerContent::Memory(layer) => write!(f, "Memory({} features)", layer.len()),
            LayerContent::Rasterizing(layer) => write!(f, "Rasterizing({} features)", layer.len()),
        }
    }
}

/// A named, orderable unit of drawing
#[derive(Debug)]
pub struct Layer {
    key: LayerKey,
    name: String,
    enabled: bool,
    handler: Option<HandlerKind>,
    content: LayerContent,
}

impl Layer {
    pub fn new(key: LayerKey, name: impl Into<String>, content: LayerContent) -> Self {
        Self {
            key,
            name: name.into(),
            enabled: true,
            handler: None,
            content,
        }
    }

    /// A user layer, tagged with the handler that built it
    pub fn user(z_index: i32, handler: HandlerKind, content: LayerContent) -> Self {
        let key = LayerKey::user(z_index);
        let mut layer = Self::new(key, key.to_string(), content);
        layer.handler = Some(handler);
        layer
    }

    pub fn key(&self) -> LayerKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn z_index(&self) -> Option<i32> {
        self.key.index
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Handler that built this layer, `None` for system and tile layers
    pub fn handler(&self) -> Option<HandlerKind> {
        self.handler
    }

    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut LayerContent {
        &mut self.content
    }

    /// Number of features held, zero for layers that do not hold features
    pub fn feature_count(&self) -> usize {
        match &self.content {
            LayerContent::Memory(layer) => layer.len(),
            LayerContent::Rasterizing(layer) => layer.len(),
            _ => 0,
        }
    }

    /// Draws this layer's share of `tile`. `None` when there is nothing to
    /// draw.
    pub async fn render(
        &self,
        tile: TileCoord,
        rasterizer: &dyn Rasterizer,
    ) -> Result<Option<Arc<Vec<u8>>>> {
        match &self.content {
            LayerContent::Empty => Ok(None),
            LayerContent::Tiles(layer) => layer.fetch(tile).await,
            LayerContent::Rasterizing(layer) => layer.render_tile(tile, rasterizer).await,
            LayerContent::Memory(layer) => {
                let features = layer.fetch(&tile.fetch_extent(), tile.resolution());
                Ok(rasterize_features(tile, features, rasterizer).await?.map(Arc::new))
            }
            LayerContent::Marker(marker) => {
                let features: Vec<&Feature> = marker.feature().into_iter().collect();
                Ok(rasterize_features(tile, features, rasterizer).await?.map(Arc::new))
            }
        }
    }
}

pub(crate) async fn rasterize_features(
    tile: TileCoord,
    features: Vec<&Feature>,
    rasterizer: &dyn Rasterizer,
) -> Result<Option<Vec<u8>>> {
    if features.is_empty() {
        return Ok(None);
    }

    let request = RasterRequest::new(tile, features);
    let image = rasterizer
        .rasterize(request)
        .await
        .map_err(|e| MapError::Render(format!("tile {}/{}/{}: {e}", tile.level, tile.col, tile.row)))?;
    Ok(if image.is_empty() { None } else { Some(image) })
}
