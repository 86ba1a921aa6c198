//! # SimpleMaps
//!
//! A layer-compositing map engine.
//!
//! Callers hand in map objects (points, lines, polygons, labels, pins) with a
//! z-index; the engine turns them into styled features, picks an in-memory or
//! an indexed/rasterized layer representation by feature count, and keeps the
//! layer list ordered against the base map, external tile overlays and the
//! location marker.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod objects;
pub mod rendering;
pub mod spatial;
pub mod tiles;
pub mod prelude;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Extent,
    config::MapEngineOptions,
    coordinates::{
        Coordinate, CoordinateSystem, RegionalGridCoordinate, WebMercatorCoordinate,
        Wgs84Coordinate,
    },
    geo::{Point, TileCoord},
    map::MapEngine,
    viewport::Viewport,
};

pub use data::feature::{to_feature, Feature, FeatureGeometry};

pub use layers::{
    base::{Layer, LayerKey, LayerRole},
    handler::{HandlerKind, LayerHandler, VisibilityFilter},
    manager::LayerManager,
    marker::LocationMarker,
};

pub use objects::{
    style::{Color, Pen, Stroke},
    GeometryObject, Label, LineString, MapObject, MapObjectKind, Pin, Polygon, Rectangle,
};

pub use input::{events::MapEvent, handler::EventManager};

pub use rendering::{
    rasterizer::{LayerImage, RasterRequest, Rasterizer},
    tile_renderer::TileRenderer,
};

pub use tiles::{
    metadata::TileMetadata,
    source::{ExternalTileSource, TileProvider},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Unsupported coordinate system: {0}")]
    UnsupportedCoordinateSystem(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Tile error: {0}")]
    Tile(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::try_init();
}
