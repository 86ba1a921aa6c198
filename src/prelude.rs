//! Prelude module for common simplemaps types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use simplemaps::prelude::*;`

pub use crate::core::{
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

pub use crate::data::feature::{Feature, FeatureGeometry};

pub use crate::layers::{
    base::{Layer, LayerKey, LayerRole},
    handler::{HandlerKind, VisibilityFilter},
};

pub use crate::objects::{
    style::{Color, Pen, Stroke},
    Label, LineString, MapObject, Pin, Polygon, Rectangle,
};

pub use crate::input::events::MapEvent;

pub use crate::rendering::rasterizer::{RasterRequest, Rasterizer};

pub use crate::tiles::{metadata::TileMetadata, source::TileProvider};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
