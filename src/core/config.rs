//! Engine configuration
//!
//! Every field has a default, so a configuration file only needs to name
//! what it changes.

use crate::{
    core::{
        constants::{
            DEFAULT_MAX_ZOOM_LEVEL, DEFAULT_TILE_CACHE_CAPACITY, DEFAULT_ZOOM_MARGIN,
            PERFORMANCE_THRESHOLD,
        },
        coordinates::Wgs84Coordinate,
        geo::TileCoord,
    },
    MapError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapEngineOptions {
    /// Feature count above which a user layer is indexed and rasterized
    pub performance_threshold: usize,
    /// Tiles kept per rasterizing or tile layer
    pub tile_cache_capacity: usize,
    /// Map units added around the box `zoom_and_center_on` fits to
    pub zoom_margin: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub initial_center: Option<Wgs84Coordinate>,
    /// Map units per pixel; the resolution of level 2 when unset
    pub initial_resolution: Option<f64>,
    pub max_zoom_level: u8,
    pub show_location_marker: bool,
    pub is_centered: bool,
}

impl Default for MapEngineOptions {
    fn default() -> Self {
        Self {
            performance_threshold: PERFORMANCE_THRESHOLD,
            tile_cache_capacity: DEFAULT_TILE_CACHE_CAPACITY,
            zoom_margin: DEFAULT_ZOOM_MARGIN,
            viewport_width: 512.0,
            viewport_height: 512.0,
            initial_center: None,
            initial_resolution: None,
            max_zoom_level: DEFAULT_MAX_ZOOM_LEVEL,
            show_location_marker: false,
            is_centered: false,
        }
    }
}

impl MapEngineOptions {
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads and validates a JSON configuration file
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, MapError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.viewport_width < 0.0 || self.viewport_height < 0.0 {
            return Err(MapError::ParseError(format!(
                "viewport size {}x{} is negative",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.initial_resolution.is_some_and(|r| r <= 0.0 || !r.is_finite()) {
            return Err(MapError::ParseError("initial resolution must be positive".to_string()));
        }
        Ok(())
    }

    pub fn with_performance_threshold(mut self, threshold: usize) -> Self {
        self.performance_threshold = threshold;
        self
    }

    pub fn with_tile_cache_capacity(mut self, capacity: usize) -> Self {
        self.tile_cache_capacity = capacity;
        self
    }

    pub fn with_viewport_size(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_initial_view(mut self, center: Wgs84Coordinate, resolution: f64) -> Self {
        self.initial_center = Some(center);
        self.initial_resolution = Some(resolution);
        self
    }

    pub fn resolved_initial_resolution(&self) -> f64 {
        self.initial_resolution
            .unwrap_or_else(|| TileCoord::resolution_for_level(2))
    }
}
