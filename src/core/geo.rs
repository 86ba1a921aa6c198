use crate::core::{
    bounds::Extent,
    constants::{SYMBOL_MARGIN_PX, TILE_EARTH_RADIUS, TILE_SIZE},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A point in projected (Web Mercator) map units or in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotates around `origin` by `degrees`, counter-clockwise.
    pub fn rotate_around(&self, origin: &Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self.subtract(origin);
        Point::new(
            origin.x + d.x * cos - d.y * sin,
            origin.y + d.x * sin + d.y * cos,
        )
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Address of a tile in the Web Mercator tile pyramid.
///
/// `col` grows eastwards and `row` grows southwards from the north-west
/// corner of the world, as in the usual slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub col: u32,
    pub row: u32,
    pub level: u8,
}

impl TileCoord {
    pub fn new(col: u32, row: u32, level: u8) -> Self {
        Self { col, row, level }
    }

    /// Half the circumference of the tile earth: the mercator origin offset.
    pub fn origin_shift() -> f64 {
        PI * TILE_EARTH_RADIUS
    }

    /// Map units per pixel at level 0.
    pub fn initial_resolution() -> f64 {
        2.0 * PI * TILE_EARTH_RADIUS / TILE_SIZE as f64
    }

    /// Map units per pixel at `level`.
    pub fn resolution_for_level(level: u8) -> f64 {
        Self::initial_resolution() / 2_f64.powi(level as i32)
    }

    pub fn resolution(&self) -> f64 {
        Self::resolution_for_level(self.level)
    }

    /// Projected extent covered by this tile
    pub fn extent(&self) -> Extent {
        let span = TILE_SIZE as f64 * self.resolution();
        let shift = Self::origin_shift();

        let min_x = self.col as f64 * span - shift;
        let max_x = (self.col as f64 + 1.0) * span - shift;
        let max_y = shift - self.row as f64 * span;
        let min_y = shift - (self.row as f64 + 1.0) * span;

        Extent::from_coords(min_x, min_y, max_x, max_y)
    }

    /// Tile containing a projected point at the given level
    pub fn from_point(point: &Point, level: u8) -> Self {
        let span = TILE_SIZE as f64 * Self::resolution_for_level(level);
        let shift = Self::origin_shift();
        let max_index = 1_u64
            .checked_shl(level as u32)
            .map_or(u32::MAX as u64, |count| (count - 1).min(u32::MAX as u64)) as f64;

        let col = ((point.x + shift) / span).floor().clamp(0.0, max_index) as u32;
        let row = ((shift - point.y) / span).floor().clamp(0.0, max_index) as u32;

        Self::new(col, row, level)
    }

    /// Gets the parent tile at a lower zoom level
    pub fn parent(&self) -> Option<TileCoord> {
        if self.level == 0 {
            None
        } else {
            Some(TileCoord::new(self.col / 2, self.row / 2, self.level - 1))
        }
    }

    /// Checks if the tile is valid for its level. Levels too deep to count
    /// tiles for are invalid.
    pub fn is_valid(&self) -> bool {
        match 1_u64.checked_shl(self.level as u32) {
            Some(count) => (self.col as u64) < count && (self.row as u64) < count,
            None => false,
        }
    }

    /// Area to fetch features from when drawing this tile: the tile grown by
    /// the symbol margin at the tile's resolution
    pub fn fetch_extent(&self) -> Extent {
        self.extent().grow(SYMBOL_MARGIN_PX * self.resolution())
    }
}
