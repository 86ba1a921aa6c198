//! Engine-wide constants for projections, tiling and layer compositing.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Feature count above which a user layer switches to the indexed, rasterized
/// representation. At or below it the layer stays in memory.
pub const PERFORMANCE_THRESHOLD: usize = 50;

/// Half the width of the Web Mercator world in meters.
pub const MERCATOR_MAX: f64 = 20_037_508.34;

/// Latitude where Web Mercator reaches `MERCATOR_MAX`; projection clamps to it.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Mean earth radius used for great-circle distance and destination points.
pub const HAVERSINE_EARTH_RADIUS: f64 = 6_371_000.0;

/// Equatorial radius used by the tile pyramid.
pub const TILE_EARTH_RADIUS: f64 = 6_378_137.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Pixels fetched around a tile so symbols straddling its edge are drawn
/// whole. The renderer's base symbol size.
pub const SYMBOL_MARGIN_PX: f64 = 32.0;

/// Equality tolerance for WGS84 coordinates, in degrees.
pub const WGS84_EPSILON: f64 = 1e-9;

/// Equality tolerance for projected coordinates, in meters.
pub const PROJECTED_EPSILON: f64 = 0.01;

/// Tolerance when comparing coordinates from different systems after
/// normalizing both to WGS84 (roughly a centimeter).
pub const CROSS_SYSTEM_EPSILON: f64 = 1e-7;

/// Margin in map units added around the union extent by zoom-and-center.
pub const DEFAULT_ZOOM_MARGIN: f64 = 1000.0;

/// Deepest tile level in the default resolution list.
pub const DEFAULT_MAX_ZOOM_LEVEL: u8 = 20;

/// Default number of tiles kept per rasterizing or tile layer.
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 1024;

/// Name of the bottom system layer holding the base map.
pub const BASE_MAP_LAYER: &str = "baseMap";

/// Name of the top system layer holding the live position marker.
pub const POSITION_LAYER: &str = "position";
