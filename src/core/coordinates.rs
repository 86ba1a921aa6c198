//! Coordinate value types and conversions between WGS84, Web Mercator and
//! the RT90 2.5 gon V regional grid.
//!
//! WGS84 values are range-checked on construction and on mutation; nothing
//! here ever clamps an out-of-range latitude or longitude. Distances and
//! destination points are computed on a sphere after normalizing to WGS84.

use crate::{
    core::{
        constants::{
            CROSS_SYSTEM_EPSILON, HAVERSINE_EARTH_RADIUS, MAX_MERCATOR_LATITUDE, MERCATOR_MAX,
            PROJECTED_EPSILON, WGS84_EPSILON,
        },
        geo::Point,
        grid::RT90_2_5_GON_V,
    },
    MapError,
};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, str::FromStr};

const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Identifies the reference system a coordinate is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    #[serde(rename = "WGS84")]
    Wgs84,
    WebMercator,
    #[serde(rename = "RT90")]
    RegionalGrid,
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Wgs84 => write!(f, "WGS84"),
            CoordinateSystem::WebMercator => write!(f, "WebMercator"),
            CoordinateSystem::RegionalGrid => write!(f, "RT90"),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "WGS84" => Ok(CoordinateSystem::Wgs84),
            "WebMercator" => Ok(CoordinateSystem::WebMercator),
            "RT90" => Ok(CoordinateSystem::RegionalGrid),
            other => Err(MapError::UnsupportedCoordinateSystem(other.to_string())),
        }
    }
}

/// Geographic latitude/longitude in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "Wgs84Repr")]
pub struct Wgs84Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct Wgs84Repr {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<Wgs84Repr> for Wgs84Coordinate {
    type Error = MapError;

    fn try_from(repr: Wgs84Repr) -> Result<Self, Self::Error> {
        Wgs84Coordinate::new(repr.latitude, repr.longitude)
    }
}

impl Wgs84Coordinate {
    /// Creates a coordinate, failing when either value is out of range
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MapError> {
        Ok(Self {
            latitude: check_latitude(latitude)?,
            longitude: check_longitude(longitude)?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn set_latitude(&mut self, latitude: f64) -> Result<(), MapError> {
        self.latitude = check_latitude(latitude)?;
        Ok(())
    }

    pub fn set_longitude(&mut self, longitude: f64) -> Result<(), MapError> {
        self.longitude = check_longitude(longitude)?;
        Ok(())
    }

    /// Great-circle (haversine) distance in meters
    pub fn distance_to(&self, other: &Wgs84Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        HAVERSINE_EARTH_RADIUS * c
    }

    /// Point reached after travelling `distance` meters along `heading`
    /// (degrees clockwise from north). Longitude is wrapped into [-180, 180].
    pub fn destination_point(&self, distance: f64, heading: f64) -> Result<Wgs84Coordinate, MapError> {
        let angular = distance / HAVERSINE_EARTH_RADIUS;
        let theta = heading.rem_euclid(360.0).to_radians();
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos()).asin();
        let lon2 = lon1
            + (theta.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        // asin can overshoot ±90 by an ulp
        let latitude = lat2.to_degrees().clamp(MIN_LATITUDE, MAX_LATITUDE);
        Wgs84Coordinate::new(latitude, wrap_longitude(lon2.to_degrees()))
    }

    /// Spherical Web Mercator projection. Latitudes past the Mercator limit
    /// land on the world's top or bottom edge.
    pub fn to_web_mercator(&self) -> WebMercatorCoordinate {
        let latitude = self.latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let x = self.longitude * (MERCATOR_MAX / 180.0);
        let y = ((90.0 + latitude) * PI / 360.0).tan().ln() * (MERCATOR_MAX / PI);
        WebMercatorCoordinate::new(x, y)
    }

    pub fn to_regional_grid(&self) -> RegionalGridCoordinate {
        let (northing, easting) = RT90_2_5_GON_V.geodetic_to_grid(self.latitude, self.longitude);
        RegionalGridCoordinate::new(northing, easting)
    }
}

impl PartialEq for Wgs84Coordinate {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < WGS84_EPSILON
            && (self.longitude - other.longitude).abs() < WGS84_EPSILON
    }
}

impl fmt::Display for Wgs84Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Wgs84Coordinate {
    type Err = MapError;

    /// Parses the `"lat,lon"` form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => (lat, lon),
            _ => return Err(MapError::ParseError(format!("expected \"lat,lon\", got {s:?}"))),
        };

        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| MapError::ParseError(format!("{value:?}: {e}")))
        };

        Wgs84Coordinate::new(parse(lat)?, parse(lon)?)
    }
}

/// Spherical Web Mercator (EPSG:3857) position in meters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WebMercatorCoordinate {
    pub x: f64,
    pub y: f64,
}

impl WebMercatorCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Inverse projection. Fails for positions outside the projected world.
    pub fn to_wgs84(&self) -> Result<Wgs84Coordinate, MapError> {
        let longitude = self.x / MERCATOR_MAX * 180.0;
        let latitude = ((self.y / MERCATOR_MAX * PI).exp().atan() * 2.0 - PI / 2.0) * 180.0 / PI;

        Wgs84Coordinate::new(
            snap_to_range(latitude, MIN_LATITUDE, MAX_LATITUDE),
            snap_to_range(longitude, MIN_LONGITUDE, MAX_LONGITUDE),
        )
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl PartialEq for WebMercatorCoordinate {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < PROJECTED_EPSILON && (self.y - other.y).abs() < PROJECTED_EPSILON
    }
}

impl From<Point> for WebMercatorCoordinate {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// RT90 2.5 gon V grid position in meters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegionalGridCoordinate {
    pub northing: f64,
    pub easting: f64,
}

impl RegionalGridCoordinate {
    pub fn new(northing: f64, easting: f64) -> Self {
        Self { northing, easting }
    }

    pub fn to_wgs84(&self) -> Result<Wgs84Coordinate, MapError> {
        let (latitude, longitude) = RT90_2_5_GON_V.grid_to_geodetic(self.northing, self.easting);
        Wgs84Coordinate::new(latitude, longitude)
    }
}

impl PartialEq for RegionalGridCoordinate {
    fn eq(&self, other: &Self) -> bool {
        (self.northing - other.northing).abs() < PROJECTED_EPSILON
            && (self.easting - other.easting).abs() < PROJECTED_EPSILON
    }
}

impl fmt::Display for RegionalGridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RT90({:.0}, {:.0})", self.northing, self.easting)
    }
}

/// A position in any of the supported coordinate systems
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "coordinateSystem")]
pub enum Coordinate {
    #[serde(rename = "WGS84")]
    Wgs84(Wgs84Coordinate),
    WebMercator(WebMercatorCoordinate),
    #[serde(rename = "RT90")]
    RegionalGrid(RegionalGridCoordinate),
}

impl Coordinate {
    /// Shorthand for a validated WGS84 coordinate
    pub fn wgs84(latitude: f64, longitude: f64) -> Result<Self, MapError> {
        Wgs84Coordinate::new(latitude, longitude).map(Coordinate::Wgs84)
    }

    pub fn system(&self) -> CoordinateSystem {
        match self {
            Coordinate::Wgs84(_) => CoordinateSystem::Wgs84,
            Coordinate::WebMercator(_) => CoordinateSystem::WebMercator,
            Coordinate::RegionalGrid(_) => CoordinateSystem::RegionalGrid,
        }
    }

    /// Longitude or easting
    pub fn x(&self) -> f64 {
        match self {
            Coordinate::Wgs84(c) => c.longitude,
            Coordinate::WebMercator(c) => c.x,
            Coordinate::RegionalGrid(c) => c.easting,
        }
    }

    /// Latitude or northing
    pub fn y(&self) -> f64 {
        match self {
            Coordinate::Wgs84(c) => c.latitude,
            Coordinate::WebMercator(c) => c.y,
            Coordinate::RegionalGrid(c) => c.northing,
        }
    }

    /// Converts into `target`. Pairs without a direct formula go through WGS84.
    pub fn convert_to(&self, target: CoordinateSystem) -> Result<Coordinate, MapError> {
        Ok(match (self, target) {
            (_, t) if t == self.system() => *self,
            (Coordinate::Wgs84(c), CoordinateSystem::WebMercator) => {
                Coordinate::WebMercator(c.to_web_mercator())
            }
            (Coordinate::Wgs84(c), CoordinateSystem::RegionalGrid) => {
                Coordinate::RegionalGrid(c.to_regional_grid())
            }
            (Coordinate::WebMercator(c), CoordinateSystem::Wgs84) => Coordinate::Wgs84(c.to_wgs84()?),
            (Coordinate::RegionalGrid(c), CoordinateSystem::Wgs84) => Coordinate::Wgs84(c.to_wgs84()?),
            (_, CoordinateSystem::WebMercator) => {
                Coordinate::WebMercator(self.to_wgs84()?.to_web_mercator())
            }
            (_, CoordinateSystem::RegionalGrid) => {
                Coordinate::RegionalGrid(self.to_wgs84()?.to_regional_grid())
            }
            (_, CoordinateSystem::Wgs84) => Coordinate::Wgs84(self.to_wgs84()?),
        })
    }

    /// Converts into the system named by `target` (`"WGS84"`, `"WebMercator"`, `"RT90"`)
    pub fn convert_to_named(&self, target: &str) -> Result<Coordinate, MapError> {
        self.convert_to(target.parse()?)
    }

    pub fn to_wgs84(&self) -> Result<Wgs84Coordinate, MapError> {
        match self {
            Coordinate::Wgs84(c) => Ok(*c),
            Coordinate::WebMercator(c) => c.to_wgs84(),
            Coordinate::RegionalGrid(c) => c.to_wgs84(),
        }
    }

    pub fn to_web_mercator(&self) -> Result<WebMercatorCoordinate, MapError> {
        match self {
            Coordinate::WebMercator(c) => Ok(*c),
            other => Ok(other.to_wgs84()?.to_web_mercator()),
        }
    }

    pub fn to_regional_grid(&self) -> Result<RegionalGridCoordinate, MapError> {
        match self {
            Coordinate::RegionalGrid(c) => Ok(*c),
            other => Ok(other.to_wgs84()?.to_regional_grid()),
        }
    }

    /// Projected position handed to the renderer
    pub fn to_point(&self) -> Result<Point, MapError> {
        self.to_web_mercator().map(|c| c.to_point())
    }

    /// Great-circle distance in meters between two coordinates of any system
    pub fn distance_to(&self, other: &Coordinate) -> Result<f64, MapError> {
        Ok(self.to_wgs84()?.distance_to(&other.to_wgs84()?))
    }

    /// Destination point, always returned as WGS84 whatever the source system
    pub fn destination_point(&self, distance: f64, heading: f64) -> Result<Wgs84Coordinate, MapError> {
        self.to_wgs84()?.destination_point(distance, heading)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coordinate::Wgs84(a), Coordinate::Wgs84(b)) => a == b,
            (Coordinate::WebMercator(a), Coordinate::WebMercator(b)) => a == b,
            (Coordinate::RegionalGrid(a), Coordinate::RegionalGrid(b)) => a == b,
            _ => match (self.to_wgs84(), other.to_wgs84()) {
                (Ok(a), Ok(b)) => {
                    (a.latitude - b.latitude).abs() < CROSS_SYSTEM_EPSILON
                        && (a.longitude - b.longitude).abs() < CROSS_SYSTEM_EPSILON
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Wgs84(c) => write!(f, "{c}"),
            Coordinate::WebMercator(c) => write!(f, "WebMercator({:.2}, {:.2})", c.x, c.y),
            Coordinate::RegionalGrid(c) => write!(f, "{c}"),
        }
    }
}

impl From<Wgs84Coordinate> for Coordinate {
    fn from(c: Wgs84Coordinate) -> Self {
        Coordinate::Wgs84(c)
    }
}

impl From<WebMercatorCoordinate> for Coordinate {
    fn from(c: WebMercatorCoordinate) -> Self {
        Coordinate::WebMercator(c)
    }
}

impl From<RegionalGridCoordinate> for Coordinate {
    fn from(c: RegionalGridCoordinate) -> Self {
        Coordinate::RegionalGrid(c)
    }
}

fn check_latitude(latitude: f64) -> Result<f64, MapError> {
    if (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(MapError::InvalidCoordinates(format!(
            "latitude {latitude} must be between {MIN_LATITUDE} and {MAX_LATITUDE}"
        )))
    }
}

fn check_longitude(longitude: f64) -> Result<f64, MapError> {
    if (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(MapError::InvalidCoordinates(format!(
            "longitude {longitude} must be between {MIN_LONGITUDE} and {MAX_LONGITUDE}"
        )))
    }
}

/// Pulls values that miss a bound by floating-point noise back onto it.
/// Anything further out is left for validation to reject.
fn snap_to_range(value: f64, min: f64, max: f64) -> f64 {
    if value > max && value - max < WGS84_EPSILON {
        max
    } else if value < min && min - value < WGS84_EPSILON {
        min
    } else {
        value
    }
}

/// Wraps longitude to [-180, 180]
fn wrap_longitude(longitude: f64) -> f64 {
    if (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        return longitude;
    }
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84_rejects_out_of_range() {
        assert!(Wgs84Coordinate::new(90.0, 180.0).is_ok());
        assert!(matches!(
            Wgs84Coordinate::new(90.5, 0.0),
            Err(MapError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            Wgs84Coordinate::new(0.0, -180.01),
            Err(MapError::InvalidCoordinates(_))
        ));

        let mut c = Wgs84Coordinate::new(10.0, 10.0).unwrap();
        assert!(c.set_latitude(-91.0).is_err());
        assert_eq!(c.latitude(), 10.0);
        assert!(c.set_longitude(20.0).is_ok());
        assert_eq!(c.longitude(), 20.0);
    }

    #[test]
    fn test_web_mercator_known_values() {
        let origin = Wgs84Coordinate::new(0.0, 0.0).unwrap().to_web_mercator();
        assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-6);

        let edge = Wgs84Coordinate::new(0.0, 180.0).unwrap().to_web_mercator();
        assert!((edge.x - MERCATOR_MAX).abs() < 1e-6);

        let back = edge.to_wgs84().unwrap();
        assert!((back.longitude() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_poles_project_onto_world_edge() {
        for latitude in [90.0, -90.0] {
            let projected = Wgs84Coordinate::new(latitude, 10.0).unwrap().to_web_mercator();
            assert!(projected.y.is_finite());
            assert!((projected.y.abs() - MERCATOR_MAX).abs() < 1e-3);

            let back = projected.to_wgs84().unwrap();
            assert!((back.latitude().abs() - MAX_MERCATOR_LATITUDE).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mercator_outside_world_fails() {
        let far = WebMercatorCoordinate::new(MERCATOR_MAX * 1.5, 0.0);
        assert!(matches!(far.to_wgs84(), Err(MapError::InvalidCoordinates(_))));
    }

    #[test]
    fn test_parse_and_display() {
        let c: Wgs84Coordinate = "59.33,18.06".parse().unwrap();
        assert_eq!(c.latitude(), 59.33);
        assert_eq!(c.longitude(), 18.06);
        assert_eq!(c.to_string(), "59.33,18.06");

        assert!(matches!("59.33".parse::<Wgs84Coordinate>(), Err(MapError::ParseError(_))));
        assert!(matches!("a,b".parse::<Wgs84Coordinate>(), Err(MapError::ParseError(_))));
        assert!(matches!(
            "95,18".parse::<Wgs84Coordinate>(),
            Err(MapError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_coordinate_system_names() {
        assert_eq!("RT90".parse::<CoordinateSystem>().unwrap(), CoordinateSystem::RegionalGrid);
        assert_eq!(CoordinateSystem::Wgs84.to_string(), "WGS84");

        let c = Coordinate::wgs84(59.0, 18.0).unwrap();
        assert!(matches!(
            c.convert_to_named("UTM33"),
            Err(MapError::UnsupportedCoordinateSystem(_))
        ));
    }

    #[test]
    fn test_conversion_is_closed() {
        let start = Coordinate::wgs84(59.33, 18.06).unwrap();
        let systems = [
            CoordinateSystem::Wgs84,
            CoordinateSystem::WebMercator,
            CoordinateSystem::RegionalGrid,
        ];
        for from in systems {
            let converted = start.convert_to(from).unwrap();
            assert_eq!(converted.system(), from);
            for to in systems {
                let target = converted.convert_to(to).unwrap();
                assert_eq!(target.system(), to);
                assert_eq!(target, start);
            }
        }
    }

    #[test]
    fn test_cross_system_equality_normalizes() {
        let wgs = Coordinate::wgs84(59.33, 18.06).unwrap();
        let merc = Coordinate::WebMercator(wgs.to_web_mercator().unwrap());
        assert_eq!(wgs, merc);
        assert_ne!(wgs, Coordinate::wgs84(59.34, 18.06).unwrap());
    }

    #[test]
    fn test_destination_wraps_longitude() {
        let c = Wgs84Coordinate::new(0.0, 179.9).unwrap();
        let east = c.destination_point(50_000.0, 90.0).unwrap();
        assert!(east.longitude() < -179.0);
    }

    #[test]
    fn test_destination_is_wgs84_for_projected_source() {
        let merc = Coordinate::WebMercator(WebMercatorCoordinate::new(2_000_000.0, 8_000_000.0));
        let dest = merc.destination_point(1000.0, 0.0).unwrap();
        let start = merc.to_wgs84().unwrap();
        assert!(dest.latitude() > start.latitude());
    }

    #[test]
    fn test_serde_tagged_and_validated() {
        let c = Coordinate::wgs84(59.33, 18.06).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"coordinateSystem\":\"WGS84\""));
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let bad = r#"{"coordinateSystem":"WGS84","latitude":120.0,"longitude":0.0}"#;
        assert!(serde_json::from_str::<Coordinate>(bad).is_err());

        let grid = r#"{"coordinateSystem":"RT90","northing":6580822.0,"easting":1628294.0}"#;
        let parsed: Coordinate = serde_json::from_str(grid).unwrap();
        assert_eq!(parsed.system(), CoordinateSystem::RegionalGrid);
    }
}
