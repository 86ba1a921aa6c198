use crate::{
    core::coordinates::{Coordinate, Wgs84Coordinate},
    objects::style::{Color, Pen},
    MapError,
};
use geo::Intersects;
use geo_types::{Coord, Geometry};

/// Map objects with a planar geometry that spatial predicates can run on.
///
/// Geometries are always expressed in WGS84 with x = longitude and
/// y = latitude, whatever system the object's coordinates were given in.
pub trait GeometryObject {
    fn to_geometry(&self) -> Result<Geometry<f64>, MapError>;

    fn intersects(&self, other: &dyn GeometryObject) -> Result<bool, MapError> {
        Ok(self.to_geometry()?.intersects(&other.to_geometry()?))
    }
}

fn lon_lat(coordinate: &Coordinate) -> Result<Coord<f64>, MapError> {
    let wgs84 = coordinate.to_wgs84()?;
    Ok(Coord {
        x: wgs84.longitude(),
        y: wgs84.latitude(),
    })
}

/// Turns polygon vertices into a closed ring. A single vertex becomes a
/// degenerate ring of three copies; no vertices give an empty ring.
pub fn close_ring<T: Copy>(mut vertices: Vec<T>) -> Vec<T> {
    match vertices.len() {
        0 => vertices,
        1 => vec![vertices[0]; 3],
        _ => {
            vertices.push(vertices[0]);
            vertices
        }
    }
}

/// A filled circular marker
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub location: Coordinate,
    pub color: Color,
    pub size: u32,
}

impl Point {
    pub fn new(location: impl Into<Coordinate>) -> Self {
        Self {
            location: location.into(),
            color: Color::RED,
            size: 5,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Scale of the symbol relative to the renderer's 32 px base symbol
    pub fn symbol_scale(&self) -> f64 {
        self.size as f64 / 32.0
    }
}

impl GeometryObject for Point {
    fn to_geometry(&self) -> Result<Geometry<f64>, MapError> {
        Ok(Geometry::Point(geo_types::Point::from(lon_lat(&self.location)?)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    pub vertices: Vec<Coordinate>,
    pub stroke: Pen,
}

impl LineString {
    pub fn new(vertices: Vec<Coordinate>) -> Self {
        Self {
            vertices,
            stroke: Pen::new(Color::BLUE).with_width(4.0),
        }
    }

    pub fn with_stroke(mut self, stroke: Pen) -> Self {
        self.stroke = stroke;
        self
    }
}

impl GeometryObject for LineString {
    fn to_geometry(&self) -> Result<Geometry<f64>, MapError> {
        let coords = self.vertices.iter().map(lon_lat).collect::<Result<Vec<_>, _>>()?;
        Ok(Geometry::LineString(geo_types::LineString::new(coords)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Coordinate>,
    pub fill: Color,
    pub outline: Pen,
}

impl Polygon {
    pub fn new(vertices: Vec<Coordinate>) -> Self {
        Self {
            vertices,
            fill: Color::TRANSPARENT,
            outline: Pen::new(Color::BLACK),
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_outline(mut self, outline: Pen) -> Self {
        self.outline = outline;
        self
    }
}

impl GeometryObject for Polygon {
    fn to_geometry(&self) -> Result<Geometry<f64>, MapError> {
        let coords = self.vertices.iter().map(lon_lat).collect::<Result<Vec<_>, _>>()?;
        let exterior = geo_types::LineString::new(close_ring(coords));
        Ok(Geometry::Polygon(geo_types::Polygon::new(exterior, vec![])))
    }
}

/// Axis-aligned (in latitude/longitude) polygon defined by its four corners
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub top_left: Wgs84Coordinate,
    pub top_right: Wgs84Coordinate,
    pub bottom_left: Wgs84Coordinate,
    pub bottom_right: Wgs84Coordinate,
    polygon: Polygon,
}

impl Rectangle {
    pub fn new(
        top_left: Wgs84Coordinate,
        top_right: Wgs84Coordinate,
        bottom_left: Wgs84Coordinate,
        bottom_right: Wgs84Coordinate,
    ) -> Self {
        let vertices = [top_right, top_left, bottom_left, bottom_right]
            .into_iter()
            .map(Coordinate::Wgs84)
            .collect();

        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            polygon: Polygon::new(vertices),
        }
    }

    /// Square-ish rectangle reaching `radius` meters north, south, east and
    /// west of `center`.
    pub fn from_location(center: &Wgs84Coordinate, radius: f64) -> Result<Self, MapError> {
        let north = center.destination_point(radius, 0.0)?;
        let south = center.destination_point(radius, 180.0)?;
        let east = center.destination_point(radius, 90.0)?;
        let west = center.destination_point(radius, 270.0)?;

        Ok(Self::new(
            Wgs84Coordinate::new(north.latitude(), west.longitude())?,
            Wgs84Coordinate::new(north.latitude(), east.longitude())?,
            Wgs84Coordinate::new(south.latitude(), west.longitude())?,
            Wgs84Coordinate::new(south.latitude(), east.longitude())?,
        ))
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.polygon.fill = fill;
        self
    }

    pub fn with_outline(mut self, outline: Pen) -> Self {
        self.polygon.outline = outline;
        self
    }

    /// The polygon the rectangle renders as
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

impl GeometryObject for Rectangle {
    fn to_geometry(&self) -> Result<Geometry<f64>, MapError> {
        self.polygon.to_geometry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::style::Stroke;

    fn wgs(lat: f64, lon: f64) -> Coordinate {
        Coordinate::wgs84(lat, lon).unwrap()
    }

    #[test]
    fn test_defaults() {
        let point = Point::new(wgs(59.0, 18.0));
        assert_eq!(point.color, Color::RED);
        assert_eq!(point.size, 5);
        assert!((point.symbol_scale() - 5.0 / 32.0).abs() < 1e-12);

        let line = LineString::new(vec![]);
        assert_eq!(line.stroke.color, Color::BLUE);
        assert_eq!(line.stroke.width, 4.0);
        assert_eq!(line.stroke.stroke, Stroke::Solid);

        let polygon = Polygon::new(vec![]);
        assert_eq!(polygon.fill, Color::TRANSPARENT);
        assert_eq!(polygon.outline, Pen::new(Color::BLACK));
    }

    #[test]
    fn test_close_ring() {
        assert!(close_ring::<i32>(vec![]).is_empty());
        assert_eq!(close_ring(vec![7]), vec![7, 7, 7]);
        assert_eq!(close_ring(vec![1, 2, 3]), vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_geometry_is_lon_lat() {
        let geometry = Point::new(wgs(59.0, 18.0)).to_geometry().unwrap();
        match geometry {
            Geometry::Point(p) => {
                assert_eq!(p.x(), 18.0);
                assert_eq!(p.y(), 59.0);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_intersects() {
        let square = Polygon::new(vec![wgs(1.0, 0.0), wgs(1.0, 1.0), wgs(0.0, 1.0), wgs(0.0, 0.0)]);
        let inside = Point::new(wgs(0.5, 0.5));
        let outside = Point::new(wgs(5.0, 5.0));
        let crossing = LineString::new(vec![wgs(-1.0, 0.5), wgs(2.0, 0.5)]);

        assert!(square.intersects(&inside).unwrap());
        assert!(!square.intersects(&outside).unwrap());
        assert!(crossing.intersects(&square).unwrap());
        assert!(!crossing.intersects(&outside).unwrap());
    }

    #[test]
    fn test_intersects_across_systems() {
        let square = Polygon::new(vec![wgs(1.0, 0.0), wgs(1.0, 1.0), wgs(0.0, 1.0), wgs(0.0, 0.0)]);
        let projected = wgs(0.5, 0.5).convert_to(crate::CoordinateSystem::WebMercator).unwrap();
        assert!(Point::new(projected).intersects(&square).unwrap());
    }

    #[test]
    fn test_rectangle_vertex_order() {
        let tl = Wgs84Coordinate::new(1.0, 0.0).unwrap();
        let tr = Wgs84Coordinate::new(1.0, 1.0).unwrap();
        let bl = Wgs84Coordinate::new(0.0, 0.0).unwrap();
        let br = Wgs84Coordinate::new(0.0, 1.0).unwrap();
        let rect = Rectangle::new(tl, tr, bl, br);

        let expected: Vec<Coordinate> = vec![tr.into(), tl.into(), bl.into(), br.into()];
        assert_eq!(rect.polygon().vertices, expected);
    }

    #[test]
    fn test_rectangle_from_location() {
        let center = Wgs84Coordinate::new(59.33, 18.06).unwrap();
        let rect = Rectangle::from_location(&center, 1000.0).unwrap();

        assert!(rect.top_left.latitude() > center.latitude());
        assert!(rect.bottom_left.latitude() < center.latitude());
        assert!(rect.top_left.longitude() < center.longitude());
        assert!(rect.top_right.longitude() > center.longitude());

        let north_edge = Wgs84Coordinate::new(rect.top_left.latitude(), center.longitude()).unwrap();
        assert!((north_edge.distance_to(&center) - 1000.0).abs() < 1.0);
        assert!(rect.intersects(&Point::new(center)).unwrap());
    }
}
