//! The feature adapter.
//!
//! Every [`MapObject`] becomes exactly one [`Feature`]: a Web Mercator
//! geometry, a renderer style and a back-reference to the object it came
//! from. Layers only ever hold features; the back-reference is what lets them
//! sort, filter and remove by object.

use std::sync::Arc;

use crate::{
    core::{bounds::Extent, coordinates::Coordinate, geo::Point},
    data::style::{FeatureStyle, FontStyle, LineStyle},
    objects::{
        geometry::{self, close_ring},
        style::Color,
        MapObject, MapObjectKind,
    },
    MapError,
};

/// Geometry in Web Mercator meters
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(Point),
    LineString(Vec<Point>),
    /// A closed exterior ring
    Polygon(Vec<Point>),
}

impl FeatureGeometry {
    /// Bounding box of the geometry, `None` for an empty line or ring
    pub fn extent(&self) -> Option<Extent> {
        match self {
            FeatureGeometry::Point(point) => Some(Extent::from_point(*point)),
            FeatureGeometry::LineString(points) | FeatureGeometry::Polygon(points) => {
                Extent::from_points(points)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Feature {
    geometry: FeatureGeometry,
    style: FeatureStyle,
    map_object: Arc<MapObject>,
}

impl Feature {
    pub fn geometry(&self) -> &FeatureGeometry {
        &self.geometry
    }

    pub fn style(&self) -> &FeatureStyle {
        &self.style
    }

    /// The object this feature was built from
    pub fn map_object(&self) -> &Arc<MapObject> {
        &self.map_object
    }

    pub fn rendering_order(&self) -> i32 {
        self.map_object.rendering_order()
    }

    pub fn extent(&self) -> Option<Extent> {
        self.geometry.extent()
    }

    pub fn originates_from(&self, object: &MapObject) -> bool {
        MapObject::is_same(&self.map_object, object)
    }
}

fn project(coordinate: &Coordinate) -> Result<Point, MapError> {
    coordinate.to_point()
}

fn project_all(coordinates: &[Coordinate]) -> Result<Vec<Point>, MapError> {
    coordinates.iter().map(project).collect()
}

fn polygon_feature(polygon: &geometry::Polygon) -> Result<(FeatureGeometry, FeatureStyle), MapError> {
    let ring = close_ring(project_all(&polygon.vertices)?);
    let style = FeatureStyle::Area {
        fill: polygon.fill,
        outline: LineStyle::from(&polygon.outline),
    };
    Ok((FeatureGeometry::Polygon(ring), style))
}

/// Converts a map object into its renderer feature.
pub fn to_feature(object: &Arc<MapObject>) -> Result<Feature, MapError> {
    let (geometry, style) = match object.kind() {
        MapObjectKind::Point(point) => (
            FeatureGeometry::Point(project(&point.location)?),
            FeatureStyle::Symbol {
                fill: point.color,
                scale: point.symbol_scale(),
            },
        ),
        MapObjectKind::LineString(line) => (
            FeatureGeometry::LineString(project_all(&line.vertices)?),
            FeatureStyle::Line(LineStyle::from(&line.stroke)),
        ),
        MapObjectKind::Polygon(polygon) => polygon_feature(polygon)?,
        MapObjectKind::Rectangle(rectangle) => polygon_feature(rectangle.polygon())?,
        MapObjectKind::Label(label) => (
            FeatureGeometry::Point(project(&label.location)?),
            FeatureStyle::Label {
                text: label.text.clone(),
                font: FontStyle {
                    family: label.font_family.clone(),
                    size: label.font_size,
                    bold: label.bold,
                    italic: label.italic,
                },
                fore_color: label.font_color,
                back_color: label.back_color,
            },
        ),
        MapObjectKind::Pin(pin) => (
            FeatureGeometry::Point(project(&pin.location)?),
            FeatureStyle::Image {
                fill: pin.color,
                stroke: Color::DIM_GREY,
                offset: (0.0, 0.5),
            },
        ),
    };

    Ok(Feature {
        geometry,
        style,
        map_object: Arc::clone(object),
    })
}

/// Converts every object, failing on the first one that cannot be projected.
pub fn to_features(objects: &[Arc<MapObject>]) -> Result<Vec<Feature>, MapError> {
    objects.iter().map(to_feature).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::coordinates::{Wgs84Coordinate, WebMercatorCoordinate},
        data::style::DashPattern,
        objects::{style::{Pen, Stroke}, Label, LineString, Pin, Polygon, Rectangle},
    };

    fn wgs(lat: f64, lon: f64) -> Coordinate {
        Coordinate::wgs84(lat, lon).unwrap()
    }

    #[test]
    fn test_point_is_projected_to_web_mercator() {
        let object = MapObject::from(geometry::Point::new(wgs(59.33, 18.06)).with_size(16)).shared();
        let feature = to_feature(&object).unwrap();

        let expected = wgs(59.33, 18.06).to_point().unwrap();
        assert_eq!(feature.geometry(), &FeatureGeometry::Point(expected));
        assert_eq!(
            feature.style(),
            &FeatureStyle::Symbol { fill: Color::RED, scale: 0.5 }
        );
        assert!(Arc::ptr_eq(feature.map_object(), &object));
    }

    #[test]
    fn test_projected_input_is_kept() {
        let location = Coordinate::from(WebMercatorCoordinate::new(1000.0, 2000.0));
        let object = MapObject::from(Pin::new(location)).shared();
        let feature = to_feature(&object).unwrap();

        assert_eq!(feature.geometry(), &FeatureGeometry::Point(Point::new(1000.0, 2000.0)));
        match feature.style() {
            FeatureStyle::Image { fill, stroke, offset } => {
                assert_eq!(*fill, Color::BLUE);
                assert_eq!(*stroke, Color::DIM_GREY);
                assert_eq!(*offset, (0.0, 0.5));
            }
            other => panic!("unexpected style {other:?}"),
        }
    }

    #[test]
    fn test_line_style() {
        let pen = Pen::new(Color::BLACK).with_width(3.0).with_stroke(Stroke::Dashed);
        let line = LineString::new(vec![wgs(0.0, 0.0), wgs(1.0, 1.0)]).with_stroke(pen);
        let feature = to_feature(&MapObject::from(line).shared()).unwrap();

        match (feature.geometry(), feature.style()) {
            (FeatureGeometry::LineString(points), FeatureStyle::Line(style)) => {
                assert_eq!(points.len(), 2);
                assert_eq!(style.width, 3.0);
                assert_eq!(style.dash, DashPattern::Dash);
            }
            other => panic!("unexpected feature {other:?}"),
        }
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let polygon = Polygon::new(vec![wgs(0.0, 0.0), wgs(0.0, 1.0), wgs(1.0, 1.0)])
            .with_fill(Color::RED);
        let feature = to_feature(&MapObject::from(polygon).shared()).unwrap();

        match feature.geometry() {
            FeatureGeometry::Polygon(ring) => {
                assert_eq!(ring.len(), 4);
                assert_eq!(ring.first(), ring.last());
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        assert!(matches!(feature.style(), FeatureStyle::Area { fill, .. } if *fill == Color::RED));
    }

    #[test]
    fn test_empty_polygon_has_no_extent() {
        let feature = to_feature(&MapObject::from(Polygon::new(vec![])).shared()).unwrap();
        assert!(feature.extent().is_none());
    }

    #[test]
    fn test_rectangle_and_label() {
        let center = Wgs84Coordinate::new(10.0, 10.0).unwrap();
        let rect = Rectangle::from_location(&center, 500.0).unwrap();
        let feature = to_feature(&MapObject::from(rect).shared()).unwrap();
        let extent = feature.extent().unwrap();
        assert!(extent.contains(&Coordinate::from(center).to_point().unwrap()));

        let label = Label::new(wgs(1.0, 2.0)).with_text("hello").with_emphasis(true, false);
        let feature = to_feature(&MapObject::from(label).shared()).unwrap();
        match feature.style() {
            FeatureStyle::Label { text, font, fore_color, .. } => {
                assert_eq!(text, "hello");
                assert!(font.bold);
                assert_eq!(font.family, "Arial");
                assert_eq!(*fore_color, Color::WHITE);
            }
            other => panic!("unexpected style {other:?}"),
        }
    }

    #[test]
    fn test_originates_from() {
        let a = MapObject::from(Pin::new(wgs(1.0, 1.0))).shared();
        let b = MapObject::from(Pin::new(wgs(2.0, 2.0))).shared();
        let feature = to_feature(&a).unwrap();

        assert!(feature.originates_from(&a));
        assert!(!feature.originates_from(&b));
        assert_eq!(to_features(&[a, b]).unwrap().len(), 2);
    }
}
