use crate::{
    core::{
        constants::MERCATOR_MAX,
        coordinates::{WebMercatorCoordinate, Wgs84Coordinate},
        geo::Point,
    },
    MapError,
};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in projected (Web Mercator) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Point,
    pub max: Point,
}

impl Extent {
    /// Creates an extent spanning two corner points, in any order
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates an extent from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// The whole projected world
    pub fn world() -> Self {
        Self::from_coords(-MERCATOR_MAX, -MERCATOR_MAX, MERCATOR_MAX, MERCATOR_MAX)
    }

    /// Degenerate extent around a single point
    pub fn from_point(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Smallest extent containing every point, `None` when there are none
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut points = points.into_iter();
        let mut extent = Self::from_point(*points.next()?);
        for point in points {
            extent.extend(point);
        }
        Some(extent)
    }

    /// Creates an extent from a center point and size
    pub fn from_center_and_size(center: Point, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self::from_coords(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.min.x, self.max.y)
    }

    pub fn top_right(&self) -> Point {
        self.max
    }

    pub fn bottom_left(&self) -> Point {
        self.min
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.max.x, self.min.y)
    }

    /// Checks if the extent contains a point (edges included)
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if the extent intersects another extent (touching counts)
    pub fn intersects(&self, other: &Extent) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }

    /// Extends the extent to include a point
    pub fn extend(&mut self, point: &Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Union of two extents
    pub fn join(&self, other: &Extent) -> Extent {
        let mut joined = *self;
        joined.extend(&other.min);
        joined.extend(&other.max);
        joined
    }

    /// Returns a new extent grown by `amount` on every side
    pub fn grow(&self, amount: f64) -> Extent {
        Extent::from_coords(
            self.min.x - amount,
            self.min.y - amount,
            self.max.x + amount,
            self.max.y + amount,
        )
    }

    /// Returns this extent limited to `bounds`
    pub fn clamp_to(&self, bounds: &Extent) -> Extent {
        let clamp = |p: &Point| {
            Point::new(
                p.x.clamp(bounds.min.x, bounds.max.x),
                p.y.clamp(bounds.min.y, bounds.max.y),
            )
        };
        Extent::new(clamp(&self.min), clamp(&self.max))
    }

    /// Corners as WGS84 in the order top left, top right, bottom left,
    /// bottom right. The extent is limited to the projected world first.
    pub fn wgs84_corners(&self) -> Result<[Wgs84Coordinate; 4], MapError> {
        let world = self.clamp_to(&Extent::world());
        let corner = |p: Point| WebMercatorCoordinate::from(p).to_wgs84();
        Ok([
            corner(world.top_left())?,
            corner(world.top_right())?,
            corner(world.bottom_left())?,
            corner(world.bottom_right())?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_creation_normalizes_corners() {
        let extent = Extent::new(Point::new(10.0, -5.0), Point::new(-10.0, 5.0));
        assert_eq!(extent.min, Point::new(-10.0, -5.0));
        assert_eq!(extent.max, Point::new(10.0, 5.0));
        assert_eq!(extent.width(), 20.0);
        assert_eq!(extent.height(), 10.0);
        assert_eq!(extent.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_extent_join_and_grow() {
        let a = Extent::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Extent::from_coords(20.0, -5.0, 30.0, 5.0);
        let joined = a.join(&b);
        assert_eq!(joined, Extent::from_coords(0.0, -5.0, 30.0, 10.0));

        let grown = joined.grow(1000.0);
        assert_eq!(grown, Extent::from_coords(-1000.0, -1005.0, 1030.0, 1010.0));
    }

    #[test]
    fn test_extent_intersects_and_contains() {
        let a = Extent::from_coords(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Extent::from_coords(10.0, 10.0, 20.0, 20.0)));
        assert!(!a.intersects(&Extent::from_coords(11.0, 0.0, 20.0, 5.0)));
        assert!(a.contains(&Point::new(5.0, 5.0)));
        assert!(!a.contains(&Point::new(-1.0, 5.0)));
    }

    #[test]
    fn test_from_points() {
        let none: [Point; 0] = [];
        assert!(Extent::from_points(&none).is_none());
        let points = [Point::new(1.0, 2.0), Point::new(-3.0, 4.0)];
        let extent = Extent::from_points(&points).unwrap();
        assert_eq!(extent, Extent::from_coords(-3.0, 2.0, 1.0, 4.0));
    }

    #[test]
    fn test_corners_and_clamp() {
        let extent = Extent::from_coords(-2.0, -1.0, 2.0, 1.0);
        assert_eq!(extent.top_left(), Point::new(-2.0, 1.0));
        assert_eq!(extent.bottom_right(), Point::new(2.0, -1.0));

        let clamped = extent.clamp_to(&Extent::from_coords(-1.0, -1.0, 1.0, 1.0));
        assert_eq!(clamped, Extent::from_coords(-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn test_wgs84_corners_are_clamped_to_world() {
        let beyond = Extent::world().grow(1_000_000.0);
        let [tl, tr, bl, br] = beyond.wgs84_corners().unwrap();
        assert_eq!(tl.longitude(), -180.0);
        assert_eq!(tr.longitude(), 180.0);
        assert!(tl.latitude() > 85.0 && tl.latitude() < 85.1);
        assert!((bl.latitude() + tl.latitude()).abs() < 1e-9);
        assert_eq!(br.longitude(), 180.0);
    }
}
