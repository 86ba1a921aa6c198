use crate::core::{bounds::Extent, geo::{Point, TileCoord}};
use log::debug;
use serde::{Deserialize, Serialize};

/// Relative tolerance when stepping between resolutions
const RESOLUTION_TOLERANCE: f64 = 1e-9;

/// The navigable view: center, resolution, rotation and size in pixels.
///
/// Positions are Web Mercator meters. Resolution is map units per pixel and
/// snaps to the tile pyramid's levels when zooming in and out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the view in Web Mercator meters
    pub center: Point,
    /// Map units per pixel
    pub resolution: f64,
    /// Counter-clockwise rotation of the map in degrees
    pub rotation: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// Resolutions of levels 0..=max, coarsest first
    resolutions: Vec<f64>,
}

impl Viewport {
    pub fn new(center: Point, resolution: f64, size: Point, max_zoom_level: u8) -> Self {
        let resolutions = (0..=max_zoom_level)
            .map(TileCoord::resolution_for_level)
            .collect();

        Self {
            center,
            resolution,
            rotation: 0.0,
            size,
            resolutions,
        }
    }

    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    /// Level whose resolution is closest to the current one
    pub fn zoom_level(&self) -> usize {
        self.resolutions
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (self.resolution.ln() - a.ln()).abs();
                let db = (self.resolution.ln() - b.ln()).abs();
                da.total_cmp(&db)
            })
            .map(|(level, _)| level)
            .unwrap_or(0)
    }

    pub fn center_on(&mut self, center: Point) {
        self.center = center;
    }

    pub fn center_on_with_resolution(&mut self, center: Point, resolution: f64) {
        self.center = center;
        if resolution > 0.0 {
            self.resolution = resolution;
        }
    }

    /// Moves straight to the destination. Animating the flight is up to the
    /// renderer, which sees the final state.
    pub fn fly_to(&mut self, center: Point, resolution: f64) {
        debug!(
            "flying from ({:.1}, {:.1}) to ({:.1}, {:.1})",
            self.center.x, self.center.y, center.x, center.y
        );
        self.center_on_with_resolution(center, resolution);
    }

    /// Steps to the next finer resolution
    pub fn zoom_in(&mut self) {
        let current = self.resolution * (1.0 - RESOLUTION_TOLERANCE);
        if let Some(&finer) = self.resolutions.iter().find(|&&r| r < current) {
            self.resolution = finer;
        }
    }

    /// Steps to the next coarser resolution
    pub fn zoom_out(&mut self) {
        let current = self.resolution * (1.0 + RESOLUTION_TOLERANCE);
        if let Some(&coarser) = self.resolutions.iter().rev().find(|&&r| r > current) {
            self.resolution = coarser;
        }
    }

    /// Fits the view to `extent`, keeping the whole box visible
    pub fn zoom_to_box(&mut self, extent: &Extent) {
        self.center = extent.center();
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return;
        }

        let resolution = (extent.width() / self.size.x).max(extent.height() / self.size.y);
        if resolution > 0.0 {
            self.resolution = resolution;
        }
    }

    pub fn rotate_to(&mut self, degrees: f64) {
        self.rotation = degrees.rem_euclid(360.0);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = Point::new(width, height);
    }

    /// World position under a screen pixel. Screen y grows downwards.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let offset = Point::new(
            (screen.x - self.size.x / 2.0) * self.resolution,
            (self.size.y / 2.0 - screen.y) * self.resolution,
        );
        self.center
            .add(&offset)
            .rotate_around(&self.center, self.rotation)
    }

    /// Area covered by the view. With a rotation this is the bounding box of
    /// the rotated screen.
    pub fn extent(&self) -> Extent {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(self.size.x, 0.0),
            Point::new(0.0, self.size.y),
            Point::new(self.size.x, self.size.y),
        ]
        .map(|corner| self.screen_to_world(corner));

        Extent::from_points(&corners).unwrap_or_else(|| Extent::from_point(self.center))
    }
}
