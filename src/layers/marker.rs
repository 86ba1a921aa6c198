use crate::{
    core::coordinates::Wgs84Coordinate,
    data::feature::{to_feature, Feature},
    objects::{MapObject, Pin},
    MapError,
};
use log::warn;

/// The live position marker shown in the top system layer
#[derive(Debug, Default)]
pub struct LocationMarker {
    position: Option<Wgs84Coordinate>,
    /// Degrees clockwise from north, relative to the map
    bearing: f64,
    /// Degrees, relative to the screen
    direction: f64,
    feature: Option<Feature>,
}

impl LocationMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Option<Wgs84Coordinate> {
        self.position
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Direction the marker points on screen
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Moves the marker. `viewport_rotation` turns the map bearing into a
    /// screen direction.
    pub fn update(
        &mut self,
        position: Wgs84Coordinate,
        bearing: f64,
        viewport_rotation: f64,
    ) -> Result<(), MapError> {
        let object = MapObject::from(Pin::new(position)).shared();
        self.feature = Some(to_feature(&object)?);
        self.position = Some(position);
        self.bearing = bearing;
        self.direction = (bearing - viewport_rotation).rem_euclid(360.0);
        Ok(())
    }

    /// Re-derives the screen direction after the viewport rotated
    pub fn rotate_with_viewport(&mut self, viewport_rotation: f64) {
        if self.position.is_none() {
            warn!("rotating a location marker that has no position");
        }
        self.direction = (self.bearing - viewport_rotation).rem_euclid(360.0);
    }

    pub fn feature(&self) -> Option<&Feature> {
        self.feature.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_sets_direction_relative_to_rotation() {
        let mut marker = LocationMarker::new();
        assert!(marker.position().is_none());
        assert!(marker.feature().is_none());

        let position = Wgs84Coordinate::new(59.33, 18.06).unwrap();
        marker.update(position, 30.0, 45.0).unwrap();

        assert_eq!(marker.position(), Some(position));
        assert_eq!(marker.bearing(), 30.0);
        assert_eq!(marker.direction(), 345.0);
        assert!(marker.feature().is_some());

        marker.rotate_with_viewport(0.0);
        assert_eq!(marker.direction(), 30.0);
    }
}
