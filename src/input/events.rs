use crate::core::coordinates::Wgs84Coordinate;
use serde::Serialize;

/// Events emitted by the map engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapEvent {
    /// Center, resolution or rotation changed. Corners describe the visible
    /// extent, limited to the projected world.
    ViewportChanged {
        center: Wgs84Coordinate,
        resolution: f64,
        top_left: Wgs84Coordinate,
        top_right: Wgs84Coordinate,
        bottom_left: Wgs84Coordinate,
        bottom_right: Wgs84Coordinate,
    },
    /// A pointer press resolved to a world position
    MapClicked { location: Wgs84Coordinate },
}

impl MapEvent {
    /// Name listeners register under
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewportChanged { .. } => "viewportchanged",
            MapEvent::MapClicked { .. } => "mapclicked",
        }
    }
}
