use crate::{
    core::{coordinates::Wgs84Coordinate, geo::TileCoord},
    MapError,
};
use serde::Serialize;

/// A tile address together with the geographic area it covers.
///
/// This is what external tile providers receive: they usually key their
/// imagery by `level/col/row`, but some want the corners to run a bounding
/// box query instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileMetadata {
    pub col: u32,
    pub row: u32,
    pub level: u8,
    pub top_left: Wgs84Coordinate,
    pub top_right: Wgs84Coordinate,
    pub bottom_left: Wgs84Coordinate,
    pub bottom_right: Wgs84Coordinate,
}

impl TileMetadata {
    pub fn from_tile(tile: TileCoord) -> Result<Self, MapError> {
        if !tile.is_valid() {
            return Err(MapError::Tile(format!(
                "tile {}/{}/{} is outside the pyramid",
                tile.level, tile.col, tile.row
            )));
        }

        let [top_left, top_right, bottom_left, bottom_right] = tile.extent().wgs84_corners()?;
        Ok(Self {
            col: tile.col,
            row: tile.row,
            level: tile.level,
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }

    pub fn tile(&self) -> TileCoord {
        TileCoord::new(self.col, self.row, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_covers_the_world() {
        let meta = TileMetadata::from_tile(TileCoord::new(0, 0, 0)).unwrap();
        assert_eq!(meta.top_left.longitude(), -180.0);
        assert_eq!(meta.bottom_right.longitude(), 180.0);
        assert!((meta.top_left.latitude() - 85.0511).abs() < 1e-3);
        assert!((meta.bottom_left.latitude() + 85.0511).abs() < 1e-3);
        assert_eq!(meta.tile(), TileCoord::new(0, 0, 0));
    }

    #[test]
    fn test_col_is_east_west() {
        // Level 1: col 1 is the eastern half, row 1 the southern half
        let meta = TileMetadata::from_tile(TileCoord::new(1, 0, 1)).unwrap();
        assert!(meta.top_left.longitude().abs() < 1e-6);
        assert_eq!(meta.top_right.longitude(), 180.0);
        assert!(meta.bottom_left.latitude().abs() < 1e-6);
        assert!(meta.top_left.latitude() > 85.0);
    }

    #[test]
    fn test_invalid_tile() {
        assert!(matches!(
            TileMetadata::from_tile(TileCoord::new(2, 0, 1)),
            Err(MapError::Tile(_))
        ));
    }
}
