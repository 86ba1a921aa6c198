use crate::core::bounds::Extent;

use rstar::{RTree, RTreeObject, AABB};

/// A value indexed by its projected extent
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub bounds: Extent,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(bounds: Extent, data: T) -> Self {
        Self { bounds, data }
    }
}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

/// R-tree over Web Mercator extents
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
    bounds: Option<Extent>,
}

impl<T> SpatialIndex<T> {
    /// Builds a balanced tree in one pass
    pub fn bulk_load(items: Vec<SpatialItem<T>>) -> Self {
        let bounds = items
            .iter()
            .map(|item| item.bounds)
            .reduce(|acc, b| acc.join(&b));

        Self {
            rtree: RTree::bulk_load(items),
            bounds,
        }
    }

    /// Items whose extent touches `bounds`
    pub fn query(&self, bounds: &Extent) -> Vec<&SpatialItem<T>> {
        let envelope = AABB::from_corners(
            [bounds.min.x, bounds.min.y],
            [bounds.max.x, bounds.max.y],
        );
        self.rtree.locate_in_envelope_intersecting(&envelope).collect()
    }

    /// Extent covering every item
    pub fn bounds(&self) -> Option<Extent> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }
}
