//! The contract shared by the two strategies a user layer can be built with.

use crate::{data::feature::Feature, layers::base::Layer, objects::MapObject};
use std::sync::Arc;

/// Decides per object and map resolution whether a feature is drawn
pub type VisibilityFilter = Arc<dyn Fn(&MapObject, f64) -> bool + Send + Sync>;

/// Tag recorded on each user layer naming the handler that built it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// In-memory, directly editable features
    Ordinary,
    /// Spatially indexed features rasterized into cached tiles
    Performance,
}

impl HandlerKind {
    /// Strategy for a layer holding `count` features. Layers above
    /// `threshold` are rasterized.
    pub fn for_count(count: usize, threshold: usize) -> Self {
        if count > threshold {
            HandlerKind::Performance
        } else {
            HandlerKind::Ordinary
        }
    }
}

pub trait LayerHandler: Send + Sync {
    fn kind(&self) -> HandlerKind;

    /// Builds a fresh layer for `z_index` holding `features`
    fn create_layer(&self, features: Vec<Feature>, z_index: i32) -> Layer;

    /// Features left after excising everything that came from `object`.
    /// `None` if the layer was not built by this handler or holds no feature
    /// of `object`.
    fn try_remove(&self, layer: &Layer, object: &MapObject) -> Option<Vec<Feature>>;

    fn features(&self, layer: &Layer) -> Vec<Feature>;

    /// Installs a visibility filter on a layer built by this handler
    fn apply_filter(&self, layer: &mut Layer, filter: VisibilityFilter);

    fn can_handle(&self, layer: &Layer) -> bool {
        layer.handler() == Some(self.kind())
    }
}
