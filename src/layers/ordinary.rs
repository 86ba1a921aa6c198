//! Small user layers: features kept in memory and edited in place.

use crate::{
    core::bounds::Extent,
    data::feature::Feature,
    layers::{
        base::{Layer, LayerContent},
        handler::{HandlerKind, LayerHandler, VisibilityFilter},
    },
    objects::MapObject,
};
/// Directly editable feature collection
#[derive(Default)]
pub struct MemoryLayer {
    features: Vec<Feature>,
    filter: Option<VisibilityFilter>,
}

impl MemoryLayer {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            filter: None,
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn add(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Drops every feature built from `object`, returning how many went
    pub fn remove(&mut self, object: &MapObject) -> usize {
        let before = self.features.len();
        self.features.retain(|f| !f.originates_from(object));
        before - self.features.len()
    }

    pub fn set_filter(&mut self, filter: Option<VisibilityFilter>) {
        self.filter = filter;
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Features touching `extent` that pass the filter at `resolution`, in
    /// paint order. Ties keep insertion order.
    pub fn fetch(&self, extent: &Extent, resolution: f64) -> Vec<&Feature> {
        let mut visible: Vec<&Feature> = self
            .features
            .iter()
            .filter(|f| f.extent().is_some_and(|e| e.intersects(extent)))
            .filter(|f| match &self.filter {
                Some(filter) => filter(f.map_object(), resolution),
                None => true,
            })
            .collect();

        visible.sort_by_key(|f| f.rendering_order());
        visible
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OrdinaryHandler;

impl OrdinaryHandler {
    fn memory<'a>(&self, layer: &'a Layer) -> Option<&'a MemoryLayer> {
        if !self.can_handle(layer) {
            return None;
        }
        match layer.content() {
            LayerContent::Memory(memory) => Some(memory),
            _ => None,
        }
    }
}

impl LayerHandler for OrdinaryHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Ordinary
    }

    fn create_layer(&self, features: Vec<Feature>, z_index: i32) -> Layer {
        Layer::user(
            z_index,
            HandlerKind::Ordinary,
            LayerContent::Memory(MemoryLayer::new(features)),
        )
    }

    fn try_remove(&self, layer: &Layer, object: &MapObject) -> Option<Vec<Feature>> {
        let memory = self.memory(layer)?;
        if !memory.features().iter().any(|f| f.originates_from(object)) {
            return None;
        }

        Some(
            memory
                .features()
                .iter()
                .filter(|f| !f.originates_from(object))
                .cloned()
                .collect(),
        )
    }

    fn features(&self, layer: &Layer) -> Vec<Feature> {
        self.memory(layer)
            .map(|memory| memory.features().to_vec())
            .unwrap_or_default()
    }

    fn apply_filter(&self, layer: &mut Layer, filter: VisibilityFilter) {
        if !self.can_handle(layer) {
            return;
        }
        if let LayerContent::Memory(memory) = layer.content_mut() {
            memory.set_filter(Some(filter));
        }
    }
}
