use crate::layers::base::{Layer, LayerKey, LayerRole};
use log::debug;

/// The ordered list of layers, in the order they are drawn.
///
/// The position of a new layer is recomputed from the current list on every
/// insert by counting the layers that sort before it, so the list stays
/// ordered however often layers are dropped and rebuilt.
#[derive(Debug, Default)]
pub struct LayerManager {
    layers: Vec<Layer>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `layer` at its ordered position, dropping any layer already
    /// holding its key. Returns the replaced layer.
    pub fn insert(&mut self, layer: Layer) -> Option<Layer> {
        let key = layer.key();
        let replaced = if key.index.is_some() {
            self.remove(&key)
        } else {
            None
        };

        let position = self
            .layers
            .iter()
            .filter(|l| l.key().sorts_before(&key))
            .count();

        debug!("inserting {} at position {}", layer.name(), position);
        self.layers.insert(position, layer);
        replaced
    }

    pub fn remove(&mut self, key: &LayerKey) -> Option<Layer> {
        let position = self.position(key)?;
        Some(self.layers.remove(position))
    }

    /// Position of the first layer with `key`
    pub fn position(&self, key: &LayerKey) -> Option<usize> {
        self.layers.iter().position(|l| &l.key() == key)
    }

    pub fn get(&self, key: &LayerKey) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.key() == key)
    }

    pub fn get_mut(&mut self, key: &LayerKey) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| &l.key() == key)
    }

    /// System layer by name
    pub fn find(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    /// Layers in draw order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Z-indices of the user layers, ascending
    pub fn user_indices(&self) -> Vec<i32> {
        self.indices(LayerRole::User)
    }

    pub fn tile_indices(&self) -> Vec<i32> {
        self.indices(LayerRole::Tile)
    }

    fn indices(&self, role: LayerRole) -> Vec<i32> {
        self.layers
            .iter()
            .filter(|l| l.key().role == role)
            .filter_map(|l| l.z_index())
            .collect()
    }

    /// Whether the list is in draw order: bottom system layers, tile layers
    /// by z-index, user layers by z-index, top system layers.
    pub fn is_ordered(&self) -> bool {
        self.layers
            .windows(2)
            .all(|pair| pair[0].key().sorts_before(&pair[1].key()))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{base::LayerContent, handler::HandlerKind};

    fn user(z: i32) -> Layer {
        Layer::user(z, HandlerKind::Ordinary, LayerContent::Empty)
    }

    fn names(manager: &LayerManager) -> Vec<String> {
        manager.layers().iter().map(|l| l.name().to_string()).collect()
    }

    #[test]
    fn test_insert_keeps_bands_in_order() {
        let mut manager = LayerManager::new();
        manager.insert(Layer::new(LayerKey::system_top(), "sys_top_position", LayerContent::Empty));
        manager.insert(Layer::new(LayerKey::system_bottom(), "sys_bottom_baseMap", LayerContent::Empty));
        manager.insert(user(5));
        manager.insert(Layer::new(LayerKey::tile(9), "tile_9", LayerContent::Empty));
        manager.insert(user(-3));
        manager.insert(Layer::new(LayerKey::tile(1), "tile_1", LayerContent::Empty));
        manager.insert(user(2));

        assert_eq!(
            names(&manager),
            vec![
                "sys_bottom_baseMap",
                "tile_1",
                "tile_9",
                "user_-3",
                "user_2",
                "user_5",
                "sys_top_position"
            ]
        );
        assert!(manager.is_ordered());
        assert_eq!(manager.user_indices(), vec![-3, 2, 5]);
        assert_eq!(manager.tile_indices(), vec![1, 9]);
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut manager = LayerManager::new();
        manager.insert(user(1));
        let mut disabled = user(1);
        disabled.set_enabled(false);
        let replaced = manager.insert(disabled);

        assert!(replaced.is_some_and(|l| l.is_enabled()));
        assert_eq!(manager.len(), 1);
        assert!(!manager.get(&LayerKey::user(1)).unwrap().is_enabled());
    }

    #[test]
    fn test_system_layers_keep_insertion_order() {
        let mut manager = LayerManager::new();
        manager.insert(Layer::new(LayerKey::system_bottom(), "first", LayerContent::Empty));
        manager.insert(Layer::new(LayerKey::system_bottom(), "second", LayerContent::Empty));
        assert_eq!(names(&manager), vec!["first", "second"]);
        assert!(manager.find("second").is_some());
    }

    #[test]
    fn test_remove() {
        let mut manager = LayerManager::new();
        manager.insert(user(1));
        assert!(manager.remove(&LayerKey::user(2)).is_none());
        assert!(manager.remove(&LayerKey::user(1)).is_some());
        assert!(manager.is_empty());
    }
}
