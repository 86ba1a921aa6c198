//! The map engine: owns the ordered layer list, picks a handler per user
//! layer and keeps desired visibility and filters alive across rebuilds.
//!
//! Every mutating call runs on the caller's thread and finishes before it
//! returns. Layers are never edited into a new shape: a changed user layer is
//! built from scratch by the handler its feature count calls for and swapped
//! into the list, so a render pass only ever sees whole layers.

use crate::{
    core::{
        bounds::Extent,
        config::MapEngineOptions,
        constants::{BASE_MAP_LAYER, POSITION_LAYER},
        coordinates::{Coordinate, WebMercatorCoordinate, Wgs84Coordinate},
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    data::feature::{to_features, Feature},
    input::{events::MapEvent, handler::EventManager},
    layers::{
        base::{Layer, LayerContent, LayerKey},
        handler::{HandlerKind, LayerHandler, VisibilityFilter},
        manager::LayerManager,
        marker::LocationMarker,
        ordinary::OrdinaryHandler,
        performance::PerformanceHandler,
        tile::TileLayer,
    },
    objects::MapObject,
    prelude::HashMap,
    rendering::rasterizer::{LayerImage, Rasterizer},
    tiles::source::{ExternalTileSource, TileProvider},
    MapError, Result,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// The two user layer strategies
#[derive(Debug, Clone, Copy)]
struct Handlers {
    ordinary: OrdinaryHandler,
    performance: PerformanceHandler,
}

impl Handlers {
    fn get(&self, kind: HandlerKind) -> &dyn LayerHandler {
        match kind {
            HandlerKind::Ordinary => &self.ordinary,
            HandlerKind::Performance => &self.performance,
        }
    }

    /// The handler that built `layer`, if any
    fn of(&self, layer: &Layer) -> Option<&dyn LayerHandler> {
        [self.get(HandlerKind::Ordinary), self.get(HandlerKind::Performance)]
            .into_iter()
            .find(|handler| handler.can_handle(layer))
    }
}

pub struct MapEngine {
    options: MapEngineOptions,
    layers: LayerManager,
    handlers: Handlers,
    /// Visibility asked for per z-index, outliving layer rebuilds
    desired_visibility: HashMap<i32, bool>,
    /// Filter asked for per z-index, outliving layer rebuilds
    desired_filter: HashMap<i32, VisibilityFilter>,
    viewport: Viewport,
    events: EventManager,
    is_centered: bool,
}

impl MapEngine {
    pub fn new(options: MapEngineOptions) -> Self {
        let center = options
            .initial_center
            .map(|c| c.to_web_mercator().to_point())
            .unwrap_or_default();
        let viewport = Viewport::new(
            center,
            options.resolved_initial_resolution(),
            Point::new(options.viewport_width, options.viewport_height),
            options.max_zoom_level,
        );

        let mut layers = LayerManager::new();
        layers.insert(Layer::new(
            LayerKey::system_bottom(),
            format!("{}_{}", LayerKey::system_bottom(), BASE_MAP_LAYER),
            LayerContent::Empty,
        ));
        let mut position = Layer::new(
            LayerKey::system_top(),
            format!("{}_{}", LayerKey::system_top(), POSITION_LAYER),
            LayerContent::Marker(LocationMarker::new()),
        );
        position.set_enabled(options.show_location_marker);
        layers.insert(position);

        info!(
            "map engine created: threshold {}, viewport {}x{}",
            options.performance_threshold, options.viewport_width, options.viewport_height
        );

        Self {
            handlers: Handlers {
                ordinary: OrdinaryHandler,
                performance: PerformanceHandler::new(options.tile_cache_capacity),
            },
            is_centered: options.is_centered,
            options,
            layers,
            desired_visibility: HashMap::default(),
            desired_filter: HashMap::default(),
            viewport,
            events: EventManager::new(),
        }
    }

    pub fn options(&self) -> &MapEngineOptions {
        &self.options
    }

    /// Layers in draw order
    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    /// The user layer at `z_index`
    pub fn layer(&self, z_index: i32) -> Option<&Layer> {
        self.layers.get(&LayerKey::user(z_index))
    }

    /// Features currently held at `z_index`
    pub fn features(&self, z_index: i32) -> Vec<Feature> {
        self.layer(z_index)
            .and_then(|layer| Some(self.handlers.of(layer)?.features(layer)))
            .unwrap_or_default()
    }

    pub fn desired_visibility(&self, z_index: i32) -> Option<bool> {
        self.desired_visibility.get(&z_index).copied()
    }

    pub fn has_desired_filter(&self, z_index: i32) -> bool {
        self.desired_filter.contains_key(&z_index)
    }

    // --- user layers -------------------------------------------------------------------------

    /// Adds objects to the layer at `z_index`, rebuilding it
    pub fn add(&mut self, objects: &[Arc<MapObject>], z_index: i32) -> std::result::Result<(), MapError> {
        if objects.is_empty() {
            return Ok(());
        }

        let added = to_features(objects)?;
        let mut features = self.features(z_index);
        features.extend(added);
        self.replace_features(features, z_index);
        Ok(())
    }

    /// Replaces the contents of the layer at `z_index`. An empty set removes
    /// the layer.
    pub fn replace(&mut self, objects: &[Arc<MapObject>], z_index: i32) -> std::result::Result<(), MapError> {
        let features = to_features(objects)?;
        self.replace_features(features, z_index);
        Ok(())
    }

    /// Removes `object` from every user layer holding it. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, object: &MapObject) -> bool {
        let mut removed = false;

        for z_index in self.layers.user_indices() {
            let key = LayerKey::user(z_index);
            let remaining = self.layers.get(&key).and_then(|layer| {
                self.handlers.of(layer)?.try_remove(layer, object)
            });

            let Some(remaining) = remaining else {
                continue;
            };
            removed = true;

            if remaining.is_empty() {
                debug!("last object removed from {key}, dropping layer");
                self.drop_user_layer(z_index);
            } else {
                self.replace_features(remaining, z_index);
            }
        }

        if !removed {
            debug!("remove: object not found in any layer");
        }
        removed
    }

    /// Drops the layer at `z_index` together with its desired state
    pub fn remove_all(&mut self, z_index: i32) {
        self.drop_user_layer(z_index);
    }

    /// Sets the visibility filter for `z_index`. Held until a layer exists
    /// there, then reapplied every time that layer is rebuilt.
    pub fn set_filter<F>(&mut self, z_index: i32, filter: F)
    where
        F: Fn(&MapObject, f64) -> bool + Send + Sync + 'static,
    {
        let filter: VisibilityFilter = Arc::new(filter);
        self.desired_filter.insert(z_index, Arc::clone(&filter));

        let handlers = self.handlers;
        match self.layers.get_mut(&LayerKey::user(z_index)) {
            Some(layer) => {
                if let Some(handler) = handlers.of(layer) {
                    handler.apply_filter(layer, filter);
                }
            }
            None => debug!("filter for user_{z_index} held until the layer exists"),
        }
    }

    /// Shows or hides `z_index`, now or once a layer exists there
    pub fn set_visible(&mut self, z_index: i32, enabled: bool) {
        self.desired_visibility.insert(z_index, enabled);

        match self.layers.get_mut(&LayerKey::user(z_index)) {
            Some(layer) => layer.set_enabled(enabled),
            None => debug!("visibility for user_{z_index} held until the layer exists"),
        }
    }

    /// Drops every rasterized tile so the next render draws afresh
    pub fn refresh(&self) {
        for layer in self.layers.layers() {
            if let LayerContent::Rasterizing(rasterizing) = layer.content() {
                debug!("clearing {} cached tiles of {}", rasterizing.cached_tiles(), layer.name());
                rasterizing.clear_cache();
            }
        }
    }

    fn replace_features(&mut self, features: Vec<Feature>, z_index: i32) {
        if features.is_empty() {
            self.remove_all(z_index);
            return;
        }

        let key = LayerKey::user(z_index);
        let kind = HandlerKind::for_count(features.len(), self.options.performance_threshold);
        let (previous_kind, inherited) = match self.layers.get(&key) {
            Some(layer) => (layer.handler(), Some(layer.is_enabled())),
            None => (None, None),
        };

        if previous_kind.is_some_and(|previous| previous != kind) {
            debug!("{key} switches from {previous_kind:?} to {kind:?} at {} features", features.len());
        }

        let handler = self.handlers.get(kind);
        let mut layer = handler.create_layer(features, z_index);

        let enabled = self
            .desired_visibility
            .get(&z_index)
            .copied()
            .or(inherited)
            .unwrap_or(true);
        layer.set_enabled(enabled);

        if let Some(filter) = self.desired_filter.get(&z_index) {
            debug!("reapplying filter to rebuilt {key}");
            handler.apply_filter(&mut layer, Arc::clone(filter));
        }

        debug!("{key} rebuilt with {} features ({kind:?})", layer.feature_count());
        self.layers.insert(layer);
    }

    fn drop_user_layer(&mut self, z_index: i32) {
        self.layers.remove(&LayerKey::user(z_index));
        self.desired_visibility.remove(&z_index);
        self.desired_filter.remove(&z_index);
    }

    // --- tile layers -------------------------------------------------------------------------

    /// Adds imagery from `provider` at `z_index`, below every user layer.
    /// An existing tile layer at the same z-index is replaced.
    pub fn add_tile_layer(&mut self, provider: Arc<dyn TileProvider>, z_index: i32) {
        let key = LayerKey::tile(z_index);
        let layer = Layer::new(
            key,
            key.to_string(),
            LayerContent::Tiles(TileLayer::new(
                ExternalTileSource::new(provider),
                self.options.tile_cache_capacity,
            )),
        );

        info!("tile layer registered as {key}");
        self.layers.insert(layer);
    }

    pub fn remove_tile_layer(&mut self, z_index: i32) -> bool {
        self.layers.remove(&LayerKey::tile(z_index)).is_some()
    }

    pub fn set_tile_layer_visible(&mut self, z_index: i32, enabled: bool) -> std::result::Result<(), MapError> {
        let layer = self
            .layers
            .get_mut(&LayerKey::tile(z_index))
            .ok_or_else(|| MapError::Layer(format!("no tile layer at {z_index}")))?;
        layer.set_enabled(enabled);
        Ok(())
    }

    pub fn clear_tile_layer_cache(&self, z_index: i32) -> std::result::Result<(), MapError> {
        match self.layers.get(&LayerKey::tile(z_index)).map(Layer::content) {
            Some(LayerContent::Tiles(tiles)) => {
                tiles.clear_cache();
                Ok(())
            }
            _ => Err(MapError::Layer(format!("no tile layer at {z_index}"))),
        }
    }

    /// Backs the base map with imagery from `provider`
    pub fn set_base_map(&mut self, provider: Arc<dyn TileProvider>) {
        let capacity = self.options.tile_cache_capacity;
        let name = format!("{}_{}", LayerKey::system_bottom(), BASE_MAP_LAYER);
        if let Some(layer) = self.layers.find_mut(&name) {
            *layer.content_mut() =
                LayerContent::Tiles(TileLayer::new(ExternalTileSource::new(provider), capacity));
            info!("base map source set");
        }
    }

    // --- location marker ---------------------------------------------------------------------

    fn position_layer_name() -> String {
        format!("{}_{}", LayerKey::system_top(), POSITION_LAYER)
    }

    fn marker(&self) -> Option<&LocationMarker> {
        match self.layers.find(&Self::position_layer_name())?.content() {
            LayerContent::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn show_location_marker(&self) -> bool {
        self.layers
            .find(&Self::position_layer_name())
            .is_some_and(Layer::is_enabled)
    }

    pub fn set_show_location_marker(&mut self, show: bool) {
        if let Some(layer) = self.layers.find_mut(&Self::position_layer_name()) {
            layer.set_enabled(show);
        }
    }

    /// Last position given to [`MapEngine::move_location_marker`]
    pub fn my_location(&self) -> Option<Wgs84Coordinate> {
        self.marker()?.position()
    }

    pub fn is_centered(&self) -> bool {
        self.is_centered
    }

    /// Keeps the view centered on the marker. Turning it on while the marker
    /// is shown recenters right away.
    pub fn set_centered(&mut self, centered: bool) {
        self.is_centered = centered;
        if centered && self.show_location_marker() {
            if let Some(position) = self.my_location() {
                self.viewport.center_on(position.to_web_mercator().to_point());
                self.viewport_changed();
            }
        }
    }

    /// Moves the marker to `location` pointing along `bearing` (degrees
    /// clockwise from north)
    pub fn move_location_marker(
        &mut self,
        location: &Coordinate,
        bearing: f64,
    ) -> std::result::Result<(), MapError> {
        let position = location.to_wgs84()?;
        let rotation = self.viewport.rotation;

        if let Some(layer) = self.layers.find_mut(&Self::position_layer_name()) {
            if let LayerContent::Marker(marker) = layer.content_mut() {
                marker.update(position, bearing, rotation)?;
            }
        }

        if self.is_centered {
            self.viewport.center_on(position.to_web_mercator().to_point());
            self.viewport_changed();
        }
        Ok(())
    }

    // --- viewport ----------------------------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn center_on(&mut self, location: &Coordinate) -> std::result::Result<(), MapError> {
        self.viewport.center_on(location.to_point()?);
        self.viewport_changed();
        Ok(())
    }

    pub fn center_on_with_resolution(
        &mut self,
        location: &Coordinate,
        resolution: f64,
    ) -> std::result::Result<(), MapError> {
        self.viewport
            .center_on_with_resolution(location.to_point()?, resolution);
        self.viewport_changed();
        Ok(())
    }

    pub fn fly_to(&mut self, location: &Coordinate, resolution: f64) -> std::result::Result<(), MapError> {
        self.viewport.fly_to(location.to_point()?, resolution);
        self.viewport_changed();
        Ok(())
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.viewport_changed();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.viewport_changed();
    }

    pub fn rotate_to(&mut self, degrees: f64) {
        self.viewport.rotate_to(degrees);
        let rotation = self.viewport.rotation;
        if let Some(layer) = self.layers.find_mut(&Self::position_layer_name()) {
            if let LayerContent::Marker(marker) = layer.content_mut() {
                if marker.position().is_some() {
                    marker.rotate_with_viewport(rotation);
                }
            }
        }
        self.viewport_changed();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.viewport_changed();
    }

    /// Fits the view to the union of the objects' extents, grown by the
    /// configured margin. Does nothing when no object has an extent.
    pub fn zoom_and_center_on(&mut self, objects: &[Arc<MapObject>]) -> std::result::Result<(), MapError> {
        let extent = to_features(objects)?
            .iter()
            .filter_map(Feature::extent)
            .reduce(|a, b| a.join(&b));

        match extent {
            Some(extent) => {
                self.viewport.zoom_to_box(&extent.grow(self.options.zoom_margin));
                self.viewport_changed();
            }
            None => debug!("zoom_and_center_on: nothing to fit"),
        }
        Ok(())
    }

    /// Resolves a pointer press at screen pixel `x`,`y` and emits
    /// [`MapEvent::MapClicked`]
    pub fn click(&mut self, x: f64, y: f64) -> std::result::Result<Wgs84Coordinate, MapError> {
        let world = self.viewport.screen_to_world(Point::new(x, y));
        let location = WebMercatorCoordinate::from(world).to_wgs84()?;
        self.events.emit(MapEvent::MapClicked { location });
        Ok(location)
    }

    fn viewport_changed(&mut self) {
        let world = Extent::world();
        let center = Extent::from_point(self.viewport.center).clamp_to(&world).center();

        let corners = self.viewport.extent().wgs84_corners();
        let center = WebMercatorCoordinate::from(center).to_wgs84();

        match (center, corners) {
            (Ok(center), Ok([top_left, top_right, bottom_left, bottom_right])) => {
                self.events.emit(MapEvent::ViewportChanged {
                    center,
                    resolution: self.viewport.resolution,
                    top_left,
                    top_right,
                    bottom_left,
                    bottom_right,
                });
            }
            (Err(e), _) | (_, Err(e)) => warn!("viewport cannot be expressed in WGS84: {e}"),
        }
    }

    // --- events ------------------------------------------------------------------------------

    /// Registers a listener for `"viewportchanged"` or `"mapclicked"`
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
    }

    /// Dispatches queued events to listeners and returns them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.events.process_events()
    }

    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    // --- rendering ---------------------------------------------------------------------------

    /// Draws `tile` for every enabled layer, bottom to top. Layers with
    /// nothing in the tile are left out.
    pub async fn render_tile(&self, tile: TileCoord, rasterizer: &dyn Rasterizer) -> Result<Vec<LayerImage>> {
        let mut images = Vec::new();

        for layer in self.layers.layers().iter().filter(|l| l.is_enabled()) {
            if let Some(image) = layer.render(tile, rasterizer).await? {
                images.push(LayerImage {
                    key: layer.key(),
                    name: layer.name().to_string(),
                    image,
                });
            }
        }

        Ok(images)
    }
}

impl Default for MapEngine {
    fn default() -> Self {
        Self::new(MapEngineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Point as PointObject;

    fn point(lat: f64, lon: f64) -> Arc<MapObject> {
        MapObject::from(PointObject::new(Coordinate::wgs84(lat, lon).unwrap())).shared()
    }

    #[test]
    fn test_new_engine_has_system_layers() {
        let engine = MapEngine::default();
        let names: Vec<_> = engine.layers().layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["sys_bottom_baseMap", "sys_top_position"]);
        assert!(!engine.show_location_marker());
        assert!(engine.my_location().is_none());
    }

    #[test]
    fn test_add_then_remove_drops_layer() {
        let mut engine = MapEngine::default();
        let p = point(59.33, 18.06);
        engine.add(&[p.clone()], 0).unwrap();
        assert!(engine.layer(0).is_some());

        assert!(engine.remove(&p));
        assert!(engine.layer(0).is_none());
        assert!(!engine.remove(&p));
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut engine = MapEngine::default();
        engine.add(&[], 3).unwrap();
        assert!(engine.layer(3).is_none());
    }

    #[test]
    fn test_pending_filter_applies_on_creation() {
        let mut engine = MapEngine::default();
        engine.set_filter(0, |_, resolution| resolution < 100.0);
        engine.add(&[point(1.0, 1.0)], 0).unwrap();

        match engine.layer(0).unwrap().content() {
            LayerContent::Memory(memory) => assert!(memory.has_filter()),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_threshold_from_options() {
        let mut engine = MapEngine::new(MapEngineOptions::default().with_performance_threshold(2));
        engine.add(&[point(1.0, 1.0), point(2.0, 2.0)], 0).unwrap();
        assert_eq!(engine.layer(0).unwrap().handler(), Some(HandlerKind::Ordinary));
        engine.add(&[point(3.0, 3.0)], 0).unwrap();
        assert_eq!(engine.layer(0).unwrap().handler(), Some(HandlerKind::Performance));
    }

    #[test]
    fn test_click_emits_event() {
        let mut engine = MapEngine::default();
        let location = engine.click(256.0, 256.0).unwrap();
        assert!(location.latitude().abs() < 1e-9);

        let events = engine.process_events();
        assert_eq!(events, vec![MapEvent::MapClicked { location }]);
    }
}
