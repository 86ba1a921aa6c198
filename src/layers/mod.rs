//! Layer model, the two layer handlers and the ordered layer list.

pub mod base;
pub mod handler;
pub mod manager;
pub mod marker;
pub mod ordinary;
pub mod performance;
pub mod tile;

pub use base::{Layer, LayerContent, LayerKey, LayerRole};
pub use handler::{HandlerKind, LayerHandler, VisibilityFilter};
pub use manager::LayerManager;
pub use marker::LocationMarker;
pub use ordinary::{MemoryLayer, OrdinaryHandler};
pub use performance::{FilteredIndexedProvider, PerformanceHandler, RasterizingLayer};
pub use tile::TileLayer;
