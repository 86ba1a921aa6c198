//! Map objects: the caller-facing geometric and visual entities.
//!
//! A [`MapObject`] wraps one [`MapObjectKind`] together with a rendering
//! order and an optional opaque context. Objects are immutable once built and
//! are shared as `Arc<MapObject>` between the caller and the layers holding
//! their features.

pub mod geometry;
pub mod marker;
pub mod style;

pub use geometry::{GeometryObject, LineString, Point, Polygon, Rectangle};
pub use marker::{Label, Pin};

use std::{any::Any, fmt, sync::Arc};

/// Caller-attached data the engine never looks into
pub type ObjectContext = Arc<dyn Any + Send + Sync>;

/// The closed set of drawable entities
#[derive(Debug, Clone, PartialEq)]
pub enum MapObjectKind {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    Rectangle(Rectangle),
    Label(Label),
    Pin(Pin),
}

impl MapObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            MapObjectKind::Point(_) => "point",
            MapObjectKind::LineString(_) => "line_string",
            MapObjectKind::Polygon(_) => "polygon",
            MapObjectKind::Rectangle(_) => "rectangle",
            MapObjectKind::Label(_) => "label",
            MapObjectKind::Pin(_) => "pin",
        }
    }
}

macro_rules! impl_from_kind {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for MapObjectKind {
                fn from(value: $variant) -> Self {
                    MapObjectKind::$variant(value)
                }
            }

            impl From<$variant> for MapObject {
                fn from(value: $variant) -> Self {
                    MapObject::new(value)
                }
            }
        )*
    };
}

impl_from_kind!(Point, LineString, Polygon, Rectangle, Label, Pin);

#[derive(Clone)]
pub struct MapObject {
    kind: MapObjectKind,
    rendering_order: i32,
    context: Option<ObjectContext>,
}

impl MapObject {
    pub fn new(kind: impl Into<MapObjectKind>) -> Self {
        Self {
            kind: kind.into(),
            rendering_order: 0,
            context: None,
        }
    }

    /// Paint order inside a layer; lower values are drawn first
    pub fn with_rendering_order(mut self, rendering_order: i32) -> Self {
        self.rendering_order = rendering_order;
        self
    }

    pub fn with_context<T: Any + Send + Sync>(mut self, context: T) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    pub fn with_shared_context(mut self, context: ObjectContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Wraps the object for handing to the engine
    pub fn shared(self) -> Arc<MapObject> {
        Arc::new(self)
    }

    pub fn kind(&self) -> &MapObjectKind {
        &self.kind
    }

    pub fn rendering_order(&self) -> i32 {
        self.rendering_order
    }

    pub fn context(&self) -> Option<&ObjectContext> {
        self.context.as_ref()
    }

    pub fn context_as<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
    }

    /// Planar geometry view, `None` for labels and pins
    pub fn geometry(&self) -> Option<&dyn GeometryObject> {
        match &self.kind {
            MapObjectKind::Point(g) => Some(g),
            MapObjectKind::LineString(g) => Some(g),
            MapObjectKind::Polygon(g) => Some(g),
            MapObjectKind::Rectangle(g) => Some(g),
            MapObjectKind::Label(_) | MapObjectKind::Pin(_) => None,
        }
    }

    /// Whether `shared` is this object: the same allocation or an equal value
    pub fn is_same(shared: &Arc<MapObject>, other: &MapObject) -> bool {
        std::ptr::eq(Arc::as_ptr(shared), other) || shared.as_ref() == other
    }
}

impl PartialEq for MapObject {
    fn eq(&self, other: &Self) -> bool {
        let same_context = match (&self.context, &other.context) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_context && self.rendering_order == other.rendering_order && self.kind == other.kind
    }
}

impl fmt::Debug for MapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapObject")
            .field("kind", &self.kind)
            .field("rendering_order", &self.rendering_order)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinates::Coordinate;

    fn point(lat: f64, lon: f64) -> MapObject {
        MapObject::from(Point::new(Coordinate::wgs84(lat, lon).unwrap()))
    }

    #[test]
    fn test_defaults_and_builders() {
        let obj = point(1.0, 2.0);
        assert_eq!(obj.rendering_order(), 0);
        assert!(obj.context().is_none());
        assert_eq!(obj.kind().name(), "point");

        let obj = obj.with_rendering_order(3).with_context("tag".to_string());
        assert_eq!(obj.rendering_order(), 3);
        assert_eq!(obj.context_as::<String>().map(String::as_str), Some("tag"));
        assert!(obj.context_as::<u32>().is_none());
    }

    #[test]
    fn test_equality_uses_context_identity() {
        let ctx: ObjectContext = Arc::new(5_u32);
        let a = point(1.0, 2.0).with_shared_context(ctx.clone());
        let b = point(1.0, 2.0).with_shared_context(ctx);
        let c = point(1.0, 2.0).with_context(5_u32);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(point(1.0, 2.0), point(1.0, 2.0).with_rendering_order(1));
    }

    #[test]
    fn test_is_same() {
        let shared = point(1.0, 2.0).shared();
        assert!(MapObject::is_same(&shared, &shared));
        assert!(MapObject::is_same(&shared, &point(1.0, 2.0)));
        assert!(!MapObject::is_same(&shared, &point(1.0, 3.0)));
    }

    #[test]
    fn test_geometry_view() {
        assert!(point(0.0, 0.0).geometry().is_some());
        let pin = MapObject::from(Pin::new(Coordinate::wgs84(0.0, 0.0).unwrap()));
        assert!(pin.geometry().is_none());
    }
}
