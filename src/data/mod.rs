//! Conversion of map objects into renderer features.

pub mod feature;
pub mod style;

pub use feature::{to_feature, to_features, Feature, FeatureGeometry};
pub use style::{DashPattern, FeatureStyle, FontStyle, LineStyle};
