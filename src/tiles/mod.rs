pub mod cache;
pub mod metadata;
pub mod source;

// Re-exports for convenience
pub use cache::TileCache;
pub use metadata::TileMetadata;
pub use source::{ExternalTileSource, TileProvider};
