pub mod bounds;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod geo;
pub mod grid;
pub mod map;
pub mod viewport;
