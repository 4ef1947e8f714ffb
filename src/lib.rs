pub mod config;
pub mod directory;
pub mod engine;
pub mod grid;
pub mod model;
pub mod observability;
pub mod render;
pub mod snapshot;
