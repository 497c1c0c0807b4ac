//! Procedural tile-grid world generation library
//!
//! Re-exports modules for use by the binary and tools.

pub mod algorithms;
pub mod ascii;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod heightmap;
pub mod render;
pub mod tilemap;
pub mod tiles;
pub mod world;

pub use algorithms::{Algorithm, StageOutcome};
pub use config::{Preset, WorldConfig};
pub use error::GenError;
pub use grid::Grid;
pub use render::{NullRenderer, Palette, TileRenderer};
pub use tilemap::{Coord, Tilemap};
pub use tiles::{GroundTile, ObjectTile, TileCode};
pub use world::{GenerationReport, Layer, World};
