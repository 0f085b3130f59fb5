//! Procedural generation of tiled spherical worlds: lattice topology,
//! diffused terrain fields, tectonic plates, biomes and start sites.

pub mod capitals;
pub mod climate;
pub mod config;
pub mod diffusion;
pub mod error;
pub mod export;
pub mod plates;
pub mod rng;
pub mod topology;
pub mod world;

pub use climate::Biome;
pub use config::{GenerationConfig, PresetLoader};
pub use error::GenerationError;
pub use export::{ExportError, ExportWriter, WorldExport, WorldMetadata};
pub use topology::TileCoord;
pub use world::{
    build_world, build_world_with, Edge, StageReport, Tile, WorldGenerator, WorldTopology,
};
