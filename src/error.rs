use thiserror::Error;

use crate::climate::Biome;
use crate::topology::{Direction, SectorType, TileCoord};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("detail factor must be at least 1, got {0}")]
    InvalidDetailFactor(u32),

    #[error("facet count must be between 3 and 5, got {0}")]
    InvalidFacets(u32),

    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    #[error(
        "world cannot support the requested number of start sites: \
         {requested} {biome} capitals requested, {available} {biome} tiles available"
    )]
    Capacity {
        biome: Biome,
        available: usize,
        requested: usize,
    },

    #[error("edge {from} -> {to} ({direction}) has no reciprocal")]
    AsymmetricTopology {
        from: TileCoord,
        to: TileCoord,
        direction: Direction,
    },

    #[error("tile {coord} ({sector}) has {actual} neighbors, expected {expected}")]
    IncompleteTopology {
        coord: TileCoord,
        sector: SectorType,
        expected: usize,
        actual: usize,
    },

    #[error("{unresolved} tiles are unreachable from every reference tile")]
    Disconnected { unresolved: usize },
}
