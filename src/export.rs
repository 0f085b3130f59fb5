//! JSON persistence for generated worlds.
//!
//! The exported record keeps only what cannot be recomputed: per-tile raw
//! fields, tiers, plate and biome, plus the world header and capitals.
//! Sectors, temperatures, plate colors and all mobility costs are rebuilt on
//! load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::climate::{temperature, tile_mobility_cost, Biome};
use crate::diffusion::{AltitudeTier, HumidityTier};
use crate::error::GenerationError;
use crate::plates::PlateId;
use crate::topology::{build_topology, TileCoord};
use crate::world::{Tile, WorldHeader, WorldTopology};

pub const WORLD_FILE: &str = "world.json";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("exported world does not match its topology: {0}")]
    Mismatch(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub coord: TileCoord,
    pub raw_altitude: f64,
    pub raw_humidity: f64,
    pub altitude: AltitudeTier,
    pub humidity: HumidityTier,
    pub plate: PlateId,
    pub biome: Biome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldExport {
    pub header: WorldHeader,
    pub detail_factor: u32,
    pub facets: u32,
    pub tiles: Vec<TileRecord>,
    pub capitals: Vec<TileCoord>,
}

impl WorldExport {
    pub fn from_world(world: &WorldTopology) -> Self {
        let tiles = world
            .tiles()
            .iter()
            .map(|tile| TileRecord {
                coord: tile.coord,
                raw_altitude: tile.raw_altitude,
                raw_humidity: tile.raw_humidity,
                altitude: tile.altitude,
                humidity: tile.humidity,
                plate: tile.plate,
                biome: tile.biome,
            })
            .collect();
        Self {
            header: world.header().clone(),
            detail_factor: world.detail_factor(),
            facets: world.facets(),
            tiles,
            capitals: world.capitals().to_vec(),
        }
    }

    /// Rebuilds the topology and every derived attribute.
    pub fn into_world(self) -> Result<WorldTopology, ExportError> {
        let topology = build_topology(self.detail_factor, self.facets)?;
        if self.tiles.len() != topology.len() {
            return Err(ExportError::Mismatch(format!(
                "{} tile records for a {}-tile lattice",
                self.tiles.len(),
                topology.len()
            )));
        }

        let mut tiles = Vec::with_capacity(self.tiles.len());
        for (position, record) in self.tiles.into_iter().enumerate() {
            let coord = topology.coord(position);
            if record.coord != coord {
                return Err(ExportError::Mismatch(format!(
                    "record {position} is {} but the lattice expects {coord}",
                    record.coord
                )));
            }
            let temperature =
                temperature(coord.ring, self.detail_factor, record.altitude, record.humidity);
            let biome = Biome::resolve(temperature, record.altitude, record.humidity);
            if biome != record.biome {
                return Err(ExportError::Mismatch(format!(
                    "tile {coord} is recorded as {} but its climate resolves to {biome}",
                    record.biome
                )));
            }
            tiles.push(Tile {
                coord,
                sector: topology.sector(position),
                raw_altitude: record.raw_altitude,
                raw_humidity: record.raw_humidity,
                altitude: record.altitude,
                humidity: record.humidity,
                plate: record.plate,
                temperature,
                biome,
                mobility_cost: tile_mobility_cost(biome, &self.header.mobility),
            });
        }

        let starting_biome = self.header.starting_biome;
        let mut seen = HashSet::new();
        for capital in &self.capitals {
            let biome = topology
                .position(*capital)
                .map(|position| tiles[position].biome);
            if biome != Some(starting_biome) {
                return Err(ExportError::Mismatch(format!(
                    "capital {capital} is not a {starting_biome} tile"
                )));
            }
            if !seen.insert(*capital) {
                return Err(ExportError::Mismatch(format!(
                    "capital {capital} appears twice"
                )));
            }
        }
        let expected = tiles
            .iter()
            .filter(|tile| tile.biome == starting_biome)
            .count()
            / 2;
        if self.capitals.len() != expected {
            return Err(ExportError::Mismatch(format!(
                "{} capitals recorded but {expected} {starting_biome} capitals fit",
                self.capitals.len()
            )));
        }

        Ok(WorldTopology::assemble(
            self.header,
            topology,
            tiles,
            self.capitals,
        ))
    }
}

/// Lightweight summary written next to the world record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMetadata {
    pub name: String,
    pub detail_factor: u32,
    pub facets: u32,
    pub starting_biome: Biome,
    pub capital_count: usize,
    pub tile_count: usize,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
}

impl WorldMetadata {
    pub fn from_world(world: &WorldTopology) -> Self {
        Self {
            name: world.name().to_string(),
            detail_factor: world.detail_factor(),
            facets: world.facets(),
            starting_biome: world.starting_biome(),
            capital_count: world.capitals().len(),
            tile_count: world.tile_count(),
            seed: world.seed(),
            generated_at: Utc::now(),
        }
    }
}

/// Writes each world to `<output_dir>/<name>/`.
pub struct ExportWriter {
    output_dir: PathBuf,
}

impl ExportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn world_dir(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    pub fn write(&self, world: &WorldTopology) -> Result<PathBuf, ExportError> {
        let dir = self.world_dir(world.name());
        fs::create_dir_all(&dir)?;
        let record = serde_json::to_string(&WorldExport::from_world(world))?;
        fs::write(dir.join(WORLD_FILE), record)?;
        let metadata = serde_json::to_string_pretty(&WorldMetadata::from_world(world))?;
        fs::write(dir.join(METADATA_FILE), metadata)?;
        Ok(dir)
    }

    pub fn read_world(&self, name: &str) -> Result<WorldTopology, ExportError> {
        let data = fs::read_to_string(self.world_dir(name).join(WORLD_FILE))?;
        let record: WorldExport = serde_json::from_str(&data)?;
        record.into_world()
    }

    pub fn read_metadata(&self, name: &str) -> Result<WorldMetadata, ExportError> {
        let data = fs::read_to_string(self.world_dir(name).join(METADATA_FILE))?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::world::WorldGenerator;

    fn sample_world() -> WorldTopology {
        let config = GenerationConfig::new(3, Biome::Ocean).with_seed(17);
        WorldGenerator::new(config)
            .and_then(|generator| generator.generate())
            .expect("world generates")
    }

    #[test]
    fn rehydration_restores_derived_attributes() {
        let world = sample_world();
        let restored = WorldExport::from_world(&world)
            .into_world()
            .expect("record matches topology");
        assert_eq!(restored.tiles(), world.tiles());
        assert_eq!(restored.capitals(), world.capitals());
        for (from, edge) in world.edges() {
            let twin = restored.edge_between(from, edge.to).expect("edge kept");
            assert_eq!(twin.mobility_cost, edge.mobility_cost);
            assert_eq!(twin.direction, edge.direction);
        }
    }

    #[test]
    fn rejects_records_for_another_lattice() {
        let mut record = WorldExport::from_world(&sample_world());
        record.detail_factor = 2;
        assert!(matches!(record.into_world(), Err(ExportError::Mismatch(_))));
    }

    #[test]
    fn rejects_inconsistent_biomes() {
        let mut record = WorldExport::from_world(&sample_world());
        let pole = &mut record.tiles[0];
        assert_eq!(pole.biome, Biome::Ice);
        pole.biome = Biome::Desert;
        assert!(matches!(record.into_world(), Err(ExportError::Mismatch(_))));
    }

    #[test]
    fn rejects_misplaced_capitals() {
        let mut record = WorldExport::from_world(&sample_world());
        record.capitals.push(TileCoord::new(0, 0));
        assert!(matches!(record.into_world(), Err(ExportError::Mismatch(_))));
    }

    #[test]
    fn rejects_duplicate_capitals() {
        let mut record = WorldExport::from_world(&sample_world());
        let first = record.capitals[0];
        record.capitals.push(first);
        match record.into_world() {
            Err(ExportError::Mismatch(message)) => assert!(message.contains("twice")),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_capitals() {
        let mut record = WorldExport::from_world(&sample_world());
        record.capitals.pop();
        assert!(matches!(record.into_world(), Err(ExportError::Mismatch(_))));
    }

    #[test]
    fn metadata_summarises_the_world() {
        let world = sample_world();
        let metadata = WorldMetadata::from_world(&world);
        assert_eq!(metadata.tile_count, 92);
        assert_eq!(metadata.capital_count, world.capitals().len());
        assert_eq!(metadata.seed, 17);
        assert_eq!(metadata.starting_biome, Biome::Ocean);
    }
}
