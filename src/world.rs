use std::collections::BTreeMap;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capitals::select_capitals;
use crate::climate::{edge_mobility_cost, temperature, tile_mobility_cost, Biome};
use crate::config::{GenerationConfig, MobilityConfig};
use crate::diffusion::{
    altitude_cuts, diffuse_field, rank_into_tiers, reference_count, AltitudeTier, HumidityTier,
    HUMIDITY_CUTS,
};
use crate::error::GenerationError;
use crate::plates::{classify_plates, PlateId};
use crate::rng::RngManager;
use crate::topology::{build_topology, Direction, GeoPoint, SectorType, TileCoord, Topology};

/// One fully annotated tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub coord: TileCoord,
    pub sector: SectorType,
    pub raw_altitude: f64,
    pub raw_humidity: f64,
    pub altitude: AltitudeTier,
    pub humidity: HumidityTier,
    pub plate: PlateId,
    pub temperature: f64,
    pub biome: Biome,
    pub mobility_cost: f64,
}

impl Tile {
    pub fn plate_color(&self) -> [u8; 3] {
        self.plate.color()
    }

    pub fn plate_label(&self) -> char {
        self.plate.label()
    }

    pub fn biome_color(&self) -> [u8; 3] {
        self.biome.color()
    }
}

/// Directed edge stored on its source tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: TileCoord,
    pub target: usize,
    pub direction: Direction,
    pub mobility_cost: f64,
}

/// World-level values that are not derivable from the tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldHeader {
    pub name: String,
    pub seed: u64,
    pub starting_biome: Biome,
    pub land_fraction: f64,
    pub mobility: MobilityConfig,
}

/// A generated world: the tile graph, every tile's annotations, and the
/// candidate start sites. Immutable once built.
#[derive(Debug, Clone)]
pub struct WorldTopology {
    header: WorldHeader,
    topology: Topology,
    tiles: Vec<Tile>,
    edges: Vec<Vec<Edge>>,
    capitals: Vec<TileCoord>,
}

impl WorldTopology {
    /// Wires edge costs from the tiles' biomes. `tiles` must follow the
    /// topology's position order.
    pub(crate) fn assemble(
        header: WorldHeader,
        topology: Topology,
        tiles: Vec<Tile>,
        capitals: Vec<TileCoord>,
    ) -> Self {
        let edges = (0..topology.len())
            .map(|position| {
                let from = tiles[position].biome;
                topology
                    .links(position)
                    .iter()
                    .map(|link| Edge {
                        to: topology.coord(link.target),
                        target: link.target,
                        direction: link.direction,
                        mobility_cost: edge_mobility_cost(
                            from,
                            tiles[link.target].biome,
                            &header.mobility,
                        ),
                    })
                    .collect()
            })
            .collect();
        Self {
            header,
            topology,
            tiles,
            edges,
            capitals,
        }
    }

    pub fn header(&self) -> &WorldHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn seed(&self) -> u64 {
        self.header.seed
    }

    pub fn starting_biome(&self) -> Biome {
        self.header.starting_biome
    }

    pub fn land_fraction(&self) -> f64 {
        self.header.land_fraction
    }

    pub fn detail_factor(&self) -> u32 {
        self.topology.detail_factor()
    }

    pub fn facets(&self) -> u32 {
        self.topology.facets()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.topology
            .position(coord)
            .map(|position| &self.tiles[position])
    }

    pub fn centroid(&self, coord: TileCoord) -> Option<GeoPoint> {
        self.topology
            .position(coord)
            .map(|_| self.topology.index().centroid(coord))
    }

    /// Outgoing edges of `coord`; empty for coordinates outside the world.
    pub fn neighbors(&self, coord: TileCoord) -> &[Edge] {
        match self.topology.position(coord) {
            Some(position) => &self.edges[position],
            None => &[],
        }
    }

    /// Every directed edge with its source coordinate.
    pub fn edges(&self) -> impl Iterator<Item = (TileCoord, &Edge)> + '_ {
        self.tiles
            .iter()
            .zip(&self.edges)
            .flat_map(|(tile, edges)| edges.iter().map(move |edge| (tile.coord, edge)))
    }

    pub fn edge_between(&self, from: TileCoord, to: TileCoord) -> Option<&Edge> {
        self.neighbors(from).iter().find(|edge| edge.to == to)
    }

    pub fn capitals(&self) -> &[TileCoord] {
        &self.capitals
    }

    pub fn biome_census(&self) -> BTreeMap<Biome, usize> {
        let mut census = BTreeMap::new();
        for tile in &self.tiles {
            *census.entry(tile.biome).or_insert(0) += 1;
        }
        census
    }

    pub fn plate_census(&self) -> BTreeMap<PlateId, usize> {
        let mut census = BTreeMap::new();
        for tile in &self.tiles {
            *census.entry(tile.plate).or_insert(0) += 1;
        }
        census
    }
}

#[derive(Debug, Clone)]
pub struct StageReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

fn timed<T>(
    reports: &mut Vec<StageReport>,
    name: &'static str,
    stage: impl FnOnce() -> Result<T, GenerationError>,
) -> Result<T, GenerationError> {
    let start = Instant::now();
    let output = stage()?;
    let duration_ms = start.elapsed().as_secs_f64() * 1_000.0;
    debug!(stage = name, duration_ms, "stage finished");
    reports.push(StageReport { name, duration_ms });
    Ok(output)
}

/// Runs the whole pipeline for one configuration.
///
/// Stages run in a fixed order: topology, altitude, humidity, plates,
/// climate, capitals, mobility. The random stages each draw from their own
/// named stream.
pub struct WorldGenerator {
    config: GenerationConfig,
}

impl WorldGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn generate(&self) -> Result<WorldTopology, GenerationError> {
        self.generate_with_report().map(|(world, _)| world)
    }

    pub fn generate_with_report(
        &self,
    ) -> Result<(WorldTopology, Vec<StageReport>), GenerationError> {
        let config = &self.config;
        let mut rngs = match config.seed {
            Some(seed) => RngManager::new(seed),
            None => RngManager::from_entropy(),
        };
        let mut reports = Vec::new();

        let topology = timed(&mut reports, "topology", || {
            build_topology(config.detail_factor, config.facets)
        })?;

        let (land_fraction, raw_altitude, altitude) = timed(&mut reports, "altitude", || {
            let mut rng = rngs.stream("altitude");
            let settings = &config.altitude;
            let land_fraction =
                rng.gen_range(settings.land_fraction.min..=settings.land_fraction.max);
            let samples = reference_count(
                settings.samples_per_factor,
                config.detail_factor,
                topology.len(),
            );
            let field = diffuse_field(&topology, samples, settings.raw_range, &mut rng)?;
            let cuts = altitude_cuts(land_fraction, settings);
            let tiers = rank_into_tiers(&field.values, &AltitudeTier::ALL, &cuts, &mut rng);
            Ok((land_fraction, field.values, tiers))
        })?;

        let (raw_humidity, humidity) = timed(&mut reports, "humidity", || {
            let mut rng = rngs.stream("humidity");
            let settings = &config.humidity;
            let samples = reference_count(
                settings.samples_per_factor,
                config.detail_factor,
                topology.len(),
            );
            let field = diffuse_field(&topology, samples, settings.raw_range, &mut rng)?;
            let tiers = rank_into_tiers(&field.values, &HumidityTier::ALL, &HUMIDITY_CUTS, &mut rng);
            Ok((field.values, tiers))
        })?;

        let plates = timed(&mut reports, "plates", || {
            let mut rng = rngs.stream("plates");
            Ok(classify_plates(&topology, &mut rng))
        })?;

        let tiles = timed(&mut reports, "climate", || {
            let tiles = topology
                .coords()
                .iter()
                .enumerate()
                .map(|(position, &coord)| {
                    let temperature = temperature(
                        coord.ring,
                        config.detail_factor,
                        altitude[position],
                        humidity[position],
                    );
                    let biome = Biome::resolve(temperature, altitude[position], humidity[position]);
                    Tile {
                        coord,
                        sector: topology.sector(position),
                        raw_altitude: raw_altitude[position],
                        raw_humidity: raw_humidity[position],
                        altitude: altitude[position],
                        humidity: humidity[position],
                        plate: plates.plates[position],
                        temperature,
                        biome,
                        mobility_cost: tile_mobility_cost(biome, &config.mobility),
                    }
                })
                .collect::<Vec<_>>();
            Ok(tiles)
        })?;

        let biomes: Vec<Biome> = tiles.iter().map(|tile| tile.biome).collect();
        let capitals = timed(&mut reports, "capitals", || {
            let mut rng = rngs.stream("capitals");
            let sites = select_capitals(&topology, &biomes, config.starting_biome, &mut rng)?;
            Ok(sites
                .into_iter()
                .map(|position| topology.coord(position))
                .collect::<Vec<_>>())
        })?;

        let header = WorldHeader {
            name: config.name.clone(),
            seed: rngs.seed(),
            starting_biome: config.starting_biome,
            land_fraction,
            mobility: config.mobility.clone(),
        };
        let world = timed(&mut reports, "mobility", || {
            Ok(WorldTopology::assemble(header, topology, tiles, capitals))
        })?;

        info!(
            name = %world.name(),
            seed = world.seed(),
            tiles = world.tile_count(),
            capitals = world.capitals().len(),
            land_fraction = world.land_fraction(),
            "world generated"
        );
        Ok((world, reports))
    }
}

/// Generates a world with default settings for everything but the inputs.
///
/// The default lattice has five facets, so the world holds `10F² + 2`
/// tiles. Use [`build_world_with`] and [`GenerationConfig::with_facets`]
/// for other facet counts; three facets give `6F² + 2`.
pub fn build_world(
    detail_factor: u32,
    starting_biome: Biome,
    seed: Option<u64>,
) -> Result<WorldTopology, GenerationError> {
    let mut config = GenerationConfig::new(detail_factor, starting_biome);
    config.seed = seed;
    WorldGenerator::new(config)?.generate()
}

/// Validates `config` and generates one world from it.
pub fn build_world_with(config: GenerationConfig) -> Result<WorldTopology, GenerationError> {
    WorldGenerator::new(config)?.generate()
}
