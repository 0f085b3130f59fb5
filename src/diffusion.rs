//! Multi-source diffusion of random scalar fields and their ranking into tiers.

use std::fmt;

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{AltitudeConfig, RawRange};
use crate::error::GenerationError;
use crate::topology::Topology;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeTier {
    Abyssal,
    Barrier,
    Shelf,
    Plain,
    Plateau,
    Mountain,
}

impl AltitudeTier {
    pub const ALL: [AltitudeTier; 6] = [
        AltitudeTier::Abyssal,
        AltitudeTier::Barrier,
        AltitudeTier::Shelf,
        AltitudeTier::Plain,
        AltitudeTier::Plateau,
        AltitudeTier::Mountain,
    ];

    pub fn is_maritime(self) -> bool {
        matches!(
            self,
            AltitudeTier::Abyssal | AltitudeTier::Barrier | AltitudeTier::Shelf
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            AltitudeTier::Abyssal => "abyssal",
            AltitudeTier::Barrier => "barrier",
            AltitudeTier::Shelf => "shelf",
            AltitudeTier::Plain => "plain",
            AltitudeTier::Plateau => "plateau",
            AltitudeTier::Mountain => "mountain",
        }
    }
}

impl fmt::Display for AltitudeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityTier {
    Arid,
    SemiArid,
    Fertile,
    Humid,
}

impl HumidityTier {
    pub const ALL: [HumidityTier; 4] = [
        HumidityTier::Arid,
        HumidityTier::SemiArid,
        HumidityTier::Fertile,
        HumidityTier::Humid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HumidityTier::Arid => "arid",
            HumidityTier::SemiArid => "semi-arid",
            HumidityTier::Fertile => "fertile",
            HumidityTier::Humid => "humid",
        }
    }
}

impl fmt::Display for HumidityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quartile cuts for humidity.
pub const HUMIDITY_CUTS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Raw values for every tile plus the reference tiles they were spread from.
#[derive(Debug, Clone)]
pub struct DiffusedField {
    pub values: Vec<f64>,
    pub references: Vec<usize>,
    /// Largest radius needed to cover the graph.
    pub radius: usize,
}

/// Number of reference tiles for a field: proportional to the detail factor,
/// never more than the graph holds.
pub fn reference_count(samples_per_factor: u32, detail_factor: u32, tiles: usize) -> usize {
    ((samples_per_factor as usize) * (detail_factor as usize)).clamp(1, tiles.max(1))
}

/// Seeds `samples` distinct reference tiles with random raw values and
/// spreads them outward one radius at a time.
///
/// At each radius every still-unassigned tile collects the values of all
/// references exactly that far away; once the pass is over, tiles that
/// collected anything take the mean and are settled.
pub fn diffuse_field<R: Rng + ?Sized>(
    topology: &Topology,
    samples: usize,
    range: RawRange,
    rng: &mut R,
) -> Result<DiffusedField, GenerationError> {
    let tiles = topology.len();
    let references = index::sample(rng, tiles, samples.min(tiles)).into_vec();
    let seeds: Vec<f64> = references
        .iter()
        .map(|_| f64::from(rng.gen_range(range.min..=range.max)))
        .collect();

    let mut values = vec![0.0; tiles];
    let mut resolved = vec![false; tiles];
    for (&reference, &value) in references.iter().zip(&seeds) {
        values[reference] = value;
        resolved[reference] = true;
    }

    let layers: Vec<Vec<Vec<usize>>> = references
        .iter()
        .map(|&reference| topology.bfs_layers(reference))
        .collect();

    let mut unresolved = tiles - references.len();
    let mut pending: Vec<Vec<f64>> = vec![Vec::new(); tiles];
    let mut radius = 0;
    while unresolved > 0 {
        radius += 1;
        let mut touched = Vec::new();
        let mut frontier_exists = false;
        for (reference_layers, &value) in layers.iter().zip(&seeds) {
            let Some(layer) = reference_layers.get(radius) else {
                continue;
            };
            frontier_exists = true;
            for &tile in layer {
                if resolved[tile] {
                    continue;
                }
                if pending[tile].is_empty() {
                    touched.push(tile);
                }
                pending[tile].push(value);
            }
        }
        if !frontier_exists {
            return Err(GenerationError::Disconnected { unresolved });
        }

        for tile in touched {
            let inputs = std::mem::take(&mut pending[tile]);
            values[tile] = inputs.iter().sum::<f64>() / inputs.len() as f64;
            resolved[tile] = true;
            unresolved -= 1;
        }
    }

    Ok(DiffusedField {
        values,
        references,
        radius,
    })
}

/// Cumulative upper bounds (as fractions of all tiles) for the six altitude
/// tiers. Sea tiers split the non-land share, land tiers split `land_fraction`.
pub fn altitude_cuts(land_fraction: f64, config: &AltitudeConfig) -> [f64; 6] {
    let sea = 1.0 - land_fraction;
    let abyssal = sea * config.abyssal_share;
    let barrier = abyssal + sea * config.barrier_share;
    let plain = sea + land_fraction * config.plain_share;
    let plateau = plain + land_fraction * config.plateau_share;
    [abyssal, barrier, sea, plain, plateau, 1.0]
}

/// Ranks tiles by raw value and cuts the ranking into contiguous bands.
///
/// Tiles are shuffled before a stable sort, so equal values are ordered by
/// the shuffle. `cuts[i]` is the cumulative fraction of tiles at or below
/// `tiers[i]`.
pub fn rank_into_tiers<T: Copy, R: Rng + ?Sized>(
    values: &[f64],
    tiers: &[T],
    cuts: &[f64],
    rng: &mut R,
) -> Vec<T> {
    debug_assert_eq!(tiers.len(), cuts.len());
    let tiles = values.len();
    let mut order: Vec<usize> = (0..tiles).collect();
    order.shuffle(rng);
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let bounds: Vec<usize> = cuts
        .iter()
        .map(|cut| ((cut * tiles as f64).round() as usize).min(tiles))
        .collect();

    let mut assigned = vec![tiers[0]; tiles];
    let mut band = 0;
    for (rank, &tile) in order.iter().enumerate() {
        while band + 1 < tiers.len() && rank >= bounds[band] {
            band += 1;
        }
        assigned[tile] = tiers[band];
    }
    assigned
}
