//! Nearest-reference plate classification.

use std::fmt;

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::topology::{Topology, UNREACHABLE};

pub const PLATE_COUNT: usize = 24;
pub const REFERENCES_PER_PLATE: usize = 2;
/// Every plate color's channel sum stays above this so it reads on dark maps.
pub const MIN_PLATE_BRIGHTNESS: u16 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plate {
    pub name: &'static str,
    pub label: char,
    pub color: [u8; 3],
}

const fn plate(name: &'static str, label: char, color: [u8; 3]) -> Plate {
    Plate { name, label, color }
}

pub const PLATES: [Plate; PLATE_COUNT] = [
    plate("Alpha", 'α', [230, 80, 80]),
    plate("Beta", 'β', [80, 200, 120]),
    plate("Gamma", 'γ', [90, 140, 240]),
    plate("Delta", 'δ', [240, 200, 60]),
    plate("Epsilon", 'ε', [200, 90, 220]),
    plate("Zeta", 'ζ', [60, 210, 210]),
    plate("Eta", 'η', [250, 140, 70]),
    plate("Theta", 'θ', [160, 230, 90]),
    plate("Iota", 'ι', [120, 110, 250]),
    plate("Kappa", 'κ', [250, 120, 170]),
    plate("Lambda", 'λ', [110, 190, 70]),
    plate("Mu", 'μ', [70, 170, 250]),
    plate("Nu", 'ν', [220, 170, 120]),
    plate("Xi", 'ξ', [180, 120, 90]),
    plate("Omicron", 'ο', [130, 220, 180]),
    plate("Pi", 'π', [240, 240, 140]),
    plate("Rho", 'ρ', [170, 80, 160]),
    plate("Sigma", 'σ', [100, 160, 160]),
    plate("Tau", 'τ', [210, 110, 110]),
    plate("Upsilon", 'υ', [150, 200, 240]),
    plate("Phi", 'φ', [200, 230, 200]),
    plate("Chi", 'χ', [140, 100, 200]),
    plate("Psi", 'ψ', [230, 160, 220]),
    plate("Omega", 'ω', [180, 180, 80]),
];

/// Index into [`PLATES`]; serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlateId(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("plate id {0} is out of range")]
pub struct InvalidPlateId(pub u8);

impl PlateId {
    pub fn new(index: usize) -> Option<Self> {
        (index < PLATE_COUNT).then(|| PlateId(index as u8))
    }

    pub fn all() -> impl Iterator<Item = PlateId> {
        (0..PLATE_COUNT as u8).map(PlateId)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn plate(self) -> &'static Plate {
        &PLATES[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.plate().name
    }

    pub fn label(self) -> char {
        self.plate().label
    }

    pub fn color(self) -> [u8; 3] {
        self.plate().color
    }
}

impl TryFrom<u8> for PlateId {
    type Error = InvalidPlateId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PlateId::new(usize::from(value)).ok_or(InvalidPlateId(value))
    }
}

impl From<PlateId> for u8 {
    fn from(id: PlateId) -> Self {
        id.0
    }
}

impl fmt::Display for PlateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.label())
    }
}

#[derive(Debug, Clone)]
pub struct PlateAssignment {
    pub plates: Vec<PlateId>,
    /// Reference tiles and the plate each was seeded with.
    pub references: Vec<(usize, PlateId)>,
    /// Tiles no reference could reach; assigned at random.
    pub fallbacks: usize,
}

/// Assigns every tile to the plate of its nearest reference tile.
///
/// References are dealt round-robin, so each plate gets one before any plate
/// gets a second. Equidistant references are chosen between at random.
pub fn classify_plates<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> PlateAssignment {
    let tiles = topology.len();
    let wanted = (PLATE_COUNT * REFERENCES_PER_PLATE).min(tiles);
    let references: Vec<(usize, PlateId)> = index::sample(rng, tiles, wanted)
        .into_iter()
        .enumerate()
        .map(|(deal, tile)| (tile, PlateId((deal % PLATE_COUNT) as u8)))
        .collect();

    let mut seeded: Vec<Option<PlateId>> = vec![None; tiles];
    for &(tile, plate) in &references {
        seeded[tile] = Some(plate);
    }

    let sweeps: Vec<Vec<u32>> = references
        .iter()
        .map(|&(tile, _)| topology.bfs_distances(tile))
        .collect();

    let mut plates = Vec::with_capacity(tiles);
    let mut fallbacks = 0;
    let mut nearest: Vec<PlateId> = Vec::with_capacity(references.len());
    for tile in 0..tiles {
        if let Some(plate) = seeded[tile] {
            plates.push(plate);
            continue;
        }

        let best = sweeps
            .iter()
            .map(|distances| distances[tile])
            .min()
            .unwrap_or(UNREACHABLE);
        nearest.clear();
        if best != UNREACHABLE {
            nearest.extend(
                sweeps
                    .iter()
                    .zip(&references)
                    .filter(|(distances, _)| distances[tile] == best)
                    .map(|(_, &(_, plate))| plate),
            );
        }

        let plate = match nearest.choose(rng) {
            Some(&plate) => plate,
            None => {
                fallbacks += 1;
                let plate = PlateId(rng.gen_range(0..PLATE_COUNT as u8));
                warn!(
                    coord = %topology.coord(tile),
                    plate = plate.name(),
                    "tile unreachable from every plate reference, assigned at random"
                );
                plate
            }
        };
        plates.push(plate);
    }

    PlateAssignment {
        plates,
        references,
        fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::topology::build_topology;

    #[test]
    fn catalog_is_bright_and_distinct() {
        let labels: HashSet<char> = PLATES.iter().map(|p| p.label).collect();
        let names: HashSet<&str> = PLATES.iter().map(|p| p.name).collect();
        assert_eq!(labels.len(), PLATE_COUNT);
        assert_eq!(names.len(), PLATE_COUNT);
        for plate in PLATES {
            let brightness: u16 = plate.color.iter().map(|&c| u16::from(c)).sum();
            assert!(brightness > MIN_PLATE_BRIGHTNESS, "{} too dark", plate.name);
        }
    }

    #[test]
    fn unreachable_tile_falls_back_to_a_random_plate() {
        let mut hits = 0;
        for seed in 0..20 {
            let mut topology = build_topology(3, 5).expect("topology builds");
            topology.isolate(41);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let assignment = classify_plates(&topology, &mut rng);
            assert_eq!(assignment.plates.len(), topology.len());
            if assignment.references.iter().any(|&(tile, _)| tile == 41) {
                assert_eq!(assignment.fallbacks, 0);
                continue;
            }
            assert_eq!(assignment.fallbacks, 1);
            assert!(assignment.plates[41].index() < PLATE_COUNT);
            hits += 1;
        }
        assert!(hits > 0, "tile 41 was a reference for every seed");
    }

    #[test]
    fn classification_is_total() {
        let topology = build_topology(4, 5).expect("topology builds");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let assignment = classify_plates(&topology, &mut rng);
        assert_eq!(assignment.plates.len(), topology.len());
        assert_eq!(assignment.references.len(), 48);
        assert_eq!(assignment.fallbacks, 0);
        assert!(assignment.plates.iter().all(|p| p.index() < PLATE_COUNT));
    }

    #[test]
    fn both_references_keep_their_plate() {
        let topology = build_topology(5, 5).expect("topology builds");
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let assignment = classify_plates(&topology, &mut rng);
        for plate in PlateId::all() {
            let seeds: Vec<usize> = assignment
                .references
                .iter()
                .filter(|(_, p)| *p == plate)
                .map(|(tile, _)| *tile)
                .collect();
            assert_eq!(seeds.len(), REFERENCES_PER_PLATE);
            for tile in seeds {
                assert_eq!(assignment.plates[tile], plate);
            }
        }
    }

    #[test]
    fn small_worlds_deal_one_reference_per_plate_first() {
        let topology = build_topology(1, 5).expect("topology builds");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let assignment = classify_plates(&topology, &mut rng);
        assert_eq!(assignment.references.len(), topology.len());
        let dealt: Vec<usize> = assignment.references.iter().map(|(_, p)| p.index()).collect();
        assert_eq!(dealt, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn tiles_follow_a_nearest_reference() {
        let topology = build_topology(4, 5).expect("topology builds");
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let assignment = classify_plates(&topology, &mut rng);
        let sweeps: Vec<Vec<u32>> = assignment
            .references
            .iter()
            .map(|&(tile, _)| topology.bfs_distances(tile))
            .collect();
        for tile in 0..topology.len() {
            let best = sweeps.iter().map(|d| d[tile]).min().expect("references");
            let winners: Vec<PlateId> = sweeps
                .iter()
                .zip(&assignment.references)
                .filter(|(d, _)| d[tile] == best)
                .map(|(_, (_, plate))| *plate)
                .collect();
            assert!(winners.contains(&assignment.plates[tile]));
        }
    }

    #[test]
    fn plate_ids_reject_out_of_range_values() {
        assert_eq!(PlateId::try_from(23).map(PlateId::index), Ok(23));
        assert_eq!(PlateId::try_from(24), Err(InvalidPlateId(24)));
        assert!(serde_json::from_str::<PlateId>("30").is_err());
        assert_eq!(serde_json::to_string(&PlateId(3)).expect("json"), "3");
    }
}
