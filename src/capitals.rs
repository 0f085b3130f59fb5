//! Farthest-point placement of starting sites.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::climate::Biome;
use crate::error::GenerationError;
use crate::topology::Topology;

/// Picks `floor(n / 2)` well-separated tiles of `biome`, where `n` is the
/// number of tiles carrying it.
///
/// The first site is random; each later site is the remaining candidate
/// whose distance to its nearest chosen site is largest. The isolation of
/// every tile is kept up to date with one sweep per chosen site.
pub fn select_capitals<R: Rng + ?Sized>(
    topology: &Topology,
    biomes: &[Biome],
    biome: Biome,
    rng: &mut R,
) -> Result<Vec<usize>, GenerationError> {
    let mut remaining: Vec<usize> = biomes
        .iter()
        .enumerate()
        .filter(|(_, tile_biome)| **tile_biome == biome)
        .map(|(tile, _)| tile)
        .collect();
    let available = remaining.len();
    let requested = available / 2;
    let capacity_error = || GenerationError::Capacity {
        biome,
        available,
        requested: requested.max(1),
    };
    if requested == 0 {
        return Err(capacity_error());
    }

    let first = rng.gen_range(0..remaining.len());
    let first = remaining.remove(first);
    let mut chosen = vec![first];
    let mut isolation = topology.bfs_distances(first);

    let mut ties = Vec::new();
    while chosen.len() < requested {
        let Some(best) = remaining.iter().map(|&tile| isolation[tile]).max() else {
            return Err(capacity_error());
        };
        ties.clear();
        ties.extend(
            remaining
                .iter()
                .enumerate()
                .filter(|&(_, &tile)| isolation[tile] == best)
                .map(|(slot, _)| slot),
        );
        let Some(&slot) = ties.choose(rng) else {
            return Err(capacity_error());
        };
        let site = remaining.remove(slot);
        chosen.push(site);
        for (current, distance) in isolation.iter_mut().zip(topology.bfs_distances(site)) {
            *current = (*current).min(distance);
        }
    }
    Ok(chosen)
}
