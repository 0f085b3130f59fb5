use std::collections::HashSet;

use tracing::debug;

use super::{Direction, Link, SectorType, TileCoord, TileIndex, Topology};
use crate::error::GenerationError;

pub const MIN_FACETS: u32 = 3;
pub const MAX_FACETS: u32 = 5;

/// Builds the tile adjacency graph for a ring lattice.
///
/// Sectors are assigned to every tile before any edge is wired. Each tile's
/// links come from the fixed rule for its sector; the result is rejected if a
/// tile ends up with the wrong neighbor count or an edge lacks its reciprocal.
pub fn build_topology(detail_factor: u32, facets: u32) -> Result<Topology, GenerationError> {
    if detail_factor == 0 {
        return Err(GenerationError::InvalidDetailFactor(detail_factor));
    }
    if !(MIN_FACETS..=MAX_FACETS).contains(&facets) {
        return Err(GenerationError::InvalidFacets(facets));
    }

    let index = TileIndex::new(detail_factor, facets);
    let sectors: Vec<SectorType> = index
        .coords()
        .map(|coord| SectorType::classify(coord, detail_factor))
        .collect();

    let mut links = Vec::with_capacity(index.len());
    for (position, coord) in index.coords().enumerate() {
        let sector = sectors[position];
        let tile_links = sector_links(&index, coord, sector);
        let distinct: HashSet<usize> = tile_links.iter().map(|link| link.target).collect();
        let expected = sector.expected_degree(facets);
        if distinct.len() != expected || tile_links.len() != expected || distinct.contains(&position) {
            return Err(GenerationError::IncompleteTopology {
                coord,
                sector,
                expected,
                actual: distinct.len(),
            });
        }
        links.push(tile_links);
    }

    let topology = Topology {
        coords: index.coords().collect(),
        index,
        sectors,
        links,
    };
    topology.validate_symmetry()?;
    debug!(
        detail_factor,
        facets,
        tiles = topology.len(),
        edges = topology.edge_count(),
        "topology built"
    );
    Ok(topology)
}

/// Neighbor rule for one tile.
///
/// Cap rings split into `facets` segments of `r` tiles (`r` counted from the
/// nearer pole); `s`/`t` is the segment and `j` the position inside it. Belt
/// rings keep their length, so neighbors above sit at `o-1, o` and below at
/// `o, o+1`.
fn sector_links(index: &TileIndex, coord: TileCoord, sector: SectorType) -> Vec<Link> {
    let f = i64::from(index.detail_factor());
    let ring = coord.ring;
    let i = i64::from(ring);
    let o = i64::from(coord.offset);
    let link = |ring: u32, offset: i64, direction: Direction| Link {
        target: index.slot(ring, offset),
        direction,
    };

    let above = ring.wrapping_sub(1);
    let below = ring + 1;

    match sector {
        SectorType::PolarNorth => (0..index.ring_len(1))
            .map(|offset| link(1, i64::from(offset), Direction::S))
            .collect(),
        SectorType::PolarSouth => {
            let ring = index.last_ring() - 1;
            (0..index.ring_len(ring))
                .map(|offset| link(ring, i64::from(offset), Direction::N))
                .collect()
        }
        SectorType::InterNodalPolarNorth => {
            let (r, s) = (i, o / i);
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, s * (r - 1), Direction::N),
                link(below, s * (r + 1) - 1, Direction::SW),
                link(below, s * (r + 1), Direction::S),
                link(below, s * (r + 1) + 1, Direction::SE),
            ]
        }
        SectorType::CentralPolarNorth => {
            let (r, s, j) = (i, o / i, o % i);
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, s * (r - 1) + j - 1, Direction::NW),
                link(above, s * (r - 1) + j, Direction::NE),
                link(below, s * (r + 1) + j, Direction::SW),
                link(below, s * (r + 1) + j + 1, Direction::SE),
            ]
        }
        SectorType::NodalTropicalNorth => {
            let s = o / f;
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, s * (f - 1), Direction::N),
                link(below, o, Direction::SW),
                link(below, o + 1, Direction::SE),
            ]
        }
        SectorType::InterNodalTropicalNorth => {
            let (s, j) = (o / f, o % f);
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, s * (f - 1) + j - 1, Direction::NW),
                link(above, s * (f - 1) + j, Direction::NE),
                link(below, o, Direction::SW),
                link(below, o + 1, Direction::SE),
            ]
        }
        SectorType::Equatorial => vec![
            link(ring, o - 1, Direction::W),
            link(ring, o + 1, Direction::E),
            link(above, o - 1, Direction::NW),
            link(above, o, Direction::NE),
            link(below, o, Direction::SW),
            link(below, o + 1, Direction::SE),
        ],
        SectorType::InterNodalTropicalSouth => {
            let (t, j) = (o / f, o % f);
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, o - 1, Direction::NW),
                link(above, o, Direction::NE),
                link(below, t * (f - 1) + j - 1, Direction::SW),
                link(below, t * (f - 1) + j, Direction::SE),
            ]
        }
        SectorType::NodalTropicalSouth => {
            let t = o / f;
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, o - 1, Direction::NW),
                link(above, o, Direction::NE),
                link(below, t * (f - 1), Direction::S),
            ]
        }
        SectorType::CentralPolarSouth => {
            let r = 3 * f - i;
            let (t, j) = (o / r, o % r);
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, t * (r + 1) + j, Direction::NW),
                link(above, t * (r + 1) + j + 1, Direction::NE),
                link(below, t * (r - 1) + j - 1, Direction::SW),
                link(below, t * (r - 1) + j, Direction::SE),
            ]
        }
        SectorType::InterNodalPolarSouth => {
            let r = 3 * f - i;
            let t = o / r;
            vec![
                link(ring, o - 1, Direction::W),
                link(ring, o + 1, Direction::E),
                link(above, t * (r + 1) - 1, Direction::NW),
                link(above, t * (r + 1), Direction::N),
                link(above, t * (r + 1) + 1, Direction::NE),
                link(below, t * (r - 1), Direction::S),
            ]
        }
    }
}
