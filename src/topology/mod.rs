//! Tile lattice over the sphere and its adjacency graph.

mod builder;
mod coord;
mod index;
mod paths;
mod sector;

pub use builder::{build_topology, MAX_FACETS, MIN_FACETS};
pub use coord::{Direction, TileCoord};
pub use index::{GeoPoint, TileIndex};
pub use paths::UNREACHABLE;
pub use sector::SectorType;

use crate::error::GenerationError;

/// Directed half of an adjacency edge, stored on its source tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub target: usize,
    pub direction: Direction,
}

/// The base tile graph: every tile with its sector and labelled neighbors.
///
/// Tiles are addressed by their dense position in [`TileIndex`] order; every
/// link is mirrored by a link in the opposite direction.
#[derive(Debug, Clone)]
pub struct Topology {
    index: TileIndex,
    coords: Vec<TileCoord>,
    sectors: Vec<SectorType>,
    links: Vec<Vec<Link>>,
}

impl Topology {
    pub fn detail_factor(&self) -> u32 {
        self.index.detail_factor()
    }

    pub fn facets(&self) -> u32 {
        self.index.facets()
    }

    pub fn index(&self) -> &TileIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn coords(&self) -> &[TileCoord] {
        &self.coords
    }

    pub fn coord(&self, position: usize) -> TileCoord {
        self.coords[position]
    }

    pub fn position(&self, coord: TileCoord) -> Option<usize> {
        self.index.position(coord)
    }

    pub fn sector(&self, position: usize) -> SectorType {
        self.sectors[position]
    }

    pub fn links(&self, position: usize) -> &[Link] {
        &self.links[position]
    }

    pub fn neighbors(&self, position: usize) -> impl Iterator<Item = usize> + '_ {
        self.links[position].iter().map(|link| link.target)
    }

    /// Undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.links.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Fails on the first edge whose target does not link back with the
    /// opposite direction.
    pub fn validate_symmetry(&self) -> Result<(), GenerationError> {
        for (position, links) in self.links.iter().enumerate() {
            for link in links {
                let reciprocal = self.links[link.target]
                    .iter()
                    .any(|back| back.target == position && back.direction == link.direction.opposite());
                if !reciprocal {
                    return Err(GenerationError::AsymmetricTopology {
                        from: self.coords[position],
                        to: self.coords[link.target],
                        direction: link.direction,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Topology {
    /// Cuts every link into and out of `position`.
    pub(crate) fn isolate(&mut self, position: usize) {
        self.links[position].clear();
        for links in &mut self.links {
            links.retain(|link| link.target != position);
        }
    }
}
