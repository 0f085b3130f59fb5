use serde::{Deserialize, Serialize};

use super::TileCoord;

/// Approximate tile centroid in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

/// Enumerates the tiles of a ring lattice.
///
/// Rings run from the north pole (ring 0) to the south pole (ring 3F). Cap
/// rings grow by `facets` tiles per ring, belt rings all hold `facets * F`.
#[derive(Debug, Clone)]
pub struct TileIndex {
    detail_factor: u32,
    facets: u32,
    ring_starts: Vec<usize>,
    len: usize,
}

impl TileIndex {
    pub fn new(detail_factor: u32, facets: u32) -> Self {
        let mut index = Self {
            detail_factor,
            facets,
            ring_starts: Vec::with_capacity(3 * detail_factor as usize + 1),
            len: 0,
        };
        let mut start = 0usize;
        for ring in 0..=index.last_ring() {
            index.ring_starts.push(start);
            start += index.ring_len(ring) as usize;
        }
        index.len = start;
        index
    }

    pub fn detail_factor(&self) -> u32 {
        self.detail_factor
    }

    pub fn facets(&self) -> u32 {
        self.facets
    }

    pub fn last_ring(&self) -> u32 {
        3 * self.detail_factor
    }

    pub fn ring_len(&self, ring: u32) -> u32 {
        let f = self.detail_factor;
        let k = self.facets;
        if ring == 0 || ring == 3 * f {
            1
        } else if ring <= f {
            k * ring
        } else if ring <= 2 * f {
            k * f
        } else {
            k * (3 * f - ring)
        }
    }

    /// Tile count: `2 * facets * F^2 + 2`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..=self.last_ring())
            .flat_map(move |ring| (0..self.ring_len(ring)).map(move |offset| TileCoord::new(ring, offset)))
    }

    pub fn position(&self, coord: TileCoord) -> Option<usize> {
        if coord.ring > self.last_ring() || coord.offset >= self.ring_len(coord.ring) {
            return None;
        }
        Some(self.ring_starts[coord.ring as usize] + coord.offset as usize)
    }

    /// Dense index of `offset` on `ring`, wrapping the offset around the ring.
    pub(crate) fn slot(&self, ring: u32, offset: i64) -> usize {
        let len = i64::from(self.ring_len(ring));
        self.ring_starts[ring as usize] + offset.rem_euclid(len) as usize
    }

    pub fn coord(&self, position: usize) -> Option<TileCoord> {
        if position >= self.len {
            return None;
        }
        let ring = match self.ring_starts.binary_search(&position) {
            Ok(ring) => ring,
            Err(next) => next - 1,
        };
        Some(TileCoord::new(
            ring as u32,
            (position - self.ring_starts[ring]) as u32,
        ))
    }

    /// Latitude falls linearly with ring index; longitude follows the
    /// segment layout, with the belt shearing half a tile west per ring.
    pub fn centroid(&self, coord: TileCoord) -> GeoPoint {
        let f = f64::from(self.detail_factor);
        let k = f64::from(self.facets);
        let ring = f64::from(coord.ring);
        let offset = f64::from(coord.offset);
        let latitude = 90.0 - 180.0 * ring / (3.0 * f);

        let turns = if coord.ring == 0 || coord.ring == self.last_ring() {
            0.0
        } else if coord.ring <= self.detail_factor {
            offset / (k * ring)
        } else if coord.ring <= 2 * self.detail_factor {
            (offset - (ring - f) / 2.0) / (k * f)
        } else {
            let segment = 3.0 * f - ring;
            let t = (offset / segment).floor();
            let j = offset - t * segment;
            (t + j / segment - 0.5) / k
        };

        GeoPoint {
            latitude,
            longitude: (turns * 360.0).rem_euclid(360.0),
        }
    }
}
