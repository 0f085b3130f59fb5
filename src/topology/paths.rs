use std::collections::VecDeque;

use super::Topology;

/// Distance reported for tiles a sweep never reached.
pub const UNREACHABLE: u32 = u32::MAX;

impl Topology {
    /// Unweighted single-source shortest-path lengths to every tile.
    pub fn bfs_distances(&self, source: usize) -> Vec<u32> {
        let mut distances = vec![UNREACHABLE; self.len()];
        let mut queue = VecDeque::new();
        distances[source] = 0;
        queue.push_back(source);

        while let Some(tile) = queue.pop_front() {
            let next = distances[tile] + 1;
            for neighbor in self.neighbors(tile) {
                if distances[neighbor] == UNREACHABLE {
                    distances[neighbor] = next;
                    queue.push_back(neighbor);
                }
            }
        }
        distances
    }

    /// Tiles grouped by their distance from `source`; layer 0 is the source.
    pub fn bfs_layers(&self, source: usize) -> Vec<Vec<usize>> {
        let distances = self.bfs_distances(source);
        let mut layers: Vec<Vec<usize>> = Vec::new();
        for (tile, &distance) in distances.iter().enumerate() {
            if distance == UNREACHABLE {
                continue;
            }
            let distance = distance as usize;
            if layers.len() <= distance {
                layers.resize_with(distance + 1, Vec::new);
            }
            layers[distance].push(tile);
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use crate::topology::{build_topology, TileCoord};

    #[test]
    fn pole_to_pole_spans_every_ring() {
        let topology = build_topology(4, 5).expect("topology builds");
        let north = topology.position(TileCoord::new(0, 0)).expect("pole");
        let south = topology.position(TileCoord::new(12, 0)).expect("pole");
        let distances = topology.bfs_distances(north);
        assert_eq!(distances[south], 12);
        assert!(distances.iter().all(|&d| d != super::UNREACHABLE));
    }

    #[test]
    fn layers_partition_the_graph() {
        let topology = build_topology(3, 5).expect("topology builds");
        let layers = topology.bfs_layers(17);
        assert_eq!(layers[0], vec![17]);
        assert_eq!(layers[1].len(), topology.links(17).len());
        let total: usize = layers.iter().map(Vec::len).sum();
        assert_eq!(total, topology.len());
    }
}
