//! Memory-efficient in-memory road graph backend

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::graph::{GraphError, NodeId, SpatialGraph};

/// Compressed sparse representation of an undirected weighted road network.
///
/// Every edge is stored in both directions, so `targets.len()` is twice the
/// number of undirected edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Planar node coordinates, indexed by node id
    pub coords: Vec<[f64; 2]>,

    /// Offset array: offsets[i] to offsets[i+1] defines the edge range for node i
    pub offsets: Vec<u32>,

    /// Edge target array: concatenated adjacency lists
    pub targets: Vec<u32>,

    /// Edge length array, parallel to `targets`
    pub lengths: Vec<f64>,

    /// Optional mapping from internal node ids to original external ids
    pub external_ids: Option<Vec<i64>>,
}

/// Frontier entry for Dijkstra, ordered as a min-heap on cost.
#[derive(Debug, Clone, Copy, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RoadGraph {
    /// Iterate a node's adjacency as (target, edge length) pairs
    pub fn adjacency(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        self.targets[start..end]
            .iter()
            .copied()
            .zip(self.lengths[start..end].iter().copied())
    }

    /// Degree of a node
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.offsets[node as usize] as usize;
        let end = self.offsets[node as usize + 1] as usize;
        end - start
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    fn dijkstra(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if from == to {
            return Some(vec![from]);
        }

        let mut dist = vec![f64::INFINITY; self.node_count];
        let mut prev = vec![u32::MAX; self.node_count];
        let mut heap = BinaryHeap::new();

        dist[from as usize] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: from,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if node == to {
                break;
            }
            // Stale entry: a shorter route to this node was already settled
            if cost > dist[node as usize] {
                continue;
            }
            for (neighbor, length) in self.adjacency(node) {
                let next = cost + length;
                if next < dist[neighbor as usize] {
                    dist[neighbor as usize] = next;
                    prev[neighbor as usize] = node;
                    heap.push(State {
                        cost: next,
                        node: neighbor,
                    });
                }
            }
        }

        if dist[to as usize].is_infinite() {
            return None;
        }

        // Walk predecessor pointers back to the start
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            current = prev[current as usize];
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

impl SpatialGraph for RoadGraph {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn coord(&self, node: NodeId) -> [f64; 2] {
        self.coords[node as usize]
    }

    fn neighbors(&self, node: NodeId) -> Vec<(NodeId, f64)> {
        self.adjacency(node).collect()
    }

    fn edge_length(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency(a)
            .find(|&(target, _)| target == b)
            .map(|(_, length)| length)
    }

    fn nearest_node(&self, x: f64, y: f64) -> Result<Option<NodeId>, GraphError> {
        let mut best: Option<(NodeId, f64)> = None;
        for (node, coord) in self.coords.iter().enumerate() {
            let dx = coord[0] - x;
            let dy = coord[1] - y;
            let sq = dx * dx + dy * dy;
            // Strict comparison keeps the lowest id on ties
            if best.map_or(true, |(_, best_sq)| sq < best_sq) {
                best = Some((node as u32, sq));
            }
        }
        Ok(best.map(|(node, _)| node))
    }

    fn shortest_path(
        &self,
        from: NodeId,
        to: NodeId,
    ) -> Result<Option<Vec<NodeId>>, GraphError> {
        Ok(self.dijkstra(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraphBuilder;

    fn path_graph(lengths: &[f64]) -> RoadGraph {
        let mut builder = RoadGraphBuilder::new();
        for i in 0..=lengths.len() {
            builder.add_node(i as i64, i as f64 * 100.0, 0.0);
        }
        for (i, &length) in lengths.iter().enumerate() {
            builder.add_edge(i as i64, (i + 1) as i64, length).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_adjacency_is_undirected() {
        let graph = path_graph(&[100.0, 50.0]);
        assert_eq!(graph.neighbors(1), vec![(0, 100.0), (2, 50.0)]);
        assert_eq!(graph.edge_length(2, 1), Some(50.0));
        assert_eq!(graph.edge_length(0, 2), None);
    }

    #[test]
    fn test_nearest_node() {
        let graph = path_graph(&[100.0, 100.0]);
        assert_eq!(graph.nearest_node(90.0, 10.0).unwrap(), Some(1));
        assert_eq!(graph.nearest_node(-50.0, 0.0).unwrap(), Some(0));
    }

    #[test]
    fn test_nearest_node_empty_graph() {
        let graph = RoadGraphBuilder::new().build();
        assert_eq!(graph.nearest_node(0.0, 0.0).unwrap(), None);
    }

    #[test]
    fn test_shortest_path_follows_lengths() {
        // Square with one long diagonal-ish detour: 0-1-2 is shorter than 0-3-2
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(0, 0.0, 0.0);
        builder.add_node(1, 100.0, 0.0);
        builder.add_node(2, 200.0, 0.0);
        builder.add_node(3, 100.0, 500.0);
        builder.add_edge(0, 1, 100.0).unwrap();
        builder.add_edge(1, 2, 100.0).unwrap();
        builder.add_edge(0, 3, 500.0).unwrap();
        builder.add_edge(3, 2, 500.0).unwrap();
        let graph = builder.build();

        let path = graph.shortest_path(0, 2).unwrap().unwrap();
        assert_eq!(path, vec![0, 1, 2]);
    }

    #[test]
    fn test_shortest_path_disconnected() {
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(0, 0.0, 0.0);
        builder.add_node(1, 100.0, 0.0);
        builder.add_node(2, 1000.0, 0.0);
        builder.add_edge(0, 1, 100.0).unwrap();
        let graph = builder.build();

        assert_eq!(graph.shortest_path(0, 2).unwrap(), None);
        assert_eq!(graph.shortest_path(2, 2).unwrap(), Some(vec![2]));
    }
}
