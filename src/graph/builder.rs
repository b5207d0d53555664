//! Road graph construction

use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::graph::{NodeId, RoadGraph};

/// Builder for incrementally constructing a RoadGraph
#[derive(Debug, Default)]
pub struct RoadGraphBuilder {
    /// Mapping from external ids (e.g. OSM node ids) to dense indices
    id_to_index: HashMap<i64, u32>,

    /// External ids in insertion order
    external_ids: Vec<i64>,

    /// Planar node coordinates
    coords: Vec<[f64; 2]>,

    /// Adjacency lists as (target, length) pairs
    adjacency: Vec<Vec<(u32, f64)>>,
}

impl RoadGraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with pre-allocated node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            external_ids: Vec::with_capacity(capacity),
            coords: Vec::with_capacity(capacity),
            adjacency: Vec::with_capacity(capacity),
        }
    }

    /// Register a node, or update its coordinate if the id is already known
    pub fn add_node(&mut self, external_id: i64, x: f64, y: f64) -> NodeId {
        if let Some(&idx) = self.id_to_index.get(&external_id) {
            self.coords[idx as usize] = [x, y];
            return idx;
        }

        let idx = self.coords.len() as u32;
        self.id_to_index.insert(external_id, idx);
        self.external_ids.push(external_id);
        self.coords.push([x, y]);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add an undirected edge between two previously registered nodes
    pub fn add_edge(&mut self, u: i64, v: i64, length: f64) -> Result<()> {
        let (Some(&a), Some(&b)) = (self.id_to_index.get(&u), self.id_to_index.get(&v)) else {
            bail!("edge references unknown node: {} - {}", u, v);
        };
        if !(length > 0.0) {
            bail!("edge {} - {} has non-positive length {}", u, v, length);
        }

        self.adjacency[a as usize].push((b, length));
        self.adjacency[b as usize].push((a, length));
        Ok(())
    }

    /// Dense index assigned to an external id, if registered
    pub fn index_of(&self, external_id: i64) -> Option<NodeId> {
        self.id_to_index.get(&external_id).copied()
    }

    /// Build the compressed road graph
    pub fn build(mut self) -> RoadGraph {
        let node_count = self.coords.len();
        let edge_slots: usize = self.adjacency.iter().map(|list| list.len()).sum();

        // Sort adjacency lists so iteration order is deterministic
        for list in &mut self.adjacency {
            list.sort_by(|a, b| {
                a.0.cmp(&b.0)
                    .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            });
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        let mut offset = 0u32;
        for list in &self.adjacency {
            offset += list.len() as u32;
            offsets.push(offset);
        }

        let mut targets = Vec::with_capacity(edge_slots);
        let mut lengths = Vec::with_capacity(edge_slots);
        for list in &self.adjacency {
            for &(target, length) in list {
                targets.push(target);
                lengths.push(length);
            }
        }

        RoadGraph {
            node_count,
            coords: self.coords,
            offsets,
            targets,
            lengths,
            external_ids: Some(self.external_ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_ids_in_insertion_order() {
        let mut builder = RoadGraphBuilder::new();
        assert_eq!(builder.add_node(9001, 0.0, 0.0), 0);
        assert_eq!(builder.add_node(42, 10.0, 0.0), 1);
        assert_eq!(builder.add_node(9001, 1.0, 2.0), 0);
        assert_eq!(builder.index_of(42), Some(1));
        assert_eq!(builder.index_of(7), None);

        let graph = builder.build();
        assert_eq!(graph.node_count, 2);
        assert_eq!(graph.coords[0], [1.0, 2.0]);
        assert_eq!(graph.external_ids.as_deref(), Some(&[9001, 42][..]));
    }

    #[test]
    fn test_edge_requires_known_nodes() {
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(1, 0.0, 0.0);
        assert!(builder.add_edge(1, 2, 100.0).is_err());

        builder.add_node(2, 100.0, 0.0);
        assert!(builder.add_edge(1, 2, 0.0).is_err());
        assert!(builder.add_edge(1, 2, 100.0).is_ok());

        let graph = builder.build();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.degree(1), 1);
    }
}
