//! Incident density propagation over the road network
//!
//! Each incident snaps to its nearest graph node and spreads a unit of weight
//! outward along edges, discounted by `exp(-path_length / bandwidth)` and cut
//! off once the traversed path exceeds the bandwidth. The traversal pops its
//! frontier last-in-first-out, so the distance used for decay at a node is the
//! length of whichever path reached it first, not necessarily the shortest.
//! That discipline is part of the method's observable behavior and is kept
//! as-is.

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, SpatialGraph};

/// One crime occurrence, already projected into the graph's reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub x: f64,
    pub y: f64,
}

/// Accumulated per-node density, dense over all graph nodes.
///
/// Values start at zero, only ever grow, and persist across incremental
/// updates within one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityMap {
    values: Vec<f64>,
}

impl DensityMap {
    /// A zero-initialized map covering `node_count` nodes
    pub fn zeroed(node_count: usize) -> Self {
        Self {
            values: vec![0.0; node_count],
        }
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map covers no nodes
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Accumulated density at a node
    pub fn get(&self, node: NodeId) -> f64 {
        self.values[node as usize]
    }

    /// Add weight to a node's accumulator
    pub fn add(&mut self, node: NodeId, weight: f64) {
        self.values[node as usize] += weight;
    }

    /// All values, indexed by node id
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Elementwise sum with another map of the same size
    pub fn merge(&mut self, other: &DensityMap) {
        debug_assert_eq!(self.values.len(), other.values.len());
        for (value, &extra) in self.values.iter_mut().zip(&other.values) {
            *value += extra;
        }
    }

    /// Largest accumulated density, zero on an empty map
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Merge the incidents' contributions into `densities` in place.
///
/// The map must cover the graph's nodes. In-place mutation is what the
/// incremental polygon update relies on: prior accumulated weight survives.
/// An incident with no nearby node (empty graph) is skipped with a warning;
/// a fatal backend error aborts.
pub fn propagate<G: SpatialGraph>(
    graph: &G,
    incidents: &[Incident],
    bandwidth: f64,
    densities: &mut DensityMap,
) -> Result<()> {
    let mut visited = vec![false; graph.node_count()];

    for incident in incidents {
        let seed = match graph.nearest_node(incident.x, incident.y) {
            Ok(Some(node)) => node,
            Ok(None) => {
                log::warn!(
                    "no graph node near incident at ({}, {}), skipping",
                    incident.x,
                    incident.y
                );
                continue;
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                log::warn!("nearest-node lookup failed, skipping incident: {}", e);
                continue;
            }
        };

        visited.fill(false);
        propagate_from(graph, seed, bandwidth, densities, &mut visited);
    }

    Ok(())
}

/// Compute a fresh density map for the incidents
pub fn compute<G: SpatialGraph>(
    graph: &G,
    incidents: &[Incident],
    bandwidth: f64,
) -> Result<DensityMap> {
    let mut densities = DensityMap::zeroed(graph.node_count());
    propagate(graph, incidents, bandwidth, &mut densities)?;
    Ok(densities)
}

/// Parallel variant of [`compute`].
///
/// Incidents propagate independently into thread-local maps which are then
/// summed, so the result matches the serial version up to floating-point
/// summation order.
pub fn compute_par<G: SpatialGraph + Sync>(
    graph: &G,
    incidents: &[Incident],
    bandwidth: f64,
) -> Result<DensityMap> {
    let node_count = graph.node_count();

    incidents
        .par_iter()
        .try_fold(
            || DensityMap::zeroed(node_count),
            |mut local, incident| -> Result<DensityMap> {
                propagate(graph, std::slice::from_ref(incident), bandwidth, &mut local)?;
                Ok(local)
            },
        )
        .try_reduce(
            || DensityMap::zeroed(node_count),
            |mut left, right| {
                left.merge(&right);
                Ok(left)
            },
        )
}

/// Bandwidth-bounded depth-first spread from one seed node.
///
/// The visited set is per-incident; each incident gets to contribute to every
/// node it can reach. Neighbors are pushed without dedup, duplicates are
/// discarded at pop time.
fn propagate_from<G: SpatialGraph>(
    graph: &G,
    seed: NodeId,
    bandwidth: f64,
    densities: &mut DensityMap,
    visited: &mut [bool],
) {
    let mut frontier = vec![(seed, 0.0f64)];

    while let Some((current, dist)) = frontier.pop() {
        if visited[current as usize] {
            continue;
        }
        visited[current as usize] = true;

        densities.add(current, (-dist / bandwidth).exp());

        for (neighbor, edge_length) in graph.neighbors(current) {
            let candidate = dist + edge_length;
            if candidate <= bandwidth {
                frontier.push((neighbor, candidate));
            }
        }
    }
}
