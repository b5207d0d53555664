//! Flood-fill hotspot expansion from high-density seeds

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::density::DensityMap;
use crate::graph::{NodeId, SpatialGraph};
use crate::hotspot::{undirected, Expansion};

/// Grow one expansion per chain of threshold-qualifying nodes.
///
/// Nodes are scanned by density descending, equal densities broken by
/// ascending node id so the output is reproducible. The first unvisited node
/// below the threshold ends the whole scan: everything after it in the sorted
/// order is below threshold too. Each qualifying unvisited node seeds a LIFO
/// flood fill that collects qualifying neighbors and records every incident
/// edge, including boundary edges to sub-threshold neighbors.
pub fn expand<G: SpatialGraph>(
    densities: &DensityMap,
    graph: &G,
    density_threshold: f64,
) -> Vec<Expansion> {
    let mut order: Vec<NodeId> = (0..graph.node_count() as u32).collect();
    order.sort_by(|&a, &b| {
        densities
            .get(b)
            .partial_cmp(&densities.get(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let mut visited = vec![false; graph.node_count()];
    let mut expansions = Vec::new();

    for &seed in &order {
        if visited[seed as usize] {
            continue;
        }
        if densities.get(seed) < density_threshold {
            break;
        }

        let mut frontier = vec![seed];
        let mut nodes = BTreeSet::new();
        let mut edges = BTreeSet::new();

        while let Some(current) = frontier.pop() {
            if visited[current as usize] {
                continue;
            }
            visited[current as usize] = true;
            nodes.insert(current);

            for (neighbor, _) in graph.neighbors(current) {
                if densities.get(neighbor) >= density_threshold
                    && !visited[neighbor as usize]
                {
                    frontier.push(neighbor);
                }
                // Boundary edges stay in the record even when the neighbor
                // fails the threshold
                edges.insert(undirected(current, neighbor));
            }
        }

        expansions.push(Expansion {
            id: expansions.len() as u32,
            nodes,
            edges,
        });
    }

    expansions
}
