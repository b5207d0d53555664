//! Shortest-path subgraph assembly for clustered nodes

use std::collections::BTreeSet;

use anyhow::Result;
use itertools::Itertools;

use crate::graph::{NodeId, SpatialGraph};
use crate::hotspot::{undirected, SubgraphHotspot};

/// How a cluster's members get connected into a road subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectStrategy {
    /// Union the shortest paths between every member pair. O(k^2) path
    /// queries per cluster of size k.
    #[default]
    AllPairs,

    /// Prim's algorithm over pairwise shortest-path lengths; only the chosen
    /// tree's paths contribute edges. Same connectivity, sparser output.
    SpanningTree,
}

/// Connect each node group into a road subgraph.
///
/// Groups with fewer than two members are dropped. Member pairs with no
/// connecting path are skipped, so a cluster straddling disconnected
/// components yields a partial subgraph rather than an error.
pub fn build_subgraphs<G: SpatialGraph>(
    groups: &[Vec<NodeId>],
    graph: &G,
    strategy: ConnectStrategy,
) -> Result<Vec<SubgraphHotspot>> {
    let mut hotspots = Vec::new();

    for (id, group) in groups.iter().enumerate() {
        if group.len() < 2 {
            continue;
        }

        let edges = match strategy {
            ConnectStrategy::AllPairs => all_pairs_edges(group, graph)?,
            ConnectStrategy::SpanningTree => spanning_tree_edges(group, graph)?,
        };

        hotspots.push(SubgraphHotspot {
            id: id as u32,
            nodes: group.iter().copied().collect(),
            edges,
        });
    }

    Ok(hotspots)
}

fn all_pairs_edges<G: SpatialGraph>(
    group: &[NodeId],
    graph: &G,
) -> Result<BTreeSet<(NodeId, NodeId)>> {
    let mut edges = BTreeSet::new();

    for (&a, &b) in group.iter().tuple_combinations() {
        match path_between(graph, a, b)? {
            Some(path) => {
                for (&u, &v) in path.iter().tuple_windows() {
                    edges.insert(undirected(u, v));
                }
            }
            None => continue,
        }
    }

    Ok(edges)
}

/// Shortest path with the per-query error policy applied: recoverable query
/// failures are logged and treated as "no path", fatal backend errors abort
fn path_between<G: SpatialGraph>(
    graph: &G,
    a: NodeId,
    b: NodeId,
) -> Result<Option<Vec<NodeId>>> {
    match graph.shortest_path(a, b) {
        Ok(path) => Ok(path),
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(e) => {
            log::warn!("skipping pair ({}, {}): {}", a, b, e);
            Ok(None)
        }
    }
}

fn spanning_tree_edges<G: SpatialGraph>(
    group: &[NodeId],
    graph: &G,
) -> Result<BTreeSet<(NodeId, NodeId)>> {
    let k = group.len();

    // Pairwise shortest paths and their lengths over the member set
    let mut paths: Vec<Vec<Option<(Vec<NodeId>, f64)>>> = vec![vec![None; k]; k];
    for ((i, &a), (j, &b)) in group.iter().enumerate().tuple_combinations() {
        if let Some(path) = path_between(graph, a, b)? {
            let length = path_length(graph, &path);
            paths[i][j] = Some((path.clone(), length));
            paths[j][i] = Some((path, length));
        }
    }

    // Prim over the member-pair distances, starting from the first member.
    // Unreachable members are left out, mirroring the skip policy above.
    let mut in_tree = vec![false; k];
    in_tree[0] = true;
    let mut edges = BTreeSet::new();

    for _ in 1..k {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..k {
            if !in_tree[i] {
                continue;
            }
            for j in 0..k {
                if in_tree[j] {
                    continue;
                }
                if let Some((_, length)) = &paths[i][j] {
                    if best.map_or(true, |(_, _, best_len)| *length < best_len) {
                        best = Some((i, j, *length));
                    }
                }
            }
        }

        let Some((i, j, _)) = best else {
            break;
        };
        if let Some((path, _)) = &paths[i][j] {
            for (&u, &v) in path.iter().tuple_windows() {
                edges.insert(undirected(u, v));
            }
        }
        in_tree[j] = true;
    }

    Ok(edges)
}

fn path_length<G: SpatialGraph>(graph: &G, path: &[NodeId]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(&u, &v)| graph.edge_length(u, v).unwrap_or(0.0))
        .sum()
}
