//! Hotspot region construction
//!
//! Four representations over one density map: convex-hull polygon areas
//! (PHAR), their incremental variant (i-PHAR), shortest-path road subgraphs
//! (SHAR), and density-gated flood-fill expansions.

pub mod cluster;
pub mod expansion;
pub mod hull;
pub mod incremental;
pub mod subgraph;

use std::collections::BTreeSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisParams;
use crate::density::DensityMap;
use crate::graph::{NodeId, SpatialGraph};

pub use subgraph::ConnectStrategy;

/// Convex-hull geometry of a polygon hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HullGeometry {
    /// Proper convex polygon as a closed boundary ring (first coordinate
    /// repeated at the end)
    Polygon(Vec<[f64; 2]>),

    /// Fully collinear group, degenerated to the segment between its two
    /// extreme member coordinates
    Line([[f64; 2]; 2]),
}

/// Hotspot represented as a convex polygon over clustered nodes.
///
/// Cluster ids are arbitrary and not stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonHotspot {
    pub id: u32,
    pub geometry: HullGeometry,
    /// Member node ids, ascending
    pub members: Vec<NodeId>,
}

/// Hotspot represented as a connected road subgraph over clustered nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphHotspot {
    pub id: u32,
    /// Cluster member nodes
    pub nodes: BTreeSet<NodeId>,
    /// Unordered road edges connecting the members, including path
    /// intermediates
    pub edges: BTreeSet<(NodeId, NodeId)>,
}

/// Hotspot grown by threshold-gated flood fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expansion {
    pub id: u32,
    /// Nodes at or above the density threshold reached from the seed
    pub nodes: BTreeSet<NodeId>,
    /// All edges incident to the cluster, boundary edges to sub-threshold
    /// neighbors included
    pub edges: BTreeSet<(NodeId, NodeId)>,
}

/// Normalize an edge to an unordered (low, high) pair
pub(crate) fn undirected(u: NodeId, v: NodeId) -> (NodeId, NodeId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// PHAR: cluster above-threshold nodes by planar distance and wrap each
/// cluster in a convex-hull polygon.
pub fn polygon_hotspots<G: SpatialGraph>(
    densities: &DensityMap,
    graph: &G,
    params: &AnalysisParams,
) -> Result<Vec<PolygonHotspot>> {
    let groups = cluster::cluster_by_distance(
        densities,
        graph,
        params.density_threshold,
        params.distance_threshold,
    );
    Ok(hull::build_polygons(&groups, graph))
}

/// SHAR: cluster above-threshold nodes, then connect each cluster into a
/// road subgraph via shortest paths.
pub fn subgraph_hotspots<G: SpatialGraph>(
    densities: &DensityMap,
    graph: &G,
    params: &AnalysisParams,
    strategy: ConnectStrategy,
) -> Result<Vec<SubgraphHotspot>> {
    let groups = cluster::cluster_by_distance(
        densities,
        graph,
        params.density_threshold,
        params.distance_threshold,
    );
    subgraph::build_subgraphs(&groups, graph, strategy)
}
