//! Road network representation and spatial queries

pub mod builder;
pub mod road;

pub use builder::RoadGraphBuilder;
pub use road::RoadGraph;

use thiserror::Error;

/// Dense internal node index.
pub type NodeId = u32;

/// Errors surfaced by a spatial graph backend.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The backend cannot be reached at all. Callers must abort the run.
    #[error("graph backend unavailable: {0}")]
    Unavailable(String),

    /// A single query failed. Callers may skip it and continue.
    #[error("graph query failed: {0}")]
    Query(String),
}

impl GraphError {
    /// Whether this error should abort the whole analysis
    pub fn is_fatal(&self) -> bool {
        matches!(self, GraphError::Unavailable(_))
    }
}

/// Read-only view of a weighted planar road network.
///
/// Node ids are dense `0..node_count()`. Coordinates and edge lengths must
/// share one projected, meter-based reference frame. The graph is immutable
/// for the duration of an analysis run.
pub trait SpatialGraph {
    /// Number of nodes in the graph
    fn node_count(&self) -> usize;

    /// Planar coordinate of a node
    fn coord(&self, node: NodeId) -> [f64; 2];

    /// Neighbors of a node, each with the length of the connecting edge
    fn neighbors(&self, node: NodeId) -> Vec<(NodeId, f64)>;

    /// Length of the edge between two adjacent nodes, if one exists.
    /// With parallel edges, the first match wins.
    fn edge_length(&self, a: NodeId, b: NodeId) -> Option<f64>;

    /// Node closest to a planar coordinate. `None` on an empty graph.
    fn nearest_node(&self, x: f64, y: f64) -> Result<Option<NodeId>, GraphError>;

    /// Shortest path between two nodes as an ordered node sequence including
    /// both endpoints. `None` if no path exists.
    fn shortest_path(&self, from: NodeId, to: NodeId)
        -> Result<Option<Vec<NodeId>>, GraphError>;
}
