//! CSV ingestion of road networks and incident records
//!
//! Thin collaborator layer in front of the analysis core: callers with their
//! own graph source can skip it entirely and implement
//! [`SpatialGraph`](crate::graph::SpatialGraph) directly.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::density::Incident;
use crate::graph::{RoadGraph, RoadGraphBuilder};

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: i64,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    u: i64,
    v: i64,
    length: f64,
}

/// Load a road network from a nodes CSV (`id,x,y`) and an edges CSV
/// (`u,v,length`). Coordinates must already be projected into a meter-based
/// frame; edge endpoints must appear in the nodes file.
pub fn load_network<P: AsRef<Path>>(nodes_path: P, edges_path: P) -> Result<RoadGraph> {
    let nodes_path = nodes_path.as_ref();
    let edges_path = edges_path.as_ref();

    let mut builder = RoadGraphBuilder::new();

    let mut reader = csv::Reader::from_path(nodes_path)
        .with_context(|| format!("opening node file {}", nodes_path.display()))?;
    for record in reader.deserialize() {
        let node: NodeRecord =
            record.with_context(|| format!("parsing node record in {}", nodes_path.display()))?;
        builder.add_node(node.id, node.x, node.y);
    }

    let mut reader = csv::Reader::from_path(edges_path)
        .with_context(|| format!("opening edge file {}", edges_path.display()))?;
    for record in reader.deserialize() {
        let edge: EdgeRecord =
            record.with_context(|| format!("parsing edge record in {}", edges_path.display()))?;
        builder.add_edge(edge.u, edge.v, edge.length)?;
    }

    let graph = builder.build();
    log::info!(
        "Loaded road network with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count()
    );
    Ok(graph)
}

/// Load incident coordinates from a CSV with `x` and `y` columns, in the same
/// projected frame as the graph
pub fn load_incidents<P: AsRef<Path>>(path: P) -> Result<Vec<Incident>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening incident file {}", path.display()))?;

    let mut incidents = Vec::new();
    for record in reader.deserialize() {
        let incident: Incident =
            record.with_context(|| format!("parsing incident record in {}", path.display()))?;
        incidents.push(incident);
    }

    log::info!("Loaded {} incidents from {}", incidents.len(), path.display());
    Ok(incidents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_network_and_incidents() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let edges_path = dir.path().join("edges.csv");
        let incidents_path = dir.path().join("incidents.csv");

        let mut file = std::fs::File::create(&nodes_path).unwrap();
        writeln!(file, "id,x,y\n10,0.0,0.0\n20,100.0,0.0\n30,200.0,0.0").unwrap();
        let mut file = std::fs::File::create(&edges_path).unwrap();
        writeln!(file, "u,v,length\n10,20,100.0\n20,30,100.0").unwrap();
        let mut file = std::fs::File::create(&incidents_path).unwrap();
        writeln!(file, "x,y\n99.0,2.0").unwrap();

        let graph = load_network(&nodes_path, &edges_path).unwrap();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.external_ids.as_deref(), Some(&[10, 20, 30][..]));

        let incidents = load_incidents(&incidents_path).unwrap();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].x, 99.0);
    }

    #[test]
    fn test_edge_with_unknown_node_fails() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let edges_path = dir.path().join("edges.csv");

        let mut file = std::fs::File::create(&nodes_path).unwrap();
        writeln!(file, "id,x,y\n10,0.0,0.0").unwrap();
        let mut file = std::fs::File::create(&edges_path).unwrap();
        writeln!(file, "u,v,length\n10,99,100.0").unwrap();

        assert!(load_network(&nodes_path, &edges_path).is_err());
    }
}
