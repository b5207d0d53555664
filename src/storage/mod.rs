//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, to_string_pretty};

use crate::config::AnalysisParams;
use crate::density::DensityMap;
use crate::graph::RoadGraph;

/// Write hotspot records as pretty-printed JSON to `hotspots.json`
pub fn save_hotspots<T: Serialize>(hotspots: &[T], output_dir: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    let path = Path::new(output_dir).join("hotspots.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&hotspots)?.as_bytes())?;

    log::info!("Saved {} hotspots to {}", hotspots.len(), output_dir);
    Ok(())
}

/// Save run summary information
pub fn save_summary(
    graph: &RoadGraph,
    densities: &DensityMap,
    params: &AnalysisParams,
    incident_count: usize,
    hotspot_count: usize,
    output_dir: &str,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    let above_threshold = densities
        .values()
        .iter()
        .filter(|&&d| d >= params.density_threshold)
        .count();
    let total: f64 = densities.values().iter().sum();

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count,
            "edge_count": graph.edge_count(),
            "avg_degree": if graph.node_count == 0 { 0.0 } else {
                graph.targets.len() as f64 / graph.node_count as f64
            },
        },
        "density_stats": {
            "incident_count": incident_count,
            "max_density": densities.max(),
            "mean_density": if densities.is_empty() { 0.0 } else {
                total / densities.len() as f64
            },
            "nodes_above_threshold": above_threshold,
        },
        "parameters": {
            "bandwidth": params.bandwidth,
            "density_threshold": params.density_threshold,
            "distance_threshold": params.distance_threshold,
        },
        "hotspot_count": hotspot_count,
    });

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}
