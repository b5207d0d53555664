//! Incremental polygon hotspot updates

use anyhow::Result;

use crate::config::AnalysisParams;
use crate::density;
use crate::density::{DensityMap, Incident};
use crate::graph::SpatialGraph;
use crate::hotspot::{polygon_hotspots, PolygonHotspot};

/// i-PHAR: merge `new_incidents` into an existing density map in place, then
/// rebuild the polygon hotspots from the updated map.
///
/// Prior accumulated density survives the update; the caller owns the map for
/// the duration of the analysis session. `previous` is the prior polygon set,
/// accepted so callers can wire a future polygon-merging strategy; it does not
/// influence the current result.
pub fn update<G: SpatialGraph>(
    densities: &mut DensityMap,
    graph: &G,
    new_incidents: &[Incident],
    params: &AnalysisParams,
    previous: &[PolygonHotspot],
) -> Result<Vec<PolygonHotspot>> {
    let _ = previous;
    density::propagate(graph, new_incidents, params.bandwidth, densities)?;
    polygon_hotspots(densities, graph, params)
}
