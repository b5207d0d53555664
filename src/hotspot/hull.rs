//! Convex-hull polygon construction for clustered nodes

use std::cmp::Ordering;

use geo::{Area, ConvexHull, MultiPoint, Point};

use crate::graph::{NodeId, SpatialGraph};
use crate::hotspot::{HullGeometry, PolygonHotspot};

/// Build one convex-hull polygon per node group.
///
/// Groups with fewer than three members are dropped silently. A group whose
/// hull has zero area (fully collinear members) is emitted as a degenerate
/// line between its two lexicographically extreme coordinates instead of a
/// polygon.
pub fn build_polygons<G: SpatialGraph>(
    groups: &[Vec<NodeId>],
    graph: &G,
) -> Vec<PolygonHotspot> {
    let mut hotspots = Vec::new();

    for (id, group) in groups.iter().enumerate() {
        if group.len() < 3 {
            continue;
        }

        let coords: Vec<[f64; 2]> = group.iter().map(|&node| graph.coord(node)).collect();
        let points: MultiPoint<f64> = coords
            .iter()
            .map(|&[x, y]| Point::new(x, y))
            .collect();
        let hull = points.convex_hull();

        let geometry = if hull.unsigned_area() > 0.0 {
            let ring = hull
                .exterior()
                .coords()
                .map(|c| [c.x, c.y])
                .collect::<Vec<_>>();
            HullGeometry::Polygon(ring)
        } else {
            HullGeometry::Line(extreme_pair(&coords))
        };

        hotspots.push(PolygonHotspot {
            id: id as u32,
            geometry,
            members: group.clone(),
        });
    }

    hotspots
}

/// Lexicographic min and max coordinates; for a collinear set these are the
/// segment endpoints
fn extreme_pair(coords: &[[f64; 2]]) -> [[f64; 2]; 2] {
    let mut min = coords[0];
    let mut max = coords[0];
    for &coord in &coords[1..] {
        if lex_cmp(coord, min) == Ordering::Less {
            min = coord;
        }
        if lex_cmp(coord, max) == Ordering::Greater {
            max = coord;
        }
    }
    [min, max]
}

fn lex_cmp(a: [f64; 2], b: [f64; 2]) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RoadGraph, RoadGraphBuilder};

    fn graph_with_coords(coords: &[(f64, f64)]) -> RoadGraph {
        let mut builder = RoadGraphBuilder::new();
        for (i, &(x, y)) in coords.iter().enumerate() {
            builder.add_node(i as i64, x, y);
        }
        builder.build()
    }

    #[test]
    fn test_triangle_group_yields_closed_ring() {
        let graph = graph_with_coords(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let hotspots = build_polygons(&[vec![0, 1, 2]], &graph);

        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0].members, vec![0, 1, 2]);
        match &hotspots[0].geometry {
            HullGeometry::Polygon(ring) => {
                assert_eq!(ring.len(), 4);
                assert_eq!(ring.first(), ring.last());
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_interior_points_excluded_from_hull() {
        let graph = graph_with_coords(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
            (50.0, 50.0),
        ]);
        let hotspots = build_polygons(&[vec![0, 1, 2, 3, 4]], &graph);

        match &hotspots[0].geometry {
            HullGeometry::Polygon(ring) => {
                // Square ring: 4 corners plus the closing coordinate
                assert_eq!(ring.len(), 5);
                assert!(!ring.contains(&[50.0, 50.0]));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_collinear_group_degenerates_to_line() {
        let graph = graph_with_coords(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]);
        let hotspots = build_polygons(&[vec![0, 1, 2]], &graph);

        assert_eq!(hotspots.len(), 1);
        assert_eq!(
            hotspots[0].geometry,
            HullGeometry::Line([[0.0, 0.0], [200.0, 0.0]])
        );
    }

    #[test]
    fn test_small_groups_dropped() {
        let graph = graph_with_coords(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let hotspots = build_polygons(&[vec![0, 1], vec![2]], &graph);
        assert!(hotspots.is_empty());
    }
}
