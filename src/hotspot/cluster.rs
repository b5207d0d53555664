//! Distance-threshold agglomerative clustering of high-density nodes

use std::collections::BTreeMap;

use kodama::{linkage, Method};

use crate::density::DensityMap;
use crate::graph::{NodeId, SpatialGraph};

/// Union-Find over selected-node indices, used to cut the dendrogram
struct DisjointSets {
    /// Parent pointers (parent[i] = parent of item i)
    parent: Vec<u32>,

    /// Rank/size of each set (for union by rank)
    rank: Vec<u32>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        let mut parent = Vec::with_capacity(size);
        let mut rank = Vec::with_capacity(size);

        // Initialize each item as its own set
        for i in 0..size {
            parent.push(i as u32);
            rank.push(1);
        }

        Self { parent, rank }
    }

    /// Find the root of the set containing x with path compression
    fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Union the sets containing x and y
    fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Union by rank: attach smaller tree under root of larger tree
        let rank_x = self.rank[root_x as usize];
        let rank_y = self.rank[root_y as usize];

        if rank_x > rank_y {
            self.parent[root_y as usize] = root_x;
            self.rank[root_x as usize] += self.rank[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.rank[root_y as usize] += self.rank[root_x as usize];
        }
    }
}

/// Group nodes with density at or above `density_threshold` by average-linkage
/// agglomerative clustering over their planar coordinates, merging until the
/// nearest inter-cluster average distance exceeds `distance_threshold`.
///
/// The returned groups partition the selected node set. Members are ascending
/// by node id and groups are ordered by their smallest member, so the output
/// is deterministic for fixed input. Fewer than two selected nodes yield an
/// empty list.
pub fn cluster_by_distance<G: SpatialGraph>(
    densities: &DensityMap,
    graph: &G,
    density_threshold: f64,
    distance_threshold: f64,
) -> Vec<Vec<NodeId>> {
    let selected: Vec<NodeId> = (0..graph.node_count() as u32)
        .filter(|&node| densities.get(node) >= density_threshold)
        .collect();

    if selected.len() < 2 {
        return Vec::new();
    }

    let n = selected.len();
    let coords: Vec<[f64; 2]> = selected.iter().map(|&node| graph.coord(node)).collect();

    // Condensed upper-triangle dissimilarity matrix, row-major
    let mut condensed = Vec::with_capacity(n * (n - 1) / 2);
    for row in 0..n - 1 {
        for col in row + 1..n {
            condensed.push(euclidean(coords[row], coords[col]));
        }
    }

    let dendrogram = linkage(&mut condensed, n, Method::Average);

    // Cut at the distance threshold. Average linkage is monotone, so applying
    // exactly the merges at or below the threshold equals stopping the
    // agglomeration once the nearest remaining pair exceeds it.
    //
    // Dendrogram steps use SciPy-style labels: leaves are 0..n-1 and merge i
    // creates cluster n+i; leaf_of tracks one representative leaf per label.
    let mut sets = DisjointSets::new(n);
    let mut leaf_of: Vec<usize> = (0..n).collect();
    for step in dendrogram.steps() {
        let a = leaf_of[step.cluster1];
        let b = leaf_of[step.cluster2];
        if step.dissimilarity <= distance_threshold {
            sets.union(a as u32, b as u32);
        }
        leaf_of.push(a);
    }

    // Group selected ids by root; BTreeMap plus ascending selection order
    // keeps the partition reproducible
    let mut groups: BTreeMap<u32, Vec<NodeId>> = BTreeMap::new();
    for (i, &node) in selected.iter().enumerate() {
        let root = sets.find(i as u32);
        groups.entry(root).or_default().push(node);
    }

    let mut out: Vec<Vec<NodeId>> = groups.into_values().collect();
    out.sort_by_key(|group| group[0]);
    out
}

fn euclidean(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RoadGraph, RoadGraphBuilder};

    /// Two tight triads 10km apart, plus one low-density node in between
    fn two_blobs() -> (RoadGraph, DensityMap) {
        let coords = [
            (0.0, 0.0),
            (50.0, 0.0),
            (25.0, 40.0),
            (5000.0, 5000.0),
            (10000.0, 0.0),
            (10050.0, 0.0),
            (10025.0, 40.0),
        ];
        let mut builder = RoadGraphBuilder::new();
        for (i, &(x, y)) in coords.iter().enumerate() {
            builder.add_node(i as i64, x, y);
        }
        let graph = builder.build();

        let mut densities = DensityMap::zeroed(graph.node_count);
        for node in [0, 1, 2, 4, 5, 6] {
            densities.add(node, 2.0);
        }
        densities.add(3, 0.1);
        (graph, densities)
    }

    #[test]
    fn test_splits_far_groups() {
        let (graph, densities) = two_blobs();
        let groups = cluster_by_distance(&densities, &graph, 1.0, 300.0);

        assert_eq!(groups, vec![vec![0, 1, 2], vec![4, 5, 6]]);
    }

    #[test]
    fn test_large_threshold_single_group() {
        let (graph, densities) = two_blobs();
        let groups = cluster_by_distance(&densities, &graph, 1.0, 1e9);

        assert_eq!(groups, vec![vec![0, 1, 2, 4, 5, 6]]);
    }

    #[test]
    fn test_partition_covers_selection_exactly() {
        let (graph, densities) = two_blobs();
        let groups = cluster_by_distance(&densities, &graph, 1.0, 300.0);

        let mut seen: Vec<NodeId> = groups.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 4, 5, 6]);
        assert!(groups.iter().all(|g| !g.is_empty()));
    }

    #[test]
    fn test_fewer_than_two_selected_is_empty() {
        let (graph, mut densities) = two_blobs();
        let groups = cluster_by_distance(&densities, &graph, 10.0, 300.0);
        assert!(groups.is_empty());

        densities.add(0, 100.0);
        let groups = cluster_by_distance(&densities, &graph, 50.0, 300.0);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_repeated_runs_identical() {
        let (graph, densities) = two_blobs();
        let first = cluster_by_distance(&densities, &graph, 1.0, 300.0);
        for _ in 0..5 {
            assert_eq!(cluster_by_distance(&densities, &graph, 1.0, 300.0), first);
        }
    }
}
