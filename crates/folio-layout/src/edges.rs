#![forbid(unsafe_code)]

//! Edge derivation.
//!
//! Each node connects to its nearest neighbors by Euclidean distance; the
//! collage variant sprinkles in seeded cross-links for density. Edges are
//! undirected and stored normalized (`a < b`), which makes deduplication a
//! set-membership check and rules out self-loops by construction.

use std::collections::HashSet;

use folio_core::geometry::Vec2;
use folio_core::rng::Lcg;

/// An undirected edge between node indices, normalized so `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    /// Create a normalized edge. Returns `None` for a self-loop.
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self { a: i, b: j }),
            std::cmp::Ordering::Greater => Some(Self { a: j, b: i }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Whether the edge touches node `i`.
    pub fn touches(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }
}

/// Connect every node to its `k` nearest neighbors, deduplicated.
///
/// Insertion order follows node index then neighbor distance, so the result
/// is deterministic for a given position list.
pub fn nearest_neighbor_edges(positions: &[Vec2], k: usize) -> Vec<Edge> {
    let n = positions.len();
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for i in 0..n {
        let mut neighbors: Vec<(usize, f32)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, positions[i].distance(positions[j])))
            .collect();
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1));

        for &(j, _) in neighbors.iter().take(k) {
            if let Some(edge) = Edge::new(i, j) {
                if seen.insert(edge) {
                    edges.push(edge);
                }
            }
        }
    }

    edges
}

/// Add up to one seeded pseudo-random cross-link per node.
///
/// Mirrors the nearest-neighbor pass: self-loops and duplicates are skipped
/// rather than retried, so the extra link count varies with the draw.
pub fn cross_links(edges: &mut Vec<Edge>, node_count: usize, rng: &mut Lcg) {
    let mut seen: HashSet<Edge> = edges.iter().copied().collect();
    for i in 0..node_count {
        let target = rng.index(node_count);
        if let Some(edge) = Edge::new(i, target) {
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
}
