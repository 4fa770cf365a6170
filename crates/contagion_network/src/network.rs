//! # Network
//!
//! The immutable product of [`GraphBuilder`](crate::GraphBuilder): adjacency,
//! degree sequence, total degree and display positions.
//!
//! ## Invariants
//!
//! - `adjacent(i, j) ⇔ adjacent(j, i)`, never `adjacent(i, i)`
//! - `degree[i]` equals the number of neighbours of `i`
//! - `sum(degree) == total_degree == 2 × edge_count`

use crate::adjacency::AdjacencyMatrix;
use crate::layout::{circle_positions, Point};

/// A fixed contact network.
#[derive(Clone, Debug)]
pub struct Network {
    adjacency: AdjacencyMatrix,
    degrees: Vec<u32>,
    total_degree: u64,
    positions: Vec<Point>,
}

impl Network {
    /// Creates an edgeless network laid out on a circle of `layout_radius`.
    pub(crate) fn empty(node_count: usize, layout_radius: f32) -> Self {
        Self {
            adjacency: AdjacencyMatrix::new(node_count),
            degrees: vec![0; node_count],
            total_degree: 0,
            positions: circle_positions(node_count, layout_radius),
        }
    }

    /// Connects `i` and `j`: both directions, both degrees and the total in
    /// one call. Returns false (and changes nothing) if the edge is invalid
    /// or already present.
    pub(crate) fn add_edge(&mut self, i: usize, j: usize) -> bool {
        if !self.adjacency.insert(i, j) {
            return false;
        }
        self.degrees[i] += 1;
        self.degrees[j] += 1;
        self.total_degree += 2;
        true
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.degrees.len()
    }

    /// The adjacency relation.
    #[inline]
    #[must_use]
    pub fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adjacency
    }

    /// Returns true if `i` and `j` share an edge.
    #[inline]
    #[must_use]
    pub fn are_adjacent(&self, i: usize, j: usize) -> bool {
        self.adjacency.contains(i, j)
    }

    /// Neighbours of `node` in ascending order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.neighbors(node)
    }

    /// Degree sequence.
    #[inline]
    #[must_use]
    pub fn degrees(&self) -> &[u32] {
        &self.degrees
    }

    /// Degree of `node`, or 0 when out of range.
    #[inline]
    #[must_use]
    pub fn degree(&self, node: usize) -> u32 {
        self.degrees.get(node).copied().unwrap_or(0)
    }

    /// Degree sequence as `i32`, the kernel-boundary layout.
    #[must_use]
    pub fn degrees_i32(&self) -> Vec<i32> {
        self.degrees
            .iter()
            .map(|&d| i32::try_from(d).unwrap_or(i32::MAX))
            .collect()
    }

    /// Running total degree, maintained edge by edge.
    #[inline]
    #[must_use]
    pub fn total_degree(&self) -> u64 {
        self.total_degree
    }

    /// Sum of the degree sequence, recomputed.
    #[must_use]
    pub fn degree_sum(&self) -> u64 {
        self.degrees.iter().map(|&d| u64::from(d)).sum()
    }

    /// Number of undirected edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        usize::try_from(self.total_degree / 2).unwrap_or(usize::MAX)
    }

    /// Each undirected edge once, as `(i, j)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.node_count())
            .flat_map(move |i| self.adjacency.neighbors(i).filter(move |&j| j > i).map(move |j| (i, j)))
    }

    /// Display positions, one per node.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Display position of `node`.
    #[inline]
    #[must_use]
    pub fn position(&self, node: usize) -> Option<Point> {
        self.positions.get(node).copied()
    }

    /// Flat line list `[x_i, y_i, x_j, y_j, ...]`, one segment per edge.
    #[must_use]
    pub fn edge_segments(&self) -> Vec<f32> {
        let mut segments = Vec::with_capacity(self.edge_count() * 4);
        for (i, j) in self.edges() {
            let (a, b) = (self.positions[i], self.positions[j]);
            segments.extend_from_slice(&[a.x, a.y, b.x, b.y]);
        }
        segments
    }
}
