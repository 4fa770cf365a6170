//! # Adjacency Matrix
//!
//! Dense symmetric bit matrix, one `u64` word per 64 columns.
//!
//! Memory is `N² / 8` bytes: 500 nodes fit in ~31 KB. Networks in the tens
//! of thousands of nodes want an adjacency list instead.

const WORD_BITS: usize = 64;

/// Symmetric, loop-free adjacency relation over `[0, N)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    node_count: usize,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl AdjacencyMatrix {
    /// Creates an empty relation over `node_count` nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        let words_per_row = node_count.div_ceil(WORD_BITS);
        Self {
            node_count,
            words_per_row,
            bits: vec![0; words_per_row * node_count],
        }
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.node_count
    }

    /// Returns true if the relation has no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// Returns true if `i` and `j` are adjacent. Out-of-range indices are never adjacent.
    #[inline]
    #[must_use]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        if i >= self.node_count || j >= self.node_count {
            return false;
        }
        let (word, mask) = self.locate(i, j);
        self.bits[word] & mask != 0
    }

    /// Sets `i ~ j` in both directions. Returns false for self-loops, repeats
    /// and out-of-range indices.
    pub(crate) fn insert(&mut self, i: usize, j: usize) -> bool {
        if i == j || i >= self.node_count || j >= self.node_count || self.contains(i, j) {
            return false;
        }
        let (word, mask) = self.locate(i, j);
        self.bits[word] |= mask;
        let (word, mask) = self.locate(j, i);
        self.bits[word] |= mask;
        true
    }

    /// Neighbours of `node` in ascending order. Empty for out-of-range nodes.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        let row: &[u64] = if node < self.node_count {
            &self.bits[node * self.words_per_row..(node + 1) * self.words_per_row]
        } else {
            &[]
        };
        row.iter().enumerate().flat_map(|(w, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(w * WORD_BITS + bit)
            })
        })
    }

    /// Number of entries in `node`'s row.
    #[must_use]
    pub fn row_count(&self, node: usize) -> usize {
        if node >= self.node_count {
            return 0;
        }
        self.bits[node * self.words_per_row..(node + 1) * self.words_per_row]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Row-major `N×N` matrix of 0/1, the layout a compute kernel expects.
    #[must_use]
    pub fn to_dense_i32(&self) -> Vec<i32> {
        let n = self.node_count;
        let mut dense = vec![0i32; n * n];
        for i in 0..n {
            for j in self.neighbors(i) {
                dense[i * n + j] = 1;
            }
        }
        dense
    }

    /// Checks symmetry and the absence of self-loops.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.node_count)
            .all(|i| !self.contains(i, i) && self.neighbors(i).all(|j| self.contains(j, i)))
    }

    #[inline]
    fn locate(&self, row: usize, col: usize) -> (usize, u64) {
        (
            row * self.words_per_row + col / WORD_BITS,
            1u64 << (col % WORD_BITS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sets_both_directions() {
        let mut adj = AdjacencyMatrix::new(130);
        assert!(adj.insert(3, 129));
        assert!(adj.contains(3, 129));
        assert!(adj.contains(129, 3));
        assert!(!adj.contains(3, 128));
        assert!(adj.is_symmetric());
    }

    #[test]
    fn test_insert_rejects_loops_and_repeats() {
        let mut adj = AdjacencyMatrix::new(4);
        assert!(!adj.insert(2, 2));
        assert!(adj.insert(0, 1));
        assert!(!adj.insert(1, 0));
        assert!(!adj.insert(0, 4));
        assert_eq!(adj.row_count(0), 1);
    }

    #[test]
    fn test_neighbors_ascending_across_words() {
        let mut adj = AdjacencyMatrix::new(200);
        for j in [150, 5, 64, 63, 199] {
            adj.insert(10, j);
        }
        let row: Vec<usize> = adj.neighbors(10).collect();
        assert_eq!(row, vec![5, 63, 64, 150, 199]);
        assert_eq!(adj.neighbors(500).count(), 0);
    }

    #[test]
    fn test_dense_export() {
        let mut adj = AdjacencyMatrix::new(3);
        adj.insert(0, 2);
        assert_eq!(adj.to_dense_i32(), vec![0, 0, 1, 0, 0, 0, 1, 0, 0]);
    }
}
