// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Pairwise fragment matching
//!
//! The algorithmic heart: for every unordered pair of fragments, count the
//! point pairs closer than the proximity threshold, and declare the fragments
//! adjacent when the count exceeds the match threshold. Exhaustive distance
//! computation, no spatial index; exactness over asymptotic efficiency.

use crate::fragment::Fragment;
use ndarray::Array2;
use rayon::prelude::*;

/// Square, symmetric, zero-diagonal binary matrix over fragment indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    n: usize,
    cells: Vec<u8>,
}

impl AdjacencyMatrix {
    /// Zero-initialized `n × n` matrix
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            cells: vec![0; n * n],
        }
    }

    /// Number of fragments (matrix side length)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[i * self.n + j]
    }

    /// Mark fragments `i` and `j` adjacent, setting both mirror cells
    ///
    /// The diagonal stays zero; marking a fragment adjacent to itself is a
    /// caller bug.
    pub fn mark_adjacent(&mut self, i: usize, j: usize) {
        debug_assert_ne!(i, j);
        self.cells[i * self.n + j] = 1;
        self.cells[j * self.n + i] = 1;
    }

    /// All 1-cells in row-major order
    ///
    /// Scans the full matrix, so every adjacent unordered pair appears twice,
    /// once as `(i, j)` and once as `(j, i)`. The redundancy is part of the
    /// output encoding, not deduplicated.
    pub fn pair_list(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.n {
            for j in 0..self.n {
                if self.get(i, j) == 1 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Count of adjacent unordered pairs
    pub fn num_adjacent(&self) -> usize {
        self.pair_list().len() / 2
    }

    /// Floating-point 0/1 array for persistence
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n, self.n), |(i, j)| f64::from(self.get(i, j)))
    }

    /// Rebuild a matrix from a pair list (test support)
    pub fn from_pairs(n: usize, pairs: &[(usize, usize)]) -> Self {
        let mut matrix = Self::zeros(n);
        for &(i, j) in pairs {
            matrix.cells[i * n + j] = 1;
        }
        matrix
    }
}

/// Number of (point-in-a, point-in-b) pairs with distance strictly below
/// `epsilon`
///
/// Approximates the number of near-coincident surface points between two
/// fragments of the same object.
pub fn match_count(a: &Fragment, b: &Fragment, epsilon: f64) -> usize {
    a.points()
        .iter()
        .map(|p| b.points().iter().filter(|q| (p - *q).norm() < epsilon).count())
        .sum()
}

/// Compute the full pairwise adjacency matrix
///
/// Visits each unordered pair once (strictly lower triangle). A pair is
/// adjacent when its match count strictly exceeds `min_matches`. Pairs are
/// independent, so the loop runs on rayon; the result is deterministic.
pub fn compute_matching(fragments: &[Fragment], epsilon: f64, min_matches: usize) -> AdjacencyMatrix {
    let n = fragments.len();
    let mut matrix = AdjacencyMatrix::zeros(n);

    let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (0..i).map(move |j| (i, j))).collect();

    let adjacent: Vec<(usize, usize)> = pairs
        .into_par_iter()
        .filter(|&(i, j)| match_count(&fragments[i], &fragments[j], epsilon) > min_matches)
        .collect();

    for (i, j) in adjacent {
        matrix.mark_adjacent(i, j);
    }
    matrix
}
