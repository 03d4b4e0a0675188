//! Pairwise similarity matrices over ordered collections of text units

use super::calculator::{GraphSimilarity, NGramGraphSimilarity};
use crate::graph::builder::NGramGraphCreator;
use crate::graph::ngram::NGramGraph;
use crate::types::TextUnit;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Sparse symmetric similarity matrix over elements `0..len`.
///
/// Every element carries a self-loop of weight 1. Off-diagonal entries are
/// stored only when positive.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    len: usize,
    /// (row, col) -> similarity, both orientations stored
    entries: FxHashMap<(u32, u32), f64>,
}

impl SimilarityMatrix {
    /// Create an identity matrix (self-loops only) over `len` elements
    pub fn identity(len: usize) -> Self {
        let entries = (0..len as u32).map(|i| ((i, i), 1.0)).collect();
        Self { len, entries }
    }

    /// Record a symmetric similarity between two distinct elements.
    ///
    /// Self-loops and non-positive values are ignored.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i == j || value <= 0.0 || i >= self.len || j >= self.len {
            return;
        }
        self.entries.insert((i as u32, j as u32), value);
        self.entries.insert((j as u32, i as u32), value);
    }

    /// Similarity between two elements, 0 when unrecorded
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.entries
            .get(&(i as u32, j as u32))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the matrix covers no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored entries, self-loops included
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over stored `(row, col, value)` entries in arbitrary order
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.entries
            .iter()
            .map(|(&(i, j), &v)| (i as usize, j as usize, v))
    }
}

/// Builds similarity matrices from text units or prebuilt graphs.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrixBuilder<S = NGramGraphSimilarity> {
    creator: NGramGraphCreator,
    calculator: S,
}

impl SimilarityMatrixBuilder {
    /// Create a builder using the given graph creator and the default calculator
    pub fn new(creator: NGramGraphCreator) -> Self {
        Self {
            creator,
            calculator: NGramGraphSimilarity,
        }
    }
}

impl<S: GraphSimilarity> SimilarityMatrixBuilder<S> {
    /// Use a different similarity calculator
    pub fn with_calculator<T: GraphSimilarity>(self, calculator: T) -> SimilarityMatrixBuilder<T> {
        SimilarityMatrixBuilder {
            creator: self.creator,
            calculator,
        }
    }

    /// Build the matrix for `units`.
    ///
    /// Each unit's graph is built once, held for the pairwise scan and
    /// released before returning.
    pub fn build(&self, units: &[TextUnit]) -> SimilarityMatrix {
        let graphs = self.creator.build_all(units);
        let matrix = self.build_from_graphs(&graphs);
        drop(graphs);
        matrix
    }

    /// Build the matrix from graphs the caller already holds.
    ///
    /// Every unordered pair is compared exactly once; the entry is the
    /// normalized value similarity.
    pub fn build_from_graphs(&self, graphs: &[NGramGraph]) -> SimilarityMatrix {
        let n = graphs.len();
        let rows: Vec<Vec<(usize, f64)>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .filter_map(|j| {
                        let score = self
                            .calculator
                            .similarity(&graphs[i], &graphs[j])
                            .normalized_value();
                        (score > 0.0).then_some((j, score))
                    })
                    .collect()
            })
            .collect();

        let mut matrix = SimilarityMatrix::identity(n);
        for (i, row) in rows.into_iter().enumerate() {
            for (j, score) in row {
                matrix.set(i, j, score);
            }
        }

        tracing::debug!(elements = n, nnz = matrix.nnz(), "built similarity matrix");
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::calculator::Similarity;

    #[test]
    fn test_identity() {
        let m = SimilarityMatrix::identity(3);
        assert_eq!(m.len(), 3);
        assert_eq!(m.nnz(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
        }
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_set_is_symmetric_and_keeps_self_loops() {
        let mut m = SimilarityMatrix::identity(3);
        m.set(0, 2, 0.4);
        m.set(1, 1, 0.1);
        m.set(1, 2, 0.0);

        assert_eq!(m.get(0, 2), 0.4);
        assert_eq!(m.get(2, 0), 0.4);
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.nnz(), 5);
    }

    #[test]
    fn test_build_from_units() {
        let units = vec![
            TextUnit::new("a", "the cat sat on the mat"),
            TextUnit::new("b", "the cat sat on the mat"),
            TextUnit::new("c", "zzzzzz qqqqqq"),
        ];
        let m = SimilarityMatrixBuilder::new(NGramGraphCreator::new()).build(&units);

        assert_eq!(m.len(), 3);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
    }

    #[test]
    fn test_custom_calculator() {
        struct Constant;
        impl GraphSimilarity for Constant {
            fn similarity(&self, _: &NGramGraph, _: &NGramGraph) -> Similarity {
                Similarity {
                    size: 1.0,
                    value: 0.3,
                    containment: 0.6,
                }
            }
        }

        let builder = SimilarityMatrixBuilder::new(NGramGraphCreator::new()).with_calculator(Constant);
        let graphs = vec![NGramGraph::new(); 3];
        let m = builder.build_from_graphs(&graphs);

        assert!((m.get(0, 1) - 0.5).abs() < 1e-12);
        assert!((m.get(1, 2) - 0.5).abs() < 1e-12);
        assert_eq!(m.nnz(), 9);
    }
}
