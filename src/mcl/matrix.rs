//! Compressed Sparse Column (CSC) matrix for Markov clustering
//!
//! MCL works on column-stochastic matrices: column `j` holds the transition
//! probabilities out of element `j`. CSC keeps each column contiguous, which
//! is what expansion (column-by-column products) and inflation (per-column
//! rescaling) iterate over.

use crate::similarity::matrix::SimilarityMatrix;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// A square sparse matrix in Compressed Sparse Column format
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticMatrix {
    /// Number of rows and columns
    pub n: usize,
    /// Column pointers: column j's entries are at col_ptr[j]..col_ptr[j+1]
    pub col_ptr: Vec<usize>,
    /// Row index of each entry, ascending within a column
    pub row_idx: Vec<u32>,
    /// Entry values
    pub values: Vec<f64>,
}

impl StochasticMatrix {
    /// Assemble from per-column entry lists (each sorted by row)
    pub fn from_columns(columns: Vec<Vec<(u32, f64)>>) -> Self {
        let n = columns.len();
        let nnz = columns.iter().map(Vec::len).sum();
        let mut col_ptr = Vec::with_capacity(n + 1);
        let mut row_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        col_ptr.push(0);
        for column in columns {
            for (row, value) in column {
                row_idx.push(row);
                values.push(value);
            }
            col_ptr.push(row_idx.len());
        }

        Self {
            n,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Column-normalized transition matrix of a similarity matrix.
    ///
    /// Every column carries at least its self-loop.
    pub fn from_similarity(matrix: &SimilarityMatrix) -> Self {
        let n = matrix.len();
        let mut columns: Vec<Vec<(u32, f64)>> = vec![Vec::new(); n];
        for (row, col, value) in matrix.entries() {
            columns[col].push((row as u32, value));
        }
        for (j, column) in columns.iter_mut().enumerate() {
            if !column.iter().any(|&(row, _)| row as usize == j) {
                column.push((j as u32, 1.0));
            }
            column.sort_unstable_by_key(|&(row, _)| row);
        }

        let mut m = Self::from_columns(columns);
        m.normalize_columns();
        m
    }

    /// Iterate over the entries of a column
    pub fn column(&self, col: usize) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.col_ptr[col];
        let end = self.col_ptr[col + 1];
        (start..end).map(move |i| (self.row_idx[i], self.values[i]))
    }

    /// Value at (row, col), 0 when not stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.column(col)
            .find(|&(r, _)| r as usize == row)
            .map_or(0.0, |(_, v)| v)
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Rescale every column to sum to 1. All-zero columns are left alone.
    pub fn normalize_columns(&mut self) {
        for j in 0..self.n {
            let range = self.col_ptr[j]..self.col_ptr[j + 1];
            let sum: f64 = self.values[range.clone()].iter().sum();
            if sum > 0.0 {
                for v in &mut self.values[range] {
                    *v /= sum;
                }
            }
        }
    }

    /// Matrix product `self · other`, one parallel task per result column.
    pub fn multiply(&self, other: &StochasticMatrix) -> StochasticMatrix {
        let columns: Vec<Vec<(u32, f64)>> = (0..other.n)
            .into_par_iter()
            .map(|j| {
                let mut acc: FxHashMap<u32, f64> = FxHashMap::default();
                for (k, b) in other.column(j) {
                    for (i, a) in self.column(k as usize) {
                        *acc.entry(i).or_insert(0.0) += a * b;
                    }
                }
                let mut column: Vec<_> = acc.into_iter().filter(|&(_, v)| v != 0.0).collect();
                column.sort_unstable_by_key(|&(row, _)| row);
                column
            })
            .collect();

        Self::from_columns(columns)
    }

    /// Raise the matrix to the `power`-th matrix power (power 0 and 1 return a copy)
    pub fn power(&self, power: usize) -> StochasticMatrix {
        let mut result = self.clone();
        for _ in 1..power {
            result = result.multiply(self);
        }
        result
    }

    /// Raise every entry to `power`, then rescale columns to sum to 1
    pub fn inflate(&self, power: f64) -> StochasticMatrix {
        let mut m = self.clone();
        m.values.par_iter_mut().for_each(|v| *v = v.powf(power));
        m.normalize_columns();
        m
    }

    /// Drop entries below `epsilon` and renormalize.
    ///
    /// The largest entry of each column always survives, so no column is
    /// emptied.
    pub fn prune(&self, epsilon: f64) -> StochasticMatrix {
        let columns: Vec<Vec<(u32, f64)>> = (0..self.n)
            .map(|j| {
                let max = self.column(j).map(|(_, v)| v).fold(0.0, f64::max);
                self.column(j)
                    .filter(|&(_, v)| v >= epsilon || (v == max && v > 0.0))
                    .collect()
            })
            .collect();

        let mut m = Self::from_columns(columns);
        m.normalize_columns();
        m
    }

    /// L1 distance between two matrices of the same size
    pub fn distance(&self, other: &StochasticMatrix) -> f64 {
        (0..self.n.max(other.n))
            .map(|j| {
                let a: Vec<_> = if j < self.n { self.column(j).collect() } else { Vec::new() };
                let b: Vec<_> = if j < other.n { other.column(j).collect() } else { Vec::new() };

                let (mut x, mut y, mut sum) = (0, 0, 0.0);
                while x < a.len() || y < b.len() {
                    match (a.get(x), b.get(y)) {
                        (Some(&(ra, va)), Some(&(rb, vb))) if ra == rb => {
                            sum += (va - vb).abs();
                            x += 1;
                            y += 1;
                        }
                        (Some(&(ra, va)), Some(&(rb, _))) if ra < rb => {
                            sum += va.abs();
                            x += 1;
                        }
                        (Some(&(_, va)), None) => {
                            sum += va.abs();
                            x += 1;
                        }
                        (_, Some(&(_, vb))) => {
                            sum += vb.abs();
                            y += 1;
                        }
                        (None, None) => break,
                    }
                }
                sum
            })
            .sum()
    }

    /// Nonzero `(row, col)` positions
    pub fn support(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |j| {
            self.column(j)
                .filter(|&(_, v)| v > 0.0)
                .map(move |(i, _)| (i as usize, j))
        })
    }
}

impl Default for StochasticMatrix {
    fn default() -> Self {
        Self {
            n: 0,
            col_ptr: vec![0],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blocks() -> SimilarityMatrix {
        let mut m = SimilarityMatrix::identity(4);
        m.set(0, 1, 0.9);
        m.set(2, 3, 0.8);
        m.set(1, 2, 0.05);
        m
    }

    fn assert_column_stochastic(m: &StochasticMatrix) {
        for j in 0..m.n {
            let sum: f64 = m.column(j).map(|(_, v)| v).sum();
            assert!((sum - 1.0).abs() < 1e-9, "column {j} sums to {sum}");
        }
    }

    #[test]
    fn test_from_similarity_is_column_stochastic() {
        let m = StochasticMatrix::from_similarity(&two_blocks());
        assert_eq!(m.n, 4);
        assert_column_stochastic(&m);
        assert!((m.get(0, 0) - 1.0 / 1.9).abs() < 1e-12);
        assert!((m.get(1, 0) - 0.9 / 1.9).abs() < 1e-12);
        assert_eq!(m.get(3, 0), 0.0);
    }

    #[test]
    fn test_multiply_identity() {
        let id = StochasticMatrix::from_similarity(&SimilarityMatrix::identity(3));
        let m = StochasticMatrix::from_similarity(&two_blocks());
        let m4 = StochasticMatrix::from_similarity(&SimilarityMatrix::identity(4));

        assert_eq!(id.multiply(&id), id);
        assert!(m.multiply(&m4).distance(&m) < 1e-12);
        assert!(m4.multiply(&m).distance(&m) < 1e-12);
    }

    #[test]
    fn test_power_keeps_stochastic() {
        let m = StochasticMatrix::from_similarity(&two_blocks());
        let m2 = m.power(2);
        assert_column_stochastic(&m2);
        assert!(m2.get(2, 0) > 0.0); // two-step path 0 -> 1 -> 2
        assert_eq!(m.power(1), m);
    }

    #[test]
    fn test_inflate_sharpens() {
        let m = StochasticMatrix::from_similarity(&two_blocks());
        let inflated = m.inflate(2.0);
        assert_column_stochastic(&inflated);
        // Column 1 has entries 0.9, 1.0, 0.05: the small one shrinks
        assert!(inflated.get(2, 1) < m.get(2, 1));
    }

    #[test]
    fn test_prune_keeps_column_max() {
        let m = StochasticMatrix::from_columns(vec![
            vec![(0, 0.004), (1, 0.003), (2, 0.002)],
            vec![(1, 1.0)],
            vec![(0, 0.5), (2, 0.5)],
        ]);
        let pruned = m.prune(0.01);

        assert_eq!(pruned.column(0).count(), 1);
        assert!((pruned.get(0, 0) - 1.0).abs() < 1e-12);
        assert_eq!(pruned.column(2).count(), 2);
        assert_column_stochastic(&pruned);
    }

    #[test]
    fn test_distance() {
        let a = StochasticMatrix::from_columns(vec![vec![(0, 1.0)], vec![(0, 0.5), (1, 0.5)]]);
        let b = StochasticMatrix::from_columns(vec![vec![(1, 1.0)], vec![(1, 1.0)]]);

        assert_eq!(a.distance(&a), 0.0);
        assert!((a.distance(&b) - 3.0).abs() < 1e-12);
        assert!((b.distance(&a) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix() {
        let m = StochasticMatrix::from_similarity(&SimilarityMatrix::identity(0));
        assert_eq!(m, StochasticMatrix::default());
        assert_eq!(m.support().count(), 0);
    }
}
