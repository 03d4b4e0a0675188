//! Markov clustering engine
//!
//! Iterates expansion, inflation and pruning on the column-stochastic
//! transition matrix of a similarity matrix until the L1 change between
//! iterations drops below a tolerance or the iteration cap is hit.

use super::matrix::StochasticMatrix;
use super::{ClusterAssignment, MclResult};
use crate::similarity::matrix::SimilarityMatrix;
use rustc_hash::FxHashMap;

/// Markov clustering implementation
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovCluster {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Matrix power applied at each expansion step
    pub expansion: usize,
    /// Entry-wise power applied at each inflation step
    pub inflation: f64,
    /// Entries below this are pruned after inflation
    pub prune_epsilon: f64,
    /// Convergence threshold on the L1 change between iterations
    pub tolerance: f64,
}

impl Default for MarkovCluster {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            expansion: 2,
            inflation: 2.0,
            prune_epsilon: 0.01,
            tolerance: 1e-6,
        }
    }
}

impl MarkovCluster {
    /// Create a new MarkovCluster with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the expansion power
    pub fn with_expansion(mut self, expansion: usize) -> Self {
        self.expansion = expansion;
        self
    }

    /// Set the inflation power
    pub fn with_inflation(mut self, inflation: f64) -> Self {
        self.inflation = inflation;
        self
    }

    /// Set the pruning threshold
    pub fn with_prune_epsilon(mut self, prune_epsilon: f64) -> Self {
        self.prune_epsilon = prune_epsilon;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run MCL on a similarity matrix.
    ///
    /// Returns the clusters of the last matrix even if convergence wasn't
    /// achieved, with `converged=false`.
    pub fn run(&self, matrix: &SimilarityMatrix) -> MclResult {
        let n = matrix.len();
        if n == 0 {
            return MclResult::new(ClusterAssignment::default(), 0, 0.0, true);
        }

        let mut current = StochasticMatrix::from_similarity(matrix);
        let mut iterations = 0;
        let mut delta = f64::MAX;

        while iterations < self.max_iterations && delta >= self.tolerance {
            iterations += 1;

            let next = current
                .power(self.expansion)
                .inflate(self.inflation)
                .prune(self.prune_epsilon);

            delta = next.distance(&current);
            current = next;

            tracing::trace!(iteration = iterations, delta, nnz = current.nnz(), "mcl step");
        }

        let converged = delta < self.tolerance;
        if !converged {
            tracing::warn!(
                elements = n,
                iterations,
                delta,
                "mcl did not converge, clustering last matrix"
            );
        }

        let assignment = extract_clusters(&current);
        tracing::debug!(
            elements = n,
            clusters = assignment.len(),
            iterations,
            converged,
            "mcl finished"
        );

        MclResult::new(assignment, iterations, delta, converged)
    }

    /// Run MCL and keep only the clusters
    pub fn cluster(&self, matrix: &SimilarityMatrix) -> ClusterAssignment {
        self.run(matrix).assignment
    }
}

/// Read the attractor basins off the final matrix.
///
/// Attractors are elements keeping mass on their own diagonal. Attractors
/// holding mass in each other's columns form one attractor system. Every
/// other element joins the single system its column's mass sits on; an
/// element whose mass is split across systems, or sits on no attractor,
/// stays a singleton.
fn extract_clusters(matrix: &StochasticMatrix) -> ClusterAssignment {
    let n = matrix.n;
    let is_attractor: Vec<bool> = (0..n).map(|i| matrix.get(i, i) > 0.0).collect();
    let mut parent: Vec<usize> = (0..n).collect();

    // Union-find helpers
    fn find(parent: &mut [usize], i: usize) -> usize {
        let mut root = i;
        while parent[root] != root {
            root = parent[root];
        }
        let mut node = i;
        while parent[node] != root {
            let next = parent[node];
            parent[node] = root;
            node = next;
        }
        root
    }

    fn union(parent: &mut [usize], i: usize, j: usize) {
        let pi = find(parent, i);
        let pj = find(parent, j);
        if pi != pj {
            parent[pi.max(pj)] = pi.min(pj);
        }
    }

    for (row, col) in matrix.support() {
        if row != col && is_attractor[row] && is_attractor[col] {
            union(&mut parent, row, col);
        }
    }

    for col in (0..n).filter(|&j| !is_attractor[j]) {
        let mut systems: Vec<usize> = matrix
            .column(col)
            .filter(|&(row, v)| v > 0.0 && is_attractor[row as usize])
            .map(|(row, _)| find(&mut parent, row as usize))
            .collect();
        systems.sort_unstable();
        systems.dedup();

        match systems[..] {
            [system] => union(&mut parent, system, col),
            _ => tracing::trace!(element = col, systems = systems.len(), "unattached element"),
        }
    }

    let mut clusters: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for i in 0..n {
        let root = find(&mut parent, i);
        clusters.entry(root).or_default().push(i);
    }

    ClusterAssignment::from_clusters(clusters.into_values().collect())
}
