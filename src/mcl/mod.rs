//! Markov clustering (MCL)
//!
//! This module provides the sparse stochastic-matrix kernels and the
//! iterative expansion / inflation / pruning engine.

pub mod engine;
pub mod matrix;

use serde::Serialize;

/// A partition of elements `0..n` into clusters.
///
/// Cluster ids are positions in [`clusters`](Self::clusters), ordered by
/// each cluster's smallest member; members are ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterAssignment {
    clusters: Vec<Vec<usize>>,
}

impl ClusterAssignment {
    /// Build from member lists, normalizing member and cluster order.
    ///
    /// Empty member lists are dropped.
    pub fn from_clusters(mut clusters: Vec<Vec<usize>>) -> Self {
        clusters.retain(|c| !c.is_empty());
        for cluster in &mut clusters {
            cluster.sort_unstable();
            cluster.dedup();
        }
        clusters.sort_unstable_by_key(|c| c[0]);
        Self { clusters }
    }

    /// Every element in its own cluster
    pub fn singletons(n: usize) -> Self {
        Self {
            clusters: (0..n).map(|i| vec![i]).collect(),
        }
    }

    /// Clusters in id order
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Check if there are no clusters
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster id of an element
    pub fn cluster_of(&self, element: usize) -> Option<usize> {
        self.clusters
            .iter()
            .position(|members| members.binary_search(&element).is_ok())
    }

    /// Check that the clusters partition exactly `0..n`
    pub fn is_partition_of(&self, n: usize) -> bool {
        let mut seen = vec![false; n];
        for &element in self.clusters.iter().flatten() {
            if element >= n || seen[element] {
                return false;
            }
            seen[element] = true;
        }
        seen.into_iter().all(|s| s)
    }

    /// Iterate over `(cluster id, members)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.clusters.iter().map(Vec::as_slice).enumerate()
    }
}

/// Result of an MCL run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MclResult {
    /// Extracted clusters
    pub assignment: ClusterAssignment,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final L1 change between the last two matrices
    pub delta: f64,
    /// Whether the change fell below the tolerance before the iteration cap
    pub converged: bool,
}

impl MclResult {
    /// Create a new MCL result
    pub fn new(assignment: ClusterAssignment, iterations: usize, delta: f64, converged: bool) -> Self {
        Self {
            assignment,
            iterations,
            delta,
            converged,
        }
    }
}
