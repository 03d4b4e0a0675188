//! Structural similarity between n-gram graphs
//!
//! Two edges match when they join the same pair of n-gram labels in the same
//! direction, whatever their weights. From the matched edge set:
//!
//! - size similarity: `min(|E1|, |E2|) / max(|E1|, |E2|)`
//! - value similarity: `Σ min(w1, w2) / max(w1, w2)` over matched edges,
//!   divided by `max(|E1|, |E2|)`
//! - containment similarity: `matched / min(|E1|, |E2|)`
//! - normalized value similarity: `value / containment`
//!
//! Every 0/0 case resolves to 0.

use crate::graph::ngram::NGramGraph;
use rayon::prelude::*;
use serde::Serialize;

/// Above this many edges in the smaller graph, edge matching runs in parallel.
const PARALLEL_EDGE_THRESHOLD: usize = 4096;

/// Similarity of two graphs. All components lie in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Similarity {
    pub size: f64,
    pub value: f64,
    pub containment: f64,
}

impl Similarity {
    /// All-zero similarity
    pub const ZERO: Similarity = Similarity {
        size: 0.0,
        value: 0.0,
        containment: 0.0,
    };

    /// Value similarity with mere edge overlap factored out
    pub fn normalized_value(&self) -> f64 {
        if self.containment > 0.0 {
            (self.value / self.containment).min(1.0)
        } else {
            0.0
        }
    }

    /// `[size, value, containment]` feature vector for downstream classifiers
    pub fn as_features(&self) -> [f64; 3] {
        [self.size, self.value, self.containment]
    }
}

/// A way of comparing two graphs.
pub trait GraphSimilarity: Send + Sync {
    /// Compare two graphs. Must be commutative.
    fn similarity(&self, a: &NGramGraph, b: &NGramGraph) -> Similarity;
}

/// The size / value / containment similarity over n-gram graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NGramGraphSimilarity;

impl NGramGraphSimilarity {
    /// Create a new calculator
    pub fn new() -> Self {
        Self
    }
}

impl GraphSimilarity for NGramGraphSimilarity {
    fn similarity(&self, a: &NGramGraph, b: &NGramGraph) -> Similarity {
        let (small, large) = if a.edge_count() <= b.edge_count() {
            (a, b)
        } else {
            (b, a)
        };
        let min_edges = small.edge_count();
        let max_edges = large.edge_count();

        if max_edges == 0 {
            return Similarity::ZERO;
        }

        let size = min_edges as f64 / max_edges as f64;

        let ratio = |(edge, w): ((u32, u32), f64)| {
            large
                .weight_of_foreign(small, edge)
                .map(|other| {
                    let hi = w.max(other);
                    // 0/0 resolves to 0
                    if hi > 0.0 {
                        w.min(other) / hi
                    } else {
                        0.0
                    }
                })
        };

        let edges: Vec<_> = small.raw_edges().collect();
        let mut ratios: Vec<f64> = if edges.len() >= PARALLEL_EDGE_THRESHOLD {
            edges.into_par_iter().filter_map(ratio).collect()
        } else {
            edges.into_iter().filter_map(ratio).collect()
        };

        let common = ratios.len();
        if common == 0 {
            return Similarity {
                size,
                value: 0.0,
                containment: 0.0,
            };
        }

        // Summation order must not depend on argument order or hash layout.
        ratios.sort_unstable_by(f64::total_cmp);
        let value = ratios.iter().sum::<f64>() / max_edges as f64;
        let containment = common as f64 / min_edges as f64;

        Similarity {
            size,
            value,
            containment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str, f64)]) -> NGramGraph {
        NGramGraph::from_edges(edges.iter().copied())
    }

    #[test]
    fn test_identical_graphs() {
        let g = graph(&[("a", "b", 1.0), ("b", "c", 0.3), ("c", "d", 0.7)]);
        let sim = NGramGraphSimilarity.similarity(&g, &g);

        assert_eq!(sim.size, 1.0);
        assert_eq!(sim.value, 1.0);
        assert_eq!(sim.containment, 1.0);
        assert_eq!(sim.normalized_value(), 1.0);
    }

    #[test]
    fn test_empty_graphs() {
        let empty = NGramGraph::new();
        let sim = NGramGraphSimilarity.similarity(&empty, &empty);
        assert_eq!(sim, Similarity::ZERO);
        assert_eq!(sim.normalized_value(), 0.0);

        let g = graph(&[("a", "b", 1.0)]);
        let sim = NGramGraphSimilarity.similarity(&g, &empty);
        assert_eq!(sim, Similarity::ZERO);
    }

    #[test]
    fn test_partial_overlap() {
        let a = graph(&[("a", "b", 1.0), ("b", "c", 0.5)]);
        let b = graph(&[("a", "b", 0.5), ("x", "y", 1.0), ("y", "z", 1.0), ("z", "w", 1.0)]);

        let sim = NGramGraphSimilarity.similarity(&a, &b);

        assert!((sim.size - 0.5).abs() < 1e-12);
        // One common edge with ratio 0.5, over max size 4
        assert!((sim.value - 0.125).abs() < 1e-12);
        // One common edge over min size 2
        assert!((sim.containment - 0.5).abs() < 1e-12);
        assert!((sim.normalized_value() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_direction_matters() {
        let a = graph(&[("a", "b", 1.0)]);
        let b = graph(&[("b", "a", 1.0)]);
        let sim = NGramGraphSimilarity.similarity(&a, &b);

        assert_eq!(sim.size, 1.0);
        assert_eq!(sim.containment, 0.0);
        assert_eq!(sim.value, 0.0);
    }

    #[test]
    fn test_commutative() {
        let a = graph(&[("a", "b", 1.0), ("b", "c", 0.2), ("c", "a", 0.9)]);
        let b = graph(&[("a", "b", 0.4), ("c", "a", 1.0), ("q", "r", 0.1)]);

        let ab = NGramGraphSimilarity.similarity(&a, &b);
        let ba = NGramGraphSimilarity.similarity(&b, &a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_zero_weight_edges_stay_finite() {
        use crate::combine::{GraphOperator, Merge};

        // Merging with r = 1 keeps the incoming edge at weight 0
        let a = graph(&[("a", "b", 1.0)]);
        let b = graph(&[("c", "d", 1.0)]);
        let merged = Merge.combine(&a, &b, 1.0);
        assert_eq!(merged.edge_weight("c", "d"), Some(0.0));

        let sim = NGramGraphSimilarity.similarity(&merged, &merged.clone());
        assert!(sim.as_features().iter().all(|v| v.is_finite()));
        assert!((sim.value - 0.5).abs() < 1e-12);
        assert_eq!(sim.containment, 1.0);
        assert!((sim.normalized_value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_features() {
        let sim = Similarity {
            size: 0.1,
            value: 0.2,
            containment: 0.4,
        };
        assert_eq!(sim.as_features(), [0.1, 0.2, 0.4]);
        assert!((sim.normalized_value() - 0.5).abs() < 1e-12);
    }
}
