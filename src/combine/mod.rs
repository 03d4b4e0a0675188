//! Graph combination operators
//!
//! Both operators blend two weight functions with a factor `r` in (0, 1):
//! an edge weighing `w1` in the accumulator and `w2` in the incoming graph
//! ends up at `r·w1 + (1−r)·w2`, where a missing edge counts as weight 0.
//!
//! - [`Intersect`] keeps only edges present in both graphs.
//! - [`Merge`] keeps the union, so an edge unique to the accumulator decays
//!   to `r·w1` and an edge unique to the incoming graph enters at `(1−r)·w2`.
//!
//! Blended weights of inputs in (0, 1] stay in (0, 1].
//!
//! Neither operator is associative, and with `r != 0.5` neither is
//! commutative: folding `[a, b, c]` and `[c, b, a]` generally yields
//! different graphs. [`GraphFold`] always folds left in the order given.

pub mod fold;

use crate::graph::ngram::NGramGraph;

pub use fold::{BlendSchedule, GraphFold};

/// A binary graph operator applied in place to a fold accumulator.
pub trait GraphOperator: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Combine `next` into `acc` with blend factor `r` for `acc`.
    fn apply(&self, acc: &mut NGramGraph, next: &NGramGraph, r: f64);

    /// Combine two graphs into a new one
    fn combine(&self, a: &NGramGraph, b: &NGramGraph, r: f64) -> NGramGraph {
        let mut acc = a.clone();
        self.apply(&mut acc, b, r);
        acc
    }
}

/// Keeps the shared structure of two graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intersect;

impl GraphOperator for Intersect {
    fn name(&self) -> &'static str {
        "intersect"
    }

    fn apply(&self, acc: &mut NGramGraph, next: &NGramGraph, r: f64) {
        acc.retain_edges(|source, target, w| match next.edge_weight(source, target) {
            Some(other) => {
                *w = r * *w + (1.0 - r) * other;
                true
            }
            None => false,
        });
    }
}

/// Accumulates the structure of two graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Merge;

impl GraphOperator for Merge {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn apply(&self, acc: &mut NGramGraph, next: &NGramGraph, r: f64) {
        acc.scale_weights(r);
        for (source, target, w) in next.edges() {
            acc.add_to_edge(source, target, (1.0 - r) * w);
        }
    }
}
