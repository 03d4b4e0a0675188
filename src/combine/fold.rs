//! Left folds of graph operators over ordered graph sequences

use super::GraphOperator;
use crate::graph::ngram::NGramGraph;

/// How the blend factor evolves along a fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendSchedule {
    /// Same factor `r` for the accumulator at every step
    Fixed(f64),
    /// Folding the k-th graph (0-based) uses `r = k / (k + 1)`, so each
    /// operand contributes equally to the final weights
    RunningMean,
}

impl Default for BlendSchedule {
    fn default() -> Self {
        BlendSchedule::Fixed(0.5)
    }
}

impl BlendSchedule {
    /// Accumulator factor when folding in the graph at position `step` (≥ 1)
    pub fn factor(&self, step: usize) -> f64 {
        match *self {
            BlendSchedule::Fixed(r) => r,
            BlendSchedule::RunningMean => step as f64 / (step + 1) as f64,
        }
    }
}

/// A left fold of one operator with a blend schedule and periodic
/// checkpoints.
///
/// Every `checkpoint_interval` steps the running accumulator is compacted:
/// vertices left behind by dropped edges are released and spare capacity is
/// returned. Compaction never changes the folded result.
#[derive(Debug, Clone)]
pub struct GraphFold<O> {
    operator: O,
    schedule: BlendSchedule,
    checkpoint_interval: usize,
}

impl<O: GraphOperator> GraphFold<O> {
    /// Create a fold with the default schedule and a checkpoint every 20 steps
    pub fn new(operator: O) -> Self {
        Self {
            operator,
            schedule: BlendSchedule::default(),
            checkpoint_interval: 20,
        }
    }

    /// Set the blend schedule
    pub fn with_schedule(mut self, schedule: BlendSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the checkpoint interval (at least 1)
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval.max(1);
        self
    }

    /// Fold the graphs left to right.
    ///
    /// An empty sequence yields the empty graph; a single graph yields a copy
    /// of itself.
    pub fn fold<'a, I>(&self, graphs: I) -> NGramGraph
    where
        I: IntoIterator<Item = &'a NGramGraph>,
    {
        let mut graphs = graphs.into_iter();
        let Some(first) = graphs.next() else {
            return NGramGraph::new();
        };

        let mut acc = first.clone();
        for (step, next) in (1..).zip(graphs) {
            self.operator.apply(&mut acc, next, self.schedule.factor(step));

            if step % self.checkpoint_interval == 0 {
                acc.compact();
                tracing::debug!(
                    operator = self.operator.name(),
                    step,
                    vertices = acc.vertex_count(),
                    edges = acc.edge_count(),
                    "fold checkpoint"
                );
            }
        }

        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::{Intersect, Merge};

    fn graph(edges: &[(&str, &str, f64)]) -> NGramGraph {
        NGramGraph::from_edges(edges.iter().copied())
    }

    #[test]
    fn test_empty_and_single_folds() {
        let fold = GraphFold::new(Merge);
        assert!(fold.fold(std::iter::empty()).is_empty());

        let g = graph(&[("a", "b", 0.4)]);
        assert_eq!(fold.fold([&g]), g);
        assert_eq!(GraphFold::new(Intersect).fold([&g]), g);
    }

    #[test]
    fn test_fold_is_left_to_right() {
        let a = graph(&[("a", "b", 1.0)]);
        let b = graph(&[("a", "b", 0.5)]);
        let c = graph(&[("a", "b", 0.25)]);

        let result = GraphFold::new(Merge).fold([&a, &b, &c]);
        // ((1.0 + 0.5) / 2 + 0.25) / 2
        assert!((result.edge_weight("a", "b").unwrap() - 0.5).abs() < 1e-12);

        let reversed = GraphFold::new(Merge).fold([&c, &b, &a]);
        // ((0.25 + 0.5) / 2 + 1.0) / 2
        assert!((reversed.edge_weight("a", "b").unwrap() - 0.6875).abs() < 1e-12);
    }

    #[test]
    fn test_running_mean_weights_operands_equally() {
        let graphs = [
            graph(&[("a", "b", 1.0)]),
            graph(&[("a", "b", 0.5)]),
            graph(&[("a", "b", 0.25)]),
            graph(&[("a", "b", 0.25)]),
        ];

        let forward = GraphFold::new(Merge)
            .with_schedule(BlendSchedule::RunningMean)
            .fold(graphs.iter());
        let backward = GraphFold::new(Merge)
            .with_schedule(BlendSchedule::RunningMean)
            .fold(graphs.iter().rev());

        assert!((forward.edge_weight("a", "b").unwrap() - 0.5).abs() < 1e-12);
        assert!((backward.edge_weight("a", "b").unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_schedule_factors() {
        assert_eq!(BlendSchedule::Fixed(0.3).factor(7), 0.3);
        assert_eq!(BlendSchedule::RunningMean.factor(1), 0.5);
        assert!((BlendSchedule::RunningMean.factor(3) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_checkpoint_does_not_change_result() {
        let graphs: Vec<_> = (0..45)
            .map(|i| {
                let shared = ("s", "t", 1.0 / (i + 1) as f64);
                let own = format!("v{i}");
                NGramGraph::from_edges([shared, (own.as_str(), "t", 1.0)])
            })
            .collect();

        let every_step = GraphFold::new(Intersect)
            .with_checkpoint_interval(1)
            .fold(graphs.iter());
        let never = GraphFold::new(Intersect)
            .with_checkpoint_interval(usize::MAX)
            .fold(graphs.iter());

        assert_eq!(every_step, never);
        assert_eq!(every_step.edge_count(), 1);
        // Compaction released the orphaned vertices
        assert_eq!(every_step.vertex_count(), 2);
        assert!(never.vertex_count() > 2);
    }
}
