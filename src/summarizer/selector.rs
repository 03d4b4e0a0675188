//! Essence-based sentence selection for summarization
//!
//! Sentences are ranked by value similarity against the event essence
//! graph, then a greedy redundancy filter drops every sentence too close to
//! one already kept.

use crate::graph::ngram::NGramGraph;
use crate::similarity::calculator::{GraphSimilarity, NGramGraphSimilarity};
use crate::types::ScoredSentence;
use rayon::prelude::*;

/// Configuration for sentence selection
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Sentences whose normalized value similarity to a kept sentence
    /// exceeds this are redundant
    pub redundancy_threshold: f64,
    /// Optional cap on the number of selected sentences
    pub max_sentences: Option<usize>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            redundancy_threshold: 0.2,
            max_sentences: None,
        }
    }
}

/// Greedy redundancy filter over a ranked list.
#[derive(Debug, Clone)]
pub struct RedundancyFilter<S = NGramGraphSimilarity> {
    threshold: f64,
    calculator: S,
}

impl RedundancyFilter {
    /// Create a filter with the default calculator
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            calculator: NGramGraphSimilarity,
        }
    }
}

impl<S: GraphSimilarity> RedundancyFilter<S> {
    /// Use a different similarity calculator
    pub fn with_calculator<T: GraphSimilarity>(self, calculator: T) -> RedundancyFilter<T> {
        RedundancyFilter {
            threshold: self.threshold,
            calculator,
        }
    }

    /// Positions of the kept graphs, in input order.
    ///
    /// Walks the list in order; each sentence not yet marked is kept and
    /// marks every later sentence whose normalized value similarity to it
    /// exceeds the threshold. A mark is permanent.
    pub fn filter(&self, graphs: &[&NGramGraph]) -> Vec<usize> {
        let n = graphs.len();
        let mut redundant = vec![false; n];
        let mut kept = Vec::new();

        for i in 0..n {
            if redundant[i] {
                continue;
            }
            kept.push(i);

            let marked: Vec<usize> = ((i + 1)..n)
                .into_par_iter()
                .filter(|&j| {
                    !redundant[j]
                        && self
                            .calculator
                            .similarity(graphs[i], graphs[j])
                            .normalized_value()
                            > self.threshold
                })
                .collect();

            for j in marked {
                redundant[j] = true;
            }
        }

        kept
    }
}

/// Scores sentences against an essence graph and picks non-redundant ones.
#[derive(Debug, Clone)]
pub struct SentenceSelector<S = NGramGraphSimilarity> {
    config: SelectorConfig,
    calculator: S,
}

impl Default for SentenceSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSelector {
    /// Create a new selector with default config
    pub fn new() -> Self {
        Self::with_config(SelectorConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: SelectorConfig) -> Self {
        Self {
            config,
            calculator: NGramGraphSimilarity,
        }
    }
}

impl<S: GraphSimilarity + Clone> SentenceSelector<S> {
    /// Use a different similarity calculator
    pub fn with_calculator<T: GraphSimilarity + Clone>(self, calculator: T) -> SentenceSelector<T> {
        SentenceSelector {
            config: self.config,
            calculator,
        }
    }

    /// Set the redundancy threshold
    pub fn with_redundancy_threshold(mut self, threshold: f64) -> Self {
        self.config.redundancy_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the maximum number of selected sentences
    pub fn with_max_sentences(mut self, max: usize) -> Self {
        self.config.max_sentences = Some(max);
        self
    }

    /// Rank sentences by value similarity against `essence`, best first.
    ///
    /// Equal scores keep input order.
    pub fn rank(&self, graphs: &[NGramGraph], essence: &NGramGraph) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = graphs
            .par_iter()
            .enumerate()
            .map(|(i, g)| (i, self.calculator.similarity(g, essence).value))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    /// Rank, filter redundancy and apply the length cap.
    ///
    /// `sentences` and `graphs` are parallel slices.
    pub fn select<T: AsRef<str>>(
        &self,
        sentences: &[T],
        graphs: &[NGramGraph],
        essence: &NGramGraph,
    ) -> Vec<ScoredSentence> {
        debug_assert_eq!(sentences.len(), graphs.len());

        let ranked = self.rank(graphs, essence);
        let ranked_graphs: Vec<&NGramGraph> = ranked.iter().map(|&(i, _)| &graphs[i]).collect();

        let filter = RedundancyFilter {
            threshold: self.config.redundancy_threshold,
            calculator: self.calculator.clone(),
        };
        let kept = filter.filter(&ranked_graphs);
        tracing::debug!(
            ranked = ranked.len(),
            kept = kept.len(),
            threshold = self.config.redundancy_threshold,
            "redundancy filter"
        );

        let limit = self.config.max_sentences.unwrap_or(usize::MAX);
        kept.into_iter()
            .take(limit)
            .map(|pos| {
                let (index, score) = ranked[pos];
                ScoredSentence {
                    index,
                    text: sentences[index].as_ref().to_string(),
                    score,
                }
            })
            .collect()
    }
}
