//! Property-based tests for the redundancy filter.

use proptest::prelude::*;
use rapid_ngg::{GraphSimilarity, NGramGraph, NGramGraphCreator, NGramGraphSimilarity, RedundancyFilter};

fn sentences() -> impl Strategy<Value = Vec<NGramGraph>> {
    prop::collection::vec("[abc ]{3,20}", 0..15).prop_map(|texts| {
        let creator = NGramGraphCreator::new();
        texts.iter().map(|t| creator.build_graph(t)).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Property: no two kept sentences are more similar than the threshold
    #[test]
    fn kept_sentences_are_pairwise_distinct(graphs in sentences(), threshold in 0.0..1.0f64) {
        let refs: Vec<&NGramGraph> = graphs.iter().collect();
        let kept = RedundancyFilter::new(threshold).filter(&refs);

        for (x, &i) in kept.iter().enumerate() {
            for &j in &kept[x + 1..] {
                let nvs = NGramGraphSimilarity.similarity(refs[i], refs[j]).normalized_value();
                prop_assert!(nvs <= threshold, "{} vs {}: {}", i, j, nvs);
            }
        }
    }

    /// Property: filtering the filter's output keeps everything
    #[test]
    fn filter_is_idempotent(graphs in sentences(), threshold in 0.0..1.0f64) {
        let refs: Vec<&NGramGraph> = graphs.iter().collect();
        let filter = RedundancyFilter::new(threshold);

        let kept = filter.filter(&refs);
        let survivors: Vec<&NGramGraph> = kept.iter().map(|&i| refs[i]).collect();
        prop_assert_eq!(filter.filter(&survivors), (0..kept.len()).collect::<Vec<_>>());
    }

    /// Property: the first sentence always survives and order is preserved
    #[test]
    fn filter_keeps_head_and_order(graphs in sentences(), threshold in 0.0..1.0f64) {
        let refs: Vec<&NGramGraph> = graphs.iter().collect();
        let kept = RedundancyFilter::new(threshold).filter(&refs);

        if !refs.is_empty() {
            prop_assert_eq!(kept.first(), Some(&0));
        }
        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }
}
