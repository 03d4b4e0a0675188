//! Property-based tests for graph construction and graph similarity.

use proptest::prelude::*;
use rapid_ngg::{GraphSimilarity, GramUnit, NGramGraphCreator, NGramGraphSimilarity};

/// Short texts over a small alphabet so that graphs overlap often
fn text() -> impl Strategy<Value = String> {
    "[abc ]{0,24}"
}

fn creator() -> impl Strategy<Value = NGramGraphCreator> {
    (1..4usize, 0..2usize, 1..4usize).prop_map(|(min_n, extra, window)| {
        NGramGraphCreator::new()
            .with_range(min_n, min_n + extra)
            .with_window(window)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: similarity does not depend on argument order
    #[test]
    fn similarity_is_commutative(a in text(), b in text(), creator in creator()) {
        let (ga, gb) = (creator.build_graph(&a), creator.build_graph(&b));
        let calc = NGramGraphSimilarity;

        let ab = calc.similarity(&ga, &gb);
        let ba = calc.similarity(&gb, &ga);
        prop_assert_eq!(ab, ba);
        prop_assert_eq!(ab.normalized_value(), ba.normalized_value());
    }

    /// Property: every component lies in [0, 1]
    #[test]
    fn similarity_is_bounded(a in text(), b in text(), creator in creator()) {
        let sim = NGramGraphSimilarity.similarity(&creator.build_graph(&a), &creator.build_graph(&b));

        for component in [sim.size, sim.value, sim.containment, sim.normalized_value()] {
            prop_assert!((0.0..=1.0).contains(&component), "{:?}", sim);
        }
    }

    /// Property: a non-empty graph is fully similar to itself
    #[test]
    fn self_similarity_is_one(a in text(), creator in creator()) {
        let g = creator.build_graph(&a);
        prop_assume!(!g.is_empty());

        let sim = NGramGraphSimilarity.similarity(&g, &g);
        prop_assert_eq!(sim.as_features(), [1.0, 1.0, 1.0]);
        prop_assert_eq!(sim.normalized_value(), 1.0);
    }

    /// Property: building twice yields the same graph with the heaviest edge at 1
    #[test]
    fn graphs_are_deterministic_and_normalized(a in text(), creator in creator()) {
        let first = creator.build_graph(&a);
        let second = creator.build_graph(&a);
        prop_assert_eq!(&first, &second);

        if !first.is_empty() {
            prop_assert_eq!(first.max_weight(), 1.0);
            prop_assert!(first.edges().all(|(s, t, w)| s != t && w > 0.0 && w <= 1.0));
        }
    }

    /// Property: word graphs obey the same bounds
    #[test]
    fn word_graph_similarity_is_bounded(a in "(cat|dog|sat|mat| ){0,20}", b in "(cat|dog|sat|mat| ){0,20}") {
        let creator = NGramGraphCreator::new().with_range(1, 2).with_unit(GramUnit::Word);
        let sim = NGramGraphSimilarity.similarity(&creator.build_graph(&a), &creator.build_graph(&b));
        prop_assert!((0.0..=1.0).contains(&sim.value));
        prop_assert!((0.0..=1.0).contains(&sim.normalized_value()));
    }
}

#[test]
fn empty_graphs_have_zero_similarity() {
    let empty = NGramGraphCreator::new().build_graph("ab");
    assert!(empty.is_empty());

    let sim = NGramGraphSimilarity.similarity(&empty, &empty);
    assert_eq!(sim.as_features(), [0.0, 0.0, 0.0]);
    assert_eq!(sim.normalized_value(), 0.0);
}
