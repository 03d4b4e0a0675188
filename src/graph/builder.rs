//! N-gram graph construction
//!
//! [`GraphBuilder`] accumulates raw co-occurrence counts with FxHashMap
//! adjacency for O(1) edge updates; [`NGramGraphCreator`] drives it over the
//! n-gram sequences of a text and freezes the result into a normalized
//! [`NGramGraph`].

use super::ngram::NGramGraph;
use crate::types::{GramUnit, TextUnit};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

/// A node in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// The n-gram for this node
    pub gram: String,
    /// Outgoing adjacency: target node ID -> co-occurrence count
    pub edges: FxHashMap<u32, f64>,
}

impl BuilderNode {
    /// Create a new node
    pub fn new(gram: impl Into<String>) -> Self {
        Self {
            gram: gram.into(),
            edges: FxHashMap::default(),
        }
    }
}

/// A mutable directed graph builder optimized for incremental construction
#[derive(Debug)]
pub struct GraphBuilder {
    /// Maps n-gram -> node ID
    gram_to_id: FxHashMap<String, u32>,
    /// Node storage
    nodes: Vec<BuilderNode>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self {
            gram_to_id: FxHashMap::default(),
            nodes: Vec::new(),
        }
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            gram_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Get or create a node for the given n-gram, returning its ID
    pub fn get_or_create_node(&mut self, gram: &str) -> u32 {
        if let Some(&id) = self.gram_to_id.get(gram) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.gram_to_id.insert(gram.to_string(), id);
        self.nodes.push(BuilderNode::new(gram));
        id
    }

    /// Add `weight` to the directed edge `from -> to`
    ///
    /// If the edge doesn't exist, it's created with `weight`.
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: f64) {
        if from == to {
            return; // No self-loops
        }

        if let Some(node) = self.nodes.get_mut(from as usize) {
            *node.edges.entry(to).or_insert(0.0) += weight;
        }
    }

    /// Link every n-gram to the `window` n-grams that follow it.
    pub fn add_sequence<S: AsRef<str>>(&mut self, grams: &[S], window: usize) {
        for j in 0..grams.len() {
            let node_j = self.get_or_create_node(grams[j].as_ref());

            for k in (j + 1)..std::cmp::min(j + 1 + window, grams.len()) {
                let node_k = self.get_or_create_node(grams[k].as_ref());
                self.increment_edge(node_j, node_k, 1.0);
            }
        }
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Freeze into an [`NGramGraph`] whose heaviest edge weighs 1.
    pub fn into_graph(self) -> NGramGraph {
        let mut graph = NGramGraph::new();
        for node in &self.nodes {
            graph.get_or_insert_vertex(&node.gram);
        }
        for (from, node) in self.nodes.iter().enumerate() {
            for (&to, &count) in &node.edges {
                graph.set_edge(from as u32, to, count);
            }
        }
        graph.normalize();
        graph
    }
}

/// Turns text into n-gram graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NGramGraphCreator {
    /// Shortest n-gram length
    pub min_n: usize,
    /// Longest n-gram length
    pub max_n: usize,
    /// Number of subsequent n-grams each n-gram is linked to
    pub window: usize,
    /// Character or word n-grams
    pub unit: GramUnit,
}

impl Default for NGramGraphCreator {
    fn default() -> Self {
        Self {
            min_n: 3,
            max_n: 3,
            window: 3,
            unit: GramUnit::Character,
        }
    }
}

impl NGramGraphCreator {
    /// Create a creator with default settings (character 3-grams, window 3)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the n-gram length range
    pub fn with_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.min_n = min_n;
        self.max_n = max_n;
        self
    }

    /// Set the correlation window
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the gram unit
    pub fn with_unit(mut self, unit: GramUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Build the n-gram graph of `text`.
    ///
    /// N-grams of each length are linked only to n-grams of the same length.
    /// A text shorter than `min_n` units yields an empty graph.
    pub fn build_graph(&self, text: &str) -> NGramGraph {
        let symbols: Vec<&str> = match self.unit {
            GramUnit::Character => text.graphemes(true).collect(),
            GramUnit::Word => text.unicode_words().collect(),
        };
        let separator = match self.unit {
            GramUnit::Character => "",
            GramUnit::Word => " ",
        };

        if self.min_n == 0 || symbols.len() < self.min_n {
            tracing::debug!(
                len = symbols.len(),
                min_n = self.min_n,
                "text too short for any n-gram, producing empty graph"
            );
            return NGramGraph::new();
        }

        let mut builder = GraphBuilder::with_capacity(symbols.len());
        for n in self.min_n..=self.max_n {
            if symbols.len() < n {
                break;
            }
            let grams: Vec<String> = symbols.windows(n).map(|w| w.join(separator)).collect();
            builder.add_sequence(&grams, self.window);
        }

        builder.into_graph()
    }

    /// Build one graph per unit, in unit order
    pub fn build_all(&self, units: &[TextUnit]) -> Vec<NGramGraph> {
        // For small batches, sequential is faster
        if units.len() < 16 {
            return units.iter().map(|u| self.build_graph(&u.text)).collect();
        }

        units.par_iter().map(|u| self.build_graph(&u.text)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder_basic() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("abc");
        let id_b = builder.get_or_create_node("bcd");
        let id_c = builder.get_or_create_node("abc"); // duplicate

        assert_eq!(id_a, id_c); // Same gram should get same ID
        assert_ne!(id_a, id_b);
        assert_eq!(builder.node_count(), 2);
    }

    #[test]
    fn test_edge_incrementing_is_directed() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("abc");
        let id_b = builder.get_or_create_node("bcd");

        builder.increment_edge(id_a, id_b, 1.0);
        builder.increment_edge(id_a, id_b, 1.0);

        assert_eq!(builder.get_node(id_a).unwrap().edges.get(&id_b), Some(&2.0));
        assert!(builder.get_node(id_b).unwrap().edges.is_empty());
    }

    #[test]
    fn test_self_loops_prevented() {
        let mut builder = GraphBuilder::new();
        let id_a = builder.get_or_create_node("aaa");

        builder.increment_edge(id_a, id_a, 1.0);

        let node = builder.get_node(id_a).unwrap();
        assert!(node.edges.is_empty());
    }

    #[test]
    fn test_abcabc_window_one() {
        let graph = NGramGraphCreator::new()
            .with_range(3, 3)
            .with_window(1)
            .build_graph("abcabc");

        let mut labels: Vec<_> = graph.labels().collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["abc", "bca", "cab"]);

        // Cyclic adjacency abc -> bca -> cab -> abc, each seen once
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_weight("abc", "bca"), Some(1.0));
        assert_eq!(graph.edge_weight("bca", "cab"), Some(1.0));
        assert_eq!(graph.edge_weight("cab", "abc"), Some(1.0));
    }

    #[test]
    fn test_abcabc_default_window() {
        let graph = NGramGraphCreator::new().build_graph("abcabc");

        // Sequence abc, bca, cab, abc with window 3 (abc -> abc skipped)
        assert_eq!(graph.edge_count(), 5);
        assert!(graph.contains_edge("abc", "cab"));
        assert!(graph.contains_edge("bca", "abc"));
        assert!(!graph.contains_edge("cab", "bca"));
        for (_, _, w) in graph.edges() {
            assert!((w - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_weights_normalized_by_max() {
        // "ab" -> "bc" occurs twice, "bc" -> "ca" once
        let graph = NGramGraphCreator::new()
            .with_range(2, 2)
            .with_window(1)
            .build_graph("abcabc");

        assert_eq!(graph.edge_weight("ab", "bc"), Some(1.0));
        assert_eq!(graph.edge_weight("bc", "ca"), Some(0.5));
        assert!(graph.edges().all(|(_, _, w)| w > 0.0 && w <= 1.0));
    }

    #[test]
    fn test_deterministic() {
        let creator = NGramGraphCreator::new();
        assert_eq!(creator.build_graph("abcabc"), creator.build_graph("abcabc"));
    }

    #[test]
    fn test_too_short_text_gives_empty_graph() {
        let creator = NGramGraphCreator::new();
        assert!(creator.build_graph("ab").is_empty());
        assert!(creator.build_graph("").is_empty());
        // Exactly one 3-gram: a vertex but no edge
        let single = creator.build_graph("abc");
        assert!(single.is_empty());
        assert_eq!(single.vertex_count(), 1);
    }

    #[test]
    fn test_multiple_lengths() {
        let graph = NGramGraphCreator::new()
            .with_range(1, 2)
            .with_window(1)
            .build_graph("abc");

        assert!(graph.contains_edge("a", "b"));
        assert!(graph.contains_edge("ab", "bc"));
        // No edges across lengths
        assert!(!graph.contains_edge("b", "bc"));
    }

    #[test]
    fn test_word_grams() {
        let graph = NGramGraphCreator::new()
            .with_unit(GramUnit::Word)
            .with_range(1, 1)
            .with_window(1)
            .build_graph("the cat sat");

        assert!(graph.contains_edge("the", "cat"));
        assert!(graph.contains_edge("cat", "sat"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_build_all_preserves_order() {
        let units: Vec<_> = (0..20)
            .map(|i| TextUnit::new(format!("u{i}"), "x".repeat(i + 1)))
            .collect();
        let creator = NGramGraphCreator::new().with_window(1);
        let graphs = creator.build_all(&units);

        assert_eq!(graphs.len(), 20);
        for (unit, graph) in units.iter().zip(&graphs) {
            assert_eq!(graph, &creator.build_graph(&unit.text));
        }
    }
}
