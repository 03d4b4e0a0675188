//! The n-gram graph value
//!
//! Vertices are n-gram labels interned into a per-graph table; edges are
//! directed `(source, target)` id pairs carrying a weight in (0, 1].
//! Graphs built independently use independent id spaces, so every
//! cross-graph comparison goes through the labels.

use rustc_hash::FxHashMap;

/// A weighted directed graph of n-grams.
#[derive(Debug, Clone, Default)]
pub struct NGramGraph {
    /// Vertex labels indexed by vertex id
    labels: Vec<String>,
    /// Maps label -> vertex id
    label_to_id: FxHashMap<String, u32>,
    /// Directed edges: (source id, target id) -> weight
    edges: FxHashMap<(u32, u32), f64>,
}

impl NGramGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from labeled edges.
    ///
    /// Repeated edges keep the last weight given. Edges whose weight is not
    /// a positive finite number are skipped, along with their vertices.
    /// Positive weights are stored as-is; pass normalized weights to keep
    /// them in (0, 1].
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        let mut graph = Self::new();
        for (source, target, weight) in edges {
            if !(weight.is_finite() && weight > 0.0) {
                continue;
            }
            let s = graph.get_or_insert_vertex(source);
            let t = graph.get_or_insert_vertex(target);
            graph.set_edge(s, t, weight);
        }
        graph
    }

    /// Get or create a vertex for the given label, returning its id
    pub(crate) fn get_or_insert_vertex(&mut self, label: &str) -> u32 {
        if let Some(&id) = self.label_to_id.get(label) {
            return id;
        }

        let id = self.labels.len() as u32;
        self.label_to_id.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        id
    }

    /// Set the weight of an edge, creating it if needed
    pub(crate) fn set_edge(&mut self, source: u32, target: u32, weight: f64) {
        self.edges.insert((source, target), weight);
    }

    /// Add `delta` to the edge `source -> target`, creating it at 0 first.
    pub(crate) fn add_to_edge(&mut self, source: &str, target: &str, delta: f64) {
        let s = self.get_or_insert_vertex(source);
        let t = self.get_or_insert_vertex(target);
        *self.edges.entry((s, t)).or_insert(0.0) += delta;
    }

    /// Multiply every edge weight by `factor`
    pub(crate) fn scale_weights(&mut self, factor: f64) {
        for weight in self.edges.values_mut() {
            *weight *= factor;
        }
    }

    /// Keep only edges for which `f(source, target, &mut weight)` returns true.
    ///
    /// Vertices of dropped edges stay in the table until [`compact`](Self::compact).
    pub(crate) fn retain_edges<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &str, &mut f64) -> bool,
    {
        let labels = &self.labels;
        self.edges
            .retain(|&(s, t), w| f(labels[s as usize].as_str(), labels[t as usize].as_str(), w));
    }

    /// Number of vertices (including vertices no edge references)
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A graph without edges is empty for every similarity purpose
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Get a vertex id by label
    pub fn vertex_id(&self, label: &str) -> Option<u32> {
        self.label_to_id.get(label).copied()
    }

    /// Get the label for a vertex id
    pub fn label(&self, id: u32) -> Option<&str> {
        self.labels.get(id as usize).map(String::as_str)
    }

    /// Weight of the edge `source -> target`, if present
    pub fn edge_weight(&self, source: &str, target: &str) -> Option<f64> {
        let s = self.vertex_id(source)?;
        let t = self.vertex_id(target)?;
        self.edges.get(&(s, t)).copied()
    }

    /// Check whether the edge `source -> target` exists
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edge_weight(source, target).is_some()
    }

    /// Look up the edge `other` knows as `edge` in this graph's id space.
    pub(crate) fn weight_of_foreign(&self, other: &NGramGraph, edge: (u32, u32)) -> Option<f64> {
        let source = other.label(edge.0)?;
        let target = other.label(edge.1)?;
        self.edge_weight(source, target)
    }

    /// Iterate over raw `(source id, target id, weight)` edges in arbitrary order
    pub(crate) fn raw_edges(&self) -> impl Iterator<Item = ((u32, u32), f64)> + '_ {
        self.edges.iter().map(|(&k, &w)| (k, w))
    }

    /// Iterate over labeled edges in arbitrary order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.edges.iter().map(move |(&(s, t), &w)| {
            (
                self.labels[s as usize].as_str(),
                self.labels[t as usize].as_str(),
                w,
            )
        })
    }

    /// Labeled edges sorted by (source, target) for deterministic output
    pub fn sorted_edges(&self) -> Vec<(&str, &str, f64)> {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        edges
    }

    /// Vertex labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    /// Heaviest edge weight, 0 for an empty graph
    pub fn max_weight(&self) -> f64 {
        self.edges.values().copied().fold(0.0, f64::max)
    }

    /// Sum of all edge weights
    pub fn total_weight(&self) -> f64 {
        self.edges.values().sum()
    }

    /// Divide every weight by the heaviest one so the maximum becomes 1.
    pub(crate) fn normalize(&mut self) {
        let max = self.max_weight();
        if max > 0.0 {
            for weight in self.edges.values_mut() {
                *weight /= max;
            }
        }
    }

    /// Drop vertices no edge references and release spare capacity.
    ///
    /// Labeled content is unchanged; only the id space is rebuilt.
    pub fn compact(&mut self) {
        let mut used = vec![false; self.labels.len()];
        for &(s, t) in self.edges.keys() {
            used[s as usize] = true;
            used[t as usize] = true;
        }

        if used.iter().all(|&u| u) {
            self.label_to_id.shrink_to_fit();
            self.edges.shrink_to_fit();
            return;
        }

        let mut remap = vec![u32::MAX; self.labels.len()];
        let mut labels = Vec::with_capacity(used.iter().filter(|&&u| u).count());
        for (old, label) in std::mem::take(&mut self.labels).into_iter().enumerate() {
            if used[old] {
                remap[old] = labels.len() as u32;
                labels.push(label);
            }
        }

        self.label_to_id = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i as u32))
            .collect();
        self.edges = std::mem::take(&mut self.edges)
            .into_iter()
            .map(|((s, t), w)| ((remap[s as usize], remap[t as usize]), w))
            .collect();
        self.labels = labels;
    }
}

/// Two graphs are equal when they hold the same labeled edges with the same
/// weights, regardless of vertex numbering or orphan vertices.
impl PartialEq for NGramGraph {
    fn eq(&self, other: &Self) -> bool {
        self.edge_count() == other.edge_count()
            && self
                .raw_edges()
                .all(|(edge, w)| other.weight_of_foreign(self, edge) == Some(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> NGramGraph {
        NGramGraph::from_edges([("a", "b", 1.0), ("b", "c", 0.5), ("c", "a", 0.25)])
    }

    #[test]
    fn test_from_edges() {
        let graph = triangle();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_weight("b", "c"), Some(0.5));
        // Directed
        assert_eq!(graph.edge_weight("c", "b"), None);
        assert!(graph.contains_edge("c", "a"));
    }

    #[test]
    fn test_from_edges_skips_non_positive_weights() {
        let graph = NGramGraph::from_edges([
            ("a", "b", 1.0),
            ("b", "c", 0.0),
            ("c", "d", -0.5),
            ("d", "e", f64::NAN),
        ]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.vertex_count(), 2);
        assert!(!graph.contains_edge("b", "c"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = NGramGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.max_weight(), 0.0);
        assert!(graph.sorted_edges().is_empty());
    }

    #[test]
    fn test_normalize() {
        let mut graph = NGramGraph::from_edges([("a", "b", 4.0), ("b", "c", 2.0)]);
        graph.normalize();
        assert_eq!(graph.edge_weight("a", "b"), Some(1.0));
        assert_eq!(graph.edge_weight("b", "c"), Some(0.5));
    }

    #[test]
    fn test_equality_ignores_vertex_order() {
        let a = NGramGraph::from_edges([("x", "y", 1.0), ("y", "z", 0.5)]);
        let b = NGramGraph::from_edges([("y", "z", 0.5), ("x", "y", 1.0)]);
        assert_eq!(a, b);

        let c = NGramGraph::from_edges([("x", "y", 1.0), ("y", "z", 0.4)]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_compact_drops_orphans() {
        let mut graph = triangle();
        let orphan = graph.get_or_insert_vertex("orphan");
        assert_eq!(orphan, 3);
        assert_eq!(graph.vertex_count(), 4);

        let before = graph.clone();
        graph.compact();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.vertex_id("orphan"), None);
        assert_eq!(graph, before);
        assert_eq!(graph.edge_weight("c", "a"), Some(0.25));
    }

    #[test]
    fn test_sorted_edges_deterministic() {
        let graph = triangle();
        let edges = graph.sorted_edges();
        assert_eq!(edges[0], ("a", "b", 1.0));
        assert_eq!(edges[1], ("b", "c", 0.5));
        assert_eq!(edges[2], ("c", "a", 0.25));
    }
}
