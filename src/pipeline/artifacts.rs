//! Intermediate results flowing between pipeline stages.

use crate::graph::builder::NGramGraphCreator;
use crate::graph::ngram::NGramGraph;
use crate::nlp::splitter::SentenceSplitter;
use crate::types::TextUnit;

/// The flattened sentences of one event, in document then reading order.
///
/// Sentence ids are `<document id>#<k>` with `k` the position inside the
/// document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentenceSet {
    units: Vec<TextUnit>,
}

impl SentenceSet {
    /// Split `documents` and flatten the sentences into one list.
    pub fn split<S: SentenceSplitter + ?Sized>(documents: &[&TextUnit], splitter: &S) -> Self {
        let units = documents
            .iter()
            .flat_map(|doc| {
                splitter
                    .split(doc)
                    .into_iter()
                    .enumerate()
                    .map(move |(k, text)| TextUnit::new(format!("{}#{k}", doc.id), text))
            })
            .collect();
        Self { units }
    }

    pub fn units(&self) -> &[TextUnit] {
        &self.units
    }

    /// Sentence texts, in list order
    pub fn texts(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// One graph per sentence, in list order
    pub fn graphs(&self, creator: &NGramGraphCreator) -> SentenceGraphs {
        SentenceGraphs {
            graphs: creator.build_all(&self.units),
        }
    }
}

/// Sentence graphs aligned with a [`SentenceSet`].
#[derive(Debug, Clone, Default)]
pub struct SentenceGraphs {
    graphs: Vec<NGramGraph>,
}

impl SentenceGraphs {
    pub fn as_slice(&self) -> &[NGramGraph] {
        &self.graphs
    }

    /// Graphs of the given sentence positions, in that order
    pub fn select<'a>(&'a self, positions: &'a [usize]) -> impl Iterator<Item = &'a NGramGraph> + 'a {
        positions.iter().map(move |&i| &self.graphs[i])
    }

    /// Sum of vertex counts over all graphs
    pub fn total_vertices(&self) -> usize {
        self.graphs.iter().map(NGramGraph::vertex_count).sum()
    }

    /// Sum of edge counts over all graphs
    pub fn total_edges(&self) -> usize {
        self.graphs.iter().map(NGramGraph::edge_count).sum()
    }
}
