//! Stage trait definitions for the pipeline.
//!
//! Each trait is one collaborator boundary. Implementations are statically
//! dispatched; every trait is object safe so `Box<dyn ...>` works too.

use crate::errors::Result;
use crate::graph::builder::NGramGraphCreator;
use crate::mcl::engine::MarkovCluster;
use crate::mcl::ClusterAssignment;
use crate::similarity::matrix::SimilarityMatrixBuilder;
use crate::types::{Summary, TextUnit};

// ============================================================================
// EventDetector: documents -> events
// ============================================================================

/// Groups input documents into events.
///
/// # Contract
///
/// - **Input**: the documents in input order.
/// - **Output**: a partition of the document positions `0..documents.len()`.
///   Cluster ids become event ids.
pub trait EventDetector: Send + Sync {
    fn detect(&self, documents: &[TextUnit]) -> ClusterAssignment;
}

/// Markov clustering over the document-level similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct MclEventDetector {
    matrix_builder: SimilarityMatrixBuilder,
    engine: MarkovCluster,
}

impl MclEventDetector {
    pub fn new(creator: NGramGraphCreator, engine: MarkovCluster) -> Self {
        Self {
            matrix_builder: SimilarityMatrixBuilder::new(creator),
            engine,
        }
    }
}

impl EventDetector for MclEventDetector {
    fn detect(&self, documents: &[TextUnit]) -> ClusterAssignment {
        let matrix = self.matrix_builder.build(documents);
        tracing::debug!(
            documents = documents.len(),
            nnz = matrix.nnz(),
            "document similarity matrix"
        );
        self.engine.cluster(&matrix)
    }
}

/// Treats the whole input as one event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleEventDetector;

impl EventDetector for SingleEventDetector {
    fn detect(&self, documents: &[TextUnit]) -> ClusterAssignment {
        if documents.is_empty() {
            return ClusterAssignment::default();
        }
        ClusterAssignment::from_clusters(vec![(0..documents.len()).collect()])
    }
}

// ============================================================================
// Summarizer: documents -> summary
// ============================================================================

/// Anything that turns a document collection into per-event summaries.
pub trait Summarizer {
    fn summarize(&self, documents: &[TextUnit]) -> Result<Summary>;
}
