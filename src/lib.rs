//! # rapid_ngg
//!
//! Extractive multi-document summarization over n-gram graphs.
//!
//! Documents and sentences are turned into weighted graphs of overlapping
//! n-grams. Graph similarity drives Markov clustering of documents into
//! events and of sentences into subtopics; Intersect and Merge folds build a
//! consensus "essence" graph per event, against which sentences are ranked
//! before redundant ones are removed.
//!
//! ## Features
//!
//! - **Parallel**: graph building, similarity matrices and sparse matrix
//!   products run on rayon
//! - **Unicode-aware**: character n-grams over grapheme clusters, or word
//!   n-grams over Unicode words
//! - **Configurable**: every tunable loads from JSON and is validated with
//!   all problems reported at once

pub mod combine;
pub mod errors;
pub mod graph;
pub mod io;
pub mod mcl;
pub mod nlp;
pub mod pipeline;
pub mod similarity;
pub mod summarizer;
pub mod types;

// Re-export commonly used types
pub use errors::{Result, SummarizerError};
pub use types::{EventSummary, GramUnit, ScoredSentence, Summary, TextUnit};

// Re-export main functionality
pub use combine::{BlendSchedule, GraphFold, GraphOperator, Intersect, Merge};
pub use graph::{builder::NGramGraphCreator, ngram::NGramGraph};
pub use mcl::{engine::MarkovCluster, ClusterAssignment, MclResult};
pub use nlp::splitter::{SentenceSplitter, UnicodeSentenceSplitter};
pub use pipeline::{SummarizationPipeline, Summarizer, SummarizerConfig};
pub use similarity::{
    calculator::{GraphSimilarity, NGramGraphSimilarity, Similarity},
    matrix::{SimilarityMatrix, SimilarityMatrixBuilder},
};
pub use summarizer::selector::{RedundancyFilter, SentenceSelector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
