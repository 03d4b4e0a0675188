//! Error types for summarization runs
//!
//! Numerical degeneracies (empty graphs, 0/0 similarities, non-converging
//! clustering) never surface here; they are resolved where they occur.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for summarizer operations.
pub type Result<T> = std::result::Result<T, SummarizerError>;

/// Errors that can occur while configuring or running a summarization.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Configuration failed validation. Carries the rendered diagnostics.
    #[error("invalid configuration:\n{0}")]
    InvalidConfig(String),

    /// Reading input failed.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration JSON could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An event produced no sentences to summarize.
    #[error("event {event_id} has no sentences")]
    EmptyEvent { event_id: usize },

    /// Writing a summary file failed.
    #[error("failed to persist summary to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dedicated worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl SummarizerError {
    /// Whether the error is scoped to a single event and the run may go on.
    pub fn is_per_event(&self) -> bool {
        matches!(self, Self::EmptyEvent { .. } | Self::Persistence { .. })
    }
}
