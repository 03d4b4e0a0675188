//! Summarization pipeline
//!
//! Configuration, validation, stage traits, observers and the runner that
//! composes graph building, clustering, folding and sentence selection.

pub mod artifacts;
pub mod config;
pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod traits;
pub mod validation;

pub use config::SummarizerConfig;
pub use observer::{NoopObserver, PipelineObserver, StageTimingObserver};
pub use runner::SummarizationPipeline;
pub use traits::{EventDetector, MclEventDetector, SingleEventDetector, Summarizer};
