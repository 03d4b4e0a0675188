//! Summarization components
//!
//! Ranks event sentences against the event essence graph and removes
//! redundant ones.

pub mod selector;

pub use selector::{RedundancyFilter, SelectorConfig, SentenceSelector};
