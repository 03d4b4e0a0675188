//! Graph construction and representation
//!
//! This module provides the n-gram graph value and the builder that
//! derives it from text.

pub mod builder;
pub mod ngram;
