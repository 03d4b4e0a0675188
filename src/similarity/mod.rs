//! Graph similarity
//!
//! This module compares n-gram graphs and assembles pairwise similarity
//! matrices for clustering.

pub mod calculator;
pub mod matrix;
