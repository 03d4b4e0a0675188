//! Natural Language Processing components
//!
//! This module provides sentence splitting.

pub mod splitter;
