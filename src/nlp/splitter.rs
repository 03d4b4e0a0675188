//! Sentence splitting
//!
//! Splitting is a collaborator boundary: the pipeline only needs an ordered
//! list of sentence strings per document. [`UnicodeSentenceSplitter`] uses
//! the UAX #29 sentence boundaries from `unicode-segmentation`.

use crate::types::TextUnit;
use unicode_segmentation::UnicodeSegmentation;

/// Maps a text unit to its ordered sentences.
pub trait SentenceSplitter: Send + Sync {
    /// Split `unit` into sentence strings, in reading order.
    fn split(&self, unit: &TextUnit) -> Vec<String>;
}

/// UAX #29 sentence splitter
#[derive(Debug, Clone, Copy)]
pub struct UnicodeSentenceSplitter {
    /// Sentences with fewer characters than this (after trimming) are dropped
    min_chars: usize,
}

impl Default for UnicodeSentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeSentenceSplitter {
    /// Create a splitter keeping every non-blank sentence
    pub fn new() -> Self {
        Self { min_chars: 1 }
    }

    /// Drop sentences shorter than `min_chars` characters
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars.max(1);
        self
    }
}

impl SentenceSplitter for UnicodeSentenceSplitter {
    fn split(&self, unit: &TextUnit) -> Vec<String> {
        // Hard-wrapped lines would otherwise end a sentence at every line feed
        let flattened = unit.text.split_whitespace().collect::<Vec<_>>().join(" ");
        flattened
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.chars().count() >= self.min_chars)
            .map(str::to_string)
            .collect()
    }
}

/// Splits on line breaks; one sentence per non-blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSplitter;

impl SentenceSplitter for LineSplitter {
    fn split(&self, unit: &TextUnit) -> Vec<String> {
        unit.text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}
