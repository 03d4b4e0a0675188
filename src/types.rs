//! Core data types shared across the summarizer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable piece of input text: a whole document or a single sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Stable identifier (file name for documents, `doc#k` for sentences)
    pub id: String,
    /// The text payload
    pub text: String,
}

impl TextUnit {
    /// Create a new text unit
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Check whether the payload is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// What an n-gram is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GramUnit {
    /// Extended grapheme clusters (classic character n-gram graphs)
    #[default]
    Character,
    /// Unicode words, joined by a single space inside a label
    Word,
}

/// A sentence with its relevance to the event essence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    /// Position in the event's flattened sentence list
    pub index: usize,
    /// Sentence text
    pub text: String,
    /// Value similarity against the event essence graph
    pub score: f64,
}

/// The summary of one detected event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    /// Event cluster id
    pub event_id: usize,
    /// Ids of the documents grouped into this event
    pub document_ids: Vec<String>,
    /// Number of subtopic clusters found among the event's sentences
    pub subtopics: usize,
    /// Selected sentences, most relevant first
    pub sentences: Vec<ScoredSentence>,
}

impl EventSummary {
    /// Sentence texts in summary order
    pub fn texts(&self) -> Vec<&str> {
        self.sentences.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Event id -> event summary. Events whose processing failed are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub events: BTreeMap<usize, EventSummary>,
}

impl Summary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Sentence texts for one event, if it was summarized
    pub fn sentences(&self, event_id: usize) -> Option<Vec<&str>> {
        self.events.get(&event_id).map(EventSummary::texts)
    }

    /// Number of summarized events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no event was summarized
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over events in id order
    pub fn iter(&self) -> impl Iterator<Item = (&usize, &EventSummary)> + '_ {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_unit() {
        assert!(TextUnit::new("a", "  \n\t").is_blank());
        assert!(!TextUnit::new("a", "text").is_blank());
    }

    #[test]
    fn test_gram_unit_serde() {
        let unit: GramUnit = serde_json::from_str("\"word\"").unwrap();
        assert_eq!(unit, GramUnit::Word);
        assert_eq!(GramUnit::default(), GramUnit::Character);
    }

    #[test]
    fn test_summary_lookup() {
        let mut summary = Summary::new();
        summary.events.insert(
            2,
            EventSummary {
                event_id: 2,
                document_ids: vec!["a.txt".into()],
                subtopics: 1,
                sentences: vec![ScoredSentence {
                    index: 0,
                    text: "Only sentence.".into(),
                    score: 1.0,
                }],
            },
        );

        assert_eq!(summary.sentences(2), Some(vec!["Only sentence."]));
        assert_eq!(summary.sentences(0), None);
        assert_eq!(summary.len(), 1);
    }
}
