//! Shared data model: sentences, entities, noun chunks, lemmas.
//!
//! All `start`/`end` offsets are character (Unicode scalar value) offsets
//! into the original document, never byte offsets.

use serde::{Deserialize, Serialize};

/// A sentence produced by a linguistic pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    /// Whitespace-joined non-stopword lemmas of `text`. May be empty.
    pub lemmatized_text: String,
    pub start: usize,
    pub end: usize,
    /// Rank score, set only on sentences selected into a summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Sentence {
    pub fn new(
        text: impl Into<String>,
        lemmatized_text: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            text: text.into(),
            lemmatized_text: lemmatized_text.into(),
            start,
            end,
            score: None,
        }
    }

    /// Number of characters covered by the sentence span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A labelled span, e.g. a medication or diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Category of the span (e.g. `MedicationName`).
    pub label: String,
    /// Normalized name or short description, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// A run of content words; usually a good search keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NounChunk {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lemma {
    pub text: String,
    pub is_stopword: bool,
}
