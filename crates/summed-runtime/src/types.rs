//! Request and response types.

use serde::{Deserialize, Serialize};
use summed_core::{NamedEntity, NounChunk, Sentence};

/// Input to [`crate::Analyzer::analyze`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    /// Two-letter code, or `"detect"` / absent for detection.
    #[serde(default)]
    pub language: Option<String>,
    /// Model short name, or `"default"` / absent for the language default.
    #[serde(default)]
    pub model: Option<String>,
    /// Summary length; falls back to the configured default.
    #[serde(default, rename = "numSentences")]
    pub num_sentences: Option<usize>,
    /// Rank on lemmatized text; falls back to the configured default.
    #[serde(default, rename = "useLemma")]
    pub use_lemma: Option<bool>,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn num_sentences(mut self, n: usize) -> Self {
        self.num_sentences = Some(n);
        self
    }

    pub fn use_lemma(mut self, use_lemma: bool) -> Self {
        self.use_lemma = Some(use_lemma);
        self
    }
}

/// Full analysis of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub language: String,
    pub model: String,
    /// The trimmed input all offsets refer to.
    pub text: String,
    /// Health entities; empty when no entity service is configured.
    pub entities: Vec<NamedEntity>,
    #[serde(rename = "nounChunks")]
    pub noun_chunks: Vec<NounChunk>,
    pub sentences: Vec<Sentence>,
    /// Top-ranked sentences in document order, with scores.
    #[serde(rename = "topSentences")]
    pub top_sentences: Vec<Sentence>,
    /// Requested summary sentences that could not be aligned.
    pub shortfall: usize,
}
