//! SumMed Rank: extractive sentence ranking and alignment.
//!
//! Sentences are ranked by a LexRank summarizer over a surrogate document
//! built from their lemmatized (or raw) text. The summarizer only returns
//! strings, so `SentenceRanker` maps each one back onto the source
//! `Sentence` by exact match or by similarity ratio, and returns the
//! matches in document order.

pub mod align;
pub mod lexrank;
pub mod similarity;

pub use align::{surrogate_document, top_sentences, RankedSummary, SentenceRanker};
pub use lexrank::{split_sentences, ExtractiveSummarizer, LexRankSummarizer, ScoredText};
pub use similarity::similarity_ratio;
