//! Alignment of summarizer output back onto source sentences.

use summed_core::config::DEFAULT_SIMILARITY_THRESHOLD;
use summed_core::Sentence;
use tracing::{debug, warn};

use crate::lexrank::{ExtractiveSummarizer, LexRankSummarizer};
use crate::similarity::similarity_ratio;

/// Top-ranked sentences, borrowed from the input, in document order.
#[derive(Debug, Clone)]
pub struct RankedSummary<'a> {
    pub sentences: Vec<&'a Sentence>,
    /// Rank score of each entry of `sentences`.
    pub scores: Vec<f64>,
    /// Number of sentences asked for.
    pub requested: usize,
    /// Summarizer strings that matched no source sentence.
    pub unmatched: Vec<String>,
}

impl<'a> RankedSummary<'a> {
    fn empty(requested: usize) -> Self {
        Self {
            sentences: Vec::new(),
            scores: Vec::new(),
            requested,
            unmatched: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// How many requested sentences could not be delivered.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.sentences.len())
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }

    /// Owned copies with `score` filled in.
    pub fn to_scored(&self) -> Vec<Sentence> {
        self.sentences
            .iter()
            .zip(&self.scores)
            .map(|(s, &score)| Sentence {
                score: Some(score),
                ..(*s).clone()
            })
            .collect()
    }
}

/// Join one line per sentence: lemmatized text or raw text.
pub fn surrogate_document(sentences: &[Sentence], use_lemma: bool) -> String {
    sentences
        .iter()
        .map(|s| if use_lemma { s.lemmatized_text.as_str() } else { s.text.as_str() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ranks sentences with an extractive summarizer and aligns the result.
pub struct SentenceRanker<S = LexRankSummarizer> {
    summarizer: S,
    threshold: f64,
}

impl<S: ExtractiveSummarizer> SentenceRanker<S> {
    pub fn new(summarizer: S) -> Self {
        Self {
            summarizer,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Minimum similarity ratio (0-100) for a lemma match.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Select up to `num_sentences` sentences.
    ///
    /// Each summarizer string is matched against the sentences in document
    /// order: verbatim against `text` when `use_lemma` is false, by
    /// similarity ratio against `lemmatized_text` otherwise. The earliest
    /// acceptable sentence not already selected wins. A shorter result than
    /// requested is not an error.
    pub fn rank<'a>(
        &self,
        sentences: &'a [Sentence],
        num_sentences: usize,
        use_lemma: bool,
    ) -> RankedSummary<'a> {
        if num_sentences == 0 || sentences.is_empty() {
            return RankedSummary::empty(num_sentences);
        }

        let document = surrogate_document(sentences, use_lemma);
        let ranked = self.summarizer.summarize(&document, num_sentences);

        let mut taken = vec![false; sentences.len()];
        let mut picks: Vec<(usize, f64)> = Vec::with_capacity(num_sentences);
        let mut unmatched = Vec::new();

        for candidate in ranked {
            if picks.len() == num_sentences {
                break;
            }
            let wanted = candidate.text.trim();
            let found = sentences
                .iter()
                .enumerate()
                .position(|(i, s)| !taken[i] && self.accepts(s, wanted, use_lemma));
            match found {
                Some(i) => {
                    taken[i] = true;
                    picks.push((i, candidate.score));
                }
                None => unmatched.push(candidate.text),
            }
        }

        picks.sort_by_key(|&(i, _)| i);

        let summary = RankedSummary {
            sentences: picks.iter().map(|&(i, _)| &sentences[i]).collect(),
            scores: picks.iter().map(|&(_, score)| score).collect(),
            requested: num_sentences,
            unmatched,
        };

        if !summary.unmatched.is_empty() {
            warn!(
                "Aligned {} of {} requested sentences; {} summary sentence(s) matched no source sentence",
                summary.len(),
                num_sentences,
                summary.unmatched.len()
            );
        } else if !summary.is_complete() {
            debug!(
                "Aligned {} of {} requested sentences; document has too few candidates",
                summary.len(),
                num_sentences
            );
        }

        summary
    }

    fn accepts(&self, sentence: &Sentence, wanted: &str, use_lemma: bool) -> bool {
        if use_lemma {
            similarity_ratio(sentence.lemmatized_text.trim(), wanted) >= self.threshold
        } else {
            sentence.text.trim() == wanted
        }
    }
}

/// Rank with LexRank for `language` and the default similarity threshold.
pub fn top_sentences<'a>(
    sentences: &'a [Sentence],
    num_sentences: usize,
    language: &str,
    use_lemma: bool,
) -> RankedSummary<'a> {
    SentenceRanker::new(LexRankSummarizer::new(language)).rank(sentences, num_sentences, use_lemma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexrank::ScoredText;
    use parking_lot::Mutex;

    /// Returns preset strings and records the document it was given.
    struct FixedSummarizer {
        output: Vec<&'static str>,
        seen: Mutex<Option<String>>,
    }

    impl FixedSummarizer {
        fn new(output: Vec<&'static str>) -> Self {
            Self {
                output,
                seen: Mutex::new(None),
            }
        }
    }

    impl ExtractiveSummarizer for FixedSummarizer {
        fn summarize(&self, document: &str, _count: usize) -> Vec<ScoredText> {
            *self.seen.lock() = Some(document.to_string());
            let n = self.output.len();
            self.output
                .iter()
                .enumerate()
                .map(|(i, t)| ScoredText {
                    text: t.to_string(),
                    score: (n - i) as f64,
                })
                .collect()
        }
    }

    fn sentence(text: &str, lemma: &str, start: usize) -> Sentence {
        Sentence::new(text, lemma, start, start + text.chars().count())
    }

    fn animals() -> Vec<Sentence> {
        vec![
            sentence("Cats are mammals.", "Cats are mammals.", 0),
            sentence("The sky is blue.", "The sky is blue.", 18),
        ]
    }

    #[test]
    fn test_exact_match_raw_text() {
        let sentences = animals();
        let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["Cats are mammals."]));
        let summary = ranker.rank(&sentences, 1, false);
        assert_eq!(summary.len(), 1);
        assert!(std::ptr::eq(summary.sentences[0], &sentences[0]));
        assert!(summary.is_complete());
    }

    #[test]
    fn test_surrogate_document_one_line_per_sentence() {
        let sentences = vec![
            sentence("Cats are mammals.", "cat mammal", 0),
            sentence("Is it?", "", 18),
            sentence("The sky is blue.", "sky blue", 25),
        ];
        let summarizer = FixedSummarizer::new(vec![]);
        let ranker = SentenceRanker::new(summarizer);
        ranker.rank(&sentences, 2, true);
        assert_eq!(
            ranker.summarizer.seen.lock().as_deref(),
            Some("cat mammal\n\nsky blue")
        );
        ranker.rank(&sentences, 2, false);
        assert_eq!(
            ranker.summarizer.seen.lock().as_deref(),
            Some("Cats are mammals.\nIs it?\nThe sky is blue.")
        );
    }

    #[test]
    fn test_fuzzy_match_and_shortfall() {
        let sentences = vec![
            sentence("Cats are mammals.", "cat be mammal", 0),
            sentence("Dogs bark loudly.", "dog bark loudly", 18),
        ];
        let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["cat mammal", "dog run fast"]));
        let summary = ranker.rank(&sentences, 2, true);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary.sentences[0].start, 0);
        assert_eq!(summary.unmatched, vec!["dog run fast".to_string()]);
        assert_eq!(summary.shortfall(), 1);
    }

    #[test]
    fn test_threshold_boundary() {
        // similarity_ratio("abcd", "abcdxy") == 80
        let sentences = vec![sentence("ABCD.", "abcd", 0)];
        for (threshold, expected) in [(79.0, 1), (80.0, 1), (81.0, 0)] {
            let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["abcdxy"])).with_threshold(threshold);
            assert_eq!(ranker.rank(&sentences, 1, true).len(), expected, "threshold={}", threshold);
        }
    }

    #[test]
    fn test_earlier_sentence_wins_ties() {
        let sentences = vec![
            sentence("Cats are mammals.", "cat mammal", 0),
            sentence("A cat is a mammal.", "cat mammal", 18),
        ];
        let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["cat mammal"]));
        let summary = ranker.rank(&sentences, 1, true);
        assert!(std::ptr::eq(summary.sentences[0], &sentences[0]));

        // A second identical summary string takes the next candidate.
        let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["cat mammal", "cat mammal"]));
        let summary = ranker.rank(&sentences, 2, true);
        let starts: Vec<usize> = summary.sentences.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 18]);
    }

    #[test]
    fn test_document_order_not_rank_order() {
        let sentences = vec![
            sentence("First.", "first", 0),
            sentence("Second.", "second", 7),
            sentence("Third.", "third", 15),
        ];
        let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["Third.", "First."]));
        let summary = ranker.rank(&sentences, 2, false);
        let texts: Vec<&str> = summary.sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["First.", "Third."]);
        // Scores travel with their sentence.
        assert_eq!(summary.scores, vec![1.0, 2.0]);
        let scored = summary.to_scored();
        assert_eq!(scored[1].score, Some(2.0));
        assert_eq!(sentences[2].score, None);
    }

    #[test]
    fn test_output_bounded_by_request() {
        let sentences = animals();
        let ranker = SentenceRanker::new(FixedSummarizer::new(vec!["The sky is blue.", "Cats are mammals."]));
        assert_eq!(ranker.rank(&sentences, 1, false).len(), 1);
        let none = ranker.rank(&sentences, 0, false);
        assert!(none.is_empty());
        assert!(ranker.summarizer.seen.lock().is_none());
    }

    #[test]
    fn test_lexrank_end_to_end_preserves_order() {
        let sentences = vec![
            sentence("Aspirin reduces fever and pain.", "aspirin reduce fever pain", 0),
            sentence("It rained.", "rain", 32),
            sentence("Aspirin is common for fever.", "aspirin common fever", 43),
            sentence("Patients take aspirin for pain.", "patient aspirin pain", 72),
            sentence("Fever and pain respond to aspirin.", "fever pain respond aspirin", 104),
        ];
        for n in 0..=6 {
            let summary = top_sentences(&sentences, n, "en", true);
            assert!(summary.len() <= n);
            assert!(summary.sentences.windows(2).all(|w| w[0].start < w[1].start));
            assert!(summary.unmatched.is_empty());
        }
        let summary = top_sentences(&sentences, 4, "en", true);
        assert!(summary.sentences.iter().all(|s| s.text != "It rained."));
    }
}
