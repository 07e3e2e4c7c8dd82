//! Linguistic pipelines: the trait the engine consumes, the loader seam the
//! cache calls, and a rule-based implementation.

use std::sync::Arc;

use parking_lot::Mutex;
use summed_core::{Error, Lemma, NounChunk, Result, Sentence};
use tracing::debug;

use crate::key::PipelineKey;
use crate::lemmatizer::english_lemma;
use crate::stopwords::StopwordFilter;

/// A token with character offsets into the analyzed text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub start: usize,
    pub end: usize,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// Result of running a pipeline over a text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub sentences: Vec<Sentence>,
    pub tokens: Vec<Token>,
    pub noun_chunks: Vec<NounChunk>,
}

impl Document {
    /// Lemma listing for every token, stopwords included.
    pub fn lemmas(&self) -> Vec<Lemma> {
        self.tokens
            .iter()
            .map(|t| Lemma {
                text: t.lemma.clone(),
                is_stopword: t.is_stop,
            })
            .collect()
    }

    /// Non-stopword lemmas of the whole document, space separated.
    pub fn lemmatized_text(&self) -> String {
        join_content_lemmas(&self.tokens)
    }
}

/// A loaded pipeline, shared read-only between concurrent requests.
pub trait LinguisticPipeline: Send + Sync {
    fn key(&self) -> &PipelineKey;

    fn language(&self) -> &str {
        self.key().language()
    }

    /// Segment and lemmatize `text`.
    fn analyze(&self, text: &str) -> Document;
}

/// A pipeline that needs exclusive access while analyzing.
pub trait UnsyncPipeline: Send {
    fn analyze(&mut self, text: &str) -> Document;
}

/// Serializes uses of a pipeline that cannot run concurrently.
pub struct SerializedPipeline<P> {
    key: PipelineKey,
    inner: Mutex<P>,
}

impl<P: UnsyncPipeline> SerializedPipeline<P> {
    pub fn new(key: PipelineKey, pipeline: P) -> Self {
        Self {
            key,
            inner: Mutex::new(pipeline),
        }
    }
}

impl<P: UnsyncPipeline> LinguisticPipeline for SerializedPipeline<P> {
    fn key(&self) -> &PipelineKey {
        &self.key
    }

    fn analyze(&self, text: &str) -> Document {
        self.inner.lock().analyze(text)
    }
}

/// Loads the pipeline for a key. Called by `PipelineCache` at most once per
/// key for every successful load.
pub trait PipelineLoader: Send + Sync {
    fn load(&self, key: &PipelineKey) -> Result<Arc<dyn LinguisticPipeline>>;
}

impl<F> PipelineLoader for F
where
    F: Fn(&PipelineKey) -> Result<Arc<dyn LinguisticPipeline>> + Send + Sync,
{
    fn load(&self, key: &PipelineKey) -> Result<Arc<dyn LinguisticPipeline>> {
        self(key)
    }
}

/// Model names the rule pipeline answers to.
pub const RULE_MODELS: &[&str] = &["core_web_sm", "core_web_md", "core_news_sm", "core_news_md"];

/// Loads `RulePipeline` instances for known models and languages with a
/// stopword list.
#[derive(Debug, Default, Clone)]
pub struct RulePipelineLoader;

impl PipelineLoader for RulePipelineLoader {
    fn load(&self, key: &PipelineKey) -> Result<Arc<dyn LinguisticPipeline>> {
        if !RULE_MODELS.contains(&key.model()) {
            return Err(Error::Load {
                key: key.to_string(),
                reason: format!("unknown model '{}'", key.model()),
            });
        }
        let stopwords = StopwordFilter::for_language(key.language()).ok_or_else(|| Error::Load {
            key: key.to_string(),
            reason: format!("unsupported language '{}'", key.language()),
        })?;
        debug!("Rule pipeline for {} ({} stopwords)", key, stopwords.len());
        Ok(Arc::new(RulePipeline::new(key.clone(), stopwords)))
    }
}

/// Lowercase words after which a period does not end a sentence.
pub const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "prof", "st", "vs", "etc", "fig", "no", "approx", "ca", "bzw", "nr",
];

const TERMINATORS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201d}', '\u{2019}', '\u{bb}'];

/// Rule-based segmenter, tokenizer and lemmatizer.
pub struct RulePipeline {
    key: PipelineKey,
    stopwords: StopwordFilter,
}

/// Token span with byte offsets kept for slicing.
struct Span {
    byte_start: usize,
    byte_end: usize,
    start: usize,
    end: usize,
    is_word: bool,
}

impl RulePipeline {
    pub fn new(key: PipelineKey, stopwords: StopwordFilter) -> Self {
        Self { key, stopwords }
    }

    fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if self.key.language() == "en" {
            english_lemma(&lower)
        } else {
            lower
        }
    }

    /// Split into words (alphanumerics with inner `'` or `-`) and single
    /// punctuation characters.
    fn scan(text: &str) -> Vec<Span> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut spans = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let (byte_start, c) = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            let start = i;
            if c.is_alphanumeric() {
                i += 1;
                while i < chars.len() {
                    let ch = chars[i].1;
                    let joins = (ch == '\'' || ch == '-')
                        && i + 1 < chars.len()
                        && chars[i + 1].1.is_alphanumeric();
                    if ch.is_alphanumeric() || joins {
                        i += 1;
                    } else {
                        break;
                    }
                }
            } else {
                i += 1;
            }
            let byte_end = chars.get(i).map(|(b, _)| *b).unwrap_or(text.len());
            spans.push(Span {
                byte_start,
                byte_end,
                start,
                end: i,
                is_word: c.is_alphanumeric(),
            });
        }
        spans
    }

    /// Whether a sentence ends after span `i`.
    fn ends_sentence(text: &str, spans: &[Span], i: usize) -> bool {
        let Some(next) = spans.get(i + 1) else {
            return true;
        };
        let gap = &text[spans[i].byte_end..next.byte_start];
        if gap.matches('\n').count() >= 2 {
            return true;
        }
        if gap.is_empty() {
            return false;
        }

        // Walk back over closing quotes/brackets to the punctuation mark.
        let mut j = i;
        while j > 0 && is_char_in(text, &spans[j], CLOSERS) && spans[j - 1].byte_end == spans[j].byte_start {
            j -= 1;
        }
        if !is_char_in(text, &spans[j], TERMINATORS) {
            return false;
        }
        if &text[spans[j].byte_start..spans[j].byte_end] == "." && j > 0 {
            let prev = &spans[j - 1];
            if prev.is_word && prev.byte_end == spans[j].byte_start {
                let word = text[prev.byte_start..prev.byte_end].to_lowercase();
                if ABBREVIATIONS.contains(&word.as_str()) {
                    return false;
                }
            }
        }
        true
    }
}

fn is_char_in(text: &str, span: &Span, set: &[char]) -> bool {
    !span.is_word
        && text[span.byte_start..span.byte_end]
            .chars()
            .next()
            .map(|c| set.contains(&c))
            .unwrap_or(false)
}

fn join_content_lemmas(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !t.is_stop && !t.is_punct)
        .map(|t| t.lemma.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl LinguisticPipeline for RulePipeline {
    fn key(&self) -> &PipelineKey {
        &self.key
    }

    fn analyze(&self, text: &str) -> Document {
        let spans = Self::scan(text);
        let tokens: Vec<Token> = spans
            .iter()
            .map(|s| {
                let surface = &text[s.byte_start..s.byte_end];
                Token {
                    text: surface.to_string(),
                    lemma: if s.is_word { self.lemmatize(surface) } else { surface.to_string() },
                    start: s.start,
                    end: s.end,
                    is_stop: s.is_word && self.stopwords.is_stopword(surface),
                    is_punct: !s.is_word,
                }
            })
            .collect();

        let mut sentences = Vec::new();
        let mut noun_chunks = Vec::new();
        let mut first = 0;
        for i in 0..spans.len() {
            if !Self::ends_sentence(text, &spans, i) {
                continue;
            }
            let sent_tokens = &tokens[first..=i];
            sentences.push(Sentence::new(
                &text[spans[first].byte_start..spans[i].byte_end],
                join_content_lemmas(sent_tokens),
                spans[first].start,
                spans[i].end,
            ));

            // Runs of adjacent content words.
            let mut run_start: Option<usize> = None;
            for k in first..=i + 1 {
                let content = k <= i && !tokens[k].is_punct && !tokens[k].is_stop;
                match (content, run_start) {
                    (true, None) => run_start = Some(k),
                    (false, Some(rs)) => {
                        noun_chunks.push(NounChunk {
                            text: text[spans[rs].byte_start..spans[k - 1].byte_end].to_string(),
                            start: spans[rs].start,
                            end: spans[k - 1].end,
                        });
                        run_start = None;
                    }
                    _ => {}
                }
            }
            first = i + 1;
        }

        Document {
            sentences,
            tokens,
            noun_chunks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> Arc<dyn LinguisticPipeline> {
        RulePipelineLoader
            .load(&PipelineKey::new("en", "core_web_sm"))
            .unwrap()
    }

    #[test]
    fn test_sentence_segmentation_offsets() {
        let text = "Cats are mammals. The sky is blue!  Why?";
        let pipeline = english();
        assert_eq!(pipeline.language(), "en");
        let doc = pipeline.analyze(text);
        let texts: Vec<&str> = doc.sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Cats are mammals.", "The sky is blue!", "Why?"]);
        assert_eq!((doc.sentences[0].start, doc.sentences[0].end), (0, 17));
        assert_eq!((doc.sentences[1].start, doc.sentences[1].end), (18, 34));
        assert_eq!(doc.sentences[0].lemmatized_text, "cat mammal");
        assert_eq!(doc.sentences[1].lemmatized_text, "sky blue");
    }

    #[test]
    fn test_offsets_are_characters() {
        let text = "Größe zählt. Ärzte helfen.";
        let doc = RulePipelineLoader
            .load(&PipelineKey::new("de", "core_news_sm"))
            .unwrap()
            .analyze(text);
        assert_eq!(doc.sentences.len(), 2);
        let second = &doc.sentences[1];
        let by_chars: String = text.chars().skip(second.start).take(second.len()).collect();
        assert_eq!(by_chars, "Ärzte helfen.");
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        let doc = english().analyze("Dr. Smith examined the patient. She recovered.");
        assert_eq!(doc.sentences.len(), 2);
        assert!(doc.sentences[0].text.starts_with("Dr. Smith"));
    }

    #[test]
    fn test_closing_quote_and_blank_line() {
        let doc = english().analyze("He said \"stop.\" Then left\n\nHeadline here");
        let texts: Vec<&str> = doc.sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["He said \"stop.\"", "Then left", "Headline here"]);
    }

    #[test]
    fn test_noun_chunks_and_lemmas() {
        let doc = english().analyze("Breast cancer spreads through lymph nodes.");
        let chunks: Vec<&str> = doc.noun_chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(chunks, vec!["Breast cancer spreads", "lymph nodes"]);
        assert!(doc.lemmas().iter().any(|l| l.text == "through" && l.is_stopword));
        assert_eq!(doc.lemmatized_text(), "breast cancer spread lymph node");
    }

    #[test]
    fn test_empty_text() {
        let doc = english().analyze("   ");
        assert!(doc.sentences.is_empty());
        assert!(doc.tokens.is_empty());
    }

    #[test]
    fn test_loader_rejects_unknown_model_and_language() {
        let err = RulePipelineLoader
            .load(&PipelineKey::new("en", "core_sci_lg"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Load { .. }));
        assert!(RulePipelineLoader
            .load(&PipelineKey::new("xx", "core_news_sm"))
            .is_err());
    }

    struct CountingPipeline {
        key: PipelineKey,
        calls: usize,
    }

    impl UnsyncPipeline for CountingPipeline {
        fn analyze(&mut self, _text: &str) -> Document {
            self.calls += 1;
            Document::default()
        }
    }

    #[test]
    fn test_serialized_pipeline_is_shareable() {
        let key = PipelineKey::new("en", "custom");
        let pipeline = Arc::new(SerializedPipeline::new(
            key.clone(),
            CountingPipeline { key: key.clone(), calls: 0 },
        ));
        std::thread::scope(|s| {
            for _ in 0..4 {
                let p = pipeline.clone();
                s.spawn(move || p.analyze("text"));
            }
        });
        let inner = pipeline.inner.lock();
        assert_eq!(inner.calls, 4);
        assert_eq!(inner.key, *pipeline.key());
    }
}
