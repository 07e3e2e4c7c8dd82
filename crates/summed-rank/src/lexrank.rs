//! LexRank extractive summarization.
//!
//! Sentences are nodes of a similarity graph: an edge connects two
//! sentences whose tf-idf cosine similarity exceeds a threshold. Sentence
//! centrality is the stationary distribution of a damped random walk on
//! that graph, computed by power iteration.

use std::collections::{HashMap, HashSet};

use ndarray::{Array1, Array2};
use summed_nlp::{StopwordFilter, ABBREVIATIONS};
use tracing::debug;

/// A summarizer output sentence with its centrality score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredText {
    pub text: String,
    pub score: f64,
}

/// Selects the `count` most representative sentences of a document.
///
/// Results are plain strings in rank order (best first); they carry no
/// reference to the positions they came from.
pub trait ExtractiveSummarizer: Send + Sync {
    fn summarize(&self, document: &str, count: usize) -> Vec<ScoredText>;
}

/// Split a document into sentences: one paragraph per line, and within a
/// line at `.`, `!` or `?` followed by whitespace. A period after one of the
/// pipeline's abbreviations does not split. Results are trimmed and never
/// empty.
pub fn split_sentences(document: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    for line in document.lines() {
        let bytes = line.as_bytes();
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if (b == b'.' || b == b'!' || b == b'?')
                && i + 1 < bytes.len()
                && bytes[i + 1].is_ascii_whitespace()
                && !(b == b'.' && follows_abbreviation(&line[..i]))
            {
                let s = line[start..=i].trim();
                if !s.is_empty() {
                    sentences.push(s);
                }
                start = i + 1;
            }
        }
        let s = line[start..].trim();
        if !s.is_empty() {
            sentences.push(s);
        }
    }
    sentences
}

fn follows_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("")
        .to_lowercase();
    !word.is_empty() && ABBREVIATIONS.contains(&word.as_str())
}

/// LexRank with a thresholded similarity graph.
#[derive(Debug, Clone)]
pub struct LexRankSummarizer {
    stopwords: Option<StopwordFilter>,
    /// Minimum cosine similarity for an edge.
    pub threshold: f64,
    /// Damping factor of the random walk.
    pub damping: f64,
    pub max_iterations: usize,
    /// L1 convergence threshold.
    pub tolerance: f64,
}

impl LexRankSummarizer {
    /// Summarizer that ignores the stopwords of `language`, if a list exists.
    pub fn new(language: &str) -> Self {
        Self {
            stopwords: StopwordFilter::for_language(language),
            threshold: 0.1,
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    fn words(&self, sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .filter(|w| {
                self.stopwords
                    .as_ref()
                    .map(|s| !s.is_stopword(w))
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Pairwise modified-cosine similarity of the sentences' tf-idf vectors.
    fn similarity_matrix(&self, sentences: &[&str]) -> Array2<f64> {
        let n = sentences.len();

        // Term frequencies normalized by the most frequent term per sentence.
        let tfs: Vec<HashMap<String, f64>> = sentences
            .iter()
            .map(|s| {
                let mut counts: HashMap<String, f64> = HashMap::new();
                for w in self.words(s) {
                    *counts.entry(w).or_insert(0.0) += 1.0;
                }
                let max = counts.values().cloned().fold(0.0, f64::max);
                if max > 0.0 {
                    counts.values_mut().for_each(|v| *v /= max);
                }
                counts
            })
            .collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        for tf in &tfs {
            for term in tf.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let idf: HashMap<&str, f64> = df
            .iter()
            .map(|(term, &count)| (*term, ((1 + n) as f64 / (1 + count) as f64).ln() + 1.0))
            .collect();

        let norms: Vec<f64> = tfs
            .iter()
            .map(|tf| {
                tf.iter()
                    .map(|(term, v)| (v * idf[term.as_str()]).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        let mut matrix = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                if norms[i] == 0.0 || norms[j] == 0.0 {
                    continue;
                }
                let common: HashSet<&String> = tfs[i].keys().filter(|t| tfs[j].contains_key(*t)).collect();
                let numerator: f64 = common
                    .iter()
                    .map(|t| tfs[i][*t] * tfs[j][*t] * idf[t.as_str()].powi(2))
                    .sum();
                let sim = numerator / (norms[i] * norms[j]);
                matrix[[i, j]] = sim;
                matrix[[j, i]] = sim;
            }
        }
        matrix
    }

    /// Centrality scores by damped power iteration over the thresholded,
    /// row-normalized graph. Sentences without edges spread their mass
    /// uniformly.
    fn centrality(&self, similarity: &Array2<f64>) -> Array1<f64> {
        let n = similarity.nrows();
        let mut transition = similarity.mapv(|s| if s > self.threshold { 1.0 } else { 0.0 });
        let mut dangling = Vec::new();
        for (i, mut row) in transition.rows_mut().into_iter().enumerate() {
            let degree = row.sum();
            if degree > 0.0 {
                row /= degree;
            } else {
                dangling.push(i);
            }
        }

        let uniform = 1.0 / n as f64;
        let teleport = (1.0 - self.damping) * uniform;
        let mut scores = Array1::from_elem(n, uniform);
        let mut iterations = 0;
        let mut delta = f64::MAX;

        while iterations < self.max_iterations && delta > self.tolerance {
            iterations += 1;
            let dangling_mass: f64 = dangling.iter().map(|&i| scores[i]).sum();
            let next = transition.t().dot(&scores) * self.damping
                + (teleport + self.damping * dangling_mass * uniform);
            delta = (&next - &scores).mapv(f64::abs).sum();
            scores = next;
        }

        debug!(
            "LexRank over {} sentences: {} iterations, delta={:.2e}",
            n, iterations, delta
        );
        scores
    }
}

impl ExtractiveSummarizer for LexRankSummarizer {
    fn summarize(&self, document: &str, count: usize) -> Vec<ScoredText> {
        let sentences = split_sentences(document);
        if count == 0 || sentences.is_empty() {
            return Vec::new();
        }

        let scores = self.centrality(&self.similarity_matrix(&sentences));

        let mut order: Vec<usize> = (0..sentences.len()).collect();
        // Stable sort: equal scores keep document order.
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        order
            .into_iter()
            .take(count)
            .map(|i| ScoredText {
                text: sentences[i].to_string(),
                score: scores[i],
            })
            .collect()
    }
}
