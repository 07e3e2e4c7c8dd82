//! Per-language stopword lists from the `stop-words` crate.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// Lowercase stopword set for one language.
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    stopwords: HashSet<String>,
}

impl StopwordFilter {
    /// Stopwords for a two-letter language code, or `None` when no list exists.
    pub fn for_language(language: &str) -> Option<Self> {
        let lang = match language.to_lowercase().as_str() {
            "en" => LANGUAGE::English,
            "de" => LANGUAGE::German,
            "fr" => LANGUAGE::French,
            "es" => LANGUAGE::Spanish,
            "it" => LANGUAGE::Italian,
            "pt" => LANGUAGE::Portuguese,
            "nl" => LANGUAGE::Dutch,
            "ru" => LANGUAGE::Russian,
            "sv" => LANGUAGE::Swedish,
            "no" => LANGUAGE::Norwegian,
            "da" => LANGUAGE::Danish,
            "fi" => LANGUAGE::Finnish,
            "hu" => LANGUAGE::Hungarian,
            "tr" => LANGUAGE::Turkish,
            "pl" => LANGUAGE::Polish,
            "ar" => LANGUAGE::Arabic,
            _ => return None,
        };
        let stopwords = get(lang).iter().map(|s| s.to_lowercase()).collect();
        Some(Self { stopwords })
    }

    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Case-insensitive membership test.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
