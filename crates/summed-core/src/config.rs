//! Configuration loaded from the environment.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Azure Text Analytics for Health accepts at most 5120 characters per document.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 5120;
pub const DEFAULT_NUM_SENTENCES: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 80.0;

/// Connection settings for the health entity-extraction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityServiceConfig {
    /// Base endpoint, e.g. `https://<name>.cognitiveservices.azure.com`.
    pub endpoint: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

/// Top-level SumMed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummedConfig {
    /// `None` disables health entity extraction.
    pub entity_service: Option<EntityServiceConfig>,
    /// Maximum characters per document sent to the entity service.
    pub max_chunk_size: usize,
    /// Default summary length.
    pub num_sentences: usize,
    /// Minimum similarity ratio (0-100) for lemma alignment.
    pub similarity_threshold: f64,
    /// Rank on lemmatized text instead of raw sentence text.
    pub use_lemma: bool,
}

impl Default for SummedConfig {
    fn default() -> Self {
        Self {
            entity_service: None,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            num_sentences: DEFAULT_NUM_SENTENCES,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            use_lemma: true,
        }
    }
}

impl SummedConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let entity_service = lookup("AZURE_TEXT_ANALYTICS_ENDPOINT")
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .map(|endpoint| EntityServiceConfig {
                endpoint,
                api_key: lookup("AZURE_TEXT_ANALYTICS_KEY").filter(|k| !k.is_empty()),
            });

        let config = Self {
            entity_service,
            max_chunk_size: lookup("SUMMED_MAX_CHUNK_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chunk_size),
            num_sentences: lookup("SUMMED_NUM_SENTENCES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.num_sentences),
            similarity_threshold: lookup("SUMMED_SIMILARITY_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.similarity_threshold),
            use_lemma: lookup("SUMMED_USE_LEMMA")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.use_lemma),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(Error::Config("max_chunk_size must be at least 1".into()));
        }
        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(Error::Config(format!(
                "similarity_threshold must be within 0..=100, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
