//! Pipeline key resolution.
//!
//! A key joins a two-letter language code and a model short name, e.g.
//! `de_core_news_sm`. Absent hints resolve through language detection and
//! the per-language default model.

use std::fmt;

use serde::{Deserialize, Serialize};
use summed_core::{Error, Result};
use tracing::debug;

use crate::detect::LanguageDetector;

/// Default model for English.
pub const DEFAULT_WEB_MODEL: &str = "core_web_sm";
/// Default model for every other language.
pub const DEFAULT_NEWS_MODEL: &str = "core_news_sm";

/// Which language to load a pipeline for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageChoice {
    /// Detect the language from the input text.
    Detect,
    Explicit(String),
}

impl LanguageChoice {
    /// Map an optional request value; absent or `"detect"` means `Detect`.
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Detect,
            Some(v) if v.eq_ignore_ascii_case("detect") => Self::Detect,
            Some(v) => Self::Explicit(v.to_lowercase()),
        }
    }
}

/// Which model variant to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    /// `core_web_sm` for English, `core_news_sm` otherwise.
    Default,
    Explicit(String),
}

impl ModelChoice {
    /// Map an optional request value; absent or `"default"` means `Default`.
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Default,
            Some(v) if v.eq_ignore_ascii_case("default") => Self::Default,
            Some(v) => Self::Explicit(v.to_lowercase()),
        }
    }
}

/// Canonical, lowercase pipeline identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PipelineKey {
    language: String,
    model: String,
}

impl PipelineKey {
    pub fn new(language: impl AsRef<str>, model: impl AsRef<str>) -> Self {
        Self {
            language: language.as_ref().trim().to_lowercase(),
            model: model.as_ref().trim().to_lowercase(),
        }
    }

    /// Parse `"{language}_{model}"`, splitting at the first underscore.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().split_once('_') {
            Some((language, model)) if !language.is_empty() && !model.is_empty() => {
                Ok(Self::new(language, model))
            }
            _ => Err(Error::Config(format!("invalid pipeline key '{}'", name))),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for PipelineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.language, self.model)
    }
}

impl From<PipelineKey> for String {
    fn from(key: PipelineKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PipelineKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

/// Derive the pipeline key for `text`.
///
/// Detection failures are returned as `Error::LanguageDetection`; falling
/// back to some default language would silently corrupt lemmatization.
pub fn resolve_model_key(
    language: &LanguageChoice,
    model: &ModelChoice,
    text: &str,
    detector: &dyn LanguageDetector,
) -> Result<PipelineKey> {
    let language = match language {
        LanguageChoice::Explicit(code) => code.trim().to_lowercase(),
        LanguageChoice::Detect => {
            let detected = detector.detect(text)?;
            let code: String = detected.trim().chars().take(2).collect::<String>().to_lowercase();
            if code.chars().count() != 2 || !code.chars().all(char::is_alphabetic) {
                return Err(Error::LanguageDetection(format!(
                    "detector returned unusable language code '{}'",
                    detected
                )));
            }
            debug!("Detected language '{}'", code);
            code
        }
    };

    let model = match model {
        ModelChoice::Explicit(name) => name.trim().to_lowercase(),
        ModelChoice::Default if language == "en" => DEFAULT_WEB_MODEL.to_string(),
        ModelChoice::Default => DEFAULT_NEWS_MODEL.to_string(),
    };

    Ok(PipelineKey::new(language, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::FixedDetector;

    struct FailingDetector;

    impl LanguageDetector for FailingDetector {
        fn detect(&self, _text: &str) -> Result<String> {
            Err(Error::LanguageDetection("no features in text".into()))
        }
    }

    #[test]
    fn test_detect_and_default_model() {
        let detector = FixedDetector::new("de");
        let key = resolve_model_key(
            &LanguageChoice::from_option(Some("detect")),
            &ModelChoice::from_option(Some("default")),
            "Das ist ein Test.",
            &detector,
        )
        .unwrap();
        assert_eq!(key.language(), "de");
        assert_eq!(key.model(), "core_news_sm");
        assert_eq!(key.to_string(), "de_core_news_sm");
    }

    #[test]
    fn test_english_default_model() {
        let key = resolve_model_key(
            &LanguageChoice::Explicit("en".into()),
            &ModelChoice::Default,
            "anything",
            &FailingDetector,
        )
        .unwrap();
        assert_eq!(key.to_string(), "en_core_web_sm");
    }

    #[test]
    fn test_detected_code_truncated_and_lowercased() {
        let detector = FixedDetector::new("EN-us");
        let key = resolve_model_key(&LanguageChoice::Detect, &ModelChoice::Default, "Hi", &detector)
            .unwrap();
        assert_eq!(key.to_string(), "en_core_web_sm");
    }

    #[test]
    fn test_detection_failure_propagates() {
        let result = resolve_model_key(
            &LanguageChoice::Detect,
            &ModelChoice::Explicit("core_news_md".into()),
            "",
            &FailingDetector,
        );
        assert!(matches!(result, Err(Error::LanguageDetection(_))));
    }

    #[test]
    fn test_explicit_values_are_normalized() {
        let key = resolve_model_key(
            &LanguageChoice::from_option(Some(" FR ")),
            &ModelChoice::from_option(Some("Core_News_MD")),
            "",
            &FailingDetector,
        )
        .unwrap();
        assert_eq!(key.to_string(), "fr_core_news_md");
    }

    #[test]
    fn test_sentinels_case_insensitive() {
        assert_eq!(LanguageChoice::from_option(Some("DETECT")), LanguageChoice::Detect);
        assert_eq!(LanguageChoice::from_option(None), LanguageChoice::Detect);
        assert_eq!(ModelChoice::from_option(Some("Default")), ModelChoice::Default);
        assert_eq!(ModelChoice::from_option(Some("")), ModelChoice::Default);
    }

    #[test]
    fn test_key_parse() {
        let key = PipelineKey::parse("en_core_web_sm").unwrap();
        assert_eq!(key.language(), "en");
        assert_eq!(key.model(), "core_web_sm");
        assert!(PipelineKey::parse("english").is_err());
    }
}
