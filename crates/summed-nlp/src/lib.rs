//! SumMed NLP: model key resolution, language detection, linguistic
//! pipelines and the process-wide pipeline cache.
//!
//! A pipeline is identified by a `PipelineKey` such as `en_core_web_sm`.
//! `resolve_model_key` derives the key from optional language/model hints,
//! `PipelineCache` loads each key at most once and hands out shared
//! instances. `RulePipeline` is the built-in rule-based implementation of
//! the `LinguisticPipeline` trait.

pub mod cache;
pub mod detect;
pub mod key;
pub mod lemmatizer;
pub mod pipeline;
pub mod stopwords;

pub use cache::PipelineCache;
pub use detect::{FixedDetector, LanguageDetector, WhatlangDetector};
pub use key::{resolve_model_key, LanguageChoice, ModelChoice, PipelineKey};
pub use pipeline::{
    Document, ABBREVIATIONS, LinguisticPipeline, PipelineLoader, RulePipeline, RulePipelineLoader,
    SerializedPipeline, Token, UnsyncPipeline,
};
pub use stopwords::StopwordFilter;
