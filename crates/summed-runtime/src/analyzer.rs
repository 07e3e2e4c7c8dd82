//! Analyzer: one document in, sentences, entities and a ranked summary out.

use std::sync::Arc;

use summed_core::{Error, Result, SummedConfig};
use summed_entities::{extract_entities, EntityService, HealthEntityClient};
use summed_nlp::{
    resolve_model_key, LanguageChoice, LanguageDetector, ModelChoice, PipelineCache,
    PipelineLoader,
};
use summed_rank::{LexRankSummarizer, SentenceRanker};
use tracing::{debug, info};

use crate::types::{AnalyzeRequest, AnalyzeResult};

/// Coordinates key resolution, the shared pipeline cache, entity extraction
/// and sentence ranking.
pub struct Analyzer<S = HealthEntityClient> {
    config: SummedConfig,
    cache: Arc<PipelineCache>,
    loader: Arc<dyn PipelineLoader>,
    detector: Arc<dyn LanguageDetector>,
    entity_service: Option<S>,
}

impl Analyzer<HealthEntityClient> {
    /// Create an analyzer. Entity extraction is enabled when the config
    /// names an entity service endpoint.
    pub fn new(
        config: SummedConfig,
        cache: Arc<PipelineCache>,
        loader: Arc<dyn PipelineLoader>,
        detector: Arc<dyn LanguageDetector>,
    ) -> Self {
        let entity_service = config.entity_service.as_ref().map(HealthEntityClient::new);
        info!(
            "Analyzer initialized: entity_service={}, max_chunk_size={}, threshold={}",
            entity_service.is_some(),
            config.max_chunk_size,
            config.similarity_threshold
        );
        Self {
            config,
            cache,
            loader,
            detector,
            entity_service,
        }
    }
}

impl<S: EntityService> Analyzer<S> {
    /// Replace the entity service; `None` disables entity extraction.
    pub fn with_entity_service<T: EntityService>(self, service: Option<T>) -> Analyzer<T> {
        Analyzer {
            config: self.config,
            cache: self.cache,
            loader: self.loader,
            detector: self.detector,
            entity_service: service,
        }
    }

    pub fn config(&self) -> &SummedConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<PipelineCache> {
        &self.cache
    }

    pub fn entity_service(&self) -> Option<&S> {
        self.entity_service.as_ref()
    }

    pub fn has_entity_service(&self) -> bool {
        self.entity_service.is_some()
    }

    /// Analyze one document.
    ///
    /// All offsets in the result are character offsets into the trimmed
    /// input text, which is returned as `text`. Detection, model loading,
    /// segmentation and ranking run on the blocking pool; only the entity
    /// call runs on the async runtime.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResult> {
        let text = request.text.trim().to_string();
        let language = LanguageChoice::from_option(request.language.as_deref());
        let model = ModelChoice::from_option(request.model.as_deref());
        let cache = Arc::clone(&self.cache);
        let loader = Arc::clone(&self.loader);
        let detector = Arc::clone(&self.detector);

        let (key, doc, text) = run_blocking(move || {
            let key = resolve_model_key(&language, &model, &text, detector.as_ref())?;
            let pipeline = cache.get_or_load(&key, loader.as_ref())?;
            let doc = pipeline.analyze(&text);
            debug!(
                "Pipeline '{}' produced {} sentences, {} noun chunks",
                key,
                doc.sentences.len(),
                doc.noun_chunks.len()
            );
            Ok((key, doc, text))
        })
        .await?;

        let entities = match &self.entity_service {
            Some(service) => {
                extract_entities(&text, key.language(), self.config.max_chunk_size, service).await?
            }
            None => Vec::new(),
        };

        let num_sentences = request.num_sentences.unwrap_or(self.config.num_sentences);
        let use_lemma = request.use_lemma.unwrap_or(self.config.use_lemma);
        let threshold = self.config.similarity_threshold;
        let rank_language = key.language().to_string();
        let sentences = doc.sentences;

        let (sentences, top_sentences, shortfall) = run_blocking(move || {
            let ranker = SentenceRanker::new(LexRankSummarizer::new(&rank_language))
                .with_threshold(threshold);
            let summary = ranker.rank(&sentences, num_sentences, use_lemma);
            let top_sentences = summary.to_scored();
            let shortfall = summary.shortfall();
            Ok((sentences, top_sentences, shortfall))
        })
        .await?;

        Ok(AnalyzeResult {
            language: key.language().to_string(),
            model: key.model().to_string(),
            text,
            entities,
            noun_chunks: doc.noun_chunks,
            sentences,
            top_sentences,
            shortfall,
        })
    }
}

/// Run CPU-bound or blocking work off the async worker threads.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Internal(format!("analysis task failed: {}", e)))?
}
