//! Process-wide pipeline cache.
//!
//! Loading a model is expensive and the key space is small, so entries are
//! never evicted. Each key owns a slot that is initialized at most once;
//! concurrent callers for the same unseen key block on that slot while one
//! of them loads. Callers for other keys are not blocked.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use summed_core::Result;
use tracing::{debug, info};

use crate::key::PipelineKey;
use crate::pipeline::{LinguisticPipeline, PipelineLoader};

type Slot = Arc<OnceCell<Arc<dyn LinguisticPipeline>>>;

/// Shared map from pipeline key to the loaded pipeline instance.
///
/// Create one per process and pass it around behind an `Arc`.
#[derive(Default)]
pub struct PipelineCache {
    slots: DashMap<PipelineKey, Slot>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached pipeline for `key`, loading it first if needed.
    ///
    /// A failed load is returned to the caller and leaves the key uncached,
    /// so a later call retries.
    pub fn get_or_load(
        &self,
        key: &PipelineKey,
        loader: &dyn PipelineLoader,
    ) -> Result<Arc<dyn LinguisticPipeline>> {
        // Clone the slot out so the shard lock is released before loading.
        let slot: Slot = Arc::clone(&self.slots.entry(key.clone()).or_default());

        let pipeline = match slot.get_or_try_init(|| {
            info!("Loading language model: '{}' ...", key);
            loader.load(key)
        }) {
            Ok(pipeline) => {
                // A waiter that retried after a failed load holds a slot that
                // was already dropped from the map; register it again.
                if !self.slots.contains_key(key) {
                    self.slots.entry(key.clone()).or_insert_with(|| Arc::clone(&slot));
                }
                pipeline
            }
            Err(e) => {
                // Drop the empty slot so unknown keys from requests do not accumulate.
                self.slots.remove_if(key, |_, slot| slot.get().is_none());
                return Err(e);
            }
        };

        debug!("Using language model: '{}'", key);
        Ok(Arc::clone(pipeline))
    }

    /// The cached pipeline for `key`, without loading.
    pub fn get(&self, key: &PipelineKey) -> Option<Arc<dyn LinguisticPipeline>> {
        self.slots.get(key).and_then(|slot| slot.value().get().cloned())
    }

    pub fn contains(&self, key: &PipelineKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of loaded pipelines.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of all loaded pipelines, sorted.
    pub fn keys(&self) -> Vec<PipelineKey> {
        let mut keys: Vec<PipelineKey> = self
            .slots
            .iter()
            .filter(|slot| slot.value().get().is_some())
            .map(|slot| slot.key().clone())
            .collect();
        keys.sort();
        keys
    }
}
