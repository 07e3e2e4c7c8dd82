//! Chunked entity extraction and offset reconciliation.

use std::collections::HashMap;

use summed_core::{Error, NamedEntity, Result};
use tracing::debug;

use crate::chunking::chunk_document;
use crate::client::EntityService;
use crate::types::{DocumentEntities, EntityDocument};

/// Extract entities from `text` with a single batched service call.
///
/// Entities come back in chunk order, then in the order the service listed
/// them within a chunk. Offsets are shifted by the chunk's character offset,
/// so `start`/`end` are relative to the whole `text`. Entities that straddle
/// a chunk boundary are returned as the service reports them for each chunk.
pub async fn extract_entities<S: EntityService>(
    text: &str,
    language: &str,
    max_chunk_size: usize,
    service: &S,
) -> Result<Vec<NamedEntity>> {
    let chunks = chunk_document(text, max_chunk_size)?;
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let documents: Vec<EntityDocument> = chunks
        .iter()
        .map(|chunk| EntityDocument {
            id: chunk.id.to_string(),
            language: language.to_string(),
            text: chunk.text.clone(),
        })
        .collect();
    debug!(
        "Extracting entities from {} chars in {} chunk(s)",
        text.chars().count(),
        documents.len()
    );

    let mut by_id: HashMap<String, DocumentEntities> = service
        .recognize(documents)
        .await?
        .into_iter()
        .map(|doc| (doc.id.clone(), doc))
        .collect();

    let mut entities = Vec::new();
    for chunk in &chunks {
        let doc = by_id.remove(&chunk.id.to_string()).ok_or_else(|| {
            Error::ExternalService(format!("no result for document {}", chunk.id))
        })?;
        entities.extend(doc.entities.into_iter().map(|e| {
            let start = chunk.char_offset + e.offset;
            NamedEntity {
                text: e.text,
                start,
                end: start + e.length,
                label: e.category,
                definition: e.name.filter(|n| !n.is_empty()),
            }
        }));
    }

    Ok(entities)
}
