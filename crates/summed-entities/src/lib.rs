//! SumMed Entities: document chunking and health entity extraction.
//!
//! Long documents are split into chunks that fit the entity service's
//! per-document limit, sent as one batched request, and the per-chunk
//! entity lists are flattened back into one document-relative sequence.

pub mod chunking;
pub mod client;
pub mod reconcile;
pub mod types;

pub use chunking::{chunk_document, DocumentChunk};
pub use client::{EntityService, HealthEntityClient};
pub use reconcile::extract_entities;
pub use types::{DocumentEntities, EntityDocument, ServiceEntity};
