//! SumMed Core: shared data model, configuration, error taxonomy.

pub mod config;
pub mod error;
pub mod types;

pub use config::{EntityServiceConfig, SummedConfig};
pub use error::{Error, Result};
pub use types::{Lemma, NamedEntity, NounChunk, Sentence};
