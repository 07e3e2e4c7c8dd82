//! Analyzer runtime: ties key resolution, the pipeline cache, entity
//! extraction and sentence ranking into one request/response call.

pub mod analyzer;
pub mod types;

pub use analyzer::Analyzer;
pub use types::*;
