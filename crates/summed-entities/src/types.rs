//! Wire types of the batched entity-extraction call.

use serde::{Deserialize, Serialize};

/// One document of a batched request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    pub id: String,
    pub language: String,
    pub text: String,
}

/// Entities the service found in one request document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntities {
    pub id: String,
    #[serde(default)]
    pub entities: Vec<ServiceEntity>,
}

/// An entity as returned by the service. `offset` and `length` count
/// characters within the request document, not within the full text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntity {
    pub text: String,
    pub offset: usize,
    pub length: usize,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct HealthRequest<'a> {
    pub documents: &'a [EntityDocument],
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HealthResponse {
    #[serde(default)]
    pub documents: Vec<DocumentEntities>,
    #[serde(default)]
    pub errors: Vec<DocumentError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DocumentError {
    pub id: String,
    #[serde(default)]
    pub error: serde_json::Value,
}
