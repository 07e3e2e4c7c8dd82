//! Azure Text Analytics for Health client.

use std::future::Future;

use reqwest::Client;
use summed_core::{EntityServiceConfig, Error, Result};
use tracing::{debug, error};

use crate::types::{DocumentEntities, EntityDocument, HealthRequest, HealthResponse};

const HEALTH_ENTITIES_PATH: &str = "/text/analytics/v3.1-preview.4/entities/health";

/// Batched entity extraction. One call carries every chunk of a document.
pub trait EntityService: Send + Sync {
    fn recognize(
        &self,
        documents: Vec<EntityDocument>,
    ) -> impl Future<Output = Result<Vec<DocumentEntities>>> + Send;
}

/// Calls the health entities endpoint. No retries are attempted.
#[derive(Debug, Clone)]
pub struct HealthEntityClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HealthEntityClient {
    pub fn new(config: &EntityServiceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &EntityServiceConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Full request URL. Offsets are requested as Unicode code points so
    /// they line up with the character offsets used everywhere else.
    pub fn url(&self) -> String {
        format!(
            "{}{}?stringIndexType=UnicodeCodePoint",
            self.endpoint, HEALTH_ENTITIES_PATH
        )
    }
}

impl EntityService for HealthEntityClient {
    async fn recognize(&self, documents: Vec<EntityDocument>) -> Result<Vec<DocumentEntities>> {
        let url = self.url();
        debug!("Requesting health entities for {} document(s)", documents.len());

        let mut request = self
            .client
            .post(&url)
            .header("X-ClientTraceId", uuid::Uuid::new_v4().to_string())
            .json(&HealthRequest {
                documents: &documents,
            });
        if let Some(key) = &self.api_key {
            request = request.header("Ocp-Apim-Subscription-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Entity service returned {}", status);
            return Err(Error::ExternalService(format!(
                "entity service returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ExternalService(format!("failed to read response: {}", e)))?;
        parse_response(&body)
    }
}

/// Decode a response body. Any per-document error fails the whole call.
pub(crate) fn parse_response(body: &str) -> Result<Vec<DocumentEntities>> {
    let parsed: HealthResponse = serde_json::from_str(body)?;
    if let Some(failed) = parsed.errors.first() {
        return Err(Error::ExternalService(format!(
            "document {} failed: {}",
            failed.id, failed.error
        )));
    }
    Ok(parsed.documents)
}
