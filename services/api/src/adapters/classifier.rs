//! services/api/src/adapters/classifier.rs
//!
//! Adapter for the external language/sentiment classifier, implementing the
//! `SentimentService` port: text in, `{language, compound}` out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use auracare_core::domain::Classification;
use auracare_core::ports::{PortError, PortResult, SentimentService};

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    language: String,
    compound: f64,
}

/// HTTP adapter for a classifier service exposing `POST /classify`.
#[derive(Clone)]
pub struct HttpClassifierAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifierAdapter {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl SentimentService for HttpClassifierAdapter {
    async fn classify(&self, text: &str) -> PortResult<Classification> {
        let response = self
            .client
            .post(format!("{}/classify", self.base_url))
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("classify request failed: {e}")))?
            .error_for_status()
            .map_err(|e| PortError::Unexpected(format!("classify request rejected: {e}")))?;

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed classify response: {e}")))?;

        Ok(Classification {
            language: body.language,
            compound: body.compound.clamp(-1.0, 1.0),
        })
    }
}
