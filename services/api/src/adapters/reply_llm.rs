//! services/api/src/adapters/reply_llm.rs
//!
//! This module contains the adapter for the externally hosted text-generation
//! service. It implements the `ReplyService` port from the `core` crate,
//! speaking the Ollama-style generate API: `{model, prompt, stream, sampling
//! options}` in, `{response}` out.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use auracare_core::ports::{PortError, PortResult, ReplyService};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ReplyService` against an Ollama-style
/// `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaReplyAdapter {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    num_predict: u32,
}

impl OllamaReplyAdapter {
    pub fn new(
        base_url: String,
        model: String,
        temperature: f64,
        num_predict: u32,
        timeout: std::time::Duration,
    ) -> PortResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            model,
            temperature,
            num_predict,
        })
    }

    /// Local models occasionally leak terminal color codes into their
    /// output; strip them before the text reaches a client.
    fn strip_ansi(text: &str) -> String {
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        ansi.replace_all(text, "").trim().to_string()
    }
}

//=========================================================================================
// `ReplyService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReplyService for OllamaReplyAdapter {
    async fn generate_reply(&self, prompt: &str) -> PortResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            temperature: self.temperature,
            num_predict: self.num_predict,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("generate request failed: {e}")))?
            .error_for_status()
            .map_err(|e| PortError::Unexpected(format!("generate request rejected: {e}")))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed generate response: {e}")))?;

        let reply = Self::strip_ansi(&body.response);
        debug!(model = %self.model, chars = reply.len(), "generated reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_escapes_are_stripped() {
        let raw = "\x1b[32mHello\x1b[0m there \x1b[1;31mfriend\x1b[0m  ";
        assert_eq!(OllamaReplyAdapter::strip_ansi(raw), "Hello there friend");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(
            OllamaReplyAdapter::strip_ansi("You're doing great.\n"),
            "You're doing great."
        );
    }
}
