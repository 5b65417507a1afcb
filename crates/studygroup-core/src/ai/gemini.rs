use reqwest::Client;
use serde_json::Value;

use super::request::GenerationRequest;
use super::response::{extract_text, GenerationResult};
use crate::error::{AssistError, TransportError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Client for the `generateContent` endpoint. One POST per call, no retry,
/// no timeout.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL without the key, safe to log.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send the request and decode the body as JSON.
    pub async fn send(&self, request: &GenerationRequest) -> Result<Value, TransportError> {
        let url = self.endpoint();
        tracing::debug!(%url, "sending generation request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        response
            .json::<Value>()
            .await
            .map_err(TransportError::MalformedBody)
    }

    /// Send and interpret; keeps the typed error.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistError> {
        let body = self.send(request).await?;
        Ok(extract_text(&body)?)
    }

    /// Send and interpret, collapsing any failure to the fallback message.
    pub async fn answer(&self, request: &GenerationRequest) -> GenerationResult {
        GenerationResult::from_outcome(self.generate(request).await)
    }
}
