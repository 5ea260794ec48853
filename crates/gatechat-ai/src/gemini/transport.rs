//! The network seam: one `generateContent` call per invocation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::AiError;

/// Issues a single `generateContent` request with the given key.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError>;
}

/// HTTPS transport backed by reqwest.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| AiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(base_url, http))
    }

    /// Use a preconfigured client.
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub(crate) fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        let url = self.endpoint(model);

        debug!(model = %model, turns = request.contents.len(), "Gemini API request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))
    }
}
