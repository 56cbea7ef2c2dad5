use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::response::parse_model_response;
use super::{ModelClient, RequestBody};
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::models::{Message, ModelResponse, ToolCatalog};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API client. Each call is a single non-streaming request.
pub struct AnthropicClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    system_prompt: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| ChatError::Config(format!("Invalid API key header: {}", e)))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.api_endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        })
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn create_message(
        &self,
        transcript: &[Message],
        tools: &ToolCatalog,
    ) -> Result<ModelResponse> {
        let request_body = RequestBody::new(
            &self.model,
            self.max_tokens,
            self.system_prompt.as_deref(),
            transcript,
            tools,
        );

        debug!(
            model = %self.model,
            messages = transcript.len(),
            tools = tools.len(),
            "sending model request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "model response received");

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let response_text = response.text().await?;
        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| ChatError::MalformedResponse(format!("body is not JSON: {}", e)))?;
        parse_model_response(&response_json)
    }
}
