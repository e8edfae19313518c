use super::types::*;
use crate::{Error, Result, config::VisionConfig};
use async_trait::async_trait;
use reqwest::{StatusCode, header::ACCEPT};
use std::time::Duration;
use tracing::{debug, info, warn};

#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

/// Client for an OpenAI-style chat completions endpoint that accepts inline
/// images, such as NVIDIA's hosted Llama vision models.
pub struct HttpVisionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpVisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl VisionClient for HttpVisionClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        debug!(
            "Sending chat completion for model {} ({} prompt bytes)",
            request.model,
            request.messages.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        info!("Vision API responded with status {}", status);

        if status != StatusCode::OK {
            warn!("Vision API error {}: {}", status, body);
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("{} (body: {})", e, body)))
    }
}
