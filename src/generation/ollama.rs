use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::client::TextBackend;
use super::error::GenerationError;
use crate::config::GenerationConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Non-streaming client for an Ollama-style `/api/generate` endpoint.
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaBackend {
    pub fn from_config(cfg: &GenerationConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("build generation http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", cfg.base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        })
    }

    async fn call(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let res = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!(%status, endpoint = %self.endpoint, "generation backend returned error status");
            return Err(GenerationError::Unavailable(format!("status {}", status)));
        }
        let data: GenerateResponse = res.json().await?;
        Ok(data.response)
    }
}

#[async_trait]
impl TextBackend for OllamaBackend {
    async fn complete(
        &self,
        prompt: &str,
        cancel: CancellationToken,
    ) -> Result<String, GenerationError> {
        tokio::select! {
            res = self.call(prompt) => res,
            _ = cancel.cancelled() => Err(GenerationError::Cancelled),
        }
    }
}
