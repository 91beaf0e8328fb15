//! Generation service client speaking the Ollama `/api/generate` protocol.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use lexaid_core::config::GenerationSettings;
use lexaid_core::traits::Generator;
use lexaid_core::types::GenerationRequest;

#[derive(Debug, Serialize, PartialEq)]
pub struct GenerateOptions {
    pub num_predict: usize,
    pub temperature: f32,
    pub top_p: f32,
}

/// Request body for a single non-streaming completion.
#[derive(Debug, Serialize, PartialEq)]
pub struct GenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerateOptions,
}

impl<'a> GenerateBody<'a> {
    pub fn new(model: &'a str, request: &'a GenerationRequest) -> Self {
        Self {
            model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_length,
                temperature: request.temperature,
                top_p: request.top_p,
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking HTTP generator. One instance is shared by every agent.
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout_secs.map(Duration::from_secs))
            .build()
            .context("building HTTP client")?;
        tracing::info!(base_url = %settings.base_url, model = %settings.model, "generation client ready");
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str { &self.model }

    fn endpoint(&self) -> String { format!("{}/api/generate", self.base_url) }
}

impl Generator for OllamaGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = GenerateBody::new(&self.model, request);
        tracing::debug!(model = %self.model, prompt_chars = request.prompt.chars().count(), max_length = request.max_length, "generating");
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .with_context(|| format!("calling generation service at {}", self.base_url))?;
        let status = response.status();
        let text = response.text().context("reading generation response")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("generation service error ({}): {}", status, text));
        }
        let parsed: GenerateResponse = serde_json::from_str(&text).context("decoding generation response")?;
        Ok(parsed.response)
    }
}
