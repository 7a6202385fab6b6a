use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{parse_object, Delegate, DelegateError};
use crate::config::DelegateConfig;

/// Ollama-compatible delegate over `/api/generate`.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<Value>,
}

impl OllamaClient {
    pub fn new(config: &DelegateConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout) // Network-level bound; the Reasoner enforces its own too
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Delegate for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<Map<String, Value>, DelegateError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false, // One-shot only
            format: "json",
        };

        debug!("Calling delegate model {} at {}", self.model, self.base_url);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DelegateError::Status(response.status()));
        }

        let body: GenerateResponse = response.json().await?;

        // Generated text lives under "response" and must itself be a JSON object.
        match body.response {
            Some(Value::String(text)) => parse_object(&text),
            _ => Err(DelegateError::EmptyResponse),
        }
    }
}
