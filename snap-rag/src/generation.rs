//! Generation client for the answer-producing language model.
//!
//! The wire contract mirrors what the service actually receives: a JSON body
//! `{model, prompt, temperature, max_tokens, stream}` POSTed to the generate
//! endpoint, answered with a JSON object whose `response` field holds the
//! completion. The `max_tokens` field name is part of that literal contract
//! and is kept as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::RagError;

/// Generation calls can sit behind a slow local model; bound them rather
/// than letting a request hang forever.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Fixed parameters sent with every generation request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    /// Model identifier to request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Output length cap, under the wire name `max_tokens`.
    pub max_tokens: u32,
    /// Streaming flag; this client always requests a single response.
    pub stream: bool,
}

impl GenerationParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.2,
            max_tokens: 500,
            stream: false,
        }
    }
}

/// Sends a prompt to a language-model service and returns its completion.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generates a completion for `prompt`. Transport failures and malformed
    /// response bodies map to [`RagError::Service`]; a well-formed response
    /// without a completion field yields an empty answer.
    async fn generate(&self, prompt: &str) -> Result<String, RagError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

/// Generation client backed by Ollama's `/api/generate` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaGenerationClient {
    client: reqwest::Client,
    endpoint: String,
    params: GenerationParams,
}

impl OllamaGenerationClient {
    /// Creates a client that POSTs to `endpoint` (the full URL, e.g.
    /// `http://localhost:11434/api/generate`).
    pub fn new(endpoint: impl Into<String>, params: GenerationParams) -> Result<Self, RagError> {
        let client = reqwest::Client::builder()
            .timeout(GENERATION_TIMEOUT)
            .build()
            .map_err(|err| RagError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            params,
        })
    }

    /// Parameters sent with each request.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }
}

#[async_trait]
impl GenerationClient for OllamaGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        let request = GenerateRequest {
            model: &self.params.model,
            prompt,
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
            stream: self.params.stream,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| RagError::generation(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::generation(format!(
                "unexpected status {status} from {}",
                self.endpoint
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| RagError::generation(format!("malformed response: {err}")))?;

        // Missing `response` field is tolerated and yields an empty answer.
        Ok(body
            .get("response")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
