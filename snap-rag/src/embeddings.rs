//! Embedding providers.
//!
//! The pipeline only cares that text maps deterministically to a
//! fixed-dimension vector, so the provider sits behind a trait:
//! [`OllamaEmbeddingProvider`] talks to a local Ollama instance over HTTP,
//! [`MockEmbeddingProvider`] produces deterministic hash-derived vectors for
//! tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::RagError;

const EMBEDDING_TIMEOUT: Duration = Duration::from_secs(60);

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for a fixed model version: the same
/// text yields the same vector within floating-point tolerance.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text. Failures map to [`RagError::Service`].
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Identifier of the underlying model, for logging.
    fn model(&self) -> &str;
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

/// Embedding provider backed by Ollama's `/api/embeddings` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbeddingProvider {
    /// Creates a provider that POSTs to `endpoint` (the full URL, e.g.
    /// `http://localhost:11434/api/embeddings`) requesting `model`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, RagError> {
        let client = reqwest::Client::builder()
            .timeout(EMBEDDING_TIMEOUT)
            .build()
            .map_err(|err| RagError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let request = EmbeddingsRequest {
            model: &self.model,
            prompt: text,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| RagError::embedding(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::embedding(format!(
                "unexpected status {status} from {}",
                self.endpoint
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|err| RagError::embedding(format!("malformed response: {err}")))?;
        Ok(body.embedding)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Default dimension of mock embedding vectors.
pub const MOCK_EMBEDDING_DIMENSIONS: usize = 16;

/// Deterministic in-process embedding provider for tests.
///
/// Each component is derived by hashing the text together with the component
/// index, so equal texts always map to equal vectors and different texts
/// almost surely do not.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            dimensions: MOCK_EMBEDDING_DIMENSIONS,
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut vector = Vec::with_capacity(self.dimensions);
        for component in 0..self.dimensions {
            let mut hasher = DefaultHasher::new();
            (text, component).hash(&mut hasher);
            // Map the hash onto [-1, 1).
            let bucket = (hasher.finish() % 2048) as f32;
            vector.push(bucket / 1024.0 - 1.0);
        }
        Ok(vector)
    }

    fn model(&self) -> &str {
        "mock"
    }
}
