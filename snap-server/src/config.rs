//! Environment-backed service configuration.
//!
//! Every knob has a compiled default mirroring the service's stock local
//! setup; environment variables (optionally loaded from `.env` by `main`)
//! override them.

use std::path::PathBuf;

use snap_rag::RagError;

/// Default Ollama generation endpoint.
pub const DEFAULT_GENERATION_URL: &str = "http://localhost:11434/api/generate";
/// Default Ollama embeddings endpoint.
pub const DEFAULT_EMBEDDINGS_URL: &str = "http://localhost:11434/api/embeddings";
/// Default generation model.
pub const DEFAULT_MODEL: &str = "llama3.2:3b";
/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
/// Default manual location.
pub const DEFAULT_DOCUMENT_PATH: &str = "SnapManual.pdf";
/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Where to reach the generation service.
    pub generation_url: String,
    /// Which model to request for generation.
    pub model: String,
    /// Where to reach the embedding service.
    pub embeddings_url: String,
    /// Which model to request for embeddings.
    pub embed_model: String,
    /// Source manual location.
    pub document_path: PathBuf,
    /// Maximum chunk length, in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks, in characters.
    pub chunk_overlap: usize,
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embeddings_url: DEFAULT_EMBEDDINGS_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            document_path: PathBuf::from(DEFAULT_DOCUMENT_PATH),
            chunk_size: snap_rag::chunking::DEFAULT_CHUNK_SIZE,
            chunk_overlap: snap_rag::chunking::DEFAULT_CHUNK_OVERLAP,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolves the configuration from `SNAP_*` environment variables,
    /// falling back to the compiled defaults.
    pub fn from_env() -> Result<Self, RagError> {
        let defaults = Self::default();
        Ok(Self {
            generation_url: var_or("SNAP_GENERATION_URL", defaults.generation_url),
            model: var_or("SNAP_MODEL", defaults.model),
            embeddings_url: var_or("SNAP_EMBEDDINGS_URL", defaults.embeddings_url),
            embed_model: var_or("SNAP_EMBED_MODEL", defaults.embed_model),
            document_path: PathBuf::from(var_or(
                "SNAP_DOCUMENT_PATH",
                defaults.document_path.display().to_string(),
            )),
            chunk_size: parsed_var_or("SNAP_CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parsed_var_or("SNAP_CHUNK_OVERLAP", defaults.chunk_overlap)?,
            bind_addr: var_or("SNAP_BIND_ADDR", defaults.bind_addr),
        })
    }
}

fn var_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parsed_var_or(key: &str, default: usize) -> Result<usize, RagError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|err| {
            RagError::InvalidConfig(format!("{key} must be an integer: {err}"))
        }),
        Err(_) => Ok(default),
    }
}
