//! Retrieval-augmented question answering over a single product manual.
//!
//! ```text
//! Manual PDF ──► extract ──► chunking::TextSplitter ──► EmbeddingProvider
//!                                                            │
//!                                                            ▼
//!                                              index::VectorIndex (in memory)
//!
//! Question ──► EmbeddingProvider ──► VectorIndex::query ──► prompt::build_prompt
//!                                                            │
//!                                                            ▼
//!                                         GenerationClient ──► answer
//! ```
//!
//! The build half of the pipeline runs exactly once at startup via
//! [`engine::QueryEngine::build_from_document`]; the query half runs per
//! request via [`engine::QueryEngine::answer`]. The index is never written
//! after the build completes.

pub mod chunking;
pub mod embeddings;
pub mod engine;
pub mod extract;
pub mod generation;
pub mod index;
pub mod prompt;
pub mod types;

pub use chunking::TextSplitter;
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider, OllamaEmbeddingProvider};
pub use engine::QueryEngine;
pub use extract::extract_document_text;
pub use generation::{GenerationClient, GenerationParams, OllamaGenerationClient};
pub use index::{Retrieved, VectorIndex};
pub use prompt::{build_prompt, join_context};
pub use types::RagError;
