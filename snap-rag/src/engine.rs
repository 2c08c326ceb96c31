//! Query orchestration: one-shot index build plus per-request answering.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::chunking::TextSplitter;
use crate::embeddings::EmbeddingProvider;
use crate::extract::extract_document_text;
use crate::generation::GenerationClient;
use crate::index::VectorIndex;
use crate::prompt::{build_prompt, join_context};
use crate::types::RagError;

/// Number of chunks retrieved per question.
pub const TOP_K: usize = 3;

/// Ties the pipeline together: owns the built index and the two external
/// service clients, answers one question per call.
///
/// Built exactly once before the service accepts requests; after that it is
/// read-only, so request handlers can share it behind an `Arc` without
/// locking.
pub struct QueryEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationClient>,
    index: VectorIndex,
    top_k: usize,
}

impl QueryEngine {
    /// Startup build phase: extract the manual, chunk it, embed every chunk,
    /// and bulk-load the index. Any failure here is fatal to startup.
    pub async fn build_from_document(
        path: impl AsRef<Path>,
        splitter: &TextSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationClient>,
    ) -> Result<Self, RagError> {
        let text = extract_document_text(path)?;
        Self::build_from_text(&text, splitter, embedder, generator).await
    }

    /// Builds the engine from already-extracted text. Ids are the chunks'
    /// positions in document order, stringified.
    pub async fn build_from_text(
        text: &str,
        splitter: &TextSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationClient>,
    ) -> Result<Self, RagError> {
        let chunks = splitter.split(text);
        info!(chunks = chunks.len(), model = embedder.model(), "chunks created");

        let mut index = VectorIndex::new();
        for (ordinal, chunk) in chunks.into_iter().enumerate() {
            let embedding = embedder.embed(&chunk).await?;
            index.insert(ordinal.to_string(), embedding, chunk)?;
        }
        info!(entries = index.len(), "index build complete");

        Ok(Self {
            embedder,
            generator,
            index,
            top_k: TOP_K,
        })
    }

    /// Answers one question: embed, retrieve top-k, build the prompt, call
    /// the generation service. Upstream failures propagate to the caller;
    /// an empty index simply yields an empty context.
    pub async fn answer(&self, question: &str) -> Result<String, RagError> {
        let query_embedding = self.embedder.embed(question).await?;
        let hits = self.index.query(&query_embedding, self.top_k);
        debug!(retrieved = hits.len(), "retrieval complete");

        let context = join_context(hits.iter().map(|hit| hit.content.as_str()));
        let prompt = build_prompt(&context, question);
        self.generator.generate(&prompt).await
    }

    /// Number of chunks loaded into the index.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbeddingProvider;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Test double that records every prompt it is asked to complete.
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingGenerator {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationClient for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, RagError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn build_assigns_ordinal_ids_in_document_order() {
        let splitter = TextSplitter::new(30, 0).unwrap();
        let generator = RecordingGenerator::new("ok");
        let engine = QueryEngine::build_from_text(
            "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.",
            &splitter,
            Arc::new(MockEmbeddingProvider::new()),
            generator,
        )
        .await
        .unwrap();
        assert_eq!(engine.chunk_count(), 3);
    }

    #[tokio::test]
    async fn answer_builds_the_prompt_from_retrieved_context() {
        let splitter = TextSplitter::default();
        let generator = RecordingGenerator::new("Press button A.");
        let engine = QueryEngine::build_from_text(
            "The Snap device has three buttons: A, B, C. Button A powers on the device.",
            &splitter,
            Arc::new(MockEmbeddingProvider::new()),
            generator.clone(),
        )
        .await
        .unwrap();
        assert_eq!(engine.chunk_count(), 1);

        let answer = engine.answer("How do I power on the device?").await.unwrap();
        assert_eq!(answer, "Press button A.");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1, "generation should be called exactly once");
        assert!(prompts[0].contains("Button A powers on the device."));
        assert!(prompts[0].contains("Question: How do I power on the device?"));
    }

    #[tokio::test]
    async fn empty_document_still_answers_with_empty_context() {
        let splitter = TextSplitter::default();
        let generator = RecordingGenerator::new("I don't know.");
        let engine = QueryEngine::build_from_text(
            "",
            &splitter,
            Arc::new(MockEmbeddingProvider::new()),
            generator.clone(),
        )
        .await
        .unwrap();
        assert_eq!(engine.chunk_count(), 0);

        let answer = engine.answer("Anything?").await.unwrap();
        assert_eq!(answer, "I don't know.");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        // Context block is empty but the prompt is still fully formed.
        assert!(prompts[0].contains("Question: Anything?"));
        assert!(prompts[0].contains("Use the following manual context to answer:\n\n\n\nQuestion:"));
    }
}
