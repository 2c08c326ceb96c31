//! Service entry point: build the index, then serve.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snap_rag::{
    GenerationParams, OllamaEmbeddingProvider, OllamaGenerationClient, QueryEngine, TextSplitter,
};
use snap_server::config::ServerConfig;
use snap_server::routes::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        document = %config.document_path.display(),
        model = %config.model,
        "loading Snap manual and initializing RAG"
    );

    let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap)?;
    let embedder = Arc::new(OllamaEmbeddingProvider::new(
        config.embeddings_url.clone(),
        config.embed_model.clone(),
    )?);
    let generator = Arc::new(OllamaGenerationClient::new(
        config.generation_url.clone(),
        GenerationParams::new(config.model.clone()),
    )?);

    // Build-before-serve: a failure here aborts startup, and the listener
    // below is not opened until the index is fully populated.
    let engine = QueryEngine::build_from_document(
        &config.document_path,
        &splitter,
        embedder,
        generator,
    )
    .await?;
    info!(chunks = engine.chunk_count(), "RAG setup complete");

    let state = AppState {
        engine: Arc::new(engine),
        model: config.model.clone(),
    };
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "accepting requests");
    axum::serve(listener, routes::router(state)).await?;
    Ok(())
}
