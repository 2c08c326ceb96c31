//! HTTP surface tests: a real listener on an ephemeral port, driven with
//! reqwest, with the generation client stubbed out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use snap_rag::{
    GenerationClient, MockEmbeddingProvider, QueryEngine, RagError, TextSplitter,
};
use snap_server::routes::{AppState, router};

/// Generation stub: either a fixed reply or a service failure.
struct StubGenerator {
    reply: Result<String, String>,
}

#[async_trait]
impl GenerationClient for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, RagError> {
        match &self.reply {
            Ok(answer) => Ok(answer.clone()),
            Err(message) => Err(RagError::generation(message.clone())),
        }
    }
}

async fn spawn_server(generator: StubGenerator) -> String {
    let splitter = TextSplitter::default();
    let engine = QueryEngine::build_from_text(
        "The Snap device has three buttons: A, B, C. Button A powers on the device.",
        &splitter,
        Arc::new(MockEmbeddingProvider::new()),
        Arc::new(generator),
    )
    .await
    .unwrap();

    let state = AppState {
        engine: Arc::new(engine),
        model: "llama3.2:3b".to_string(),
    };
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test(flavor = "multi_thread")]
async fn ask_returns_the_generated_answer() {
    let base = spawn_server(StubGenerator {
        reply: Ok("Press button A.".to_string()),
    })
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/ask"))
        .json(&json!({"prompt": "How do I power on the device?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"answer": "Press button A."}));
}

#[tokio::test(flavor = "multi_thread")]
async fn info_endpoint_reports_the_served_model() {
    let base = spawn_server(StubGenerator {
        reply: Ok(String::new()),
    })
    .await;

    let response = reqwest::get(&base).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("llama3.2:3b"), "got message: {message}");
}

#[tokio::test(flavor = "multi_thread")]
async fn upstream_failure_is_a_request_level_error_not_a_crash() {
    let base = spawn_server(StubGenerator {
        reply: Err("connection refused".to_string()),
    })
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/ask"))
        .json(&json!({"prompt": "How do I power on the device?"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("generation"));

    // The process survived; a following request still gets a response.
    let again = client
        .post(format!("{base}/ask"))
        .json(&json!({"prompt": "still there?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 502);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_request_bodies_are_client_errors() {
    let base = spawn_server(StubGenerator {
        reply: Ok(String::new()),
    })
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/ask"))
        .header("content-type", "application/json")
        .body("{\"not_prompt\": 1}")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
