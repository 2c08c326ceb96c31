//! Request handlers and the error boundary.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use snap_rag::{QueryEngine, RagError};

/// Shared request-handler state: the read-only engine plus the model name
/// advertised by the info endpoint.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
    pub model: String,
}

/// Question submitted to `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
}

/// Answer returned from `POST /ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Request-boundary error: upstream failures become a 502 with a JSON body
/// instead of crashing the process.
pub struct ApiError(RagError);

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/ask", post(ask))
        .with_state(state)
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let answer = state.engine.answer(&request.prompt).await?;
    Ok(Json(AskResponse { answer }))
}

async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        message: format!("snap-server is running ({} via Ollama)", state.model),
    })
}
