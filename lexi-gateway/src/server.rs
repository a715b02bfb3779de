use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::speech::SpeechError;
use crate::state::AppState;

/// Answer request from HTTP API
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

/// Speech request from HTTP API
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// Speech response for HTTP API
#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Run the HTTP server
pub async fn run(state: Arc<AppState>, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/answer", post(answer_handler))
        .route("/synthesize-speech", post(synthesize_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Answer handler - POST /answer
async fn answer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> impl IntoResponse {
    info!("Received answer request");

    match state.composer.answer(&request.text).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("answer pipeline error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Speech handler - POST /synthesize-speech
async fn synthesize_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeechRequest>,
) -> impl IntoResponse {
    info!("Received synthesize-speech request");

    match state.speech.synthesize(&request.text).await {
        Ok(audio_url) => (StatusCode::OK, Json(SpeechResponse { audio_url })).into_response(),
        Err(e @ SpeechError::RateLimited(_)) => {
            error!("speech quota exhausted: {e}");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("speech pipeline error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
