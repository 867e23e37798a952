// CodeLens Chat API Server
// Copyright (c) 2026 Xing_The_Creator | CodeLens

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::review::language::{Language, LanguageInfo};
use crate::review::prompt::ChatRequest;
use crate::state::{HealthStatus, ServerState};

pub type AppState = Arc<ServerState>;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct DetectRequest {
    pub code: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/api/detect", post(handle_detect))
        .route("/api/health", get(health_check))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Router plus an optional directory of front-end assets served for every
/// path the API does not claim.
pub fn create_app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = create_router(state);
    match static_dir {
        Some(dir) => {
            info!("[SERVER] Serving front-end from {:?}", dir);
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    }
}

pub async fn start_server(
    port: u16,
    state: AppState,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let app = create_app(state, static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let display_addr = if addr.ip().is_unspecified() {
        format!("127.0.0.1:{}", port)
    } else {
        addr.to_string()
    };
    info!("[SERVER] CodeLens API running on http://{}", display_addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[axum::debug_handler]
async fn handle_chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    info!(
        "[SERVER] Chat request: {} history turns, {} bytes of code",
        payload.history.len(),
        payload.code.len()
    );

    match state
        .gateway
        .complete(&payload.to_turns(), &state.model)
        .await
    {
        Ok(response) => Json(ChatResponse { response }).into_response(),
        Err(e) => {
            error!("[SERVER] Completion failed: {}", e);
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

async fn handle_detect(Json(payload): Json<DetectRequest>) -> Json<LanguageInfo> {
    Json(Language::detect(&payload.code).info())
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: "codelens",
    })
}
