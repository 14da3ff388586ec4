//! HTTP layer for the stylist service.
//!
//! Request/response marshaling only: handlers delegate to the pipeline and
//! closet, and the fault classification decides the response status. Error
//! bodies carry a stable machine-readable `kind` plus a message; internal
//! errors are surfaced generically.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::closet::FsCloset;
use crate::error::{Fault, StylistError};
use crate::pipeline::{StyledOutfit, StylistPipeline};
use crate::transport;

/// Shared handler state; everything inside is read-only per request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<StylistPipeline>,
    pub closet: Arc<FsCloset>,
    pub person_image_path: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/style", post(style))
        .route("/person-image", post(save_person_image))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, bind_addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "stylist API listening");
    axum::serve(listener, router(state)).await
}

#[derive(Debug, Deserialize)]
pub struct StyleRequest {
    pub prompt: String,
    pub person_image_b64: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePersonImageRequest {
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
struct SavePersonImageResponse {
    saved_to: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: Fault,
    error: String,
}

/// Response-side wrapper: maps the fault class to a status code.
struct ApiError(StylistError);

impl From<StylistError> for ApiError {
    fn from(e: StylistError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let fault = self.0.fault();
        let status = match fault {
            Fault::ClientInput | Fault::ResourceMissing => StatusCode::BAD_REQUEST,
            Fault::UpstreamFailure | Fault::ContractViolation => StatusCode::BAD_GATEWAY,
            Fault::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Internal detail stays in the logs, never in the response body.
        let error = match fault {
            Fault::Internal => "internal error".to_string(),
            _ => self.0.to_string(),
        };
        (status, Json(ErrorBody { kind: fault, error })).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn style(
    State(state): State<AppState>,
    Json(request): Json<StyleRequest>,
) -> Result<Json<StyledOutfit>, ApiError> {
    let styled = state
        .pipeline
        .run(&request.prompt, &request.person_image_b64)
        .await?;
    Ok(Json(styled))
}

async fn save_person_image(
    State(state): State<AppState>,
    Json(request): Json<SavePersonImageRequest>,
) -> Result<Json<SavePersonImageResponse>, ApiError> {
    let bytes = transport::decode_image(&request.image_base64)?;
    let path = state
        .closet
        .save_person_image(&state.person_image_path, &bytes)
        .map_err(StylistError::from)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "person image saved");
    Ok(Json(SavePersonImageResponse {
        saved_to: path.display().to_string(),
    }))
}
