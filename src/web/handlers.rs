use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::error;

use super::AppState;
use crate::errors::ResolveError;

pub async fn index() -> &'static str {
    "Nothing to see here."
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve the resolved 32x32 PNG for a domain.
///
/// Validation failures are the only client-visible errors; every other
/// outcome for a well-formed hostname is a 200 with image bytes.
pub async fn icon(
    Path(domain): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.resolver.resolve(&domain).await {
        Ok(bytes) => Response::builder()
            .header(header::CONTENT_TYPE, "image/png")
            .header(header::CACHE_CONTROL, "public, max-age=86400")
            .body(Body::from(bytes))
            .unwrap(),
        Err(ResolveError::InvalidHostname(_)) => Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(Body::from("Invalid hostname"))
            .unwrap(),
        Err(e) => {
            error!("Icon resolution for {domain} failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
