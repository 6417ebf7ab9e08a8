//! HTTP routes.
//!
//! - `POST /api/get-key`: mint one ephemeral key
//! - `GET /`, `GET /health`: liveness
//!
//! Every failure, including a panic inside a handler, becomes a JSON body
//! with status 500. No CORS headers are sent, so browsers refuse to hand a
//! key to scripts from other origins.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::IssueError;
use crate::issuer::KeyIssuer;
use crate::models::{HealthResponse, IssuedKeyResponse};

/// Path of the key issuance endpoint.
pub const GET_KEY_PATH: &str = "/api/get-key";

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub issuer: KeyIssuer,
    /// Attach `details` to error bodies.
    pub expose_error_details: bool,
}

/// Create the HTTP router.
pub fn create_router(issuer: KeyIssuer, expose_error_details: bool) -> Router {
    let state = Arc::new(HttpState { issuer, expose_error_details });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route(GET_KEY_PATH, post(handle_get_key))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

/// `POST /api/get-key`
///
/// Takes no body; anything sent is ignored.
async fn handle_get_key(State(state): State<Arc<HttpState>>) -> Response {
    let span = tracing::info_span!("issue_key", request_id = %Uuid::new_v4());

    async move {
        match state.issuer.issue().await {
            Ok(key) => Json(IssuedKeyResponse { key }).into_response(),
            Err(err) => {
                match &err {
                    IssueError::ConfigurationMissing { .. } => {
                        tracing::error!(error = %err, "Refusing to issue key");
                    }
                    _ => {
                        tracing::error!(
                            error = %err,
                            details = %err.details().unwrap_or_default(),
                            "Key issuance failed"
                        );
                    }
                }
                err.to_response(state.expose_error_details)
            }
        }
    }
    .instrument(span)
    .await
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = message, "Handler panicked");
    IssueError::unexpected(format!("handler panicked: {message}")).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn test_panic_becomes_500_json() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": IssueError::UNEXPECTED_MESSAGE}));
    }
}
