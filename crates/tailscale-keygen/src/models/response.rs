//! Bodies returned by the inbound endpoint.

use serde::Serialize;

use super::EphemeralKey;

/// `200 OK` body: `{"key": "..."}`.
#[derive(Debug, Serialize)]
pub struct IssuedKeyResponse {
    pub key: EphemeralKey,
}

/// Error body: `{"error": "...", "details": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Liveness body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { status: "ok", service: env!("CARGO_PKG_NAME"), version: env!("CARGO_PKG_VERSION") }
    }
}
