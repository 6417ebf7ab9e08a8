//! Error types for the Tailscale key issuance server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::fmt;
use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::ErrorResponse;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Credentials rejected (401 or 403 response)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// JSON deserialization error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required response field was present but empty
    #[error("Response field '{field}' is empty")]
    EmptyField {
        /// JSON field name
        field: &'static str,
    },

    /// The configured base URL cannot carry path segments
    #[error("Invalid API endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ClientError {
    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized { status, message: message.into() }
    }

    /// The upstream HTTP status, if the call got as far as a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::BadRequest { .. } => Some(400),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the upstream answered but the body was not what we expect.
    #[must_use]
    pub const fn is_malformed_response(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::EmptyField { .. })
    }
}

/// Which outbound call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    /// OAuth client-credentials exchange.
    TokenExchange,
    /// Auth key creation in the tailnet.
    KeyIssuance,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExchange => f.write_str("token exchange"),
            Self::KeyIssuance => f.write_str("key issuance"),
        }
    }
}

/// Errors from a key issuance request.
///
/// Every variant renders as HTTP 500 with an [`ErrorResponse`] body.
#[derive(thiserror::Error, Debug)]
pub enum IssueError {
    /// One or more credentials are unset
    #[error("Server is missing required environment variables: {}", .missing.join(", "))]
    ConfigurationMissing {
        /// Environment variable names, in declaration order
        missing: Vec<&'static str>,
    },

    /// Token exchange or key creation was rejected or could not be sent
    #[error("{stage} failed: {source}")]
    UpstreamCallFailed {
        /// Call that failed
        stage: UpstreamStage,
        /// Underlying client error
        source: ClientError,
    },

    /// Anything else, e.g. a malformed upstream response
    #[error("{0}")]
    UnexpectedFailure(String),
}

impl IssueError {
    /// Message returned to callers for upstream failures.
    pub const UPSTREAM_MESSAGE: &'static str = "Could not generate Tailscale key";

    /// Message returned to callers for unexpected failures.
    pub const UNEXPECTED_MESSAGE: &'static str = "An internal server error occurred";

    /// Create a configuration error from the names of missing variables.
    #[must_use]
    pub fn configuration_missing(missing: Vec<&'static str>) -> Self {
        Self::ConfigurationMissing { missing }
    }

    /// Classify a failed outbound call.
    ///
    /// Malformed responses are unexpected failures; everything else is an
    /// upstream failure.
    #[must_use]
    pub fn from_client(stage: UpstreamStage, err: ClientError) -> Self {
        if err.is_malformed_response() {
            Self::UnexpectedFailure(format!("{stage} returned an unusable response: {err}"))
        } else {
            Self::UpstreamCallFailed { stage, source: err }
        }
    }

    /// Create an unexpected failure.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedFailure(message.into())
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message that is safe to return to any caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ConfigurationMissing { .. } => self.to_string(),
            Self::UpstreamCallFailed { .. } => Self::UPSTREAM_MESSAGE.to_string(),
            Self::UnexpectedFailure(_) => Self::UNEXPECTED_MESSAGE.to_string(),
        }
    }

    /// Diagnostic detail for logs and, when enabled, the `details` field.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::ConfigurationMissing { .. } => None,
            Self::UpstreamCallFailed { stage, source } => {
                let mut details =
                    format!("Error communicating with Tailscale API during {stage}: {source}");
                if let Some(status) = source.status() {
                    details.push_str(&format!(" | Status Code: {status}"));
                }
                Some(details)
            }
            Self::UnexpectedFailure(message) => {
                Some(format!("An unexpected error occurred: {message}"))
            }
        }
    }

    /// Render the error body, optionally with diagnostic detail.
    #[must_use]
    pub fn to_response(&self, expose_details: bool) -> Response {
        let body = ErrorResponse {
            error: self.public_message(),
            details: if expose_details { self.details() } else { None },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        self.to_response(false)
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for key issuance.
pub type IssueResult<T> = Result<T, IssueError>;
