//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay a backend response to the caller unchanged (status, body, content type)
//! - Map relay failures to the status codes and bodies callers see
//!
//! # Design Decisions
//! - Payloads are never transformed
//! - Every failure is logged once, at the point it becomes a response, with
//!   the backend name uppercased
//! - A backend's own error status is relayed as is; only transport failures
//!   become 500s

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::controller::SessionError;

/// Why a relayed request did not produce a pass-through success.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Backend entry, named instance or its secret is not configured.
    #[error("{backend} configuration not found")]
    ConfigurationMissing { backend: String },

    /// The backend answered with a non-2xx status.
    #[error("{backend} responded with {status}")]
    BackendStatus {
        backend: String,
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// The call was sent but no (complete) response came back.
    #[error("no response received from {backend} API: {source}")]
    NoResponse {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    /// The call could not be dispatched at all.
    #[error("error in making request to {backend} API: {source}")]
    RequestConstruction {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    /// The network controller refused the configured credentials.
    #[error("UniFi login failed")]
    LoginRejected,

    /// The site index in the path is not a non-negative integer.
    #[error("Invalid UniFi site index '{index}'")]
    InvalidSiteIndex { index: String },

    /// The network controller has no site at the requested index.
    #[error("UniFi site {index} not found")]
    SiteNotFound { index: usize },

    /// Any other failure during a controller session.
    #[error("{backend} session failed: {source}")]
    Session {
        backend: String,
        #[source]
        source: SessionError,
    },
}

impl RelayError {
    pub fn missing(backend: &str) -> Self {
        RelayError::ConfigurationMissing {
            backend: backend.to_uppercase(),
        }
    }

    /// Classify a transport error from the outbound client.
    pub fn from_transport(backend: &str, source: reqwest::Error) -> Self {
        let backend = backend.to_uppercase();
        if source.is_builder() {
            RelayError::RequestConstruction { backend, source }
        } else {
            RelayError::NoResponse { backend, source }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::ConfigurationMissing { .. } | RelayError::SiteNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            RelayError::BackendStatus { status, .. } => *status,
            RelayError::InvalidSiteIndex { .. } => StatusCode::BAD_REQUEST,
            RelayError::LoginRejected => StatusCode::UNAUTHORIZED,
            RelayError::NoResponse { .. }
            | RelayError::RequestConstruction { .. }
            | RelayError::Session { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            RelayError::ConfigurationMissing { backend } => {
                tracing::error!(backend = %backend, "{}", self);
            }
            RelayError::BackendStatus { backend, status, .. } => {
                tracing::error!(backend = %backend, status = %status, "Backend returned an error status");
            }
            RelayError::NoResponse { backend, source } => {
                tracing::error!(backend = %backend, error = %source, "No response received");
            }
            RelayError::RequestConstruction { backend, source } => {
                tracing::error!(backend = %backend, error = %source, "Failed to build request");
            }
            RelayError::LoginRejected => {
                tracing::error!(backend = "UNIFI", "Controller login rejected");
            }
            RelayError::InvalidSiteIndex { index } => {
                tracing::error!(backend = "UNIFI", index = %index, "Site index is not a number");
            }
            RelayError::SiteNotFound { index } => {
                tracing::error!(backend = "UNIFI", index, "Site index out of range");
            }
            RelayError::Session { backend, source } => {
                tracing::error!(backend = %backend, "ERROR: {}", source);
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        match self {
            RelayError::BackendStatus {
                status,
                content_type,
                body,
                ..
            } => relay(status, content_type, body),
            RelayError::NoResponse { backend, .. } => (
                status,
                Json(json!({ "message": format!("No response received from {} API", backend) })),
            )
                .into_response(),
            RelayError::RequestConstruction { backend, .. } => (
                status,
                Json(json!({ "message": format!("Error in making request to {} API", backend) })),
            )
                .into_response(),
            RelayError::Session { .. } => (status, "Internal Server Error").into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Build the caller-facing response from a backend's status, content type and body.
pub fn relay(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}
