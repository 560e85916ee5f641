//! Generic relay handler shared by every pass-through backend.
//!
//! A backend route only decides which config entry and which [`Auth`] scheme
//! to use; everything else (precondition check, outbound call, relaying the
//! reply, error translation) happens here.

use axum::http::{header, Method};
use axum::response::Response;

use crate::config::ConfigEntry;
use crate::http::request::{InboundRequest, OutboundRequest, QueryParams};
use crate::http::response::{relay, RelayError};
use crate::http::server::AppState;

/// How the outbound request is authenticated.
#[derive(Debug, Clone)]
pub enum Auth<'a> {
    /// HTTP basic credentials from `username` / `password`.
    Basic,
    /// API key, in `header` when given. `query` replaces the inbound query.
    ApiKey {
        header: Option<&'a str>,
        query: Option<QueryParams>,
    },
}

impl Auth<'_> {
    fn has_secret(&self, entry: &ConfigEntry) -> bool {
        match self {
            Auth::Basic => entry.password.is_some(),
            Auth::ApiKey { .. } => entry.apikey.is_some(),
        }
    }

    fn build(self, inbound: &InboundRequest, entry: &ConfigEntry) -> OutboundRequest {
        match self {
            Auth::Basic => OutboundRequest::basic_auth(inbound, entry),
            Auth::ApiKey { header, query } => OutboundRequest::api_key(inbound, entry, header, query),
        }
    }
}

/// Relay as an outbound GET.
pub async fn get(
    state: &AppState,
    backend: &str,
    entry: Option<&ConfigEntry>,
    auth: Auth<'_>,
    inbound: &InboundRequest,
) -> Result<Response, RelayError> {
    forward(state, Method::GET, backend, entry, auth, inbound).await
}

/// Relay as an outbound POST carrying the inbound body verbatim.
pub async fn post(
    state: &AppState,
    backend: &str,
    entry: Option<&ConfigEntry>,
    auth: Auth<'_>,
    inbound: &InboundRequest,
) -> Result<Response, RelayError> {
    forward(state, Method::POST, backend, entry, auth, inbound).await
}

async fn forward(
    state: &AppState,
    method: Method,
    backend: &str,
    entry: Option<&ConfigEntry>,
    auth: Auth<'_>,
    inbound: &InboundRequest,
) -> Result<Response, RelayError> {
    let entry = match entry {
        Some(entry) if auth.has_secret(entry) => entry,
        _ => return Err(RelayError::missing(backend)),
    };

    let outbound = auth.build(inbound, entry);
    let url = outbound.url();

    tracing::debug!(
        backend = %backend.to_uppercase(),
        method = %method,
        url = %url,
        "Relaying request"
    );

    let mut request = state.client.request(method.clone(), &url).query(&outbound.query);
    for (name, value) in &outbound.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if method == Method::POST {
        if let Some(content_type) = &inbound.content_type {
            request = request.header(header::CONTENT_TYPE, content_type.clone());
        }
        request = request.body(inbound.body.clone());
    }

    let response = request
        .send()
        .await
        .map_err(|e| RelayError::from_transport(backend, e))?;

    let status = response.status();
    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
    let body = response
        .bytes()
        .await
        .map_err(|e| RelayError::from_transport(backend, e))?;

    if !status.is_success() {
        return Err(RelayError::BackendStatus {
            backend: backend.to_uppercase(),
            status,
            content_type,
            body,
        });
    }

    Ok(relay(status, content_type, body))
}
