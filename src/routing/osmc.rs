//! Media-center nodes, one per `[[osmc]]` entry.
//!
//! Kodi's JSON-RPC endpoint only takes POST, so the inbound body is relayed
//! as is with HTTP basic credentials.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap},
    response::Response,
    routing::post,
    Router,
};

use crate::http::relay::{self, Auth};
use crate::http::{AppState, InboundRequest, RelayError};

pub const BACKEND: &str = "osmc";

pub fn routes() -> Router<AppState> {
    Router::new().route("/osmc/{name}/{*path}", post(proxy))
}

async fn proxy(
    State(state): State<AppState>,
    Path((name, path)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let entry = state.config.osmc_instance(&name);
    if entry.is_none() {
        tracing::warn!(backend = "OSMC", instance = %name, "Unknown instance");
    }
    let inbound = InboundRequest::new(path, query.as_deref())
        .with_body(headers.get(header::CONTENT_TYPE).cloned(), body);
    relay::post(&state, BACKEND, entry, Auth::Basic, &inbound).await
}
