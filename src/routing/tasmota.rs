//! Smart-plug devices, one per `[[tasmota]]` entry. HTTP basic credentials.

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
    routing::get,
    Router,
};

use crate::http::relay::{self, Auth};
use crate::http::{AppState, InboundRequest, RelayError};

pub const BACKEND: &str = "tasmota";

pub fn routes() -> Router<AppState> {
    Router::new().route("/tasmota/{name}/{*path}", get(proxy))
}

async fn proxy(
    State(state): State<AppState>,
    Path((name, path)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let entry = state.config.tasmota_instance(&name);
    if entry.is_none() {
        tracing::warn!(backend = "TASMOTA", instance = %name, "Unknown instance");
    }
    let inbound = InboundRequest::new(path, query.as_deref());
    relay::get(&state, BACKEND, entry, Auth::Basic, &inbound).await
}
