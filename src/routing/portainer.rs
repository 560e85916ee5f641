//! Container management UI. API key in the `X-Api-Key` header.

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
    routing::get,
    Router,
};

use crate::http::relay::{self, Auth};
use crate::http::{AppState, InboundRequest, RelayError};

pub const BACKEND: &str = "portainer";

const API_KEY_HEADER: &str = "X-Api-Key";

pub fn routes() -> Router<AppState> {
    Router::new().route("/portainer/{*path}", get(proxy))
}

async fn proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let inbound = InboundRequest::new(path, query.as_deref());
    let auth = Auth::ApiKey {
        header: Some(API_KEY_HEADER),
        query: None,
    };
    relay::get(&state, BACKEND, state.config.portainer.as_ref(), auth, &inbound).await
}
