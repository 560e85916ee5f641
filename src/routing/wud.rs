//! Container update checker. HTTP basic credentials.

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
    routing::get,
    Router,
};

use crate::http::relay::{self, Auth};
use crate::http::{AppState, InboundRequest, RelayError};

pub const BACKEND: &str = "wud";

pub fn routes() -> Router<AppState> {
    Router::new().route("/wud/{*path}", get(proxy))
}

async fn proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let inbound = InboundRequest::new(path, query.as_deref());
    relay::get(&state, BACKEND, state.config.wud.as_ref(), Auth::Basic, &inbound).await
}
