//! Ad-blocking DNS service. The API key travels as the `auth` query parameter.

use axum::{
    extract::{Path, RawQuery, State},
    response::Response,
    routing::get,
    Router,
};

use crate::http::relay::{self, Auth};
use crate::http::{AppState, InboundRequest, RelayError};

pub const BACKEND: &str = "pihole";

const AUTH_PARAM: &str = "auth";

pub fn routes() -> Router<AppState> {
    Router::new().route("/pihole/{*path}", get(proxy))
}

async fn proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let inbound = InboundRequest::new(path, query.as_deref());
    let entry = state.config.pihole.as_ref();
    let query = entry
        .and_then(|entry| entry.apikey.as_deref())
        .map(|key| inbound.query_with(AUTH_PARAM, key));
    let auth = Auth::ApiKey {
        header: None,
        query,
    };
    relay::get(&state, BACKEND, entry, auth, &inbound).await
}
