//! Network controller. Unlike the other backends this is not a pass-through:
//! each request runs a login → fetch → logout session and answers with one
//! site's statistics.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::controller::{ControllerSession, SessionError};
use crate::http::{AppState, RelayError};

pub const BACKEND: &str = "unifi";

pub fn routes() -> Router<AppState> {
    Router::new().route("/unifi/sites/{index}", get(site))
}

async fn site(
    State(state): State<AppState>,
    Path(raw_index): Path<String>,
) -> Result<Response, RelayError> {
    let (entry, password) = match state.config.unifi.as_ref() {
        Some(entry) => match entry.password.as_deref() {
            Some(password) => (entry, password),
            None => return Err(RelayError::missing(BACKEND)),
        },
        None => return Err(RelayError::missing(BACKEND)),
    };
    let index: usize = raw_index
        .parse()
        .map_err(|_| RelayError::InvalidSiteIndex { index: raw_index.clone() })?;
    let username = entry.username.as_deref().unwrap_or_default();

    let session = ControllerSession::connect(&state.config.outbound, entry.base_url())
        .await
        .map_err(session_failure)?;

    let logged_in = match session.login(username, password).await {
        Ok(logged_in) => logged_in,
        Err(SessionError::LoginRejected) => return Err(RelayError::LoginRejected),
        Err(e) => return Err(session_failure(e)),
    };

    tracing::debug!(backend = "UNIFI", kind = ?logged_in.kind(), "Fetching site statistics");

    // The session is released whatever the fetch outcome.
    let stats = logged_in.site_stats().await;
    if let Err(e) = logged_in.logout().await {
        tracing::warn!(backend = "UNIFI", error = %e, "Logout failed");
    }

    let mut sites = stats.map_err(session_failure)?;
    if index >= sites.len() {
        return Err(RelayError::SiteNotFound { index });
    }
    Ok(Json(sites.swap_remove(index)).into_response())
}

fn session_failure(source: SessionError) -> RelayError {
    RelayError::Session {
        backend: BACKEND.to_uppercase(),
        source,
    }
}
