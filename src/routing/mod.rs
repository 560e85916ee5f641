//! Routing subsystem: one module per backend.
//!
//! # Data Flow
//! ```text
//! /proxy/<backend>/...
//!     → BACKENDS (static registry, merged once at startup)
//!     → <backend>.rs handler (entry lookup, auth scheme)
//!     → http::relay (or the controller session for unifi)
//! ```
//!
//! # Design Decisions
//! - The registry is a compile-time list; adding a backend means adding a
//!   module and one line here
//! - Handlers read configuration from the injected [`AppState`], never from
//!   globals, so tests can fabricate snapshots
//! - Routes are relative; the server nests them under `/proxy`

use axum::Router;

use crate::http::server::AppState;

pub mod fibaro;
pub mod osmc;
pub mod pihole;
pub mod portainer;
pub mod prusalink;
pub mod tasmota;
pub mod unifi;
pub mod wud;

/// Builds the routes of one backend.
pub type RouteConstructor = fn() -> Router<AppState>;

/// A backend known to the gateway.
#[derive(Debug, Clone, Copy)]
pub struct BackendRoute {
    pub name: &'static str,
    pub routes: RouteConstructor,
}

/// Every backend the gateway fronts.
pub const BACKENDS: &[BackendRoute] = &[
    BackendRoute { name: fibaro::BACKEND, routes: fibaro::routes },
    BackendRoute { name: osmc::BACKEND, routes: osmc::routes },
    BackendRoute { name: pihole::BACKEND, routes: pihole::routes },
    BackendRoute { name: portainer::BACKEND, routes: portainer::routes },
    BackendRoute { name: prusalink::BACKEND, routes: prusalink::routes },
    BackendRoute { name: tasmota::BACKEND, routes: tasmota::routes },
    BackendRoute { name: unifi::BACKEND, routes: unifi::routes },
    BackendRoute { name: wud::BACKEND, routes: wud::routes },
];

/// Merge every registered backend into one router.
pub fn proxy_router() -> Router<AppState> {
    BACKENDS.iter().fold(Router::new(), |router, backend| {
        tracing::info!(backend = backend.name, "Register {}", backend.name);
        router.merge((backend.routes)())
    })
}
