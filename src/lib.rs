//! Homer proxy: one local endpoint in front of home-automation and
//! infrastructure APIs, injecting per-backend credentials.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;

// Backend-specific clients
pub mod controller;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
