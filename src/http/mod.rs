//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, CORS, routing under /proxy)
//!     → [routing: backend handler picks entry + auth scheme]
//!     → relay.rs (precondition check, outbound call)
//!         → request.rs (authenticated outbound descriptor)
//!         → client.rs (shared reqwest client)
//!     → response.rs (pass-through or translated error)
//!     → Send to client
//! ```

pub mod client;
pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, OutboundRequest, QueryParams};
pub use response::RelayError;
pub use server::{AppState, GatewayServer};
