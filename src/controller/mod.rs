//! Network controller (UniFi) session client.
//!
//! # Data Flow
//! ```text
//! ControllerSession::connect   GET  /              → Classic | UnifiOs (x-csrf-token)
//!     → login()                POST /api/login      → LoggedIn | LoginRejected
//!     → site_stats()           GET  /api/stat/sites → Vec<site>
//!     → logout()               POST /api/logout     (consumes the session)
//!
//! UniFi OS: /api/auth/login, /proxy/network/api/stat/sites, /api/auth/logout,
//! with the latest CSRF token echoed on every call.
//! ```
//!
//! # Design Decisions
//! - Each session owns its own cookie-jar client; nothing is shared between
//!   inbound requests
//! - The state machine is encoded in types: only a `LoggedIn` session can
//!   fetch stats or log out

pub mod session;

pub use session::{ControllerKind, ControllerSession, LoggedIn, SessionError};
