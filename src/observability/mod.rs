//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (backend, status, error)
//!
//! Consumers (logging.rs):
//!     → stdout (ANSI, human readable)
//!     → log file (plain text)
//! ```
//!
//! # Design Decisions
//! - Backend names are logged uppercased
//! - Per-request access logs only in debug mode

pub mod logging;

pub use logging::{init_logging, LoggingOptions};
