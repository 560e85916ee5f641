//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → secrets.rs (fill passwords / API keys from the environment)
//!     → GatewayConfig (immutable snapshot)
//!     → shared via Arc to every route handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Any load failure at startup is fatal
//! - Secrets live only in the environment, never in the file

pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AuthKind, ConfigEntry, GatewayConfig, NamedConfigEntry, OutboundConfig, ServerConfig};
