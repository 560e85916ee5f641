//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::GatewayConfig;
use crate::config::secrets::resolve_secrets;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "CONFIG_FILE_PATH";

/// Config file used when no override is given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/config.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration text. Secrets are left unresolved.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file, then resolve secrets
/// from the process environment.
///
/// Returns the snapshot together with the names of the environment variables
/// the snapshot depends on.
pub fn load_config(path: &Path) -> Result<(GatewayConfig, Vec<String>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&content)?;
    let required = resolve_secrets(&mut config, |name| std::env::var(name).ok());
    Ok((config, required))
}
