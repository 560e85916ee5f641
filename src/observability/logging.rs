//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once, before the first request
//! - Write to stdout and to a log file
//! - Resolve the log level from `LOG_LEVEL`, then the config's debug flag

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FILE_ENV: &str = "LOG_FILE_PATH";
pub const DEFAULT_LOG_FILE: &str = "./logs/homer-proxy.log";

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// An `EnvFilter` directive, usually just a level.
    pub level: String,
    pub file_path: PathBuf,
}

impl LoggingOptions {
    /// Options from the process environment.
    pub fn from_env(debug: bool) -> Self {
        Self::resolve(debug, |name| std::env::var(name).ok())
    }

    /// Options from `lookup`; `LOG_LEVEL` wins over the debug flag.
    pub fn resolve<F>(debug: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_level = if debug { "debug" } else { "info" };
        Self {
            level: lookup(LOG_LEVEL_ENV)
                .filter(|level| !level.is_empty())
                .unwrap_or_else(|| default_level.to_string()),
            file_path: lookup(LOG_FILE_ENV)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(options: &LoggingOptions) {
    let filter = EnvFilter::try_new(&options.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file, file_error) = match open_log_file(&options.file_path) {
        Ok(file) => (Some(file), None),
        Err(e) => (None, Some(e)),
    };
    let file_layer = file.map(|file| fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            path = %options.file_path.display(),
            error = %e,
            "Cannot open log file, logging to stdout only"
        );
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
