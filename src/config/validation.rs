//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every entry has a host and, when given, a numeric port
//! - Named instances have a non-empty name, unique within their section
//! - Outbound timeouts are non-zero
//!
//! Returns all validation errors, not just the first. Missing secrets are not
//! errors: the affected backend answers 404 at request time instead.

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::{ConfigEntry, GatewayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Section the problem was found in, e.g. `fibaro` or `tasmota[kitchen]`.
    pub section: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.section, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let outbound = &config.outbound;
    for (field, value) in [
        ("connect_timeout_secs", outbound.connect_timeout_secs),
        ("request_timeout_secs", outbound.request_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError {
                section: "outbound".into(),
                message: format!("{} must be greater than zero", field),
            });
        }
    }

    for (section, entry) in config.singletons() {
        if let Some(entry) = entry {
            check_entry(section, entry, &mut errors);
        }
    }

    for (section, instances) in config.instance_groups() {
        let mut seen = HashSet::new();
        for (position, instance) in instances.iter().enumerate() {
            if instance.name.trim().is_empty() {
                errors.push(ValidationError {
                    section: format!("{}[{}]", section, position),
                    message: "instance name must not be empty".into(),
                });
                continue;
            }
            let label = format!("{}[{}]", section, instance.name);
            if !seen.insert(instance.name.as_str()) {
                errors.push(ValidationError {
                    section: label.clone(),
                    message: "duplicate instance name".into(),
                });
            }
            check_entry(&label, &instance.entry, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_entry(section: &str, entry: &ConfigEntry, errors: &mut Vec<ValidationError>) {
    if entry.host.trim().is_empty() {
        errors.push(ValidationError {
            section: section.to_string(),
            message: "host must not be empty".into(),
        });
    }
    if let Some(port) = &entry.port {
        if port.parse::<u16>().is_err() {
            errors.push(ValidationError {
                section: section.to_string(),
                message: format!("port '{}' is not a valid port number", port),
            });
        }
    }
}
