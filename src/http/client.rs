//! Outbound HTTP client construction.
//!
//! Every backend call goes through a `reqwest::Client` built here so that
//! timeouts and the TLS verification policy come from one place.

use std::time::Duration;

use crate::config::OutboundConfig;

/// Builder preloaded with the configured timeouts and TLS policy.
pub fn client_builder(config: &OutboundConfig) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs));

    if config.accept_invalid_certs {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
}

/// The shared client used by every pass-through relay.
pub fn build_client(config: &OutboundConfig) -> reqwest::Result<reqwest::Client> {
    if config.accept_invalid_certs {
        tracing::warn!("TLS peer verification disabled for outbound calls");
    }
    client_builder(config).build()
}
