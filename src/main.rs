//! Homer proxy
//!
//! A single local HTTP endpoint that relays requests to home-automation and
//! infrastructure APIs, adding each backend's credentials on the way out.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                   HOMER PROXY                    │
//!                      │                                                  │
//!   GET /proxy/wud/..  │  ┌─────────┐   ┌──────────┐   ┌─────────────┐   │
//!   ───────────────────┼─▶│ server  │──▶│ routing  │──▶│ http::relay │───┼──▶ backend
//!                      │  │ /healthz│   │ per-     │   │ + request   │   │    (auth added)
//!                      │  └─────────┘   │ backend  │   │   builder   │   │
//!   ◀──────────────────┼────────────────│ handlers │◀──│ + response  │◀──┼─── status + body
//!                      │                └────┬─────┘   └─────────────┘   │
//!                      │                     │ unifi                     │
//!                      │                     ▼                           │
//!                      │              ┌─────────────┐                    │
//!                      │              │ controller  │ login/fetch/logout │
//!                      │              └─────────────┘                    │
//!                      │                                                  │
//!                      │  config (TOML + env secrets) · observability    │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use homer_proxy::config::loader::{load_config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use homer_proxy::lifecycle::{signals, Shutdown};
use homer_proxy::observability::{init_logging, LoggingOptions};
use homer_proxy::GatewayServer;

#[derive(Parser)]
#[command(name = "homer-proxy")]
#[command(about = "Credential-injecting gateway for home-automation APIs", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, required_secrets) = match load_config(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            init_logging(&LoggingOptions::from_env(false));
            tracing::error!(
                path = %cli.config.display(),
                error = %e,
                "Failed to load configuration"
            );
            std::process::exit(1);
        }
    };

    init_logging(&LoggingOptions::from_env(config.server.debug));

    tracing::info!("homer-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mandatory environment properties: ");
    for name in &required_secrets {
        tracing::info!("  - {}", name);
    }

    let server = GatewayServer::new(config)?;
    let bind_address = server.config().server.bind_address();
    let port = server.config().server.port;

    let listener = TcpListener::bind(&bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    tracing::info!("Server is running on port {}", port);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
