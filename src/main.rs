//! Currency mood service (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http server ──▶ DiffService
//!                                        │
//!                      ┌─────────────────┼───────────────────┐
//!                      ▼                 ▼                   ▼
//!               today snapshot    yesterday snapshot    GIF id → bytes
//!                      │                 │                   │
//!                      └──── CacheAsideFetcher (breaker) ────┘
//!                              │                  │
//!                              ▼                  ▼
//!                        cache store       upstream providers
//!                      (redis / memory)   (exchange, tenor)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use rate_mood::config::loader::load_config;
use rate_mood::http::HttpServer;
use rate_mood::lifecycle::{self, Shutdown};
use rate_mood::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "rate-mood", version, about = "Answers a currency's daily move with a GIF")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config/rate-mood.toml")]
    config: PathBuf,

    /// Log at debug level regardless of the configured level.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("rate-mood: {}", err);
            std::process::exit(1);
        }
    };
    if cli.verbose {
        config.observability.verbose = true;
    }

    logging::init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "rate-mood starting"
    );

    tracing::info!(
        bind_address = %config.listener.bind_address,
        cache_backend = ?config.cache.backend,
        base_currency = %config.exchange.base_currency,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = lifecycle::build_store(&config.cache).await?;
    let service = Arc::new(lifecycle::build_service(&config, store)?);
    let listener = lifecycle::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_listener(shutdown.clone());

    HttpServer::new(service, &config.timeouts)
        .run(listener, shutdown.signalled())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
