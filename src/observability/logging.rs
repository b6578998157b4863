//! Structured logging.
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - `verbose` raises the crate's own target to `debug`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Directive string used when `RUST_LOG` is absent.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    if config.verbose {
        format!("{},rate_mood=debug,tower_http=debug", config.log_level)
    } else {
        format!("{},tower_http=info", config.log_level)
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let mut config = ObservabilityConfig::default();
        assert_eq!(default_directives(&config), "info,tower_http=info");

        config.verbose = true;
        config.log_level = "warn".to_string();
        assert_eq!(default_directives(&config), "warn,rate_mood=debug,tower_http=debug");
    }
}
