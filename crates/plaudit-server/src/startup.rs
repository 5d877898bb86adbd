//! Server startup utilities.

use plaudit_config::ObservabilityConfig;
use plaudit_core::{PlauditError, PlauditResult};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &ObservabilityConfig) -> PlauditResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| PlauditError::Configuration(format!("Failed to initialize logging: {}", e)))
}

fn default_filter(level: &str) -> String {
    format!("{level},plaudit=debug,tower_http=debug")
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____  __                ___ __
   / __ \/ /___ ___  ______/ (_) /_
  / /_/ / / __ `/ / / / __  / / __/
 / ____/ / /_/ / /_/ / /_/ / / /_
/_/   /_/\__,_/\__,_/\__,_/_/\__/

                 per-article likes
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, store: &str, cache_enabled: bool) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1/articles/{{article_id}}/likes", addr);
    info!("Health:    http://{}/health", addr);
    info!("Store:     {}", store);
    info!("Cache:     {}", if cache_enabled { "redis" } else { "disabled" });
    info!("{}", separator);
}
