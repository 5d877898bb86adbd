//! # Plaudit Server
//!
//! Main entry point: loads configuration, builds the like store, cache and
//! engine, and serves the HTTP API until Ctrl+C or SIGTERM.

use plaudit_config::ConfigLoader;
use plaudit_core::PlauditResult;
use plaudit_server::app::AppBuilder;
use plaudit_server::startup::{init_logging, print_banner, print_startup_info};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be installed yet if configuration failed.
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> PlauditResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().clone();

    init_logging(&config.observability)?;
    print_banner();

    info!("Starting Plaudit Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let store = if config.database.is_memory() {
        "memory"
    } else {
        "mysql"
    };
    let addr = config.server.addr();

    let app = AppBuilder::new().with_config(config).build().await?;
    let listener = app.bind().await?;

    print_startup_info(&addr, store, app.cache_enabled());

    app.serve(listener, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
