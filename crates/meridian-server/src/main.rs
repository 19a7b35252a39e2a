//! # Meridian Server
//!
//! Main entry point for the Meridian account service.

use meridian_config::{AppConfig, ConfigLoader};
use meridian_core::{MeridianError, MeridianResult};
use meridian_repository::{create_pool, DatabasePoolInterface, MySqlAccountRepository};
use meridian_rest::create_router;
use meridian_server::{
    di::{create_cache_store, AppModuleBuilder},
    logging::init_logging,
    startup::{print_banner, print_startup_info},
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting Meridian Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> MeridianResult<()> {
    let db_pool = create_pool(&config.database).await?;
    let cache_store = create_cache_store(&config.redis).await?;

    let module = AppModuleBuilder::new()
        .with_account_repository(Arc::new(MySqlAccountRepository::new(db_pool.clone())))
        .with_cache_store(cache_store)
        .with_security_config(config.security.clone())
        .build()?;

    let router = create_router(module.app_state(), &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MeridianError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    let cache_backend = if config.redis.enabled { "redis" } else { "in-process" };
    print_startup_info(&addr, cache_backend);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeridianError::Internal(format!("REST server error: {}", e)));

    db_pool.close().await;
    drop(module);
    info!("Cache client released");

    served?;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
