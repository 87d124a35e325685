//! # controlhubd: controlhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Register the configured services with the hub
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use controlhub_adapter_http_axum::state::AppState;
use controlhub_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteAclRepository, SqliteConfigurationManager, SqliteScheduler,
    SqliteScriptRepository,
};
use controlhub_app::proxy_registry::ProxyRegistry;
use controlhub_app::service_registry::InProcessServiceRegistry;
use controlhub_app::services::acl_service::AclService;
use controlhub_app::services::proxy_service::ProxyService;
use controlhub_app::services::script_service::ScriptService;
use controlhub_app::services::service_acl_service::ServiceAclService;
use controlhub_app::services::service_catalog::ServiceCatalog;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("initialising database")?;
    let pool = db.pool().clone();

    // Repositories
    let acl_repo = Arc::new(SqliteAclRepository::new(pool.clone()));
    let script_repo = Arc::new(SqliteScriptRepository::new(pool.clone()));
    let configuration = Arc::new(SqliteConfigurationManager::new(pool.clone()));
    let scheduler = Arc::new(SqliteScheduler::new(pool));

    // Registries
    let service_registry = Arc::new(InProcessServiceRegistry::new());
    let proxy_registry = Arc::new(ProxyRegistry::new());

    // Known services
    let catalog = ServiceCatalog::new(
        Arc::clone(&service_registry),
        Arc::clone(&configuration),
        Arc::clone(&scheduler),
    );
    for service in &config.services {
        catalog
            .register(service.record(), &service.process)
            .await
            .with_context(|| format!("registering {} service", service.name))?;
    }
    tracing::info!(count = config.services.len(), "services registered");

    // Services
    let script_service = ScriptService::new(
        Arc::clone(&script_repo),
        Arc::clone(&acl_repo),
        Arc::clone(&configuration),
        Arc::clone(&scheduler),
    );
    let acl_service = AclService::new(Arc::clone(&acl_repo), script_repo);
    let service_acl_service = ServiceAclService::new(acl_repo, configuration, scheduler);
    let proxy_service = ProxyService::new(service_registry, proxy_registry);

    // HTTP
    let state = AppState::new(
        script_service,
        acl_service,
        service_acl_service,
        proxy_service,
    );
    let app = controlhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "controlhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("controlhubd stopped");
    Ok(())
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
