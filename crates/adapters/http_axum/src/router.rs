//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` next to a `/health` probe.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<AR, SR, CM, SC, REG>(state: AppState<AR, SR, CM, SC, REG>) -> Router
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
