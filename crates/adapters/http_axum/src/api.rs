//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod acl;
#[allow(clippy::missing_errors_doc)]
pub mod proxy;
#[allow(clippy::missing_errors_doc)]
pub mod scripts;
#[allow(clippy::missing_errors_doc)]
pub mod service_acl;

use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use serde_json::json;

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};

use crate::state::AppState;

/// A `{"message": ...}` success body.
pub struct Message(pub String);

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        Json(json!({ "message": self.0 })).into_response()
    }
}

/// Build the `/api` sub-router.
pub fn routes<AR, SR, CM, SC, REG>() -> Router<AppState<AR, SR, CM, SC, REG>>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    Router::new()
        // Automation scripts
        .route(
            "/control/script",
            get(scripts::list::<AR, SR, CM, SC, REG>).post(scripts::create::<AR, SR, CM, SC, REG>),
        )
        .route(
            "/control/script/{name}",
            get(scripts::get::<AR, SR, CM, SC, REG>)
                .put(scripts::update::<AR, SR, CM, SC, REG>)
                .delete(scripts::delete::<AR, SR, CM, SC, REG>),
        )
        .route(
            "/control/script/{name}/schedule",
            post(scripts::schedule::<AR, SR, CM, SC, REG>),
        )
        // ACLs
        .route(
            "/ACL",
            get(acl::list::<AR, SR, CM, SC, REG>).post(acl::create::<AR, SR, CM, SC, REG>),
        )
        .route(
            "/ACL/{name}",
            get(acl::get::<AR, SR, CM, SC, REG>)
                .put(acl::update::<AR, SR, CM, SC, REG>)
                .delete(acl::delete::<AR, SR, CM, SC, REG>),
        )
        // Service ACL attachment
        .route(
            "/service/{name}/ACL",
            put(service_acl::attach::<AR, SR, CM, SC, REG>)
                .delete(service_acl::detach::<AR, SR, CM, SC, REG>),
        )
        // Proxy
        .route("/proxy", post(proxy::create::<AR, SR, CM, SC, REG>))
        .route(
            "/proxy/{name}",
            axum::routing::delete(proxy::delete::<AR, SR, CM, SC, REG>),
        )
        .fallback(proxy::lookup::<AR, SR, CM, SC, REG>)
}
