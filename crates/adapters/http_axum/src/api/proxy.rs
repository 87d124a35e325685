//! JSON REST handlers for proxy routes.

use axum::Json;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};

use controlhub_domain::proxy::{HttpVerb, ResolvedRoute};

use super::Message;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::state::AppState;

/// `POST /api/proxy`: register the proxy routes of a service.
pub async fn create<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    payload: Payload,
) -> Result<Message, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let service = state.proxy_service.add_proxy(&payload.or_null()).await?;
    Ok(Message(format!("Proxy has been configured for {service} service.")))
}

/// `DELETE /api/proxy/{name}`: drop the proxy routes of a service.
pub async fn delete<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(service): Path<String>,
) -> Result<Message, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    state.proxy_service.delete_proxy(&service).await?;
    Ok(Message(format!("Proxy operations have been stopped for {service} service.")))
}

/// Possible responses from the proxy lookup fallback.
pub enum LookupResponse {
    /// A proxy owns the route; traffic is not forwarded.
    Proxied(ResolvedRoute),
    NotFound { verb: String, path: String },
}

impl IntoResponse for LookupResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Proxied(route) => (
                StatusCode::NOT_IMPLEMENTED,
                Json(json!({
                    "message": format!("Forwarding to {} service is not available.", route.service),
                    "service": route.service,
                    "backend_path": route.backend_path,
                })),
            )
                .into_response(),
            Self::NotFound { verb, path } => (
                StatusCode::NOT_FOUND,
                Message(format!("No route found for {verb} {path}")),
            )
                .into_response(),
        }
    }
}

/// Fallback for unmatched `/api` paths: look the request up in the proxy
/// routes.
pub async fn lookup<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> LookupResponse
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let path = uri.path();
    let resolved = match method.as_str().parse::<HttpVerb>() {
        Ok(verb) => state.proxy_service.resolve(verb, path).await,
        Err(_) => None,
    };
    match resolved {
        Some(route) => {
            tracing::debug!(
                service = %route.service,
                backend_path = %route.backend_path,
                "proxied route matched"
            );
            LookupResponse::Proxied(route)
        }
        None => LookupResponse::NotFound {
            verb: method.to_string(),
            path: path.to_string(),
        },
    }
}
