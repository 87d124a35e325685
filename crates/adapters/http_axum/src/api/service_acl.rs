//! JSON REST handlers attaching ACLs to services.

use axum::extract::{Path, State};

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};

use super::Message;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::state::AppState;

/// `PUT /api/service/{name}/ACL`: attach the ACL named by `acl_name`.
pub async fn attach<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(service): Path<String>,
    payload: Payload,
) -> Result<Message, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let acl = state
        .service_acl_service
        .attach_acl(&service, &payload.or_null())
        .await?;
    Ok(Message(format!("{acl} ACL attached to {service} service successfully")))
}

/// `DELETE /api/service/{name}/ACL`: detach the ACL of a service.
pub async fn detach<AR, SR, CM, SC, REG>(
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
    state.service_acl_service.detach_acl(&service).await?;
    Ok(Message(format!("ACL detached from {service} service successfully")))
}
