//! JSON REST handlers for ACLs.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};
use controlhub_domain::acl::{Acl, AclUpdate};

use super::Message;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Vec<Acl>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(acls) => Json(json!({ "acls": acls })).into_response(),
        }
    }
}

/// Possible responses from the get and create endpoints.
pub enum AclResponse {
    Ok(Json<Acl>),
}

impl IntoResponse for AclResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/ACL`: list all ACLs.
pub async fn list<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
) -> Result<ListResponse, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let acls = state.acl_service.list_acls().await?;
    Ok(ListResponse::Ok(acls))
}

/// `GET /api/ACL/{name}`: get ACL by name.
pub async fn get<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(name): Path<String>,
) -> Result<AclResponse, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let acl = state.acl_service.get_acl(&name).await?;
    Ok(AclResponse::Ok(Json(acl)))
}

/// `POST /api/ACL`: add an ACL.
pub async fn create<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    payload: Payload,
) -> Result<AclResponse, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let acl = Acl::from_payload(&payload.or_null())?;
    let created = state.acl_service.create_acl(acl).await?;
    Ok(AclResponse::Ok(Json(created)))
}

/// `PUT /api/ACL/{name}`: replace the service and/or url rules of an ACL.
pub async fn update<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(name): Path<String>,
    payload: Payload,
) -> Result<Message, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let update = AclUpdate::from_payload(&payload.or_null())?;
    state.acl_service.update_acl(&name, update).await?;
    Ok(Message(format!("Record updated successfully for {name} ACL")))
}

/// `DELETE /api/ACL/{name}`: delete an ACL no script refers to.
pub async fn delete<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(name): Path<String>,
) -> Result<Message, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    state.acl_service.delete_acl(&name).await?;
    Ok(Message(format!("{name} ACL deleted successfully")))
}
