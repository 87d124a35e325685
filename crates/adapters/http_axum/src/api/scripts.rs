//! JSON REST handlers for automation scripts.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};
use controlhub_domain::script::{Parameters, Script, ScriptUpdate};

use super::Message;
use crate::error::ApiError;
use crate::extract::Payload;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Vec<Script>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(scripts) => Json(json!({ "scripts": scripts })).into_response(),
        }
    }
}

/// Possible responses from the get and create endpoints.
pub enum ScriptResponse {
    Ok(Json<Script>),
}

impl IntoResponse for ScriptResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/control/script`: list all scripts.
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
    let scripts = state.script_service.list_scripts().await?;
    Ok(ListResponse::Ok(scripts))
}

/// `GET /api/control/script/{name}`: get script by name.
pub async fn get<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(name): Path<String>,
) -> Result<ScriptResponse, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let script = state.script_service.get_script(&name).await?;
    Ok(ScriptResponse::Ok(Json(script)))
}

/// `POST /api/control/script`: add a script.
pub async fn create<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    payload: Payload,
) -> Result<ScriptResponse, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let script = Script::from_payload(&payload.or_null())?;
    let created = state.script_service.create_script(script).await?;
    Ok(ScriptResponse::Ok(Json(created)))
}

/// `PUT /api/control/script/{name}`: update the steps and/or ACL of a script.
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
    let update = ScriptUpdate::from_payload(&payload.or_null())?;
    state.script_service.update_script(&name, update).await?;
    Ok(Message(format!("Control script {name} updated successfully.")))
}

/// `DELETE /api/control/script/{name}`: delete a script.
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
    state.script_service.delete_script(&name).await?;
    Ok(Message(format!("{name} script deleted successfully.")))
}

/// `POST /api/control/script/{name}/schedule`: schedule a script, optionally
/// binding `parameters` into its write steps.
pub async fn schedule<AR, SR, CM, SC, REG>(
    State(state): State<AppState<AR, SR, CM, SC, REG>>,
    Path(name): Path<String>,
    Payload(payload): Payload,
) -> Result<Message, ApiError>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    let parameters = Parameters::from_payload(payload.as_ref())?;
    state
        .script_service
        .schedule_script(&name, parameters)
        .await?;
    Ok(Message(format!(
        "Schedule and configuration is created for an automation script with name {name}"
    )))
}
