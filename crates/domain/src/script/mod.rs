//! Automation script: a named, ordered sequence of control steps that can be
//! scheduled as a task.
//!
//! Scripts optionally reference an ACL by name. An empty ACL name is kept as
//! is and means "no ACL attached"; an omitted one is simply absent.

mod placeholder;
mod step;

pub use placeholder::{Parameters, placeholders};
pub use step::{Step, StepEntry, StepKind, Steps};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::{Category, CategoryItem, ItemType};
use crate::error::ValidationError;

/// A stored automation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    pub steps: Steps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
}

impl Script {
    /// Validate the body of an add request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `name` is missing, not a string or
    /// blank, when `steps` is missing or invalid, or when `acl` is not a
    /// string.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let name = match payload.get("name") {
            None | Some(Value::Null) => return Err(ValidationError::ScriptNameRequired),
            Some(Value::String(name)) => name.trim(),
            Some(_) => return Err(ValidationError::ScriptNameType),
        };
        if name.is_empty() {
            return Err(ValidationError::ScriptNameEmpty);
        }
        let steps = match payload.get("steps") {
            None | Some(Value::Null) => return Err(ValidationError::StepsRequired),
            Some(steps @ Value::Array(_)) => steps,
            Some(_) => return Err(ValidationError::StepsNotList),
        };
        let acl = parse_acl(payload.get("acl"), ValidationError::AclNameType)?;
        Ok(Self {
            name: name.to_string(),
            steps: Steps::parse(steps)?,
            acl,
        })
    }

    /// The referenced ACL, ignoring the empty "no ACL" marker.
    #[must_use]
    pub fn acl_name(&self) -> Option<&str> {
        self.acl.as_deref().filter(|name| !name.is_empty())
    }

    /// Configuration category for a scheduled run, holding the bound write
    /// steps and the parameters they were bound with.
    #[must_use]
    pub fn run_category(&self, bound: &Steps, parameters: Option<&Parameters>) -> Category {
        let write: Vec<Value> = bound
            .write_steps()
            .map(|step| Value::from_iter([(step.kind.as_str(), step.to_value())]))
            .collect();
        let parameters = parameters
            .and_then(|p| serde_json::to_value(p).ok())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        Category::new(
            self.name.clone(),
            format!("{} automation script", self.name),
        )
        .item(
            "write",
            CategoryItem::new(
                ItemType::Json,
                format!("Write steps of {} script", self.name),
                Value::Array(write).to_string(),
            )
            .display_name("Write steps"),
        )
        .item(
            "parameters",
            CategoryItem::new(
                ItemType::Json,
                format!("Parameters bound into {} script", self.name),
                parameters.to_string(),
            )
            .display_name("Parameters"),
        )
    }
}

/// Validated body of an update request. Only supplied fields change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptUpdate {
    pub steps: Option<Steps>,
    pub acl: Option<String>,
}

impl ScriptUpdate {
    /// Validate the body of an update request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NothingToUpdate`] when neither `steps` nor
    /// `acl` is present, or the relevant error when either is malformed.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let steps = payload.get("steps").filter(|value| !value.is_null());
        let acl = payload.get("acl").filter(|value| !value.is_null());
        if steps.is_none() && acl.is_none() {
            return Err(ValidationError::NothingToUpdate);
        }
        if steps.is_some_and(|steps| !steps.is_array()) {
            return Err(ValidationError::StepsNotList);
        }
        let acl = parse_acl(acl, ValidationError::AclType)?;
        Ok(Self {
            steps: steps.map(Steps::parse).transpose()?,
            acl,
        })
    }

    /// The referenced ACL, ignoring the empty "no ACL" marker.
    #[must_use]
    pub fn acl_name(&self) -> Option<&str> {
        self.acl.as_deref().filter(|name| !name.is_empty())
    }
}

fn parse_acl(
    value: Option<&Value>,
    type_error: ValidationError,
) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => Ok(Some(name.trim().to_string())),
        Some(_) => Err(type_error),
    }
}
