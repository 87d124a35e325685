//! ACL: a named access-control list of service and URL patterns.
//!
//! ACLs are referenced by name from automation scripts and copied into a
//! service's `{service}Security` category when attached to that service.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::category::{Category, CategoryItem, ItemType};
use crate::error::ValidationError;

/// A service pattern: match by name, by type, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
}

/// A URL pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclUrl {
    #[serde(rename = "URL")]
    pub url: String,
}

/// A stored access-control list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub name: String,
    pub service: Vec<AclService>,
    pub url: Vec<AclUrl>,
}

impl Acl {
    /// Validate the body of an add request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `name` is missing, not a string or
    /// blank, or when `service` or `url` is missing, not a list or holds
    /// malformed entries.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let name = match payload.get("name") {
            None | Some(Value::Null) => return Err(ValidationError::AclNameRequired),
            Some(Value::String(name)) => name.trim(),
            Some(_) => return Err(ValidationError::AclNameNotString),
        };
        if name.is_empty() {
            return Err(ValidationError::AclNameEmpty);
        }
        let service = required_list(payload, "service")?;
        let url = required_list(payload, "url")?;
        Ok(Self {
            name: name.to_string(),
            service: parse_entries("service", service)?,
            url: parse_entries("url", url)?,
        })
    }

    /// The rule body of the ACL, without its name.
    #[must_use]
    pub fn rules(&self) -> Value {
        json!({ "service": self.service, "url": self.url })
    }

    /// The `{service}Security` category that attaches this ACL to `service`.
    #[must_use]
    pub fn security_category(&self, service: &str) -> Category {
        Category::new(
            security_category_name(service),
            format!("Security category for {service} service"),
        )
        .item(
            "AuthenticatedCaller",
            CategoryItem::new(ItemType::Boolean, "Caller authorisation is needed", "false")
                .display_name("Enable caller authorisation"),
        )
        .item(
            "ACL",
            CategoryItem::new(
                ItemType::Json,
                format!("Service ACL for {service}"),
                self.rules().to_string(),
            )
            .display_name("Service ACL"),
        )
    }
}

/// Name of the category holding the security configuration of `service`.
#[must_use]
pub fn security_category_name(service: &str) -> String {
    format!("{service}Security")
}

/// Validated body of an ACL update request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AclUpdate {
    pub service: Option<Vec<AclService>>,
    pub url: Option<Vec<AclUrl>>,
}

impl AclUpdate {
    /// Validate the body of an update request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AclNothingToUpdate`] when neither `service`
    /// nor `url` is present, or the relevant list error otherwise.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let service = payload.get("service").filter(|value| !value.is_null());
        let url = payload.get("url").filter(|value| !value.is_null());
        if service.is_none() && url.is_none() {
            return Err(ValidationError::AclNothingToUpdate);
        }
        let service = service
            .map(|value| list("service", value).and_then(|items| parse_entries("service", items)))
            .transpose()?;
        let url = url
            .map(|value| list("url", value).and_then(|items| parse_entries("url", items)))
            .transpose()?;
        Ok(Self { service, url })
    }

    /// Apply the supplied fields onto `acl`.
    pub fn apply(self, acl: &mut Acl) {
        if let Some(service) = self.service {
            acl.service = service;
        }
        if let Some(url) = self.url {
            acl.url = url;
        }
    }
}

/// Extract the ACL name of a service attach request.
///
/// # Errors
///
/// Returns a [`ValidationError`] when `acl_name` is missing, not a string or
/// blank.
pub fn attach_acl_name(payload: &Value) -> Result<String, ValidationError> {
    match payload.get("acl_name") {
        None | Some(Value::Null) => Err(ValidationError::AclNameMissing),
        Some(Value::String(name)) if name.trim().is_empty() => Err(ValidationError::EmptyAclName),
        Some(Value::String(name)) => Ok(name.trim().to_string()),
        Some(_) => Err(ValidationError::AclType),
    }
}

fn required_list<'a>(
    payload: &'a Value,
    field: &'static str,
) -> Result<&'a [Value], ValidationError> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(ValidationError::AclFieldRequired { field }),
        Some(value) => list(field, value),
    }
}

fn list<'a>(field: &'static str, value: &'a Value) -> Result<&'a [Value], ValidationError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ValidationError::AclFieldNotList { field })
}

fn parse_entries<T: DeserializeOwned>(
    field: &'static str,
    items: &[Value],
) -> Result<Vec<T>, ValidationError> {
    items
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|err| ValidationError::AclEntryMalformed {
                field,
                reason: err.to_string(),
            })
        })
        .collect()
}
