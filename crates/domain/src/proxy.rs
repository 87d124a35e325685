//! Proxy routes: public API paths forwarded to a service's own endpoints.
//!
//! Each configured service maps HTTP verbs to a table of
//! `public path → backend path`. Paths may contain `{param}` segments which
//! match any single path segment and are carried over to the backend path.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Every public path must live under this prefix.
pub const PUBLIC_PREFIX: &str = "/api/";

const SERVICE_NAME_KEY: &str = "service_name";

/// Verbs a proxy route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Render the supported verbs as `['GET', 'POST', 'PUT', 'DELETE']`.
    #[must_use]
    pub fn supported() -> String {
        let names: Vec<String> = Self::ALL
            .iter()
            .map(|verb| format!("'{}'", verb.as_str()))
            .collect();
        format!("[{}]", names.join(", "))
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedVerb { key: s.to_string() })
    }
}

/// Extract the target service of a proxy add request.
///
/// # Errors
///
/// Returns a [`ValidationError`] when `service_name` is missing, not a string
/// or blank.
pub fn service_name(payload: &Value) -> Result<String, ValidationError> {
    match payload.get(SERVICE_NAME_KEY) {
        None | Some(Value::Null) => Err(ValidationError::ServiceNameRequired),
        Some(Value::String(name)) if name.trim().is_empty() => {
            Err(ValidationError::ServiceNameEmpty)
        }
        Some(Value::String(name)) => Ok(name.trim().to_string()),
        Some(_) => Err(ValidationError::ServiceNameType),
    }
}

/// A successful lookup of a public path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub service: String,
    pub backend_path: String,
}

/// Proxy table of one service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProxyRoutes(BTreeMap<HttpVerb, BTreeMap<String, String>>);

impl ProxyRoutes {
    /// Validate the verb tables of a proxy add request for `service`.
    ///
    /// The `service_name` key is skipped; every other key must be a verb.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] met: no verb key, a key that is
    /// not a verb, an empty verb value, a verb value that is not a mapping,
    /// a public path outside [`PUBLIC_PREFIX`], or a backend path that is not
    /// a string.
    pub fn from_payload(service: &str, payload: &Value) -> Result<Self, ValidationError> {
        let entries: Vec<(&String, &Value)> = payload
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(key, _)| key.as_str() != SERVICE_NAME_KEY)
            .collect();
        if !entries
            .iter()
            .any(|(key, _)| HttpVerb::from_str(key).is_ok())
        {
            return Err(ValidationError::NoProxyVerbs {
                service: service.to_string(),
            });
        }
        let verbs = entries
            .iter()
            .map(|(key, value)| HttpVerb::from_str(key).map(|verb| (verb, *value)))
            .collect::<Result<Vec<_>, _>>()?;
        if verbs.iter().any(|(_, value)| is_empty(value)) {
            return Err(ValidationError::EmptyVerbValue);
        }
        let mut routes = BTreeMap::new();
        for (verb, value) in verbs {
            let Value::Object(table) = value else {
                return Err(ValidationError::VerbValueType {
                    verb: verb.to_string(),
                });
            };
            let mut paths = BTreeMap::new();
            for (public, backend) in table {
                if !public.starts_with(PUBLIC_PREFIX) {
                    return Err(ValidationError::PublicPathPrefix {
                        verb: verb.to_string(),
                    });
                }
                let Value::String(backend) = backend else {
                    return Err(ValidationError::BackendPathType {
                        verb: verb.to_string(),
                    });
                };
                paths.insert(public.clone(), backend.clone());
            }
            routes.insert(verb, paths);
        }
        Ok(Self(routes))
    }

    /// Verbs with at least one route.
    pub fn verbs(&self) -> impl Iterator<Item = HttpVerb> + '_ {
        self.0.keys().copied()
    }

    /// Backend path for `verb` and a concrete public `path`.
    #[must_use]
    pub fn resolve(&self, verb: HttpVerb, path: &str) -> Option<String> {
        self.0.get(&verb)?.iter().find_map(|(public, backend)| {
            match_template(public, path).map(|params| render_template(backend, &params))
        })
    }
}

// Mirrors Python truthiness for JSON values.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn template_param(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

fn match_template<'a>(template: &'a str, path: &'a str) -> Option<HashMap<&'a str, &'a str>> {
    let expected: Vec<&str> = template.split('/').collect();
    let actual: Vec<&str> = path.split('/').collect();
    if expected.len() != actual.len() {
        return None;
    }
    let mut params = HashMap::new();
    for (expected, actual) in expected.into_iter().zip(actual) {
        match template_param(expected) {
            Some(name) if !actual.is_empty() => {
                params.insert(name, actual);
            }
            Some(_) => return None,
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

fn render_template(template: &str, params: &HashMap<&str, &str>) -> String {
    template
        .split('/')
        .map(|segment| {
            template_param(segment)
                .and_then(|name| params.get(name).copied())
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/")
}
