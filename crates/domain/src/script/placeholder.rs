//! Placeholders: `$name$` tokens inside write-step values, bound to
//! caller-supplied parameters when a script is scheduled.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::{Map, Value};

use super::step::{Step, StepKind, Steps};
use crate::error::{ControlHubError, NotFoundError, ValidationError};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)\$").expect("placeholder pattern is valid"));

/// Iterate the placeholder identifiers of `text`, left to right.
pub fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Caller-supplied parameter bindings for a scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// Extract `parameters` from an optional request body.
    ///
    /// A missing or `null` body means the run has no bindings.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the body lacks `parameters`, or when
    /// it is not a mapping or is empty.
    pub fn from_payload(payload: Option<&Value>) -> Result<Option<Self>, ValidationError> {
        let Some(payload) = payload.filter(|value| !value.is_null()) else {
            return Ok(None);
        };
        match payload.get("parameters") {
            None | Some(Value::Null) => Err(ValidationError::ParametersRequired),
            Some(Value::Object(map)) if map.is_empty() => Err(ValidationError::ParametersEmpty),
            Some(Value::Object(map)) => Ok(Some(Self(map.clone()))),
            Some(_) => Err(ValidationError::ParametersNotMapping),
        }
    }

    /// Parameter names in the order they were supplied.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether a parameter named `name` was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Text substituted for `name`: strings verbatim, other values as JSON.
    #[must_use]
    pub fn render(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

impl Steps {
    /// Placeholders of every write step: list order, then key order of
    /// `values`, then left to right inside each string.
    pub fn write_placeholders(&self) -> impl Iterator<Item = &str> {
        self.write_steps()
            .filter_map(Step::write_values)
            .flat_map(Map::values)
            .filter_map(Value::as_str)
            .flat_map(placeholders)
    }

    /// Bind `parameters` into the write steps of `script`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::WriteStepsMissing`] when there is no write step
    /// - [`NotFoundError::Placeholder`] for the first placeholder without a
    ///   parameter
    /// - [`NotFoundError::Parameter`] for the first parameter no placeholder
    ///   references
    pub fn bind_parameters(
        &self,
        script: &str,
        parameters: &Parameters,
    ) -> Result<Self, ControlHubError> {
        if self.write_steps().next().is_none() {
            return Err(ValidationError::WriteStepsMissing {
                script: script.to_string(),
            }
            .into());
        }
        if let Some(name) = self
            .write_placeholders()
            .find(|name| !parameters.contains(name))
        {
            return Err(NotFoundError::Placeholder {
                name: name.to_string(),
                script: script.to_string(),
            }
            .into());
        }
        if let Some(name) = parameters
            .names()
            .find(|name| !self.write_placeholders().any(|found| found == *name))
        {
            return Err(NotFoundError::Parameter {
                name: name.to_string(),
                script: script.to_string(),
            }
            .into());
        }
        Ok(self.map_steps(|step| bind_step(step, parameters)))
    }
}

fn bind_step(step: &Step, parameters: &Parameters) -> Step {
    let mut bound = step.clone();
    if step.kind != StepKind::Write {
        return bound;
    }
    if let Some(Value::Object(values)) = bound.params.get_mut("values") {
        for value in values.values_mut() {
            if let Value::String(text) = value {
                *text = PLACEHOLDER
                    .replace_all(text, |caps: &Captures<'_>| {
                        parameters
                            .render(&caps[1])
                            .unwrap_or_else(|| caps[0].to_string())
                    })
                    .into_owned();
            }
        }
    }
    bound
}
