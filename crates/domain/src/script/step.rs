//! Step: one control action of an automation script.
//!
//! A script's `steps` is a list of entries; each entry maps one or more step
//! kinds to a step body. Every body carries an integer `order`, unique across
//! the whole list. Keys other than `order` are kept verbatim in
//! [`Step::params`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ValidationError;

const ORDER_KEY: &str = "order";

/// The closed set of step kinds a script may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    /// Change a configuration item.
    Configure,
    /// Wait before the next step.
    Delay,
    /// Invoke an operation on a service.
    Operation,
    /// Run another automation script.
    Script,
    /// Write values to a service.
    Write,
}

impl StepKind {
    /// Every kind, sorted by name.
    pub const ALL: [Self; 5] = [
        Self::Configure,
        Self::Delay,
        Self::Operation,
        Self::Script,
        Self::Write,
    ];

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Delay => "delay",
            Self::Operation => "operation",
            Self::Script => "script",
            Self::Write => "write",
        }
    }

    /// Render the supported kinds as `['configure', 'delay', …]`.
    #[must_use]
    pub fn supported() -> String {
        let names: Vec<String> = Self::ALL
            .iter()
            .map(|kind| format!("'{}'", kind.as_str()))
            .collect();
        format!("[{}]", names.join(", "))
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedStepKind { key: s.to_string() })
    }
}

/// A single validated step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    pub order: i64,
    /// Every key of the step body except `order`.
    pub params: Map<String, Value>,
}

impl Step {
    fn parse(kind: StepKind, body: &Value) -> Result<Self, ValidationError> {
        let Value::Object(body) = body else {
            return Err(ValidationError::MalformedStepValue { kind });
        };
        let order = body
            .get(ORDER_KEY)
            .ok_or(ValidationError::MissingOrderKey { kind })?;
        let order = match order.as_i64() {
            Some(order) => order,
            None => match order.as_u64() {
                Some(order) => return Err(ValidationError::OrderOutOfRange { order, kind }),
                None => return Err(ValidationError::InvalidOrderType { kind }),
            },
        };
        let params = body
            .iter()
            .filter(|(key, _)| key.as_str() != ORDER_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Self {
            kind,
            order,
            params,
        })
    }

    /// The `values` mapping of a write step.
    #[must_use]
    pub fn write_values(&self) -> Option<&Map<String, Value>> {
        match self.kind {
            StepKind::Write => self.params.get("values").and_then(Value::as_object),
            StepKind::Configure | StepKind::Delay | StepKind::Operation | StepKind::Script => None,
        }
    }

    /// Target service of a write step.
    #[must_use]
    pub fn write_service(&self) -> Option<&str> {
        match self.kind {
            StepKind::Write => self.params.get("service").and_then(Value::as_str),
            StepKind::Configure | StepKind::Delay | StepKind::Operation | StepKind::Script => None,
        }
    }

    /// The logical JSON body of the step, `order` first.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut body = Map::with_capacity(self.params.len() + 1);
        body.insert(ORDER_KEY.to_string(), Value::from(self.order));
        body.extend(self.params.clone());
        Value::Object(body)
    }
}

/// One element of the step list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepEntry(Vec<Step>);

impl StepEntry {
    /// Steps of this entry, in key order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.0.iter()
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|step| (step.kind.as_str().to_string(), step.to_value()))
                .collect(),
        )
    }
}

/// The validated, ordered step list of a script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Steps(Vec<StepEntry>);

impl Steps {
    /// Validate a raw `steps` value.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] met while walking the list in
    /// order: a non-list value, a non-mapping entry, an unknown kind, a
    /// malformed body, a missing or non-integer `order`, or an `order`
    /// already used by an earlier step of any kind.
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        let Value::Array(items) = value else {
            return Err(ValidationError::StepsNotList);
        };
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let Value::Object(item) = item else {
                return Err(ValidationError::InvalidStepsType);
            };
            let mut steps = Vec::with_capacity(item.len());
            for (key, body) in item {
                let kind = StepKind::from_str(key)?;
                let step = Step::parse(kind, body)?;
                if !seen.insert(step.order) {
                    return Err(ValidationError::DuplicateOrder {
                        order: step.order,
                        kind,
                    });
                }
                steps.push(step);
            }
            entries.push(StepEntry(steps));
        }
        Ok(Self(entries))
    }

    /// Number of entries in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every step, flattened in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.0.iter().flat_map(StepEntry::steps)
    }

    /// Only the `write` steps, in list order.
    pub fn write_steps(&self) -> impl Iterator<Item = &Step> {
        self.iter().filter(|step| step.kind == StepKind::Write)
    }

    /// Apply `f` to every step, keeping the list structure.
    #[must_use]
    pub fn map_steps(&self, mut f: impl FnMut(&Step) -> Step) -> Self {
        Self(
            self.0
                .iter()
                .map(|entry| StepEntry(entry.0.iter().map(&mut f).collect()))
                .collect(),
        )
    }

    /// The logical JSON form of the list.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(StepEntry::to_value).collect())
    }
}

impl Serialize for Steps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Steps {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
