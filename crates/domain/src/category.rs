//! Category: a named bag of typed configuration items.
//!
//! Categories nest: a parent lists its children by name. Scheduled scripts
//! register their run configuration under [`DISPATCHER_CATEGORY`]; a service's
//! security configuration lives under the service's own category.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Parent category of every scheduled automation script.
pub const DISPATCHER_CATEGORY: &str = "dispatcher";

/// Value type of a configuration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "JSON")]
    Json,
}

impl ItemType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Json => "JSON",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single configuration item. `value` starts out equal to `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub default: String,
    pub value: String,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

impl CategoryItem {
    #[must_use]
    pub fn new(
        item_type: ItemType,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        let default = default.into();
        Self {
            description: description.into(),
            item_type,
            value: default.clone(),
            default,
            display_name: None,
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// A named configuration category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
    pub items: BTreeMap<String, CategoryItem>,
}

impl Category {
    /// Create an empty category.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            items: BTreeMap::new(),
        }
    }

    /// Add or replace the item stored under `key`.
    #[must_use]
    pub fn item(mut self, key: impl Into<String>, item: CategoryItem) -> Self {
        self.items.insert(key.into(), item);
        self
    }
}
