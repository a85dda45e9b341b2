//! Projected fields, column assignments, grouping and sorting

use serde::{Deserialize, Serialize};

use super::expression::Value;
use super::table::is_false;

/// A projected output column.
///
/// When `raw` is set the name is an arbitrary SQL expression such as
/// `count(color)` rather than a column identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub raw: bool,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            raw: false,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(name).with_alias(alias)
    }

    /// A verbatim SQL expression projected under `alias`
    pub fn raw(sql: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::aliased(sql, alias).with_raw()
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// The column name this field produces in a result set
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A column assignment used by insert and update statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBy {
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub raw: bool,
}

impl GroupBy {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: false,
        }
    }

    pub fn raw(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            raw: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub name: String,
    #[serde(default = "ascending_default")]
    pub ascending: bool,
}

impl Sort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ascending: true,
        }
    }

    pub fn descending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ascending: false,
        }
    }

    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }
}

fn ascending_default() -> bool {
    true
}
