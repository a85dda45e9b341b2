//! Leaf predicates and the values they compare against

use serde::{Deserialize, Serialize};

use super::statement::SqlSelect;
use super::table::is_false;
use crate::error::{FacadeError, FacadeResult};

/// Comparison performed by an [`Expression`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Relation {
    #[default]
    EqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    In,
    NullValue,
    TrueValue,
    Exists,
    StartsWith,
    EndsWith,
    Contains,
}

/// How a predicate or subgroup combines with what precedes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalRelation {
    #[default]
    And,
    Or,
    AndNot,
    OrNot,
}

impl LogicalRelation {
    pub fn is_negated(self) -> bool {
        matches!(self, Self::AndNot | Self::OrNot)
    }

    pub fn is_or(self) -> bool {
        matches!(self, Self::Or | Self::OrNot)
    }

    /// The AND-family relation with the same negation
    pub fn to_and(self) -> Self {
        match self {
            Self::And | Self::Or => Self::And,
            Self::AndNot | Self::OrNot => Self::AndNot,
        }
    }
}

/// A value bound into a predicate or column assignment.
///
/// Encoded untagged so documents carry plain JSON scalars and arrays; a nested
/// select (for `Exists` and `In` subqueries) is encoded as an object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Query(Box<SqlSelect>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&SqlSelect> {
        match self {
            Self::Query(select) => Some(select),
            _ => None,
        }
    }

    pub fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::list(values)
    }
}

impl From<SqlSelect> for Value {
    fn from(select: SqlSelect) -> Self {
        Self::Query(Box::new(select))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// A leaf predicate: `name <relation> value`.
///
/// The value's shape has to match the relation: `In` takes a list (or a
/// nested select), `Exists` takes a nested select, `NullValue` and
/// `TrueValue` ignore it. A raw expression is a verbatim SQL fragment whose
/// `?` markers are filled from the list in `value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default)]
    pub relation: Relation,
    #[serde(default)]
    pub logical_relation: LogicalRelation,
    #[serde(default, skip_serializing_if = "is_false")]
    pub raw: bool,
}

impl Expression {
    /// An equality predicate
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// A raw SQL fragment with no bindings
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            name: sql.into(),
            value: Value::List(Vec::new()),
            raw: true,
            ..Default::default()
        }
    }

    /// A raw SQL fragment whose `?` markers bind `bindings` in order
    pub fn raw_with_bindings(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            name: sql.into(),
            value: Value::List(bindings),
            raw: true,
            ..Default::default()
        }
    }

    /// `exists (select ...)`
    pub fn exists(select: SqlSelect) -> Self {
        Self {
            value: Value::Query(Box::new(select)),
            relation: Relation::Exists,
            ..Default::default()
        }
    }

    /// `name in (select ...)`
    pub fn in_query(name: impl Into<String>, select: SqlSelect) -> Self {
        Self {
            name: name.into(),
            value: Value::Query(Box::new(select)),
            relation: Relation::In,
            ..Default::default()
        }
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn with_logical_relation(mut self, logical_relation: LogicalRelation) -> Self {
        self.logical_relation = logical_relation;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Mark this expression as raw SQL.
    ///
    /// An absent value becomes an empty binding list; any other non-list value
    /// is rejected.
    pub fn with_raw(mut self) -> FacadeResult<Self> {
        if self.value.is_null() {
            self.value = Value::List(Vec::new());
        } else if self.value.as_list().is_none() {
            return Err(FacadeError::validation(format!(
                "raw expression '{}' needs a list of bindings as its value",
                self.name
            )));
        }
        self.raw = true;
        Ok(self)
    }

    /// Bindings of a raw expression
    pub fn bindings(&self) -> &[Value] {
        self.value.as_list().unwrap_or(&[])
    }
}
