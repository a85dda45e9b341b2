use serde::{Deserialize, Serialize};

use super::expression::{Expression, LogicalRelation};
use crate::error::FacadeResult;

/// A node of a boolean filter tree.
///
/// Expressions combine with each other through their own logical relation.
/// Child filters after the first combine through this filter's
/// `logical_relation`, whatever relation the children carry themselves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expressions: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub logical_relation: LogicalRelation,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Append a raw SQL fragment combined with AND
    pub fn with_raw_expression(self, sql: impl Into<String>) -> Self {
        self.with_expression(Expression::raw(sql))
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_logical_relation(mut self, logical_relation: LogicalRelation) -> Self {
        self.logical_relation = logical_relation;
        self
    }

    /// Append an expression that still has to pass a shape check,
    /// such as [`Expression::with_raw`].
    pub fn try_with_expression(self, expression: FacadeResult<Expression>) -> FacadeResult<Self> {
        Ok(self.with_expression(expression?))
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty() && self.filters.is_empty()
    }
}
