use serde::{Deserialize, Serialize};

use super::expression::Expression;
use super::table::{CommonTableExpression, DerivedTable, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
}

/// What a join reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinTarget {
    Table(Table),
    Derived(DerivedTable),
    Cte(CommonTableExpression),
}

impl From<Table> for JoinTarget {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<DerivedTable> for JoinTarget {
    fn from(derived: DerivedTable) -> Self {
        Self::Derived(derived)
    }
}

impl From<CommonTableExpression> for JoinTarget {
    fn from(cte: CommonTableExpression) -> Self {
        Self::Cte(cte)
    }
}

/// A join clause.
///
/// The `on` expression compares two columns: its text value names the column
/// on the other side, as in `Expression::new("m.id", "v.id")`. Extra
/// expressions are ordinary predicates and always combine with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub target: JoinTarget,
    pub on: Expression,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expressions: Vec<Expression>,
    #[serde(default)]
    pub join_type: JoinType,
}

impl Join {
    pub fn new(target: impl Into<JoinTarget>, on: Expression, join_type: JoinType) -> Self {
        Self {
            target: target.into(),
            on,
            expressions: Vec::new(),
            join_type,
        }
    }

    pub fn inner(target: impl Into<JoinTarget>, on: Expression) -> Self {
        Self::new(target, on, JoinType::Inner)
    }

    pub fn left(target: impl Into<JoinTarget>, on: Expression) -> Self {
        Self::new(target, on, JoinType::Left)
    }

    pub fn with_join_expression(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }
}
