//! The predicate-builder protocol
//!
//! The filter combinator only ever talks to a [`PredicateBuilder`]: append a
//! predicate, append a raw fragment, or append a subgroup, each with a
//! [`LogicalRelation`] saying how it joins what came before. The
//! [`ConditionBuilder`] implementation folds those calls into a single SQL
//! AST condition.

use crate::ast::{count_raw_markers, BinaryOperator, Expr, ParamValue, SelectStmt};
use crate::error::{FacadeError, FacadeResult};
use crate::model::{LogicalRelation, Relation, Value};

/// Which side of a LIKE pattern the search text is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeKind {
    StartsWith,
    EndsWith,
    Contains,
}

impl LikeKind {
    /// Build the LIKE pattern, escaping wildcards in `text`
    pub fn pattern(self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len() + 2);
        for c in text.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        match self {
            Self::StartsWith => format!("{}%", escaped),
            Self::EndsWith => format!("%{}", escaped),
            Self::Contains => format!("%{}%", escaped),
        }
    }
}

/// One predicate form the builder understands
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: String,
        op: BinaryOperator,
        value: ParamValue,
    },
    /// Column-to-column comparison, used by join conditions
    CompareColumns {
        left: String,
        op: BinaryOperator,
        right: String,
    },
    In {
        column: String,
        values: Vec<ParamValue>,
    },
    InQuery {
        column: String,
        query: SelectStmt,
    },
    Null {
        column: String,
    },
    True {
        column: String,
    },
    Like {
        column: String,
        kind: LikeKind,
        text: String,
    },
    Exists {
        query: SelectStmt,
    },
}

impl Predicate {
    pub fn into_expr(self) -> Expr {
        match self {
            Self::Compare { column, op, value } => {
                Expr::binary(Expr::column_path(&column), op, Expr::Bound(value))
            }
            Self::CompareColumns { left, op, right } => {
                Expr::binary(Expr::column_path(&left), op, Expr::column_path(&right))
            }
            Self::In { column, values } => Expr::in_list(
                Expr::column_path(&column),
                values.into_iter().map(Expr::Bound).collect(),
            ),
            Self::InQuery { column, query } => {
                Expr::in_subquery(Expr::column_path(&column), query)
            }
            Self::Null { column } => Expr::is_null(Expr::column_path(&column)),
            Self::True { column } => Expr::column_path(&column).eq(Expr::bool(true)),
            Self::Like { column, kind, text } => {
                Expr::like(Expr::column_path(&column), Expr::bound(kind.pattern(&text)))
            }
            Self::Exists { query } => Expr::exists(query),
        }
    }
}

/// Comparison operator for an ordered or equality relation
pub fn comparison_operator(relation: Relation) -> Option<BinaryOperator> {
    match relation {
        Relation::EqualTo => Some(BinaryOperator::Eq),
        Relation::GreaterThan => Some(BinaryOperator::Gt),
        Relation::GreaterThanOrEqualTo => Some(BinaryOperator::GtEq),
        Relation::LessThan => Some(BinaryOperator::Lt),
        Relation::LessThanOrEqualTo => Some(BinaryOperator::LtEq),
        Relation::In
        | Relation::NullValue
        | Relation::TrueValue
        | Relation::Exists
        | Relation::StartsWith
        | Relation::EndsWith
        | Relation::Contains => None,
    }
}

/// Convert a model value in scalar position to a bound parameter
pub fn to_param(value: &Value) -> FacadeResult<ParamValue> {
    match value {
        Value::Null => Ok(ParamValue::Null),
        Value::Bool(b) => Ok(ParamValue::Bool(*b)),
        Value::Integer(n) => Ok(ParamValue::Integer(*n)),
        Value::Float(f) => Ok(ParamValue::Float(*f)),
        Value::Text(s) => Ok(ParamValue::String(s.clone())),
        Value::List(_) => Err(FacadeError::validation(
            "a list value is only valid with the In relation or as raw bindings",
        )),
        Value::Query(_) => Err(FacadeError::validation(
            "a nested select is only valid with the In or Exists relation",
        )),
    }
}

/// The sequential protocol the filter combinator drives.
///
/// Every call carries the effective logical relation: the And family joins
/// with `and`, the Or family with `or`, and the negated variants wrap the
/// appended item in `not(...)`.
pub trait PredicateBuilder: Sized {
    /// A fresh, empty builder for a parenthesized subgroup
    fn group(&self) -> Self;

    fn append(&mut self, relation: LogicalRelation, predicate: Predicate) -> FacadeResult<()>;

    /// Append a verbatim SQL fragment whose `?` markers take `bindings`
    fn append_raw(
        &mut self,
        relation: LogicalRelation,
        sql: &str,
        bindings: Vec<ParamValue>,
    ) -> FacadeResult<()>;

    fn append_group(&mut self, relation: LogicalRelation, group: Self);
}

/// Folds predicate-builder calls into one condition, left to right
#[derive(Debug, Default)]
pub struct ConditionBuilder {
    condition: Option<Expr>,
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.condition.is_none()
    }

    pub fn into_expr(self) -> Option<Expr> {
        self.condition
    }

    fn push(&mut self, relation: LogicalRelation, expr: Expr) {
        let expr = if relation.is_negated() {
            Expr::not(expr)
        } else {
            expr
        };
        self.condition = Some(match self.condition.take() {
            None => expr,
            Some(acc) if relation.is_or() => acc.or(expr),
            Some(acc) => acc.and(expr),
        });
    }
}

impl PredicateBuilder for ConditionBuilder {
    fn group(&self) -> Self {
        Self::new()
    }

    fn append(&mut self, relation: LogicalRelation, predicate: Predicate) -> FacadeResult<()> {
        self.push(relation, predicate.into_expr());
        Ok(())
    }

    fn append_raw(
        &mut self,
        relation: LogicalRelation,
        sql: &str,
        bindings: Vec<ParamValue>,
    ) -> FacadeResult<()> {
        if relation.is_negated() {
            return Err(FacadeError::validation(format!(
                "raw expression '{}' cannot be combined with {:?}",
                sql, relation
            )));
        }
        let markers = count_raw_markers(sql);
        if !bindings.is_empty() && markers != bindings.len() {
            return Err(FacadeError::validation(format!(
                "raw expression '{}' has {} binding markers but {} bindings",
                sql,
                markers,
                bindings.len()
            )));
        }
        self.push(
            relation,
            Expr::Raw {
                sql: sql.to_string(),
                bindings,
            },
        );
        Ok(())
    }

    fn append_group(&mut self, relation: LogicalRelation, group: Self) {
        // an empty group contributes nothing
        if let Some(inner) = group.condition {
            self.push(relation, inner.nested());
        }
    }
}
