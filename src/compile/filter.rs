//! Filter tree to predicate-builder calls
//!
//! A [`Filter`] is a boolean tree; a [`PredicateBuilder`] is a flat, ordered
//! protocol. The translation walks a filter's expressions first and its
//! child filters second:
//!
//! - The first item appended to a builder has its relation coerced to the
//!   And family, since there is nothing before it to disjoin against.
//! - Each later expression uses its own logical relation.
//! - Each later child filter uses the *enclosing* filter's relation, not
//!   the child's own.
//!
//! The same walk serves WHERE, HAVING, join conditions and the flat filter
//! lists of update and delete.

use super::predicate::{comparison_operator, to_param, LikeKind, Predicate, PredicateBuilder};
use super::statement::{compile_select, CteScope};
use crate::error::{FacadeError, FacadeResult};
use crate::model::{Expression, Filter, Join, LogicalRelation, Relation, Value};

/// Append every expression and child filter of `filter` to `builder`
pub fn apply_filter<B: PredicateBuilder>(
    builder: &mut B,
    filter: &Filter,
    scope: &CteScope,
) -> FacadeResult<()> {
    let mut is_first = apply_expressions(builder, &filter.expressions, scope)?;

    for child in &filter.filters {
        let mut group = builder.group();
        apply_filter(&mut group, child, scope)?;
        let relation = if is_first {
            LogicalRelation::And
        } else {
            filter.logical_relation
        };
        builder.append_group(relation, group);
        is_first = false;
    }
    Ok(())
}

/// Append a flat expression list.
///
/// Returns whether the builder is still waiting for its first item.
pub fn apply_expressions<B: PredicateBuilder>(
    builder: &mut B,
    expressions: &[Expression],
    scope: &CteScope,
) -> FacadeResult<bool> {
    let mut is_first = true;
    for expression in expressions {
        let relation = if is_first {
            expression.logical_relation.to_and()
        } else {
            expression.logical_relation
        };
        append_expression(builder, expression, relation, scope)?;
        is_first = false;
    }
    Ok(is_first)
}

/// Append a join's ON condition followed by its extra expressions, all in
/// the And family
pub fn apply_join<B: PredicateBuilder>(
    builder: &mut B,
    join: &Join,
    scope: &CteScope,
) -> FacadeResult<()> {
    let on = &join.on;
    let relation = on.logical_relation.to_and();
    if on.raw {
        append_expression(builder, on, relation, scope)?;
    } else {
        let op = comparison_operator(on.relation).ok_or_else(|| {
            FacadeError::validation(format!(
                "join condition on '{}' must be a comparison, not {:?}",
                on.name, on.relation
            ))
        })?;
        let right = match &on.value {
            Value::Text(column) => column.clone(),
            _ => {
                return Err(FacadeError::validation(format!(
                    "join condition on '{}' must name the joined column as its value",
                    on.name
                )))
            }
        };
        builder.append(
            relation,
            Predicate::CompareColumns {
                left: on.name.clone(),
                op,
                right,
            },
        )?;
    }

    for expression in &join.expressions {
        append_expression(builder, expression, expression.logical_relation.to_and(), scope)?;
    }
    Ok(())
}

fn append_expression<B: PredicateBuilder>(
    builder: &mut B,
    expression: &Expression,
    relation: LogicalRelation,
    scope: &CteScope,
) -> FacadeResult<()> {
    if expression.raw {
        if relation.is_negated() {
            return Err(FacadeError::validation(format!(
                "raw expression '{}' cannot be negated with {:?}",
                expression.name, relation
            )));
        }
        let bindings = expression
            .bindings()
            .iter()
            .map(to_param)
            .collect::<FacadeResult<Vec<_>>>()?;
        return builder.append_raw(relation, &expression.name, bindings);
    }

    let predicate = to_predicate(expression, scope)?;
    builder.append(relation, predicate)
}

fn to_predicate(expression: &Expression, scope: &CteScope) -> FacadeResult<Predicate> {
    let column = expression.name.clone();
    let predicate = match expression.relation {
        Relation::EqualTo if expression.value.is_null() => Predicate::Null { column },
        Relation::EqualTo
        | Relation::GreaterThan
        | Relation::GreaterThanOrEqualTo
        | Relation::LessThan
        | Relation::LessThanOrEqualTo => {
            let op = comparison_operator(expression.relation).ok_or_else(|| {
                FacadeError::validation(format!("{:?} is not a comparison", expression.relation))
            })?;
            Predicate::Compare {
                column,
                op,
                value: to_param(&expression.value)?,
            }
        }
        Relation::In => match &expression.value {
            Value::Query(select) => Predicate::InQuery {
                column,
                query: compile_select(select, scope)?,
            },
            Value::List(values) => Predicate::In {
                column,
                values: values.iter().map(to_param).collect::<FacadeResult<_>>()?,
            },
            Value::Null => Predicate::In {
                column,
                values: Vec::new(),
            },
            _ => {
                return Err(FacadeError::validation(format!(
                    "In on '{}' needs a list or a nested select",
                    column
                )))
            }
        },
        Relation::NullValue => Predicate::Null { column },
        Relation::TrueValue => Predicate::True { column },
        Relation::Exists => match &expression.value {
            Value::Query(select) => Predicate::Exists {
                query: compile_select(select, scope)?,
            },
            _ => {
                return Err(FacadeError::validation(
                    "Exists needs a nested select as its value",
                ))
            }
        },
        Relation::StartsWith => like(column, LikeKind::StartsWith, &expression.value)?,
        Relation::EndsWith => like(column, LikeKind::EndsWith, &expression.value)?,
        Relation::Contains => like(column, LikeKind::Contains, &expression.value)?,
    };
    Ok(predicate)
}

fn like(column: String, kind: LikeKind, value: &Value) -> FacadeResult<Predicate> {
    match value {
        Value::Text(text) => Ok(Predicate::Like {
            column,
            kind,
            text: text.clone(),
        }),
        _ => Err(FacadeError::validation(format!(
            "{:?} on '{}' needs a text value",
            kind, column
        ))),
    }
}
