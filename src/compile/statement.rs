//! Facade statements to SQL AST statements
//!
//! Each statement shape is assembled clause by clause. WHERE, HAVING, join
//! conditions and the flat update/delete filter lists all go through the
//! filter combinator with a fresh [`ConditionBuilder`].
//!
//! CTE declarations are collected into the outermost `with` list that can
//! see them: explicitly declared CTEs first, then a CTE used as the FROM
//! source, then CTEs used as join targets, then those of combined selects.
//! A name already declared by an enclosing select is never declared again.

use super::filter::{apply_expressions, apply_filter, apply_join};
use super::predicate::{to_param, ConditionBuilder};
use crate::ast::{
    Cte, DeleteStmt, Expr, FromClause, Ident, InsertStmt, InsertValues, JoinType as SqlJoinType,
    OrderByExpr, SelectColumn, SelectStmt, SetOperator, Stmt, TableName, TableRef, UpdateStmt,
};
use crate::error::{FacadeError, FacadeResult};
use crate::model::{
    CommonTableExpression, CteQuery, Expression, Field, Filter, FromSource, GroupBy, JoinTarget,
    JoinType, SetOperation, Sort, SqlDelete, SqlInsert, SqlSelect, SqlUpdate, Statement, Table,
};

/// CTE names visible to the select being compiled
#[derive(Debug, Clone, Default)]
pub struct CteScope {
    names: Vec<String>,
}

impl CteScope {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn declare(&mut self, name: &str) {
        self.names.push(name.to_string());
    }
}

pub fn compile_statement(statement: &Statement) -> FacadeResult<Stmt> {
    let stmt = match statement {
        Statement::Select(select) => Stmt::Select(compile_select(select, &CteScope::default())?),
        Statement::Insert(insert) => Stmt::Insert(compile_insert(insert)?),
        Statement::Update(update) => Stmt::Update(compile_update(update)?),
        Statement::Delete(delete) => Stmt::Delete(compile_delete(delete)?),
    };
    Ok(stmt)
}

/// Compile a select, treating every name in `outer` as already declared
pub fn compile_select(select: &SqlSelect, outer: &CteScope) -> FacadeResult<SelectStmt> {
    let mut scope = outer.clone();
    let mut ctes = Vec::new();

    for cte in &select.ctes {
        declare_cte(cte, &mut scope, &mut ctes)?;
    }
    if let Some(FromSource::Cte(cte)) = &select.from {
        declare_cte(cte, &mut scope, &mut ctes)?;
    }
    for join in &select.joins {
        if let JoinTarget::Cte(cte) = &join.target {
            declare_cte(cte, &mut scope, &mut ctes)?;
        }
    }
    for combine in &select.combines {
        for cte in &combine.select.ctes {
            declare_cte(cte, &mut scope, &mut ctes)?;
        }
        if let Some(FromSource::Cte(cte)) = &combine.select.from {
            declare_cte(cte, &mut scope, &mut ctes)?;
        }
        for join in &combine.select.joins {
            if let JoinTarget::Cte(cte) = &join.target {
                declare_cte(cte, &mut scope, &mut ctes)?;
            }
        }
    }

    let mut stmt = SelectStmt::new().with_ctes(ctes);

    let mut from = match &select.from {
        Some(source) => Some(compile_from(source, &scope)?),
        None => None,
    };

    stmt.columns = if select.fields.is_empty() {
        vec![SelectColumn::star()]
    } else {
        select.fields.iter().map(compile_field).collect()
    };

    for join in &select.joins {
        let left = from.take().ok_or_else(|| {
            FacadeError::validation("a select with joins needs a from source")
        })?;
        let right = compile_join_target(&join.target, &scope)?;
        let mut builder = ConditionBuilder::new();
        apply_join(&mut builder, join, &scope)?;
        let join_type = match join.join_type {
            JoinType::Inner => SqlJoinType::Inner,
            JoinType::Left => SqlJoinType::Left,
        };
        from = Some(FromClause::Join {
            left: Box::new(left),
            join_type,
            right: Box::new(right),
            on: builder.into_expr(),
        });
    }
    stmt.from = from;

    stmt.where_clause = compile_condition(select.where_filter.as_ref(), &scope)?;
    stmt.group_by = select.group_bys.iter().map(compile_group_by).collect();
    stmt.having = compile_condition(select.having.as_ref(), &scope)?;
    stmt.order_by = select.sorts.iter().map(compile_sort).collect();

    for (i, combine) in select.combines.iter().enumerate() {
        let mut member = compile_select(&combine.select, &scope)?;
        if !member.order_by.is_empty() {
            return Err(FacadeError::validation(
                "a combined select cannot be sorted on its own; sort the outer select",
            ));
        }
        // a set operation member renders without a with list of its own
        for cte in std::mem::take(&mut member.ctes) {
            if !stmt.ctes.iter().any(|declared| declared.name == cte.name) {
                stmt.ctes.push(cte);
            }
        }
        if !member.set_ops.is_empty() {
            // keep the member's own set operations together
            member = SelectStmt::columns(vec![SelectColumn::star()])
                .with_from(FromClause::subquery(member, format!("combined_{}", i)));
        }
        stmt = stmt.with_set_op(set_operator(combine.operation), member);
    }

    Ok(stmt)
}

pub fn compile_insert(insert: &SqlInsert) -> FacadeResult<InsertStmt> {
    let table = table_ref(&insert.table);
    match (&insert.query, insert.fields.is_empty()) {
        (Some(_), false) => Err(FacadeError::validation(
            "an insert takes either field values or a query, not both",
        )),
        (None, true) => Err(FacadeError::validation(
            "an insert needs field values or a query",
        )),
        (None, false) => {
            let columns = insert
                .fields
                .iter()
                .map(|f| Ident::new(f.name.as_str()))
                .collect();
            let row = insert
                .fields
                .iter()
                .map(|f| to_param(&f.value).map(Expr::Bound))
                .collect::<FacadeResult<Vec<_>>>()?;
            Ok(InsertStmt::new(table, columns, InsertValues::Values(vec![row])))
        }
        (Some(query), true) => {
            if query.fields.is_empty() {
                return Err(FacadeError::validation(
                    "an insert from a query needs the query to project its fields",
                ));
            }
            let columns = query
                .fields
                .iter()
                .map(|f| Ident::new(f.output_name()))
                .collect();
            let mut compiled = compile_select(query, &CteScope::default())?;
            let ctes = std::mem::take(&mut compiled.ctes);
            Ok(
                InsertStmt::new(table, columns, InsertValues::Query(Box::new(compiled)))
                    .with_ctes(ctes),
            )
        }
    }
}

pub fn compile_update(update: &SqlUpdate) -> FacadeResult<UpdateStmt> {
    if update.fields.is_empty() {
        return Err(FacadeError::validation("an update needs at least one field"));
    }
    let set = update
        .fields
        .iter()
        .map(|f| Ok((Ident::new(f.name.as_str()), Expr::Bound(to_param(&f.value)?))))
        .collect::<FacadeResult<Vec<_>>>()?;

    let mut stmt = UpdateStmt::new(table_ref(&update.table), set);
    stmt.where_clause = compile_flat_condition(&update.filters)?;
    Ok(stmt)
}

pub fn compile_delete(delete: &SqlDelete) -> FacadeResult<DeleteStmt> {
    let mut stmt = DeleteStmt::new(table_ref(&delete.table));
    stmt.where_clause = compile_flat_condition(&delete.filters)?;
    Ok(stmt)
}

fn declare_cte(
    cte: &CommonTableExpression,
    scope: &mut CteScope,
    ctes: &mut Vec<Cte>,
) -> FacadeResult<()> {
    if scope.contains(&cte.alias) {
        return Ok(());
    }
    let compiled = match &cte.query {
        CteQuery::Select(select) => Cte::select(cte.alias.as_str(), compile_select(select, scope)?),
        CteQuery::RawSql(sql) => Cte::raw(cte.alias.as_str(), sql.as_str()),
    };
    scope.declare(&cte.alias);
    ctes.push(compiled);
    Ok(())
}

fn compile_from(source: &FromSource, scope: &CteScope) -> FacadeResult<FromClause> {
    match source {
        FromSource::Table(table) => Ok(FromClause::Table(table_ref(table))),
        FromSource::Derived(derived) => Ok(FromClause::subquery(
            compile_select(&derived.select, scope)?,
            derived.alias.as_str(),
        )),
        FromSource::Cte(cte) => Ok(FromClause::Table(cte_ref(cte))),
    }
}

fn compile_join_target(target: &JoinTarget, scope: &CteScope) -> FacadeResult<FromClause> {
    match target {
        JoinTarget::Table(table) => Ok(FromClause::Table(table_ref(table))),
        JoinTarget::Derived(derived) => Ok(FromClause::subquery(
            compile_select(&derived.select, scope)?,
            derived.alias.as_str(),
        )),
        JoinTarget::Cte(cte) => Ok(FromClause::Table(cte_ref(cte))),
    }
}

fn compile_condition(filter: Option<&Filter>, scope: &CteScope) -> FacadeResult<Option<Expr>> {
    let Some(filter) = filter else {
        return Ok(None);
    };
    let mut builder = ConditionBuilder::new();
    apply_filter(&mut builder, filter, scope)?;
    Ok(builder.into_expr())
}

fn compile_flat_condition(expressions: &[Expression]) -> FacadeResult<Option<Expr>> {
    let mut builder = ConditionBuilder::new();
    apply_expressions(&mut builder, expressions, &CteScope::default())?;
    Ok(builder.into_expr())
}

fn compile_field(field: &Field) -> SelectColumn {
    let expr = if field.raw {
        Expr::raw(field.name.as_str())
    } else {
        Expr::column_path(&field.name)
    };
    match &field.alias {
        Some(alias) => SelectColumn::expr_as(expr, alias.as_str()),
        None => SelectColumn::expr(expr),
    }
}

fn compile_group_by(group_by: &GroupBy) -> Expr {
    if group_by.raw {
        Expr::raw(group_by.value.as_str())
    } else {
        Expr::column_path(&group_by.value)
    }
}

fn compile_sort(sort: &Sort) -> OrderByExpr {
    let expr = Expr::column_path(&sort.name);
    if sort.ascending {
        OrderByExpr::asc(expr)
    } else {
        OrderByExpr::desc(expr)
    }
}

fn table_ref(table: &Table) -> TableRef {
    let table_ref = if table.raw {
        TableRef::raw(table.name.as_str())
    } else {
        TableRef::new(&table.name)
    };
    match &table.alias {
        Some(alias) => table_ref.with_alias(alias.as_str()),
        None => table_ref,
    }
}

/// A declared CTE is referenced by its name alone
fn cte_ref(cte: &CommonTableExpression) -> TableRef {
    TableRef {
        name: TableName::Quoted {
            schema: None,
            name: Ident::new(cte.alias.as_str()),
        },
        alias: None,
    }
}

fn set_operator(operation: SetOperation) -> SetOperator {
    match operation {
        SetOperation::Union => SetOperator::Union,
        SetOperation::UnionAll => SetOperator::UnionAll,
        SetOperation::Intersect => SetOperator::Intersect,
        SetOperation::Except => SetOperator::Except,
    }
}
