//! SQL statement types
//!
//! This module defines the top-level SQL statement types: SELECT, INSERT, UPDATE, DELETE.

use super::cte::Cte;
use super::expr::{Expr, Ident, OrderByExpr};

/// Top-level SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
}

impl Stmt {
    /// Short name used in logs and plan descriptions
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStmt {
    /// WITH clause (CTEs)
    pub ctes: Vec<Cte>,
    /// SELECT columns; empty renders as `*`
    pub columns: Vec<SelectColumn>,
    pub from: Option<FromClause>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    /// UNION / INTERSECT / EXCEPT members, applied in order
    pub set_ops: Vec<SetOp>,
    /// ORDER BY clause, applied to the whole compound
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectStmt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simple SELECT with columns
    pub fn columns(columns: Vec<SelectColumn>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn with_from(mut self, from: FromClause) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    pub fn with_ctes(mut self, ctes: Vec<Cte>) -> Self {
        self.ctes = ctes;
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderByExpr>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_group_by(mut self, group_by: Vec<Expr>) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_set_op(mut self, operator: SetOperator, query: SelectStmt) -> Self {
        self.set_ops.push(SetOp { operator, query });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::UnionAll => "union all",
            Self::Intersect => "intersect",
            Self::Except => "except",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetOp {
    pub operator: SetOperator,
    pub query: SelectStmt,
}

/// A column in a SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// An expression with optional alias: expr AS alias
    Expr { expr: Expr, alias: Option<Ident> },
    /// All columns: *
    Star,
}

impl SelectColumn {
    pub fn expr(expr: Expr) -> Self {
        Self::Expr { expr, alias: None }
    }

    pub fn expr_as(expr: Expr, alias: impl Into<Ident>) -> Self {
        Self::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }

    pub fn star() -> Self {
        Self::Star
    }
}

/// Name of a table: quoted identifier parts or verbatim SQL
#[derive(Debug, Clone, PartialEq)]
pub enum TableName {
    Quoted {
        schema: Option<Ident>,
        name: Ident,
    },
    Raw(String),
}

impl TableName {
    /// Split `schema.table` into its quoted parts
    pub fn parse(name: &str) -> Self {
        match name.split_once('.') {
            Some((schema, table)) => Self::Quoted {
                schema: Some(schema.into()),
                name: table.into(),
            },
            None => Self::Quoted {
                schema: None,
                name: name.into(),
            },
        }
    }
}

/// A table reference with optional alias
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: TableName,
    pub alias: Option<Ident>,
}

impl TableRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: TableName::parse(name),
            alias: None,
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            name: TableName::Raw(sql.into()),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<Ident>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// FROM clause
#[derive(Debug, Clone, PartialEq)]
pub enum FromClause {
    /// Table (or CTE) reference
    Table(TableRef),
    /// Subquery
    Subquery {
        query: Box<SelectStmt>,
        alias: Ident,
    },
    /// JOIN clause
    Join {
        left: Box<FromClause>,
        join_type: JoinType,
        right: Box<FromClause>,
        on: Option<Expr>,
    },
}

impl FromClause {
    pub fn table(name: &str) -> Self {
        Self::Table(TableRef::new(name))
    }

    pub fn subquery(query: SelectStmt, alias: impl Into<Ident>) -> Self {
        Self::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    /// Add an alias to a table reference
    pub fn with_alias(self, alias: impl Into<Ident>) -> Self {
        match self {
            Self::Table(table) => Self::Table(table.with_alias(alias)),
            _ => self,
        }
    }

    pub fn join(self, join_type: JoinType, right: FromClause, on: Expr) -> Self {
        Self::Join {
            left: Box::new(self),
            join_type,
            right: Box::new(right),
            on: Some(on),
        }
    }

    pub fn left_join(self, right: FromClause, on: Expr) -> Self {
        self.join(JoinType::Left, right, on)
    }

    pub fn inner_join(self, right: FromClause, on: Expr) -> Self {
        self.join(JoinType::Inner, right, on)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Inner => "inner join",
            Self::Left => "left join",
        }
    }
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    /// WITH clause (CTEs)
    pub ctes: Vec<Cte>,
    pub table: TableRef,
    pub columns: Vec<Ident>,
    pub values: InsertValues,
}

impl InsertStmt {
    pub fn new(table: TableRef, columns: Vec<Ident>, values: InsertValues) -> Self {
        Self {
            ctes: vec![],
            table,
            columns,
            values,
        }
    }

    pub fn with_ctes(mut self, ctes: Vec<Cte>) -> Self {
        self.ctes = ctes;
        self
    }
}

/// Values for INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValues {
    /// VALUES (row1), (row2), ...
    Values(Vec<Vec<Expr>>),
    /// INSERT ... SELECT ...
    Query(Box<SelectStmt>),
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: TableRef,
    /// SET clause: column = value pairs
    pub set: Vec<(Ident, Expr)>,
    pub where_clause: Option<Expr>,
}

impl UpdateStmt {
    pub fn new(table: TableRef, set: Vec<(Ident, Expr)>) -> Self {
        Self {
            table,
            set,
            where_clause: None,
        }
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: TableRef,
    pub where_clause: Option<Expr>,
}

impl DeleteStmt {
    pub fn new(table: TableRef) -> Self {
        Self {
            table,
            where_clause: None,
        }
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_builder() {
        let stmt = SelectStmt::columns(vec![SelectColumn::star()])
            .with_from(FromClause::table("users"))
            .with_limit(10);

        assert!(matches!(stmt.from, Some(FromClause::Table(_))));
        assert_eq!(stmt.limit, Some(10));
    }

    #[test]
    fn test_from_clause_join() {
        let from = FromClause::table("users").with_alias("u").left_join(
            FromClause::table("orders").with_alias("o"),
            Expr::qualified_column("u", "id").eq(Expr::qualified_column("o", "user_id")),
        );

        assert!(matches!(
            from,
            FromClause::Join {
                join_type: JoinType::Left,
                ..
            }
        ));
    }

    #[test]
    fn test_table_name_parse() {
        assert_eq!(
            TableName::parse("public.users"),
            TableName::Quoted {
                schema: Some(Ident::new("public")),
                name: Ident::new("users"),
            }
        );
        assert_eq!(
            TableName::parse("canvas-metdata"),
            TableName::Quoted {
                schema: None,
                name: Ident::new("canvas-metdata"),
            }
        );
    }

    #[test]
    fn test_insert_stmt() {
        let stmt = InsertStmt::new(
            TableRef::new("users"),
            vec![Ident::new("name"), Ident::new("email")],
            InsertValues::Values(vec![vec![
                Expr::string("Alice"),
                Expr::string("alice@example.com"),
            ]]),
        );

        assert_eq!(stmt.columns.len(), 2);
        assert!(stmt.ctes.is_empty());
    }
}
