//! SQL string rendering
//!
//! This module converts AST nodes to SQL strings. It is the only place
//! in the codebase where SQL strings are constructed.
//!
//! # Architecture
//!
//! The rendering system is built around two key components:
//!
//! - [`Render`] trait: Implemented by AST nodes to define how they render to SQL
//! - [`SqlRenderer`]: The rendering context that handles output buffering,
//!   formatting, the target [`Dialect`] and parameter collection
//!
//! A renderer either runs in parameterized mode, where every
//! [`Expr::Bound`] value is replaced by the dialect's placeholder and pushed
//! into a [`ParamCollector`], or in inline mode, where bound values are
//! written as escaped literals.
//!
//! # Safety
//!
//! All identifiers are quoted using the dialect's quoting rules and all
//! string literals are escaped. [`Expr::Raw`] and raw table names are the
//! only text written verbatim.

use super::cte::{Cte, CteQuery};
use super::dialect::Dialect;
use super::expr::*;
use super::params::{ParamCollector, ParamValue};
use super::stmt::*;

// =============================================================================
// Render Trait
// =============================================================================

/// Trait for AST nodes that can be rendered to SQL.
///
/// # Example
///
/// ```rust,ignore
/// use sql_facade::ast::{Dialect, Expr, Render, SqlRenderer};
///
/// let mut renderer = SqlRenderer::new(Dialect::Postgres);
/// Expr::int(42).render(&mut renderer);
/// assert_eq!(renderer.into_sql(), "42");
/// ```
pub trait Render {
    /// Render this node to the given SQL renderer
    fn render(&self, renderer: &mut SqlRenderer);
}

impl Render for Stmt {
    fn render(&self, renderer: &mut SqlRenderer) {
        match self {
            Stmt::Select(s) => s.render(renderer),
            Stmt::Insert(s) => s.render(renderer),
            Stmt::Update(s) => s.render(renderer),
            Stmt::Delete(s) => s.render(renderer),
        }
    }
}

impl Render for SelectStmt {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.render_select(self);
    }
}

impl Render for InsertStmt {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.render_insert(self);
    }
}

impl Render for UpdateStmt {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.render_update(self);
    }
}

impl Render for DeleteStmt {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.render_delete(self);
    }
}

impl Render for Expr {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.render_expr(self);
    }
}

impl Render for Literal {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.render_literal(self);
    }
}

impl Render for Ident {
    fn render(&self, renderer: &mut SqlRenderer) {
        renderer.write_ident(self);
    }
}

// =============================================================================
// Constants
// =============================================================================

/// Default buffer capacity for simple queries
const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Buffer capacity for queries with CTEs or set operations
const CTE_BUFFER_CAPACITY: usize = 4096;

/// Buffer capacity for complex queries with many CTEs
const LARGE_BUFFER_CAPACITY: usize = 8192;

/// Rendered SQL text together with the values bound to its placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<ParamValue>,
    pub parameterized: bool,
}

/// SQL renderer with optional pretty-printing
pub struct SqlRenderer {
    output: String,
    indent_level: usize,
    pretty: bool,
    dialect: Dialect,
    params: Option<ParamCollector>,
}

impl SqlRenderer {
    /// Create a compact renderer that inlines bound values
    pub fn new(dialect: Dialect) -> Self {
        Self::with_capacity(dialect, DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a compact, inlining renderer with a specific buffer capacity
    pub fn with_capacity(dialect: Dialect, capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            indent_level: 0,
            pretty: false,
            dialect,
            params: None,
        }
    }

    /// Create a compact renderer that emits placeholders for bound values
    pub fn parameterized(dialect: Dialect, capacity: usize) -> Self {
        Self {
            params: Some(ParamCollector::new()),
            ..Self::with_capacity(dialect, capacity)
        }
    }

    /// Create a new renderer with pretty-printed output
    pub fn pretty(dialect: Dialect) -> Self {
        Self {
            pretty: true,
            ..Self::new(dialect)
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Estimate appropriate buffer capacity based on statement complexity
    pub fn estimate_capacity(stmt: &Stmt) -> usize {
        match stmt {
            Stmt::Select(s) => {
                let weight = s.ctes.len() + s.set_ops.len();
                if weight >= 5 {
                    LARGE_BUFFER_CAPACITY
                } else if weight > 0 {
                    CTE_BUFFER_CAPACITY
                } else {
                    DEFAULT_BUFFER_CAPACITY
                }
            }
            Stmt::Insert(s) => {
                if !s.ctes.is_empty() || matches!(s.values, InsertValues::Query(_)) {
                    CTE_BUFFER_CAPACITY
                } else {
                    DEFAULT_BUFFER_CAPACITY
                }
            }
            Stmt::Update(_) | Stmt::Delete(_) => DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Render a statement and return the SQL string
    pub fn render_stmt(&mut self, stmt: &Stmt) -> &str {
        match stmt {
            Stmt::Select(s) => self.render_select(s),
            Stmt::Insert(s) => self.render_insert(s),
            Stmt::Update(s) => self.render_update(s),
            Stmt::Delete(s) => self.render_delete(s),
        }
        &self.output
    }

    /// Take ownership of the rendered SQL string
    pub fn into_sql(self) -> String {
        self.output
    }

    /// Take the rendered SQL and the collected parameter values
    pub fn finish(self) -> CompiledSql {
        let parameterized = self.params.is_some();
        let params = self
            .params
            .map(|collector| {
                collector
                    .into_params()
                    .into_iter()
                    .map(|param| param.value)
                    .collect()
            })
            .unwrap_or_default();
        CompiledSql {
            sql: self.output,
            params,
            parameterized,
        }
    }

    // =========================================================================
    // Statement rendering
    // =========================================================================

    fn render_select(&mut self, stmt: &SelectStmt) {
        self.render_ctes(&stmt.ctes);
        self.render_select_body(stmt);

        for set_op in &stmt.set_ops {
            self.newline();
            self.write(set_op.operator.as_sql());
            self.newline();
            self.render_select_body(&set_op.query);
        }

        let paginated = stmt.limit.is_some() || stmt.offset.is_some();
        if !stmt.order_by.is_empty() {
            self.newline();
            self.write("order by ");
            self.render_order_by(&stmt.order_by);
        } else if paginated && self.dialect == Dialect::SqlServer {
            // offset/fetch is only valid after an order by
            self.newline();
            self.write("order by (select 0)");
        }

        self.render_pagination(stmt.limit, stmt.offset);
    }

    fn render_select_body(&mut self, stmt: &SelectStmt) {
        self.write("select ");
        if stmt.columns.is_empty() {
            self.write("*");
        } else {
            self.render_select_columns(&stmt.columns);
        }

        if let Some(from) = &stmt.from {
            self.newline();
            self.write("from ");
            self.render_from(from);
        }

        if let Some(where_clause) = &stmt.where_clause {
            self.newline();
            self.write("where ");
            self.render_expr(where_clause);
        }

        if !stmt.group_by.is_empty() {
            self.newline();
            self.write("group by ");
            self.render_expr_list(&stmt.group_by);
        }

        if let Some(having) = &stmt.having {
            self.newline();
            self.write("having ");
            self.render_expr(having);
        }
    }

    fn render_pagination(&mut self, limit: Option<u64>, offset: Option<u64>) {
        match self.dialect {
            Dialect::SqlServer => {
                if limit.is_none() && offset.is_none() {
                    return;
                }
                self.newline();
                self.write("offset ");
                self.write(&offset.unwrap_or(0).to_string());
                self.write(" rows");
                if let Some(limit) = limit {
                    self.write(" fetch next ");
                    self.write(&limit.to_string());
                    self.write(" rows only");
                }
            }
            Dialect::Sqlite | Dialect::Postgres => {
                if let Some(limit) = limit {
                    self.newline();
                    self.write("limit ");
                    self.write(&limit.to_string());
                } else if offset.is_some() && self.dialect == Dialect::Sqlite {
                    // sqlite has no offset without a limit
                    self.newline();
                    self.write("limit -1");
                }
                if let Some(offset) = offset {
                    self.newline();
                    self.write("offset ");
                    self.write(&offset.to_string());
                }
            }
        }
    }

    fn render_insert(&mut self, stmt: &InsertStmt) {
        self.render_ctes(&stmt.ctes);
        self.write("insert into ");
        self.render_table_name(&stmt.table.name);

        if !stmt.columns.is_empty() {
            self.write(" (");
            for (i, col) in stmt.columns.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write_ident(col);
            }
            self.write(")");
        }

        self.newline();
        match &stmt.values {
            InsertValues::Values(rows) => {
                self.write("values ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write("(");
                    self.render_expr_list(row);
                    self.write(")");
                }
            }
            InsertValues::Query(query) => {
                self.render_select(query);
            }
        }
    }

    fn render_update(&mut self, stmt: &UpdateStmt) {
        self.write("update ");
        self.render_table_ref(&stmt.table);

        self.newline();
        self.write("set ");
        for (i, (col, expr)) in stmt.set.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write_ident(col);
            self.write(" = ");
            self.render_expr(expr);
        }

        if let Some(where_clause) = &stmt.where_clause {
            self.newline();
            self.write("where ");
            self.render_expr(where_clause);
        }
    }

    fn render_delete(&mut self, stmt: &DeleteStmt) {
        self.write("delete from ");
        self.render_table_ref(&stmt.table);

        if let Some(where_clause) = &stmt.where_clause {
            self.newline();
            self.write("where ");
            self.render_expr(where_clause);
        }
    }

    // =========================================================================
    // CTE rendering
    // =========================================================================

    fn render_ctes(&mut self, ctes: &[Cte]) {
        if ctes.is_empty() {
            return;
        }

        self.write("with ");
        for (i, cte) in ctes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.render_cte(cte);
        }
        self.newline();
    }

    fn render_cte(&mut self, cte: &Cte) {
        self.write_ident(&cte.name);
        self.write(" as (");
        self.indent();
        self.line_break();

        match &cte.query {
            CteQuery::Select(s) => self.render_select(s),
            CteQuery::Raw(sql) => self.write(sql),
        }

        self.dedent();
        self.line_break();
        self.write(")");
    }

    // =========================================================================
    // FROM clause rendering
    // =========================================================================

    fn render_from(&mut self, from: &FromClause) {
        match from {
            FromClause::Table(table) => self.render_table_ref(table),
            FromClause::Subquery { query, alias } => {
                self.write("(");
                self.render_select(query);
                self.write(") as ");
                self.write_ident(alias);
            }
            FromClause::Join {
                left,
                join_type,
                right,
                on,
            } => {
                self.render_from(left);
                self.newline();
                self.write(join_type.as_sql());
                self.write(" ");
                self.render_from(right);
                if let Some(on_expr) = on {
                    self.write(" on ");
                    self.render_expr(on_expr);
                }
            }
        }
    }

    fn render_table_ref(&mut self, table: &TableRef) {
        self.render_table_name(&table.name);
        if let Some(alias) = &table.alias {
            self.write(" as ");
            self.write_ident(alias);
        }
    }

    fn render_table_name(&mut self, name: &TableName) {
        match name {
            TableName::Quoted { schema, name } => {
                if let Some(schema) = schema {
                    self.write_ident(schema);
                    self.write(".");
                }
                self.write_ident(name);
            }
            TableName::Raw(sql) => self.write(sql),
        }
    }

    // =========================================================================
    // Expression rendering
    // =========================================================================

    fn render_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Column(col) => {
                for part in &col.qualifier {
                    self.write_ident(part);
                    self.write(".");
                }
                if col.column.is_star() {
                    self.write("*");
                } else {
                    self.write_ident(&col.column);
                }
            }

            Expr::Literal(lit) => self.render_literal(lit),

            Expr::Bound(value) => self.render_bound(value),

            Expr::BinaryOp { left, op, right } => {
                self.render_expr(left);
                self.write(" ");
                self.write(op.as_sql());
                self.write(" ");
                self.render_expr(right);
            }

            Expr::UnaryOp { op, expr } => {
                self.write(op.as_sql());
                self.write("(");
                self.render_expr(expr);
                self.write(")");
            }

            Expr::Subquery(query) => {
                self.write("(");
                self.render_select(query);
                self.write(")");
            }

            Expr::IsNull { expr, negated } => {
                self.render_expr(expr);
                if *negated {
                    self.write(" is not null");
                } else {
                    self.write(" is null");
                }
            }

            Expr::InList {
                expr,
                list,
                negated,
            } => {
                if list.is_empty() {
                    // nothing is a member of the empty set
                    self.write(if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                self.render_expr(expr);
                if *negated {
                    self.write(" not in (");
                } else {
                    self.write(" in (");
                }
                self.render_expr_list(list);
                self.write(")");
            }

            Expr::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                self.render_expr(expr);
                if *negated {
                    self.write(" not in (");
                } else {
                    self.write(" in (");
                }
                self.render_select(subquery);
                self.write(")");
            }

            Expr::Like {
                expr,
                pattern,
                negated,
            } => {
                self.render_expr(expr);
                if *negated {
                    self.write(" not like ");
                } else {
                    self.write(" like ");
                }
                self.render_expr(pattern);
                self.write(" escape '\\'");
            }

            Expr::Exists { subquery, negated } => {
                if *negated {
                    self.write("not ");
                }
                self.write("exists (");
                self.render_select(subquery);
                self.write(")");
            }

            Expr::Nested(inner) => {
                self.write("(");
                self.render_expr(inner);
                self.write(")");
            }

            Expr::Raw { sql, bindings } => self.render_raw(sql, bindings),
        }
    }

    fn render_literal(&mut self, lit: &Literal) {
        match lit {
            Literal::Null => self.write("null"),
            Literal::Bool(b) => self.write(self.dialect.bool_literal(*b)),
            Literal::Integer(n) => self.write(&n.to_string()),
            Literal::String(s) => self.write_literal(s),
        }
    }

    fn render_bound(&mut self, value: &ParamValue) {
        if let Some(params) = self.params.as_mut() {
            let index = params.add(value.clone());
            let placeholder = self.dialect.placeholder(index);
            self.write(&placeholder);
            return;
        }
        match value {
            ParamValue::Null => self.write("null"),
            ParamValue::Bool(b) => self.write(self.dialect.bool_literal(*b)),
            ParamValue::Integer(n) => self.write(&n.to_string()),
            ParamValue::Float(f) => self.write(&f.to_string()),
            ParamValue::String(s) => self.write_literal(s),
        }
    }

    fn render_raw(&mut self, sql: &str, bindings: &[ParamValue]) {
        let mut bindings = bindings.iter();
        let mut in_quote = false;
        for c in sql.chars() {
            match c {
                '\'' => {
                    in_quote = !in_quote;
                    self.output.push(c);
                }
                '?' if !in_quote => match bindings.next() {
                    Some(value) => self.render_bound(value),
                    None => self.output.push(c),
                },
                _ => self.output.push(c),
            }
        }
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn render_select_columns(&mut self, columns: &[SelectColumn]) {
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match col {
                SelectColumn::Expr { expr, alias } => {
                    self.render_expr(expr);
                    if let Some(alias) = alias {
                        self.write(" as ");
                        self.write_ident(alias);
                    }
                }
                SelectColumn::Star => self.write("*"),
            }
        }
    }

    fn render_expr_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.render_expr(expr);
        }
    }

    fn render_order_by(&mut self, order_by: &[OrderByExpr]) {
        for (i, ob) in order_by.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.render_expr(&ob.expr);
            if let Some(dir) = &ob.direction {
                self.write(" ");
                self.write(dir.as_sql());
            }
        }
    }

    // =========================================================================
    // Low-level output methods
    // =========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_ident(&mut self, ident: &Ident) {
        self.dialect.write_quoted(&mut self.output, ident.as_str());
    }

    fn write_literal(&mut self, s: &str) {
        self.output.push('\'');
        for c in s.chars() {
            if c == '\'' {
                self.output.push('\'');
            }
            self.output.push(c);
        }
        self.output.push('\'');
    }

    fn newline(&mut self) {
        if self.pretty {
            self.line_break();
        } else {
            self.output.push(' ');
        }
    }

    /// A line break in pretty mode, nothing in compact mode
    fn line_break(&mut self) {
        if self.pretty {
            self.output.push('\n');
            for _ in 0..self.indent_level {
                self.output.push_str("    ");
            }
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// Number of `?` binding markers in a raw SQL fragment, ignoring quoted text
pub fn count_raw_markers(sql: &str) -> usize {
    let mut in_quote = false;
    let mut count = 0;
    for c in sql.chars() {
        match c {
            '\'' => in_quote = !in_quote,
            '?' if !in_quote => count += 1,
            _ => {}
        }
    }
    count
}

// =========================================================================
// Convenience functions
// =========================================================================

/// Render a statement with placeholders, collecting its parameters
pub fn render(stmt: &Stmt, dialect: Dialect) -> CompiledSql {
    let capacity = SqlRenderer::estimate_capacity(stmt);
    let mut renderer = SqlRenderer::parameterized(dialect, capacity);
    renderer.render_stmt(stmt);
    renderer.finish()
}

/// Render a statement with every bound value written inline
pub fn render_inline(stmt: &Stmt, dialect: Dialect) -> String {
    let capacity = SqlRenderer::estimate_capacity(stmt);
    let mut renderer = SqlRenderer::with_capacity(dialect, capacity);
    renderer.render_stmt(stmt);
    renderer.into_sql()
}

/// Render a statement to a pretty-printed SQL string with values inline
pub fn render_pretty(stmt: &Stmt, dialect: Dialect) -> String {
    let mut renderer = SqlRenderer::pretty(dialect);
    renderer.render_stmt(stmt);
    renderer.into_sql()
}

/// Render just an expression, values inline
pub fn render_expr(expr: &Expr, dialect: Dialect) -> String {
    let mut renderer = SqlRenderer::new(dialect);
    renderer.render_expr(expr);
    renderer.into_sql()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    const PG: Dialect = Dialect::Postgres;

    #[test]
    fn test_render_simple_select() {
        let stmt =
            SelectStmt::columns(vec![SelectColumn::star()]).with_from(FromClause::table("users"));

        let sql = render_inline(&Stmt::Select(stmt), PG);
        assert_eq!(sql, "select * from \"users\"");
    }

    #[test]
    fn test_render_select_with_where() {
        let stmt = SelectStmt::columns(vec![
            SelectColumn::expr(Expr::qualified_column("t", "id")),
            SelectColumn::expr(Expr::qualified_column("t", "name")),
        ])
        .with_from(FromClause::table("users").with_alias("t"))
        .with_where(Expr::qualified_column("t", "active").eq(Expr::bool(true)));

        let sql = render_inline(&Stmt::Select(stmt), PG);
        assert_eq!(
            sql,
            "select \"t\".\"id\", \"t\".\"name\" from \"users\" as \"t\" where \"t\".\"active\" = true"
        );
    }

    #[test]
    fn test_render_parameterized_collects_in_text_order() {
        let stmt = UpdateStmt::new(
            TableRef::new("canvas"),
            vec![(Ident::new("color"), Expr::bound("yellow"))],
        )
        .with_where(Expr::column("color").eq(Expr::bound("red")));

        let compiled = render(&Stmt::Update(stmt), Dialect::Sqlite);
        assert_eq!(
            compiled.sql,
            "update \"canvas\" set \"color\" = ?1 where \"color\" = ?2"
        );
        assert_eq!(
            compiled.params,
            vec![ParamValue::from("yellow"), ParamValue::from("red")]
        );
        assert!(compiled.parameterized);
    }

    #[test]
    fn test_render_insert() {
        let stmt = InsertStmt::new(
            TableRef::new("canvas"),
            vec![Ident::new("id"), Ident::new("color")],
            InsertValues::Values(vec![vec![Expr::bound("123"), Expr::bound("green")]]),
        );

        let stmt = Stmt::Insert(stmt);
        assert_eq!(
            render_inline(&stmt, Dialect::Sqlite),
            "insert into \"canvas\" (\"id\", \"color\") values ('123', 'green')"
        );
        assert_eq!(
            render(&stmt, Dialect::SqlServer).sql,
            "insert into [canvas] ([id], [color]) values (@p0, @p1)"
        );
    }

    #[test]
    fn test_render_delete() {
        let stmt = DeleteStmt::new(TableRef::new("users"))
            .with_where(Expr::column("id").eq(Expr::int(1)));

        let sql = render_inline(&Stmt::Delete(stmt), PG);
        assert_eq!(sql, "delete from \"users\" where \"id\" = 1");
    }

    #[test]
    fn test_render_cte() {
        let inner_select = SelectStmt::columns(vec![SelectColumn::star()])
            .with_from(FromClause::table("users"))
            .with_where(Expr::column("active").eq(Expr::bool(true)));

        let outer_select = SelectStmt::new()
            .with_from(FromClause::table("active_users"))
            .with_ctes(vec![
                Cte::select("active_users", inner_select),
                Cte::raw("c2", "select 'a' as col1"),
            ]);

        let sql = render_inline(&Stmt::Select(outer_select), PG);
        assert_eq!(
            sql,
            "with \"active_users\" as (select * from \"users\" where \"active\" = true), \
             \"c2\" as (select 'a' as col1) select * from \"active_users\""
        );
    }

    #[test]
    fn test_render_set_ops_and_order() {
        let member = SelectStmt::new().with_from(FromClause::table("b"));
        let stmt = SelectStmt::new()
            .with_from(FromClause::table("a"))
            .with_set_op(SetOperator::Intersect, member)
            .with_order_by(vec![OrderByExpr::desc(Expr::column("id"))]);

        let sql = render_inline(&Stmt::Select(stmt), PG);
        assert_eq!(
            sql,
            "select * from \"a\" intersect select * from \"b\" order by \"id\" desc"
        );
    }

    #[test]
    fn test_render_pagination_per_dialect() {
        let stmt = Stmt::Select(
            SelectStmt::new()
                .with_from(FromClause::table("t"))
                .with_limit(30)
                .with_offset(60),
        );
        assert_eq!(
            render_inline(&stmt, Dialect::Postgres),
            "select * from \"t\" limit 30 offset 60"
        );
        assert_eq!(
            render_inline(&stmt, Dialect::SqlServer),
            "select * from [t] order by (select 0) offset 60 rows fetch next 30 rows only"
        );

        let offset_only = Stmt::Select(
            SelectStmt::new()
                .with_from(FromClause::table("t"))
                .with_offset(5),
        );
        assert_eq!(
            render_inline(&offset_only, Dialect::Sqlite),
            "select * from \"t\" limit -1 offset 5"
        );
    }

    #[test]
    fn test_render_raw_bindings() {
        let expr = Expr::Raw {
            sql: "substr(id, 0, 7) != ? and note <> '?'".to_string(),
            bindings: vec![ParamValue::from("uuid-0")],
        };
        assert_eq!(
            render_expr(&expr, PG),
            "substr(id, 0, 7) != 'uuid-0' and note <> '?'"
        );
        assert_eq!(count_raw_markers("a = ? and b = '?' and c = ?"), 2);
    }

    #[test]
    fn test_render_empty_in_list() {
        let expr = Expr::in_list(Expr::column("id"), vec![]);
        assert_eq!(render_expr(&expr, PG), "1 = 0");
        assert_eq!(render_expr(&Expr::not(expr), PG), "not(1 = 0)");
    }

    #[test]
    fn test_render_like_escape() {
        let expr = Expr::like(Expr::column("id"), Expr::bound("uuid-1%"));
        assert_eq!(
            render_expr(&expr, PG),
            "\"id\" like 'uuid-1%' escape '\\'"
        );
    }

    #[test]
    fn test_ident_quoting() {
        let ident = Ident::new("user\"name");
        let mut renderer = SqlRenderer::new(PG);
        renderer.write_ident(&ident);
        assert_eq!(renderer.into_sql(), "\"user\"\"name\"");
    }

    #[test]
    fn test_string_literal_with_quotes() {
        let mut renderer = SqlRenderer::new(PG);
        renderer.write_literal("it's a test");
        assert_eq!(renderer.into_sql(), "'it''s a test'");
    }

    #[test]
    fn test_render_pretty_breaks_lines() {
        let stmt = SelectStmt::new()
            .with_from(FromClause::table("users"))
            .with_where(Expr::column("id").eq(Expr::int(1)));
        let sql = render_pretty(&Stmt::Select(stmt), PG);
        assert_eq!(sql, "select *\nfrom \"users\"\nwhere \"id\" = 1");
    }
}
