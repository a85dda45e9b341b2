use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::statement::{compile_select, compile_statement, CteScope};
use crate::ast::{render, render_inline, CompiledSql, Dialect, SqlRenderer, Stmt};
use crate::error::FacadeResult;
use crate::model::{SqlSelect, Statement};

///
/// COMPILERS
/// one shared compiler per dialect, created on first use
///

static COMPILERS: LazyLock<RwLock<HashMap<Dialect, Arc<Compiler>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Compiles facade statements and renders them for one dialect.
///
/// A compiler holds no state beyond its dialect, so the registry hands out
/// a single shared instance per dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    dialect: Dialect,
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The shared compiler for `dialect`.
    ///
    /// Lookups only take the read lock; the first caller for a dialect
    /// inserts it under the write lock and later racers reuse that entry.
    pub fn for_dialect(dialect: Dialect) -> Arc<Compiler> {
        {
            let compilers = COMPILERS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(compiler) = compilers.get(&dialect) {
                return Arc::clone(compiler);
            }
        }

        let mut compilers = COMPILERS.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            compilers
                .entry(dialect)
                .or_insert_with(|| Arc::new(Compiler::new(dialect))),
        )
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Build the SQL AST for a statement without rendering it
    pub fn to_stmt(&self, statement: &Statement) -> FacadeResult<Stmt> {
        compile_statement(statement)
    }

    /// Compile to parameterized SQL
    pub fn compile(&self, statement: &Statement) -> FacadeResult<CompiledSql> {
        let stmt = self.to_stmt(statement)?;
        Ok(self.render(&stmt))
    }

    /// Compile a select restricted to one window of rows
    pub fn compile_page(
        &self,
        select: &SqlSelect,
        limit: u64,
        offset: u64,
    ) -> FacadeResult<CompiledSql> {
        let stmt = compile_select(select, &CteScope::default())?
            .with_limit(limit)
            .with_offset(offset);
        Ok(self.render(&Stmt::Select(stmt)))
    }

    /// The SQL text for a statement, with placeholders or with values inlined
    pub fn get_sql(&self, statement: &Statement, parameterized: bool) -> FacadeResult<String> {
        let stmt = self.to_stmt(statement)?;
        if parameterized {
            Ok(self.render(&stmt).sql)
        } else {
            Ok(render_inline(&stmt, self.dialect))
        }
    }

    pub fn render(&self, stmt: &Stmt) -> CompiledSql {
        render(stmt, self.dialect)
    }

    /// Indented SQL with values inlined, for logs
    pub fn render_pretty(&self, stmt: &Stmt) -> String {
        let mut renderer = SqlRenderer::pretty(self.dialect);
        renderer.render_stmt(stmt);
        renderer.into_sql()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ParamValue;
    use crate::model::{Expression, FieldValue, Filter, SqlInsert, Table};
    use std::thread;

    fn canvas_insert() -> Statement {
        SqlInsert::new("canvas")
            .with_field(FieldValue::new("id", "123"))
            .with_field(FieldValue::new("color", "green"))
            .into()
    }

    #[test]
    fn test_registry_returns_shared_instance() {
        let a = Compiler::for_dialect(Dialect::Sqlite);
        let b = Compiler::for_dialect(Dialect::Sqlite);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(Compiler::for_dialect(Dialect::Postgres).dialect(), Dialect::Postgres);
    }

    #[test]
    fn test_registry_concurrent_get_or_create() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| Compiler::for_dialect(Dialect::SqlServer)))
            .collect();
        let compilers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(compilers.iter().all(|c| Arc::ptr_eq(c, &compilers[0])));
    }

    #[test]
    fn test_get_sql_inline_and_parameterized() {
        let compiler = Compiler::for_dialect(Dialect::Sqlite);
        let statement = canvas_insert();
        assert_eq!(
            compiler.get_sql(&statement, false).unwrap(),
            "insert into \"canvas\" (\"id\", \"color\") values ('123', 'green')"
        );
        assert_eq!(
            compiler.get_sql(&statement, true).unwrap(),
            "insert into \"canvas\" (\"id\", \"color\") values (?1, ?2)"
        );
    }

    #[test]
    fn test_compile_collects_params() {
        let compiled = Compiler::new(Dialect::Postgres)
            .compile(&canvas_insert())
            .unwrap();
        assert!(compiled.parameterized);
        assert_eq!(
            compiled.params,
            vec![ParamValue::from("123"), ParamValue::from("green")]
        );
    }

    #[test]
    fn test_compile_page() {
        let select = SqlSelect::new(Table::aliased("canvas", "v"))
            .with_where(Filter::new().with_expression(Expression::new("v.color", "green")));
        let compiled = Compiler::new(Dialect::SqlServer)
            .compile_page(&select, 30, 60)
            .unwrap();
        assert_eq!(
            compiled.sql,
            "select * from [canvas] as [v] where [v].[color] = @p0 \
             order by (select 0) offset 60 rows fetch next 30 rows only"
        );
    }
}
