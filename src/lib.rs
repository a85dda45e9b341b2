//! sql_facade: a serializable, database-agnostic description of SQL statements
//!
//! Application code builds [`SqlSelect`], [`SqlInsert`], [`SqlUpdate`] and
//! [`SqlDelete`] values, hands them to a [`SqlFacade`] and gets rows or
//! affected-row counts back. The same values round-trip through JSON so a
//! query can be stored or shipped between processes before it is run.
//!
//! # Architecture
//!
//! ```text
//! model (SqlSelect, Filter, Expression, ...)   <- serializable intention
//!   │  compile::filter      boolean filter tree -> predicate builder calls
//!   │  compile::statement   statement shapes   -> ast::Stmt
//!   ▼
//! ast (Stmt, Expr)  --render(dialect)-->  SQL text + bound params
//!   ▼
//! executor (Backend, Connection, Transaction, ExecutionPlan)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sql_facade::*;
//!
//! let facade = SqlFacade::new(SqlFacadeConfig::new(Dialect::Sqlite, ":memory:"))?;
//! let select = SqlSelect::new("canvas")
//!     .with_field(Field::new("id"))
//!     .with_where(Filter::new().with_expression(Expression::new("color", "green")));
//! let rows: Vec<serde_json::Value> = facade.get_results(&select, None)?;
//! ```

pub mod ast;
pub mod compile;
pub mod error;
pub mod executor;
pub mod facade;
pub mod model;
pub mod paging;

pub use ast::Dialect;
pub use compile::Compiler;
pub use error::{FacadeError, FacadeResult};
pub use executor::{Backend, Connection, Row, SqliteBackend, Transaction};
pub use facade::{SqlFacade, SqlFacadeConfig};
pub use model::*;
pub use paging::{Page, PagedResults, PagedResultsWithTotal};
