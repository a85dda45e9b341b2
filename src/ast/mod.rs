//! SQL Abstract Syntax Tree (AST) module
//!
//! This module provides a type-safe representation of SQL statements that can be
//! constructed programmatically and rendered to SQL strings. It is intentionally
//! decoupled from the facade model and from any database driver so that:
//!
//! - Rendering can be tested without a database
//! - One compiled tree renders for every supported [`Dialect`]
//!
//! # Architecture
//!
//! The AST is built from several components:
//!
//! - [`expr`]: SQL expressions (columns, literals, bound values, operators)
//! - [`stmt`]: SQL statements (SELECT, INSERT, UPDATE, DELETE)
//! - [`cte`]: Common Table Expressions (WITH clauses)
//! - [`dialect`]: Quoting, placeholder and pagination rules per engine
//! - [`params`]: Parameter handling for prepared statements
//! - [`render`]: SQL string generation
//!
//! # Example
//!
//! ```rust,ignore
//! use sql_facade::ast::*;
//!
//! let stmt = SelectStmt::new()
//!     .with_from(FromClause::table("canvas").with_alias("v"))
//!     .with_where(Expr::qualified_column("v", "id").eq(Expr::bound("uuid-1")));
//!
//! let compiled = render(&Stmt::Select(stmt), Dialect::Postgres);
//! // select * from "canvas" as "v" where "v"."id" = $1
//! ```

pub mod cte;
pub mod dialect;
pub mod expr;
pub mod params;
pub mod render;
pub mod stmt;

// Re-export all public types
pub use cte::*;
pub use dialect::*;
pub use expr::*;
pub use params::*;
pub use render::*;
pub use stmt::*;

#[cfg(test)]
mod tests;
