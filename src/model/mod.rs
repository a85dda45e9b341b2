//! Serializable statement model
//!
//! Everything an application needs to describe a query without touching SQL
//! text: tables and derived tables, projected fields, leaf [`Expression`]s
//! combined into [`Filter`] trees, joins, grouping, sorting, set operations
//! and the four statement shapes. Values are built with chained `with_*`
//! calls and are plain data afterwards; [`codec`] turns them into JSON
//! documents and back.

pub mod codec;
mod expression;
mod field;
mod filter;
mod join;
mod statement;
mod table;

pub use expression::*;
pub use field::*;
pub use filter::*;
pub use join::*;
pub use statement::*;
pub use table::{CommonTableExpression, CteQuery, DerivedTable, FromSource, Table};
