//! Execution of compiled statements
//!
//! This module runs the SQL produced by [`crate::compile`] against a live
//! database. It provides:
//!
//! - The [`Backend`]/[`Connection`] seam and a built-in SQLite backend
//! - Explicit [`Transaction`] handles that every read and write joins
//! - Execution plans for batch writes
//! - Telemetry and logging for debugging
//!
//! ```text
//! Transaction
//!   └── ExecutionPlan
//!         └── ExecutionStep[]
//!               ├── stmt: Stmt (AST)
//!               └── depends_on: Vec<StepId>
//! ```
//!
//! Writes run through plans: a single write is a one-step plan and a batch
//! write chains one step per statement, so the whole batch commits or rolls
//! back together. Reads compile their select and query the connection
//! directly.

mod backend;
mod plan;
mod sqlite;
mod telemetry;
mod transaction;

pub use backend::*;
pub use plan::*;
pub use sqlite::*;
pub use telemetry::*;
pub use transaction::*;
