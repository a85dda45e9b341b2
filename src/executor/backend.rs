//! The seam between compiled SQL and a live database
//!
//! A [`Backend`] hands out [`Connection`]s; a connection runs compiled
//! statements inside an explicit begin/commit/rollback bracket. Rows come
//! back as JSON objects keyed by column name so callers can map them onto
//! their own types with serde.

use crate::ast::CompiledSql;
use crate::error::FacadeResult;

/// One result row, columns in select order
pub type Row = serde_json::Map<String, serde_json::Value>;

pub trait Backend: Send + Sync {
    /// Acquire a connection for one unit of work
    fn connect(&self) -> FacadeResult<Box<dyn Connection + '_>>;
}

pub trait Connection {
    fn begin(&mut self) -> FacadeResult<()>;

    fn commit(&mut self) -> FacadeResult<()>;

    fn rollback(&mut self) -> FacadeResult<()>;

    /// Run a write and return the number of affected rows
    fn execute(&mut self, sql: &CompiledSql) -> FacadeResult<usize>;

    fn query(&mut self, sql: &CompiledSql) -> FacadeResult<Vec<Row>>;
}
