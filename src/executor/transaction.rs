//! Explicit units of work
//!
//! A [`Transaction`] owns one backend connection with an open transaction.
//! Every read and write issued through it joins that transaction. Call
//! [`Transaction::commit`] to keep the work; dropping the handle without
//! committing rolls it back.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use super::backend::{Connection, Row};
use super::plan::ExecutionPlan;
use super::telemetry::{get_log_level, log_error, log_plan, log_sql, ExecutionTimer, LogLevel};
use crate::ast::{CompiledSql, Stmt};
use crate::compile::Compiler;
use crate::error::{FacadeError, FacadeResult};
use crate::model::{codec, Field, SqlSelect, Statement};
use crate::paging::{page_bounds, Page, PagedResults, PagedResultsWithTotal};

/// Context attached to every execution failure
pub const EXECUTION_ERROR_CONTEXT: &str = "Exception executing SQL statement";

const COUNT_ALIAS: &str = "total";

pub struct Transaction<'a> {
    connection: Box<dyn Connection + 'a>,
    compiler: Arc<Compiler>,
    finished: bool,
}

impl<'a> Transaction<'a> {
    /// Open a transaction on `connection`
    pub fn begin(
        mut connection: Box<dyn Connection + 'a>,
        compiler: Arc<Compiler>,
    ) -> FacadeResult<Self> {
        connection
            .begin()
            .map_err(|e| FacadeError::wrap(EXECUTION_ERROR_CONTEXT, e))?;
        Ok(Self {
            connection,
            compiler,
            finished: false,
        })
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn commit(mut self) -> FacadeResult<()> {
        self.finished = true;
        self.connection
            .commit()
            .map_err(|e| FacadeError::wrap(EXECUTION_ERROR_CONTEXT, e))
    }

    pub fn rollback(mut self) -> FacadeResult<()> {
        self.finished = true;
        self.connection
            .rollback()
            .map_err(|e| FacadeError::wrap(EXECUTION_ERROR_CONTEXT, e))
    }

    /// All rows of a select, each mapped onto `T`
    pub fn get_results<T: DeserializeOwned>(
        &mut self,
        select: &SqlSelect,
    ) -> FacadeResult<Vec<T>> {
        self.instrument("get_results", select_document(select), |tx| {
            let compiled = tx.compile_select(select)?;
            let rows = tx.query(&compiled)?;
            rows.into_iter().map(decode_row).collect()
        })
    }

    /// The only row of a select, if any; more than one row is an error
    pub fn get_single_result<T: DeserializeOwned>(
        &mut self,
        select: &SqlSelect,
    ) -> FacadeResult<Option<T>> {
        self.instrument("get_single_result", select_document(select), |tx| {
            let compiled = tx.compile_select(select)?;
            let mut rows = tx.query(&compiled)?;
            if rows.len() > 1 {
                return Err(FacadeError::validation(format!(
                    "expected at most one row but the query returned {}",
                    rows.len()
                )));
            }
            rows.pop().map(decode_row).transpose()
        })
    }

    /// Number of rows a select would return, ignoring its fields and sorts
    pub fn get_total_num_results(&mut self, select: &SqlSelect) -> FacadeResult<i64> {
        self.instrument("get_total_num_results", select_document(select), |tx| {
            tx.count(select)
        })
    }

    /// One page of a select, optionally with the total row count
    pub fn get_paged_results<T: DeserializeOwned>(
        &mut self,
        select: &SqlSelect,
        page_num: u64,
        page_size: u64,
        with_total: bool,
    ) -> FacadeResult<Page<T>> {
        self.instrument("get_paged_results", select_document(select), |tx| {
            let (limit, offset) = page_bounds(page_num, page_size)?;
            let compiled = tx.compiler.compile_page(select, limit, offset)?;
            let rows = tx.query(&compiled)?;
            let paged_list = rows
                .into_iter()
                .map(decode_row)
                .collect::<FacadeResult<Vec<T>>>()?;
            let page = PagedResults {
                page_num,
                page_size,
                paged_list,
            };

            if !with_total {
                return Ok(Page::Plain(page));
            }
            let total = tx.count(select)?;
            let total = u64::try_from(total).map_err(|_| {
                FacadeError::execution(format!("row count {} is negative", total))
            })?;
            Ok(Page::WithTotal(PagedResultsWithTotal::new(page, total)))
        })
    }

    /// Run an insert, update or delete and return the affected row count
    pub fn execute_write(&mut self, statement: &Statement) -> FacadeResult<usize> {
        self.instrument("execute_write", None, |tx| {
            let stmt = tx.compiler.to_stmt(statement)?;
            let plan = ExecutionPlan::single(stmt, statement.statement_type().as_str())
                .with_context("execute_write", statement_document(statement))
                .with_tag("dialect", tx.compiler.dialect().name());
            tx.run_plan(&plan).map(|counts| counts.into_iter().sum())
        })
    }

    /// Run several writes in order; the first failure aborts the rest
    pub fn execute_batch_write(&mut self, statements: &[Statement]) -> FacadeResult<Vec<usize>> {
        self.instrument("execute_batch_write", None, |tx| {
            let stmts = statements
                .iter()
                .map(|statement| {
                    if !statement.is_write() {
                        return Err(FacadeError::validation(
                            "a batch write only takes insert, update and delete statements",
                        ));
                    }
                    tx.compiler.to_stmt(statement)
                })
                .collect::<FacadeResult<Vec<Stmt>>>()?;
            let plan = ExecutionPlan::chained(stmts)
                .with_context("execute_batch_write", None::<String>)
                .with_tag("dialect", tx.compiler.dialect().name());
            tx.run_plan(&plan)
        })
    }

    fn compile_select(&self, select: &SqlSelect) -> FacadeResult<CompiledSql> {
        self.compiler.compile(&Statement::Select(select.clone()))
    }

    fn count(&mut self, select: &SqlSelect) -> FacadeResult<i64> {
        let mut count_select = codec::deep_clone(select)?;
        count_select.clear_fields();
        count_select.clear_sorts();
        let count_select = count_select.with_field(Field::raw("count(*)", COUNT_ALIAS));

        let compiled = self.compile_select(&count_select)?;
        let rows = self.query(&compiled)?;
        match rows.first() {
            Some(row) => count_value(row),
            None => Ok(0),
        }
    }

    fn run_plan(&mut self, plan: &ExecutionPlan) -> FacadeResult<Vec<usize>> {
        log_plan(plan);
        let mut counts = Vec::with_capacity(plan.step_count());
        for step in plan.steps_in_order()? {
            let compiled = self.compiler.render(&step.stmt);
            log_sql(&compiled.sql, &compiled.params);
            counts.push(self.connection.execute(&compiled)?);
        }
        Ok(counts)
    }

    fn query(&mut self, compiled: &CompiledSql) -> FacadeResult<Vec<Row>> {
        log_sql(&compiled.sql, &compiled.params);
        self.connection.query(compiled)
    }

    fn instrument<R>(
        &mut self,
        operation: &str,
        document: Option<String>,
        f: impl FnOnce(&mut Self) -> FacadeResult<R>,
    ) -> FacadeResult<R> {
        if let Some(document) = document {
            tracing::info!("sql_facade: {} {}", operation, document);
        }
        let timer = ExecutionTimer::new(operation);
        match f(self) {
            Ok(value) => {
                timer.success();
                Ok(value)
            }
            Err(err) => {
                timer.failure(&err.to_string());
                Err(FacadeError::wrap(EXECUTION_ERROR_CONTEXT, err))
            }
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.connection.rollback() {
                log_error("rollback", &err.to_string());
            }
        }
    }
}

/// Map a row onto `T`: the whole row first, then its only column
fn decode_row<T: DeserializeOwned>(row: Row) -> FacadeResult<T> {
    let single = if row.len() == 1 {
        row.values().next().cloned()
    } else {
        None
    };
    match serde_json::from_value(Json::Object(row)) {
        Ok(value) => Ok(value),
        Err(row_err) => match single {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                FacadeError::validation(format!("cannot map result column: {}", e))
            }),
            None => Err(FacadeError::validation(format!(
                "cannot map result row: {}",
                row_err
            ))),
        },
    }
}

/// The integer in the first column of a count row
fn count_value(row: &Row) -> FacadeResult<i64> {
    match row.values().next() {
        Some(value) => value.as_i64().ok_or_else(|| {
            FacadeError::execution(format!("row count {} is not an integer", value))
        }),
        None => Err(FacadeError::execution("count query returned no columns")),
    }
}

fn select_document(select: &SqlSelect) -> Option<String> {
    statement_document(&Statement::Select(select.clone()))
}

/// The statement document, only when debug logging wants it
fn statement_document(statement: &Statement) -> Option<String> {
    if get_log_level() < LogLevel::Debug {
        return None;
    }
    codec::to_json(statement).ok()
}
