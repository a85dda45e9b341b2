//! The facade boundary applications program against
//!
//! A [`SqlFacade`] pairs the shared [`Compiler`] for its dialect with an
//! optional execution [`Backend`]. Every operation takes an optional
//! [`Transaction`]: pass one to join it, or pass `None` and the operation
//! runs in a unit of work of its own that commits on success.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as Json;

use crate::ast::Dialect;
use crate::compile::Compiler;
use crate::error::{FacadeError, FacadeResult};
use crate::executor::{log_error, Backend, SqliteBackend, Transaction, EXECUTION_ERROR_CONTEXT};
use crate::model::{codec, SqlSelect, Statement};
use crate::paging::Page;

pub const DIALECT_ENV: &str = "SQL_FACADE_DIALECT";
pub const CONNECTION_ENV: &str = "SQL_FACADE_CONNECTION";

static FACADES: LazyLock<RwLock<HashMap<SqlFacadeConfig, Arc<SqlFacade>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlFacadeConfig {
    pub dialect: Dialect,
    pub connection_string: String,
}

impl SqlFacadeConfig {
    pub fn new(dialect: Dialect, connection_string: impl Into<String>) -> Self {
        Self {
            dialect,
            connection_string: connection_string.into(),
        }
    }

    /// Read `SQL_FACADE_DIALECT` and `SQL_FACADE_CONNECTION`
    pub fn from_env() -> FacadeResult<Self> {
        let dialect = env_var(DIALECT_ENV)?.parse()?;
        let connection_string = env_var(CONNECTION_ENV)?;
        Ok(Self::new(dialect, connection_string))
    }
}

fn env_var(name: &str) -> FacadeResult<String> {
    std::env::var(name)
        .map_err(|_| FacadeError::validation(format!("environment variable {} is not set", name)))
}

pub struct SqlFacade {
    config: SqlFacadeConfig,
    compiler: Arc<Compiler>,
    backend: Option<Arc<dyn Backend>>,
}

impl std::fmt::Debug for SqlFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlFacade")
            .field("config", &self.config)
            .field("has_backend", &self.backend.is_some())
            .finish()
    }
}

impl SqlFacade {
    /// Create a facade for `config`.
    ///
    /// SQLite gets the built-in backend. Other dialects compile only; use
    /// [`SqlFacade::with_backend`] to execute against them.
    pub fn new(config: SqlFacadeConfig) -> FacadeResult<Self> {
        let backend: Option<Arc<dyn Backend>> = match config.dialect {
            Dialect::Sqlite => Some(Arc::new(SqliteBackend::open(&config.connection_string)?)),
            Dialect::Postgres | Dialect::SqlServer => None,
        };
        Ok(Self {
            compiler: Compiler::for_dialect(config.dialect),
            config,
            backend,
        })
    }

    pub fn with_backend(config: SqlFacadeConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            compiler: Compiler::for_dialect(config.dialect),
            config,
            backend: Some(backend),
        }
    }

    /// The process-wide facade for `config`, created on first use
    pub fn shared(config: SqlFacadeConfig) -> FacadeResult<Arc<SqlFacade>> {
        {
            let facades = FACADES.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(facade) = facades.get(&config) {
                return Ok(Arc::clone(facade));
            }
        }

        let mut facades = FACADES.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(facade) = facades.get(&config) {
            return Ok(Arc::clone(facade));
        }
        let facade = Arc::new(SqlFacade::new(config.clone())?);
        tracing::info!("sql_facade: created facade for {}", config.dialect);
        facades.insert(config, Arc::clone(&facade));
        Ok(facade)
    }

    pub fn config(&self) -> &SqlFacadeConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Open a unit of work; drop it without committing to roll back
    pub fn begin(&self) -> FacadeResult<Transaction<'_>> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            FacadeError::validation(format!(
                "no execution backend configured for dialect {}",
                self.config.dialect
            ))
        })?;
        let connection = backend
            .connect()
            .map_err(|e| FacadeError::wrap(EXECUTION_ERROR_CONTEXT, e))?;
        Transaction::begin(connection, Arc::clone(&self.compiler))
    }

    /// Run `f` inside `existing`, or inside a new unit of work.
    ///
    /// A new unit of work commits when `f` succeeds and rolls back when it
    /// fails. A joined one is left for its owner to finish.
    pub fn in_scope<R>(
        &self,
        existing: Option<&mut Transaction<'_>>,
        f: impl FnOnce(&mut Transaction<'_>) -> FacadeResult<R>,
    ) -> FacadeResult<R> {
        if let Some(tx) = existing {
            return f(tx);
        }

        let mut tx = self.begin()?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    log_error("rollback", &rollback_err.to_string());
                }
                Err(err)
            }
        }
    }

    pub fn get_results<T: DeserializeOwned>(
        &self,
        select: &SqlSelect,
        tx: Option<&mut Transaction<'_>>,
    ) -> FacadeResult<Vec<T>> {
        self.in_scope(tx, |tx| tx.get_results(select))
    }

    /// At most one row; several rows are a validation error
    pub fn get_single_result<T: DeserializeOwned>(
        &self,
        select: &SqlSelect,
        tx: Option<&mut Transaction<'_>>,
    ) -> FacadeResult<Option<T>> {
        self.in_scope(tx, |tx| tx.get_single_result(select))
    }

    pub fn get_total_num_results(
        &self,
        select: &SqlSelect,
        tx: Option<&mut Transaction<'_>>,
    ) -> FacadeResult<i64> {
        self.in_scope(tx, |tx| tx.get_total_num_results(select))
    }

    pub fn get_paged_results<T: DeserializeOwned>(
        &self,
        select: &SqlSelect,
        page_num: u64,
        page_size: u64,
        with_total: bool,
        tx: Option<&mut Transaction<'_>>,
    ) -> FacadeResult<Page<T>> {
        self.in_scope(tx, |tx| {
            tx.get_paged_results(select, page_num, page_size, with_total)
        })
    }

    pub fn execute_write(
        &self,
        statement: &Statement,
        tx: Option<&mut Transaction<'_>>,
    ) -> FacadeResult<usize> {
        self.in_scope(tx, |tx| tx.execute_write(statement))
    }

    /// All writes in one unit of work; any failure rolls back the batch
    pub fn execute_batch_write(
        &self,
        statements: &[Statement],
        tx: Option<&mut Transaction<'_>>,
    ) -> FacadeResult<Vec<usize>> {
        self.in_scope(tx, |tx| tx.execute_batch_write(statements))
    }

    /// SQL text for `statement` in this facade's dialect
    pub fn get_sql(&self, statement: &Statement, parameterized: bool) -> FacadeResult<String> {
        self.compiler.get_sql(statement, parameterized)
    }

    pub fn encode(&self, statement: &Statement) -> FacadeResult<Json> {
        codec::encode(statement)
    }

    pub fn decode(&self, document: &Json) -> FacadeResult<Statement> {
        codec::decode(document)
    }

    pub fn to_json(&self, statement: &Statement) -> FacadeResult<String> {
        codec::to_json(statement)
    }

    pub fn from_json(&self, json: &str) -> FacadeResult<Statement> {
        codec::from_json(json)
    }
}
