//! SQLite execution backend built on rusqlite
//!
//! File databases open a fresh connection for every unit of work. An
//! in-memory database only lives as long as its connection, so the backend
//! opens it once and keeps it behind a mutex; each unit of work holds the
//! lock until it finishes. Other threads wait for it. The owning thread
//! asking for a second unit of work gets a validation error instead, since
//! it would otherwise wait on itself.

use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Number, Value as Json};

use super::backend::{Backend, Connection, Row};
use crate::ast::{CompiledSql, ParamValue};
use crate::error::{FacadeError, FacadeResult};

const DATA_SOURCE_PREFIX: &str = "data source=";

#[derive(Debug)]
pub struct SqliteBackend {
    path: String,
    memory: Option<MemoryStore>,
}

#[derive(Debug)]
struct MemoryStore {
    connection: Mutex<rusqlite::Connection>,
    owner: Mutex<Option<ThreadId>>,
}

impl MemoryStore {
    fn new(connection: rusqlite::Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
            owner: Mutex::new(None),
        }
    }

    fn acquire(&self) -> FacadeResult<MemoryGuard<'_>> {
        let current = thread::current().id();
        if *self.owner.lock().unwrap_or_else(PoisonError::into_inner) == Some(current) {
            return Err(FacadeError::validation(
                "a unit of work is already open on this backend; pass it as tx",
            ));
        }
        let connection = self.connection.lock().unwrap_or_else(PoisonError::into_inner);
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = Some(current);
        Ok(MemoryGuard {
            connection,
            owner: &self.owner,
        })
    }
}

/// Exclusive use of the in-memory connection
struct MemoryGuard<'a> {
    connection: MutexGuard<'a, rusqlite::Connection>,
    owner: &'a Mutex<Option<ThreadId>>,
}

impl Drop for MemoryGuard<'_> {
    fn drop(&mut self) {
        // cleared before the connection lock is released
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SqliteBackend {
    /// Open a backend for `connection_string`.
    ///
    /// Accepts a bare path or URI, or `Data Source=<path>;<options>` where the
    /// options are ignored.
    pub fn open(connection_string: &str) -> FacadeResult<Self> {
        let path = normalize_path(connection_string);
        let memory = if is_memory(&path) {
            let connection = rusqlite::Connection::open(&path)?;
            Some(MemoryStore::new(connection))
        } else {
            None
        };
        Ok(Self { path, memory })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_memory(&self) -> bool {
        self.memory.is_some()
    }
}

impl Backend for SqliteBackend {
    fn connect(&self) -> FacadeResult<Box<dyn Connection + '_>> {
        let handle = match &self.memory {
            Some(store) => Handle::Shared(store.acquire()?),
            None => Handle::Owned(rusqlite::Connection::open(&self.path)?),
        };
        Ok(Box::new(SqliteConnection { handle }))
    }
}

enum Handle<'a> {
    Shared(MemoryGuard<'a>),
    Owned(rusqlite::Connection),
}

impl Deref for Handle<'_> {
    type Target = rusqlite::Connection;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Shared(guard) => &guard.connection,
            Self::Owned(connection) => connection,
        }
    }
}

pub struct SqliteConnection<'a> {
    handle: Handle<'a>,
}

impl Connection for SqliteConnection<'_> {
    fn begin(&mut self) -> FacadeResult<()> {
        self.handle.execute_batch("begin")?;
        Ok(())
    }

    fn commit(&mut self) -> FacadeResult<()> {
        self.handle.execute_batch("commit")?;
        Ok(())
    }

    fn rollback(&mut self) -> FacadeResult<()> {
        self.handle.execute_batch("rollback")?;
        Ok(())
    }

    fn execute(&mut self, sql: &CompiledSql) -> FacadeResult<usize> {
        let mut stmt = self.handle.prepare(&sql.sql)?;
        let params = to_sql_values(&sql.params);
        Ok(stmt.execute(rusqlite::params_from_iter(params.iter()))?)
    }

    fn query(&mut self, sql: &CompiledSql) -> FacadeResult<Vec<Row>> {
        let mut stmt = self.handle.prepare(&sql.sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let params = to_sql_values(&sql.params);
        let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut object = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                object.insert(name.clone(), to_json(row.get_ref(i)?));
            }
            results.push(object);
        }
        Ok(results)
    }
}

/// Strip a `Data Source=` prefix and any trailing `;` options
fn normalize_path(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    let without_prefix = match trimmed.get(..DATA_SOURCE_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(DATA_SOURCE_PREFIX) => {
            &trimmed[DATA_SOURCE_PREFIX.len()..]
        }
        _ => trimmed,
    };
    without_prefix
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn is_memory(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains(":memory:") || lower.contains("mode=memory")
}

fn to_sql_values(params: &[ParamValue]) -> Vec<SqlValue> {
    params
        .iter()
        .map(|param| match param {
            ParamValue::Null => SqlValue::Null,
            ParamValue::Bool(b) => SqlValue::Integer(i64::from(*b)),
            ParamValue::Integer(n) => SqlValue::Integer(*n),
            ParamValue::Float(f) => SqlValue::Real(*f),
            ParamValue::String(s) => SqlValue::Text(s.clone()),
        })
        .collect()
}

fn to_json(value: ValueRef<'_>) -> Json {
    match value {
        ValueRef::Null => Json::Null,
        ValueRef::Integer(n) => Json::from(n),
        ValueRef::Real(f) => Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null),
        ValueRef::Text(bytes) => Json::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(sql: &str) -> CompiledSql {
        CompiledSql {
            sql: sql.to_string(),
            params: vec![],
            parameterized: false,
        }
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("Data Source=:memory:;Version=3"), ":memory:");
        assert_eq!(normalize_path("data source=app.db"), "app.db");
        assert_eq!(
            normalize_path("file:relations?mode=memory"),
            "file:relations?mode=memory"
        );
    }

    #[test]
    fn test_memory_detection() {
        assert!(is_memory(":memory:"));
        assert!(is_memory("file:paging?MODE=MEMORY"));
        assert!(!is_memory("app.db"));
    }

    #[test]
    fn test_memory_database_survives_connections() {
        let backend = SqliteBackend::open("Data Source=:memory:").unwrap();
        assert!(backend.is_memory());
        {
            let mut conn = backend.connect().unwrap();
            conn.execute(&inline("create table t (id text, n integer, f real)"))
                .unwrap();
            conn.execute(&CompiledSql {
                sql: "insert into t values (?1, ?2, ?3)".to_string(),
                params: vec!["a".into(), ParamValue::Bool(true), 1.5.into()],
                parameterized: true,
            })
            .unwrap();
        }

        let mut conn = backend.connect().unwrap();
        let rows = conn.query(&inline("select id, n, f from t")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            Json::Object(rows[0].clone()),
            serde_json::json!({"id": "a", "n": 1, "f": 1.5})
        );
    }

    #[test]
    fn test_memory_reentry_on_same_thread_is_rejected() {
        let backend = SqliteBackend::open(":memory:").unwrap();
        let held = backend.connect().unwrap();
        let err = backend.connect().err().unwrap();
        assert!(err.is_validation());
        drop(held);
        assert!(backend.connect().is_ok());
    }

    #[test]
    fn test_memory_connection_waits_across_threads() {
        let backend = SqliteBackend::open(":memory:").unwrap();
        let mut held = backend.connect().unwrap();
        held.execute(&inline("create table t (id text)")).unwrap();

        std::thread::scope(|s| {
            let reader = s.spawn(|| {
                let mut conn = backend.connect().unwrap();
                conn.query(&inline("select id from t")).unwrap().len()
            });
            held.execute(&inline("insert into t values ('x')")).unwrap();
            drop(held);
            assert_eq!(reader.join().unwrap(), 1);
        });
    }

    #[test]
    fn test_rollback_discards_writes() {
        let backend = SqliteBackend::open(":memory:").unwrap();
        let mut conn = backend.connect().unwrap();
        conn.execute(&inline("create table t (id text)")).unwrap();
        conn.begin().unwrap();
        conn.execute(&inline("insert into t values ('x')")).unwrap();
        conn.rollback().unwrap();
        assert!(conn.query(&inline("select * from t")).unwrap().is_empty());
    }

    #[test]
    fn test_errors_are_execution_errors() {
        let backend = SqliteBackend::open(":memory:").unwrap();
        let mut conn = backend.connect().unwrap();
        let err = conn.query(&inline("select * from badTable")).unwrap_err();
        assert!(err.is_execution());
    }
}
