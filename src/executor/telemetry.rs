//! Telemetry and logging for SQL execution
//!
//! This module provides configurable logging for debugging SQL generation
//! and execution. Events are emitted through `tracing`; installing a
//! subscriber is up to the application.
//!
//! # Configuration
//!
//! Set the `SQL_FACADE_LOG_LEVEL` environment variable to one of:
//! - `off` - No logging (default)
//! - `basic` - Log SQL and timing only
//! - `detailed` - Log SQL, parameters and plan context
//! - `debug` - Log everything including statement documents
//!
//! # Example
//!
//! ```bash
//! export SQL_FACADE_LOG_LEVEL=detailed
//! ```

use std::time::Instant;
use tracing::{info, warn};

use crate::ast::ParamValue;

pub const LOG_LEVEL_ENV: &str = "SQL_FACADE_LOG_LEVEL";

/// Log level for SQL telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// No logging
    #[default]
    Off = 0,
    /// Basic info: SQL and timing
    Basic = 1,
    /// Detailed: SQL, parameters, plan context
    Detailed = 2,
    /// Debug: Everything including statement documents
    Debug = 3,
}

impl LogLevel {
    /// Parse from string
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "basic" => Self::Basic,
            "detailed" => Self::Detailed,
            "debug" => Self::Debug,
            _ => Self::Off,
        }
    }
}

/// Get current log level from environment
///
/// Checks `SQL_FACADE_LOG_LEVEL` environment variable.
pub fn get_log_level() -> LogLevel {
    std::env::var(LOG_LEVEL_ENV)
        .map(|s| LogLevel::parse(&s))
        .unwrap_or(LogLevel::Off)
}

/// Cut `text` to at most `max` bytes on a char boundary
fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Log an execution plan
pub fn log_plan(plan: &super::ExecutionPlan) {
    let level = get_log_level();
    if level < LogLevel::Basic {
        return;
    }

    info!(
        steps = plan.steps.len(),
        elapsed_ms = plan.telemetry.elapsed_ms() as u64,
        "sql_facade: execution plan"
    );

    if level >= LogLevel::Detailed {
        if let Some(operation) = &plan.telemetry.operation {
            info!("sql_facade: operation: {}", operation);
        }

        for (key, value) in &plan.telemetry.tags {
            info!("sql_facade: tag {}: {}", key, value);
        }

        for step in &plan.steps {
            info!(
                id = %step.id,
                depends_on = ?step.depends_on,
                "sql_facade: step {}",
                step.description
            );
        }
    }

    if level >= LogLevel::Debug {
        if let Some(document) = &plan.telemetry.document {
            info!("sql_facade: statement: {}", truncate(document, 2000));
        }
    }
}

/// Log SQL execution
pub fn log_sql(sql: &str, params: &[ParamValue]) {
    let level = get_log_level();
    if level < LogLevel::Basic {
        return;
    }

    // Truncate very long SQL for basic logging
    let sql_display = if level >= LogLevel::Detailed {
        sql.to_string()
    } else {
        truncate(sql, 1000)
    };

    info!("sql_facade: SQL: {}", sql_display);

    if level >= LogLevel::Detailed {
        for (i, param) in params.iter().enumerate() {
            info!("sql_facade: param {}: {:?}", i + 1, param);
        }
    }
}

/// Log execution result
pub fn log_result(start: Instant, success: bool) {
    let level = get_log_level();
    if level < LogLevel::Basic {
        return;
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = if success { "completed" } else { "failed" };

    info!(duration_ms, "sql_facade: execution {}", status);
}

/// Log an error
pub fn log_error(context: &str, error: &str) {
    let level = get_log_level();
    if level < LogLevel::Basic {
        return;
    }

    warn!("sql_facade: error in {}: {}", context, error);
}

/// A guard that logs execution timing on drop
pub struct ExecutionTimer {
    start: Instant,
    context: String,
    logged: bool,
}

impl ExecutionTimer {
    /// Start a new execution timer
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            context: context.into(),
            logged: false,
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Mark as successful and log
    pub fn success(mut self) {
        self.logged = true;
        log_result(self.start, true);
    }

    /// Mark as failed and log
    pub fn failure(mut self, error: &str) {
        self.logged = true;
        log_error(&self.context, error);
        log_result(self.start, false);
    }
}

impl Drop for ExecutionTimer {
    fn drop(&mut self) {
        // Log if not already logged (implicit failure)
        if !self.logged {
            log_result(self.start, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse("off"), LogLevel::Off);
        assert_eq!(LogLevel::parse("basic"), LogLevel::Basic);
        assert_eq!(LogLevel::parse("detailed"), LogLevel::Detailed);
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("BASIC"), LogLevel::Basic);
        assert_eq!(LogLevel::parse("invalid"), LogLevel::Off);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Basic);
        assert!(LogLevel::Basic < LogLevel::Detailed);
        assert!(LogLevel::Detailed < LogLevel::Debug);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééé", 3), "é...");
    }

    #[test]
    fn test_execution_timer() {
        let timer = ExecutionTimer::new("test");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10);
        timer.success();
    }
}
