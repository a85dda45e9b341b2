//! Execution plans for SQL statements
//!
//! An execution plan represents one or more SQL statements that need to be
//! executed together in one transaction. Reads and single writes are
//! single-step plans; a batch write becomes one step per statement, each
//! depending on the one before it.

use std::collections::HashSet;
use std::time::Instant;

use crate::ast::Stmt;
use crate::error::{FacadeError, FacadeResult};

/// An execution plan containing one or more SQL statements
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The steps to execute
    pub steps: Vec<ExecutionStep>,
    /// Telemetry information for debugging
    pub telemetry: PlanTelemetry,
}

/// A single step in an execution plan
#[derive(Debug)]
pub struct ExecutionStep {
    /// Unique identifier for this step
    pub id: String,
    /// The SQL statement (as AST)
    pub stmt: Stmt,
    /// Human-readable description of what this step does
    pub description: String,
    /// IDs of steps that must complete before this one
    pub depends_on: Vec<String>,
}

/// Telemetry information attached to an execution plan
#[derive(Debug)]
pub struct PlanTelemetry {
    /// The facade statement document (if available)
    pub document: Option<String>,
    /// The facade operation that built the plan
    pub operation: Option<String>,
    /// When the plan was created
    pub created_at: Instant,
    /// Custom tags for categorization
    pub tags: Vec<(String, String)>,
}

impl Default for PlanTelemetry {
    fn default() -> Self {
        Self {
            document: None,
            operation: None,
            created_at: Instant::now(),
            tags: Vec::new(),
        }
    }
}

impl PlanTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// Get elapsed time since plan creation
    pub fn elapsed_ms(&self) -> u128 {
        self.created_at.elapsed().as_millis()
    }
}

impl ExecutionPlan {
    /// Create a single-step execution plan
    pub fn single(stmt: Stmt, description: impl Into<String>) -> Self {
        Self {
            steps: vec![ExecutionStep::new("main", stmt, description)],
            telemetry: PlanTelemetry::default(),
        }
    }

    /// Create a multi-step execution plan
    pub fn multi(steps: Vec<ExecutionStep>) -> Self {
        Self {
            steps,
            telemetry: PlanTelemetry::default(),
        }
    }

    /// One step per statement, each depending on its predecessor.
    ///
    /// Step ids are `write-0`, `write-1`, ... in input order.
    pub fn chained(stmts: Vec<Stmt>) -> Self {
        let steps = stmts
            .into_iter()
            .enumerate()
            .map(|(i, stmt)| {
                let description = format!("{} #{}", stmt.kind(), i);
                let step = ExecutionStep::new(format!("write-{}", i), stmt, description);
                if i == 0 {
                    step
                } else {
                    step.depends_on(format!("write-{}", i - 1))
                }
            })
            .collect();
        Self::multi(steps)
    }

    /// Attach facade context to the plan
    pub fn with_context(
        mut self,
        operation: impl Into<String>,
        document: Option<impl Into<String>>,
    ) -> Self {
        self.telemetry.operation = Some(operation.into());
        self.telemetry.document = document.map(|d| d.into());
        self
    }

    /// Attach telemetry to the plan
    pub fn with_telemetry(mut self, telemetry: PlanTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Add a tag to the plan's telemetry
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.telemetry.tags.push((key.into(), value.into()));
        self
    }

    /// Check if this is a single-step plan
    pub fn is_single_step(&self) -> bool {
        self.steps.len() == 1
    }

    /// Get the number of steps in the plan
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get the main step (for single-step plans)
    pub fn main_step(&self) -> Option<&ExecutionStep> {
        if self.steps.len() == 1 {
            self.steps.first()
        } else {
            self.steps.iter().find(|s| s.id == "main")
        }
    }

    /// Get a step by ID
    pub fn get_step(&self, id: &str) -> Option<&ExecutionStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Get steps in execution order (respecting dependencies)
    ///
    /// Returns steps sorted so that dependencies come before dependents.
    /// A dependency cycle, or a dependency on a missing step, is a
    /// validation error.
    pub fn steps_in_order(&self) -> FacadeResult<Vec<&ExecutionStep>> {
        // Simple topological sort
        let mut result = Vec::with_capacity(self.steps.len());
        let mut completed: HashSet<&str> = HashSet::new();

        while result.len() < self.steps.len() {
            let mut made_progress = false;

            for step in &self.steps {
                if completed.contains(step.id.as_str()) {
                    continue;
                }

                let deps_satisfied = step
                    .depends_on
                    .iter()
                    .all(|dep| completed.contains(dep.as_str()));

                if deps_satisfied {
                    result.push(step);
                    completed.insert(&step.id);
                    made_progress = true;
                }
            }

            if !made_progress {
                return Err(FacadeError::validation(
                    "execution plan has unsatisfiable step dependencies",
                ));
            }
        }

        Ok(result)
    }
}

impl ExecutionStep {
    /// Create a new execution step
    pub fn new(id: impl Into<String>, stmt: Stmt, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stmt,
            description: description.into(),
            depends_on: vec![],
        }
    }

    /// Add a dependency on another step
    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        self.depends_on.push(step_id.into());
        self
    }

    /// Add multiple dependencies
    pub fn depends_on_all(mut self, step_ids: Vec<impl Into<String>>) -> Self {
        for id in step_ids {
            self.depends_on.push(id.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn dummy_stmt() -> Stmt {
        Stmt::Select(SelectStmt::columns(vec![SelectColumn::star()]))
    }

    fn delete_stmt() -> Stmt {
        Stmt::Delete(DeleteStmt::new(TableRef::new("canvas")))
    }

    #[test]
    fn test_single_step_plan() {
        let plan = ExecutionPlan::single(dummy_stmt(), "test query");

        assert!(plan.is_single_step());
        assert_eq!(plan.step_count(), 1);
        assert!(plan.main_step().is_some());
    }

    #[test]
    fn test_chained_plan() {
        let plan = ExecutionPlan::chained(vec![delete_stmt(), delete_stmt(), delete_stmt()]);

        assert_eq!(plan.step_count(), 3);
        assert_eq!(plan.get_step("write-2").unwrap().depends_on, vec!["write-1"]);
        assert_eq!(plan.get_step("write-0").unwrap().description, "delete #0");

        let ordered: Vec<&str> = plan
            .steps_in_order()
            .unwrap()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["write-0", "write-1", "write-2"]);
    }

    #[test]
    fn test_steps_in_order() {
        let steps = vec![
            ExecutionStep::new("c", dummy_stmt(), "third")
                .depends_on_all(vec!["a", "b"]),
            ExecutionStep::new("a", dummy_stmt(), "first"),
            ExecutionStep::new("b", dummy_stmt(), "second").depends_on("a"),
        ];

        let plan = ExecutionPlan::multi(steps);
        let ordered: Vec<&str> = plan
            .steps_in_order()
            .unwrap()
            .iter()
            .map(|s| s.id.as_str())
            .collect();

        // a must come before b, b must come before c
        let a_idx = ordered.iter().position(|&id| id == "a").unwrap();
        let b_idx = ordered.iter().position(|&id| id == "b").unwrap();
        let c_idx = ordered.iter().position(|&id| id == "c").unwrap();

        assert!(a_idx < b_idx);
        assert!(b_idx < c_idx);
    }

    #[test]
    fn test_cycle_is_an_error() {
        let steps = vec![
            ExecutionStep::new("a", dummy_stmt(), "first").depends_on("b"),
            ExecutionStep::new("b", dummy_stmt(), "second").depends_on("a"),
        ];
        let err = ExecutionPlan::multi(steps).steps_in_order().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_telemetry() {
        let plan = ExecutionPlan::single(dummy_stmt(), "test")
            .with_context("get_results", Some("{\"statementType\":\"select\"}"))
            .with_tag("dialect", "sqlite");

        assert!(plan.telemetry.document.is_some());
        assert_eq!(plan.telemetry.operation, Some("get_results".to_string()));
        assert!(!plan.telemetry.tags.is_empty());
    }
}
