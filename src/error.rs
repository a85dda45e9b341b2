//! Error types shared by every layer of the facade
//!
//! There are exactly two kinds of failure:
//!
//! - [`FacadeError::Validation`]: misuse detected by this crate (negated raw
//!   expressions, unknown statement tags, a single-result query that matched
//!   several rows, unsupported dialects). Raised where the misuse happens and
//!   propagated unchanged.
//! - [`FacadeError::Execution`]: anything the database reported. Wrapped once
//!   at the orchestration boundary with [`FacadeError::wrap`].

use std::error::Error as StdError;

/// Boxed backend error kept as the `source` of an execution failure
pub type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("execution error: {message}")]
    Execution {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

pub type FacadeResult<T> = Result<T, FacadeError>;

impl FacadeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            source: None,
        }
    }

    pub fn execution_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Execution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Re-wrap an error at the orchestration boundary.
    ///
    /// Validation errors pass through untouched; everything else becomes an
    /// execution error carrying `context` with the original error as its source.
    pub fn wrap(context: &str, err: FacadeError) -> Self {
        match err {
            Self::Validation(_) => err,
            Self::Execution { .. } => Self::Execution {
                message: context.to_string(),
                source: Some(Box::new(err)),
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}

impl From<rusqlite::Error> for FacadeError {
    fn from(err: rusqlite::Error) -> Self {
        let message = err.to_string();
        Self::execution_with_source(message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_wrap_keeps_validation() {
        let err = FacadeError::wrap("statement failed", FacadeError::validation("bad tag"));
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "validation error: bad tag");
    }

    #[test]
    fn test_wrap_execution_chains_source() {
        let err = FacadeError::wrap(
            "Exception executing SQL statement",
            FacadeError::execution("no such table: badTable"),
        );
        assert!(err.is_execution());
        assert_eq!(
            err.to_string(),
            "execution error: Exception executing SQL statement"
        );
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("execution error: no such table: badTable")
        );
    }
}
