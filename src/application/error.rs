//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DomainError, HierarchyIssue};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("invalid records in {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("strict mode: {} issue(s), first: {}", .issues.len(), .issues.first().map(ToString::to_string).unwrap_or_default())]
    StrictMode { issues: Vec<HierarchyIssue> },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
