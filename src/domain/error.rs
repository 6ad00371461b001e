//! Domain-level errors (no external dependencies)

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// Domain errors represent hierarchies that cannot be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Manager chain that loops back on itself. `path` lists the ids in
    /// manager order and ends with the id that closes the loop.
    #[error("cycle detected in hierarchy: {}", .path.iter().join(" -> "))]
    CyclicHierarchy { path: Vec<String> },
}

/// Result type for hierarchy operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Recoverable data-quality findings. The builder absorbs these with a
/// fallback and reports them next to the result.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyIssue {
    #[error("malformed manager reference on '{id}', treated as root")]
    MalformedManagerReference { id: String },

    #[error("manager '{manager}' of '{id}' not found, treated as root")]
    UnresolvedManager { id: String, manager: String },

    #[error("duplicate id '{id}', later record wins")]
    DuplicateIdentifier { id: String },
}

impl HierarchyIssue {
    /// Id of the record the issue was raised for.
    pub fn id(&self) -> &str {
        match self {
            HierarchyIssue::MalformedManagerReference { id }
            | HierarchyIssue::UnresolvedManager { id, .. }
            | HierarchyIssue::DuplicateIdentifier { id } => id,
        }
    }
}
