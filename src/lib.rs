//! orgtree: build org-chart hierarchies from flat person records.
//!
//! The core lives in [`domain`]: [`domain::build_hierarchy`] turns records that
//! optionally name a manager into a forest of leveled [`domain::HierarchyNode`]s.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_hierarchy, DomainError, HierarchyNode, ManagerRef, PersonRecord};
