//! Domain layer: entities and hierarchy construction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod node;
pub mod render;

pub use arena::{ArenaNode, HierarchyArena, HierarchyStats};
pub use builder::{build_hierarchy, HierarchyBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult, HierarchyIssue};
pub use node::{flatten, forest_node_count, HierarchyNode};
pub use render::{render_forest, RenderOptions, TreeNodeConvert};
