//! Hierarchy builder: flat person records to a leveled forest.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::HierarchyArena;
use crate::domain::entities::{ManagerTarget, PersonRecord};
use crate::domain::error::{DomainError, DomainResult, HierarchyIssue};
use crate::domain::node::HierarchyNode;

/// Build the forest for `records`, discarding absorbed issues.
pub fn build_hierarchy(records: &[PersonRecord]) -> DomainResult<Vec<HierarchyNode>> {
    Ok(HierarchyBuilder::new().build(records)?.into_forest())
}

/// Constructs hierarchies from person records.
///
/// Stateless between calls: every `build` starts from an empty arena.
#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Index, link and level `records`.
    ///
    /// Input order matters only for the order of roots and children. Records
    /// with an absent, malformed or unknown manager become roots. A manager
    /// chain that loops back on itself is an error.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&self, records: &[PersonRecord]) -> DomainResult<HierarchyArena> {
        let mut arena = HierarchyArena::new();

        self.index(&mut arena, records);
        self.link(&mut arena);
        self.level(&mut arena)?;

        debug!(
            nodes = arena.len(),
            roots = arena.roots().len(),
            issues = arena.issues().len(),
            "hierarchy built"
        );
        Ok(arena)
    }

    fn index(&self, arena: &mut HierarchyArena, records: &[PersonRecord]) {
        for record in records {
            let id = record.id.clone();
            let (_, replaced) = arena.insert_record(record.clone());
            if replaced {
                let issue = HierarchyIssue::DuplicateIdentifier { id };
                warn!("{issue}");
                arena.record_issue(issue);
            }
        }
    }

    fn link(&self, arena: &mut HierarchyArena) {
        let indices: Vec<Index> = arena.indices().collect();

        for idx in indices {
            let Some(node) = arena.get_node(idx) else {
                continue;
            };
            let id = node.record.id.clone();

            let (parent, issue) = match node.record.manager_ref.target() {
                ManagerTarget::Absent => (None, None),
                ManagerTarget::Id(manager) => match arena.lookup(manager) {
                    Some(parent) => (Some(parent), None),
                    None => (
                        None,
                        Some(HierarchyIssue::UnresolvedManager {
                            id,
                            manager: manager.to_string(),
                        }),
                    ),
                },
                ManagerTarget::Malformed => {
                    (None, Some(HierarchyIssue::MalformedManagerReference { id }))
                }
            };

            match parent {
                Some(parent) => arena.link(parent, idx),
                None => arena.push_root(idx),
            }
            if let Some(issue) = issue {
                warn!("{issue}");
                arena.record_issue(issue);
            }
        }
    }

    /// Assign levels from the roots down and reject cycles.
    ///
    /// Every node on a cycle has a resolved manager, so it never becomes a
    /// root and is not reached from one. Unreached nodes therefore point at a
    /// cycle.
    fn level(&self, arena: &mut HierarchyArena) -> DomainResult<()> {
        let mut visited: HashSet<Index> = HashSet::with_capacity(arena.len());
        let mut stack: Vec<(Index, usize)> =
            arena.roots().iter().rev().map(|&idx| (idx, 0)).collect();

        while let Some((idx, depth)) = stack.pop() {
            if !visited.insert(idx) {
                return Err(self.cycle_from(arena, idx));
            }
            let Some(node) = arena.get_node_mut(idx) else {
                continue;
            };
            node.level = depth;
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        let unreached = arena.indices().find(|idx| !visited.contains(idx));
        match unreached {
            Some(idx) => Err(self.cycle_from(arena, idx)),
            None => Ok(()),
        }
    }

    /// Follow manager links from `start` until an id repeats and return the loop.
    fn cycle_from(&self, arena: &HierarchyArena, start: Index) -> DomainError {
        let mut chain: Vec<Index> = Vec::new();
        let mut seen: HashSet<Index> = HashSet::new();
        let mut current = Some(start);

        while let Some(idx) = current {
            if !seen.insert(idx) {
                let begin = chain.iter().position(|&i| i == idx).unwrap_or(0);
                let mut path: Vec<String> = chain[begin..]
                    .iter()
                    .filter_map(|&i| arena.get_node(i))
                    .map(|node| node.record.id.clone())
                    .collect();
                if let Some(node) = arena.get_node(idx) {
                    path.push(node.record.id.clone());
                }
                warn!(path = ?path, "manager cycle");
                return DomainError::CyclicHierarchy { path };
            }
            chain.push(idx);
            current = arena.get_node(idx).and_then(|node| node.parent);
        }

        // Chain ended at a root: only reachable through the visited guard
        let path = chain
            .iter()
            .filter_map(|&i| arena.get_node(i))
            .map(|node| node.record.id.clone())
            .collect();
        DomainError::CyclicHierarchy { path }
    }
}
