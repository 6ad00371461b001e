//! Arena-backed hierarchy storage.
//!
//! Nodes are allocated up front and linked by index; nested owned children are
//! only materialized at the very end via [`HierarchyArena::into_forest`].

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use indexmap::IndexMap;
use tracing::instrument;

use crate::domain::entities::PersonRecord;
use crate::domain::error::HierarchyIssue;
use crate::domain::node::HierarchyNode;

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct ArenaNode {
    /// Originating record
    pub record: PersonRecord,
    /// Index of the manager's node, None for roots
    pub parent: Option<Index>,
    /// Indices of direct reports, in first-seen order
    pub children: Vec<Index>,
    /// Depth below the root (0 for roots)
    pub level: usize,
}

impl fmt::Display for ArenaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {})", self.record.id, self.level)
    }
}

/// Summary figures for a built hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct HierarchyStats {
    pub nodes: usize,
    pub roots: usize,
    pub leaves: usize,
    /// Number of levels (0 for an empty hierarchy)
    pub depth: usize,
}

/// Arena holding a whole forest of hierarchy nodes.
#[derive(Debug, Default)]
pub struct HierarchyArena {
    arena: Arena<ArenaNode>,
    /// id -> node, in first-seen order
    lookup: IndexMap<String, Index>,
    roots: Vec<Index>,
    issues: Vec<HierarchyIssue>,
}

impl HierarchyArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, replacing the record of an existing node with the same id.
    ///
    /// Returns the node index and whether an earlier record was replaced.
    #[instrument(level = "trace", skip(self, record), fields(id = %record.id))]
    pub fn insert_record(&mut self, record: PersonRecord) -> (Index, bool) {
        if let Some(&idx) = self.lookup.get(&record.id) {
            if let Some(node) = self.arena.get_mut(idx) {
                node.record = record;
            }
            return (idx, true);
        }

        let id = record.id.clone();
        let idx = self.arena.insert(ArenaNode {
            record,
            parent: None,
            children: Vec::new(),
            level: 0,
        });
        self.lookup.insert(id, idx);
        (idx, false)
    }

    /// Attach `child` below `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn link(&mut self, parent: Index, child: Index) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn push_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    pub fn record_issue(&mut self, issue: HierarchyIssue) {
        self.issues.push(issue);
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode> {
        self.arena.get_mut(idx)
    }

    /// Index of the node with the given id.
    pub fn lookup(&self, id: &str) -> Option<Index> {
        self.lookup.get(id).copied()
    }

    /// Node indices in first-seen order.
    pub fn indices(&self) -> impl Iterator<Item = Index> + '_ {
        self.lookup.values().copied()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn issues(&self) -> &[HierarchyIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal over all roots, left to right.
    pub fn iter(&self) -> HierarchyIterator<'_> {
        HierarchyIterator::new(self)
    }

    /// Post-order traversal over all roots, left to right.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels in the deepest tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|(_, node)| node.level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Ids of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.record.id.clone())
            .collect()
    }

    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            nodes: self.len(),
            roots: self.roots.len(),
            leaves: self.leaf_nodes().len(),
            depth: self.depth(),
        }
    }

    /// Convert into nested owned nodes, one per root.
    ///
    /// Children are assembled bottom-up from a post-order walk, so no call
    /// stack proportional to the tree depth is needed.
    #[instrument(level = "debug", skip(self))]
    pub fn into_forest(mut self) -> Vec<HierarchyNode> {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        let mut built: HashMap<Index, HierarchyNode> = HashMap::with_capacity(order.len());

        for idx in order {
            let Some(node) = self.arena.remove(idx) else {
                continue;
            };
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                idx,
                HierarchyNode {
                    record: node.record,
                    level: node.level,
                    children,
                },
            );
        }

        self.roots
            .iter()
            .filter_map(|root| built.remove(root))
            .collect()
    }
}

pub struct HierarchyIterator<'a> {
    arena: &'a HierarchyArena,
    stack: Vec<Index>,
}

impl<'a> HierarchyIterator<'a> {
    fn new(arena: &'a HierarchyArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for HierarchyIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a HierarchyArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a HierarchyArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&idx| (idx, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
