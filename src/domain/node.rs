//! Owned hierarchy nodes handed to the rendering layer.

use serde::Serialize;

use crate::domain::entities::PersonRecord;

/// Output tree node: the originating record plus its reports and depth.
///
/// Serializes with the record's fields inlined next to `level` and `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub record: PersonRecord,
    pub level: usize,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Display label from the given payload field, falling back to the id.
    pub fn label(&self, field: &str) -> String {
        self.record
            .field_text(field)
            .unwrap_or_else(|| self.record.id.clone())
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Pre-order traversal of this subtree.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Find a node by id within this subtree.
    pub fn find(&self, id: &str) -> Option<&HierarchyNode> {
        self.iter().find(|node| node.id() == id)
    }
}

// Unlink descendants onto a heap stack so dropping a long chain does not recurse.
impl Drop for HierarchyNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

pub struct NodeIter<'a> {
    stack: Vec<&'a HierarchyNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a HierarchyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// All nodes of a forest in pre-order.
pub fn flatten(forest: &[HierarchyNode]) -> Vec<&HierarchyNode> {
    forest.iter().flat_map(HierarchyNode::iter).collect()
}

pub fn forest_node_count(forest: &[HierarchyNode]) -> usize {
    forest.iter().map(HierarchyNode::node_count).sum()
}
