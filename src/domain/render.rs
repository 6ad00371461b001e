/*
Text rendering of a hierarchy with termtree.

`level` decides the initial expand/collapse depth: nodes at `expand_depth`
keep their subtree folded and only show how many people sit below them.
 */
use termtree::Tree;

use crate::domain::node::HierarchyNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Payload field used as node label
    pub label_field: String,
    /// Deepest level shown expanded, None for the full tree
    pub expand_depth: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            label_field: "name".to_string(),
            expand_depth: None,
        }
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, options: &RenderOptions) -> Tree<String>;
}

impl TreeNodeConvert for HierarchyNode {
    fn to_tree_string(&self, options: &RenderOptions) -> Tree<String> {
        let label = self.label(&options.label_field);

        let collapsed = options
            .expand_depth
            .is_some_and(|depth| self.level >= depth);
        if collapsed && !self.children.is_empty() {
            let hidden = self.node_count() - 1;
            return Tree::new(format!("{label} (+{hidden})"));
        }

        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(options))
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}

/// Render every tree of the forest, one after the other.
pub fn render_forest(forest: &[HierarchyNode], options: &RenderOptions) -> String {
    forest
        .iter()
        .map(|root| root.to_tree_string(options).to_string())
        .collect::<Vec<_>>()
        .join("")
}
