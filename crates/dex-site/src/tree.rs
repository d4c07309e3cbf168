//! Navigation tree reconstruction from parent-referenced list items.
//!
//! # Architecture
//!
//! Nodes are stored in a flat arena with children tracked by indices, and a
//! line index maps each list item's start line to its arena slot. Items are
//! added in line order, so a parent is always in the arena before any of its
//! descendants. [`TreeBuilder::build`] then assembles the owned
//! [`TreeNode`] values from the roots down.

use std::collections::HashMap;

use crate::error::BuildError;
use crate::model::{Branch, Leaf, TreeNode};

/// Node payload before its children are attached.
#[derive(Debug)]
pub(crate) enum Node {
    Leaf(Leaf),
    /// Branch label.
    Branch(String),
}

/// Builder for navigation trees.
pub(crate) struct TreeBuilder<'a> {
    /// Document the list items come from, for error messages.
    source: &'a str,
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    /// Start line of each item to its arena index.
    lines: HashMap<usize, usize>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            children: Vec::new(),
            roots: Vec::new(),
            lines: HashMap::new(),
        }
    }

    /// Add the node built for the list item starting on `line`.
    ///
    /// `parent` is the start line of the enclosing item. It must already be
    /// in the tree and be a branch.
    pub(crate) fn add_item(
        &mut self,
        line: usize,
        node: Node,
        parent: Option<usize>,
    ) -> Result<usize, BuildError> {
        let parent_idx = match parent {
            None => None,
            Some(parent_line) if parent_line >= line => {
                return Err(self.malformed(
                    line,
                    format!("parent line {} does not precede the item", parent_line + 1),
                ));
            }
            Some(parent_line) => {
                let Some(&idx) = self.lines.get(&parent_line) else {
                    return Err(self.malformed(
                        line,
                        format!("parent line {} is not a list item", parent_line + 1),
                    ));
                };
                if let Node::Leaf(leaf) = &self.nodes[idx] {
                    return Err(self.malformed(
                        line,
                        format!(
                            "parent line {} is a link to '{}', not a group",
                            parent_line + 1,
                            leaf.source_path
                        ),
                    ));
                }
                Some(idx)
            }
        };

        let idx = self.nodes.len();
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.lines.insert(line, idx);

        if let Some(parent) = parent_idx {
            self.children[parent].push(idx);
        } else {
            self.roots.push(idx);
        }

        Ok(idx)
    }

    /// Assemble the root sequence in insertion order.
    pub(crate) fn build(self) -> Vec<TreeNode> {
        let mut slots: Vec<Option<Node>> = self.nodes.into_iter().map(Some).collect();
        self.roots
            .iter()
            .filter_map(|&idx| assemble(idx, &mut slots, &self.children))
            .collect()
    }

    fn malformed(&self, line: usize, reason: String) -> BuildError {
        BuildError::MalformedOutline {
            path: self.source.to_owned(),
            line,
            reason,
        }
    }
}

/// Take the node at `idx` and recursively attach its children.
///
/// Every index is reachable from exactly one parent or root, so each slot is
/// taken once.
fn assemble(idx: usize, slots: &mut [Option<Node>], children: &[Vec<usize>]) -> Option<TreeNode> {
    match slots[idx].take()? {
        Node::Leaf(leaf) => Some(TreeNode::Leaf(leaf)),
        Node::Branch(label) => {
            let nested = children[idx]
                .iter()
                .filter_map(|&child| assemble(child, slots, children))
                .collect();
            Some(TreeNode::Branch(Branch::new(label, nested)))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn leaf(label: &str) -> Node {
        Node::Leaf(Leaf::new(label, format!("{label}.md")))
    }

    fn branch(label: &str) -> Node {
        Node::Branch(label.to_owned())
    }

    #[test]
    fn test_single_root_leaf() {
        let mut builder = TreeBuilder::new("Structure.md");
        builder.add_item(3, leaf("A"), None).unwrap();

        assert_eq!(builder.build(), vec![TreeNode::Leaf(Leaf::new("A", "A.md"))]);
    }

    #[test]
    fn test_add_item_returns_index() {
        let mut builder = TreeBuilder::new("Structure.md");

        assert_eq!(builder.add_item(3, branch("G"), None).unwrap(), 0);
        assert_eq!(builder.add_item(4, leaf("A"), Some(3)).unwrap(), 1);
    }

    #[test]
    fn test_nested_branches_preserve_order() {
        let mut builder = TreeBuilder::new("Structure.md");
        builder.add_item(1, branch("docs"), None).unwrap();
        builder.add_item(2, leaf("A"), Some(1)).unwrap();
        builder.add_item(3, branch("Group"), Some(1)).unwrap();
        builder.add_item(4, leaf("B"), Some(3)).unwrap();
        builder.add_item(5, leaf("C"), Some(1)).unwrap();
        builder.add_item(6, leaf("D"), None).unwrap();

        let expected = vec![
            TreeNode::Branch(Branch::new(
                "docs",
                vec![
                    Leaf::new("A", "A.md").into(),
                    Branch::new("Group", vec![Leaf::new("B", "B.md").into()]).into(),
                    Leaf::new("C", "C.md").into(),
                ],
            )),
            Leaf::new("D", "D.md").into(),
        ];
        assert_eq!(builder.build(), expected);
    }

    fn flatten(nodes: &[TreeNode], out: &mut Vec<String>) {
        for node in nodes {
            out.push(node.label().to_owned());
            if let TreeNode::Branch(b) = node {
                flatten(&b.children, out);
            }
        }
    }

    #[test]
    fn test_depth_first_order_matches_line_order() {
        let mut builder = TreeBuilder::new("Structure.md");
        let items = [
            (0, None),
            (1, Some(0)),
            (2, Some(1)),
            (3, Some(2)),
            (4, Some(1)),
            (5, Some(0)),
            (6, None),
            (7, Some(6)),
        ];
        for (line, parent) in items {
            builder
                .add_item(line, Node::Branch(line.to_string()), parent)
                .unwrap();
        }

        let mut labels = Vec::new();
        flatten(&builder.build(), &mut labels);

        let expected: Vec<String> = (0..8).map(|l: usize| l.to_string()).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_missing_parent_is_malformed() {
        let mut builder = TreeBuilder::new("Structure.md");
        builder.add_item(3, branch("G"), None).unwrap();

        let err = builder.add_item(5, leaf("A"), Some(2)).unwrap_err();

        assert!(matches!(
            err,
            BuildError::MalformedOutline { ref path, line: 5, .. } if path == "Structure.md"
        ));
    }

    #[test]
    fn test_forward_parent_is_malformed() {
        let mut builder = TreeBuilder::new("Structure.md");

        let err = builder.add_item(3, branch("G"), Some(3)).unwrap_err();

        assert!(err.to_string().contains("does not precede"));
    }

    #[test]
    fn test_leaf_parent_is_malformed() {
        let mut builder = TreeBuilder::new("Structure.md");
        builder.add_item(3, leaf("A"), None).unwrap();

        let err = builder.add_item(4, leaf("B"), Some(3)).unwrap_err();

        assert!(err.to_string().contains("is a link to 'A.md'"));
    }

    #[test]
    fn test_empty_builder() {
        assert!(TreeBuilder::new("Structure.md").build().is_empty());
    }
}
