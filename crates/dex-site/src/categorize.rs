//! Leaf categorization against the blog and pages indices.

use crate::model::{Category, DocumentIndex, TreeNode};

/// Set the category of every leaf whose source path is indexed.
///
/// Blog membership wins over pages membership. Leaves in neither index keep
/// their category unset. Branches are recursed into but never categorized.
pub fn categorize(items: &mut [TreeNode], posts: &DocumentIndex, docs: &DocumentIndex) {
    for item in items {
        match item {
            TreeNode::Leaf(leaf) => {
                if posts.contains_key(&leaf.source_path) {
                    leaf.category = Some(Category::Blog);
                } else if docs.contains_key(&leaf.source_path) {
                    leaf.category = Some(Category::Docs);
                }
            }
            TreeNode::Branch(branch) => categorize(&mut branch.children, posts, docs),
        }
    }
}
