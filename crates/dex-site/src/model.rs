//! Site aggregate types.
//!
//! Serialized field names are camelCase to match what site generator
//! templates expect (`sourcePath`, not `source_path`).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// Publish category of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blog,
    Docs,
}

/// A published document, keyed by `source_path` in a [`DocumentIndex`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub label: String,
    pub source_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Document body, set by [`enrich_content`](crate::enrich_content).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<Leaf> for Document {
    fn from(leaf: Leaf) -> Self {
        Self {
            label: leaf.label,
            source_path: leaf.source_path,
            slug: leaf.slug,
            category: leaf.category,
            content: None,
        }
    }
}

/// Documents keyed by source path.
pub type DocumentIndex = BTreeMap<String, Document>;

/// Terminal navigation entry pointing at a document or an external path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    pub label: String,
    pub source_path: String,
    /// Publish slug declared by the target document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Leaf {
    /// Create a leaf without slug or category.
    #[must_use]
    pub fn new(label: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source_path: source_path.into(),
            ..Self::default()
        }
    }
}

/// Labelled group of navigation entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl Branch {
    #[must_use]
    pub fn new(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }
}

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    Branch(Branch),
    Leaf(Leaf),
}

impl TreeNode {
    /// Display label of the node.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Branch(branch) => &branch.label,
            Self::Leaf(leaf) => &leaf.label,
        }
    }
}

impl From<Leaf> for TreeNode {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<Branch> for TreeNode {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Logo {
    /// Corpus path of the logo image, empty when the site has none.
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Blog {
    pub posts: DocumentIndex,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pages {
    pub docs: DocumentIndex,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Navbar {
    pub items: Vec<TreeNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    pub items: Vec<TreeNode>,
}

/// Navigation and content model of one exported site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Site {
    pub title: String,
    pub url: String,
    pub repo: String,
    /// Export directory.
    pub path: PathBuf,
    pub logo: Logo,
    pub blog: Blog,
    pub pages: Pages,
    pub navbar: Navbar,
    pub sidebar: Sidebar,
}

impl Site {
    /// Copy of the site with every document body dropped.
    #[must_use]
    pub fn without_content(&self) -> Self {
        let mut site = self.clone();
        for doc in site
            .blog
            .posts
            .values_mut()
            .chain(site.pages.docs.values_mut())
        {
            doc.content = None;
        }
        site
    }
}
