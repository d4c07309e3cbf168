//! Site model assembly for dex.
//!
//! Turns a structure manifest inside a markdown vault into a [`Site`]: blog
//! and pages indices plus categorized navbar and sidebar trees, ready for a
//! static site generator.
//!
//! A manifest is any document carrying a `#<tag>/<id>/_` marker. Its
//! outline is read by heading:
//!
//! - **Blog**, **Pages**: flat link lists, indexed by source path
//! - **Navbar**, **Sidebars**: nested lists, rebuilt as [`TreeNode`] trees
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dex_site::{SiteBuilder, SiteConfig, SiteWriter, enrich_content};
//! use dex_storage_fs::FsStorage;
//!
//! let store = Arc::new(FsStorage::new("vault".into()));
//! let mut site = SiteBuilder::new(store.clone()).build(&SiteConfig::default()).await?;
//! enrich_content(store.as_ref(), &mut site).await?;
//! SiteWriter::new(store).write(&site).await?;
//! ```

mod builder;
mod categorize;
mod enrich;
mod error;
mod link;
mod locator;
mod model;
mod section;
mod structure;
mod tree;
mod writer;

pub use builder::{SiteBuilder, SiteConfig};
pub use categorize::categorize;
pub use enrich::enrich_content;
pub use error::{BuildError, WriteError};
pub use link::{is_external, normalize_target};
pub use locator::{SiteFile, find_structure_files};
pub use model::{
    Blog, Branch, Category, Document, DocumentIndex, Leaf, Logo, Navbar, Pages, Sidebar, Site,
    TreeNode,
};
pub use section::for_heading;
pub use writer::{SITE_FILE, SiteWriter, WriteSummary};
