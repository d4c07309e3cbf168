//! Site model assembly.
//!
//! [`SiteBuilder::build`] runs as an explicit two-phase pipeline:
//!
//! 1. [`index_content`] collects the blog and pages indices from the flat
//!    link lists under the "Blog" and "Pages" headings.
//! 2. [`build_navigation`] extracts the "Navbar" and "Sidebars" trees and
//!    categorizes their leaves against the finished indices.
//!
//! The second phase takes the first phase's [`ContentIndex`] by reference,
//! so categorization can't run against partially built indices.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use dex_meta::Outline;
use dex_storage::{ContentStore, File};

use crate::categorize::categorize;
use crate::error::BuildError;
use crate::link::{LinkResolver, is_external, normalize_target};
use crate::locator::{SiteFile, find_structure_files};
use crate::model::{Blog, DocumentIndex, Leaf, Logo, Navbar, Pages, Site, Sidebar};
use crate::structure::{extract_link_tree, extract_links};

const BLOG_HEADING: &str = "Blog";
const PAGES_HEADING: &str = "Pages";
const NAVBAR_HEADING: &str = "Navbar";
const SIDEBARS_HEADING: &str = "Sidebars";

/// Navbar entry appended when the site has blog posts.
const BLOG_NAV_LABEL: &str = "Blog";
const BLOG_NAV_PATH: &str = "/blog";

/// Default manifest marker tag.
const DEFAULT_TAG: &str = "docusaurus";

/// Settings for one site build.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Manifest id to build; `None` accepts any single manifest.
    pub id: Option<String>,
    /// Manifest marker tag (`#<tag>/<id>/_`).
    pub tag: String,
    /// Site title; falls back to the manifest's frontmatter title.
    pub title: Option<String>,
    pub url: String,
    pub repo: String,
    /// Export directory.
    pub path: PathBuf,
    /// Corpus path of the logo; falls back to a manifest embed labelled "logo".
    pub logo: Option<String>,
    /// Fail on links to documents missing from the corpus.
    pub strict_links: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            id: None,
            tag: DEFAULT_TAG.to_owned(),
            title: None,
            url: String::new(),
            repo: String::new(),
            path: PathBuf::new(),
            logo: None,
            strict_links: false,
        }
    }
}

/// Flat document indices, the output of the first build phase.
#[derive(Debug, Default)]
pub(crate) struct ContentIndex {
    pub(crate) blog: Blog,
    pub(crate) pages: Pages,
}

/// Assembles a [`Site`] from the structure manifest in a content store.
pub struct SiteBuilder {
    store: Arc<dyn ContentStore>,
}

impl SiteBuilder {
    /// Create a builder reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Build the site model.
    ///
    /// Document bodies are not loaded; see [`enrich_content`](crate::enrich_content).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::StructureNotFound`] or
    /// [`BuildError::AmbiguousStructure`] unless exactly one manifest matches,
    /// [`BuildError::MalformedOutline`] for unattachable list items, and
    /// [`BuildError::UnresolvedLink`] for missing targets when
    /// `config.strict_links` is set.
    pub async fn build(&self, config: &SiteConfig) -> Result<Site, BuildError> {
        let start = Instant::now();

        let manifest = self.locate(config).await?;
        let file = &manifest.structure_file;
        let outline = self.store.outline(&file.file_ref()).await?;
        let resolver = LinkResolver::new(self.store.as_ref(), &file.path, config.strict_links);

        let index = index_content(&resolver, &outline).await?;
        let (navbar, sidebar) = build_navigation(&resolver, file, &outline, &index).await?;

        let site = Site {
            title: site_title(config, &outline),
            url: config.url.clone(),
            repo: config.repo.clone(),
            path: config.path.clone(),
            logo: Logo {
                path: logo_path(config, &outline),
            },
            blog: index.blog,
            pages: index.pages,
            navbar,
            sidebar,
        };

        tracing::info!(
            id = %manifest.id,
            manifest = %file.path,
            posts = site.blog.posts.len(),
            docs = site.pages.docs.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Site assembled"
        );
        Ok(site)
    }

    /// Find the single manifest for this build.
    async fn locate(&self, config: &SiteConfig) -> Result<SiteFile, BuildError> {
        let mut found = find_structure_files(self.store.as_ref(), &config.tag).await?;
        if let Some(id) = &config.id {
            found.retain(|site| &site.id == id);
        }

        if found.len() > 1 {
            return Err(BuildError::AmbiguousStructure {
                tag: config.tag.clone(),
                paths: found
                    .into_iter()
                    .map(|site| site.structure_file.path)
                    .collect(),
            });
        }

        let manifest = found.pop().ok_or_else(|| BuildError::StructureNotFound {
            tag: config.tag.clone(),
        })?;
        tracing::debug!(id = %manifest.id, path = %manifest.structure_file.path, "Manifest located");
        Ok(manifest)
    }
}

/// First phase: blog and pages indices keyed by source path.
pub(crate) async fn index_content(
    resolver: &LinkResolver<'_>,
    outline: &Outline,
) -> Result<ContentIndex, BuildError> {
    let (posts, docs) = futures::try_join!(
        extract_links(resolver, outline, BLOG_HEADING),
        extract_links(resolver, outline, PAGES_HEADING),
    )?;

    Ok(ContentIndex {
        blog: Blog {
            posts: to_index(resolver, posts),
        },
        pages: Pages {
            docs: to_index(resolver, docs),
        },
    })
}

/// Second phase: categorized navbar and sidebar trees.
pub(crate) async fn build_navigation(
    resolver: &LinkResolver<'_>,
    file: &File,
    outline: &Outline,
    index: &ContentIndex,
) -> Result<(Navbar, Sidebar), BuildError> {
    let (mut navbar, mut sidebar) = futures::try_join!(
        extract_link_tree(resolver, file, outline, NAVBAR_HEADING),
        extract_link_tree(resolver, file, outline, SIDEBARS_HEADING),
    )?;

    categorize(&mut sidebar, &index.blog.posts, &index.pages.docs);
    categorize(&mut navbar, &index.blog.posts, &index.pages.docs);

    if !index.blog.posts.is_empty() {
        navbar.push(Leaf::new(BLOG_NAV_LABEL, BLOG_NAV_PATH).into());
    }

    Ok((Navbar { items: navbar }, Sidebar { items: sidebar }))
}

/// Key leaves by source path. A later duplicate replaces the earlier entry.
fn to_index(resolver: &LinkResolver<'_>, leaves: Vec<Leaf>) -> DocumentIndex {
    let mut index = DocumentIndex::new();
    for leaf in leaves {
        if is_external(&leaf.source_path) {
            tracing::warn!(
                path = resolver.source(),
                target = %leaf.source_path,
                "External link can't be published, skipping"
            );
            continue;
        }
        index.insert(leaf.source_path.clone(), leaf.into());
    }
    index
}

fn site_title(config: &SiteConfig, outline: &Outline) -> String {
    config
        .title
        .clone()
        .or_else(|| outline.title().map(str::to_owned))
        .unwrap_or_default()
}

fn logo_path(config: &SiteConfig, outline: &Outline) -> String {
    config
        .logo
        .clone()
        .or_else(|| {
            outline
                .embeds
                .iter()
                .find(|embed| embed.display_text.eq_ignore_ascii_case("logo"))
                .map(|embed| normalize_target(&embed.target))
        })
        .unwrap_or_default()
}
