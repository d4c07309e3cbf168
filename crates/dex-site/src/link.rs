//! Link resolution into navigation leaves.

use dex_meta::Link;
use dex_storage::{ContentStore, FileRef};
use percent_encoding::percent_decode_str;

use crate::error::BuildError;
use crate::model::Leaf;

/// Non-markdown file types a link or embed may point at directly.
const ASSET_EXTENSIONS: &[&str] = &[
    "avif", "bmp", "gif", "ico", "jpeg", "jpg", "pdf", "png", "svg", "webp",
];

/// Whether a link target points outside the corpus.
#[must_use]
pub fn is_external(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:")
}

/// Corpus path for a raw link target.
///
/// Drops `#heading` and `^block` suffixes, percent-decodes and strips a
/// leading `./` or `/`, so paths stay relative to the corpus root. `.md` is
/// appended unless the target already names a markdown file or a known asset
/// type; dots inside note names (`Release v1.2`) don't count as extensions.
/// External targets are returned unchanged.
#[must_use]
pub fn normalize_target(target: &str) -> String {
    if is_external(target) {
        return target.to_owned();
    }

    let end = target.find(['#', '^']).unwrap_or(target.len());
    let decoded = percent_decode_str(target[..end].trim()).decode_utf8_lossy();
    let path = decoded.strip_prefix("./").unwrap_or(&*decoded);
    let path = path.trim_start_matches('/');

    if has_file_extension(path) {
        path.to_owned()
    } else {
        format!("{path}.md")
    }
}

fn has_file_extension(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && (ext.eq_ignore_ascii_case("md")
                || ASSET_EXTENSIONS
                    .iter()
                    .any(|asset| ext.eq_ignore_ascii_case(asset)))
    })
}

/// Turns outline links of one document into leaves.
///
/// Slugs come from the target document's frontmatter. A target missing from
/// the corpus is an [`BuildError::UnresolvedLink`] when `strict`, otherwise
/// it degrades to a leaf without slug.
pub(crate) struct LinkResolver<'a> {
    store: &'a dyn ContentStore,
    /// Document the links are read from.
    source: &'a str,
    strict: bool,
}

impl<'a> LinkResolver<'a> {
    pub(crate) fn new(store: &'a dyn ContentStore, source: &'a str, strict: bool) -> Self {
        Self {
            store,
            source,
            strict,
        }
    }

    pub(crate) fn source(&self) -> &str {
        self.source
    }

    pub(crate) async fn resolve(&self, link: &Link) -> Result<Leaf, BuildError> {
        let mut leaf = Leaf::new(&link.display_text, normalize_target(&link.target));
        if is_external(&link.target) {
            return Ok(leaf);
        }

        match self.store.outline(&FileRef::new(leaf.source_path.clone())).await {
            Ok(outline) => {
                leaf.slug = outline.slug().map(str::to_owned);
                Ok(leaf)
            }
            Err(e) if e.is_not_found() => {
                let err = BuildError::UnresolvedLink {
                    path: self.source.to_owned(),
                    target: link.target.clone(),
                };
                if self.strict {
                    return Err(err);
                }
                tracing::warn!(
                    path = self.source,
                    line = link.position.start.line + 1,
                    target = %link.target,
                    "{err}, keeping link without slug"
                );
                Ok(leaf)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use dex_meta::Position;
    use dex_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn link(target: &str, display_text: &str) -> Link {
        Link {
            target: target.to_owned(),
            display_text: display_text.to_owned(),
            position: Position::lines(3, 3),
        }
    }

    fn store() -> MockStorage {
        MockStorage::new()
            .with_file("Docs Landing Page.md", "---\nslug: /\n---\n# Welcome\n")
            .with_file("Page Simple.md", "Simplest page.")
    }

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(normalize_target("Page Simple"), "Page Simple.md");
    }

    #[test]
    fn test_normalize_keeps_extension() {
        assert_eq!(normalize_target("notes/Page.md"), "notes/Page.md");
        assert_eq!(normalize_target("assets/logo.png"), "assets/logo.png");
    }

    #[test]
    fn test_normalize_dotted_note_names() {
        assert_eq!(normalize_target("Release v1.2"), "Release v1.2.md");
        assert_eq!(
            normalize_target("Meeting 2024.01.05"),
            "Meeting 2024.01.05.md"
        );
        assert_eq!(normalize_target("notes/v2.0/Intro"), "notes/v2.0/Intro.md");
        assert_eq!(normalize_target("Logo.PNG"), "Logo.PNG");
    }

    #[test]
    fn test_normalize_strips_leading_slash() {
        assert_eq!(normalize_target("/tmp/x.md"), "tmp/x.md");
        assert_eq!(normalize_target("/Page Simple"), "Page Simple.md");
    }

    #[test]
    fn test_normalize_strips_heading_and_block() {
        assert_eq!(normalize_target("Page#Setup"), "Page.md");
        assert_eq!(normalize_target("Page#^abc123"), "Page.md");
        assert_eq!(normalize_target("Page^abc123"), "Page.md");
    }

    #[test]
    fn test_normalize_percent_decodes_and_strips_dot_slash() {
        assert_eq!(normalize_target("./Page%20Simple.md"), "Page Simple.md");
    }

    #[test]
    fn test_normalize_external_verbatim() {
        assert_eq!(
            normalize_target("https://example.com/a#b"),
            "https://example.com/a#b"
        );
        assert_eq!(normalize_target("mailto:me@example.com"), "mailto:me@example.com");
    }

    #[tokio::test]
    async fn test_resolve_with_slug() {
        let store = store();
        let resolver = LinkResolver::new(&store, "Structure.md", false);

        let leaf = resolver
            .resolve(&link("Docs Landing Page", "Welcome"))
            .await
            .unwrap();

        assert_eq!(
            leaf,
            Leaf {
                slug: Some("/".to_owned()),
                ..Leaf::new("Welcome", "Docs Landing Page.md")
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_without_slug() {
        let store = store();
        let resolver = LinkResolver::new(&store, "Structure.md", false);

        let leaf = resolver
            .resolve(&link("Page Simple", "Page Simple"))
            .await
            .unwrap();

        assert_eq!(leaf, Leaf::new("Page Simple", "Page Simple.md"));
    }

    #[tokio::test]
    async fn test_resolve_dotted_note_name() {
        let store = MockStorage::new().with_file("Release v1.2.md", "---\nslug: /rel\n---\n");
        let resolver = LinkResolver::new(&store, "Structure.md", true);

        let leaf = resolver
            .resolve(&link("Release v1.2", "Release v1.2"))
            .await
            .unwrap();

        assert_eq!(
            leaf,
            Leaf {
                slug: Some("/rel".to_owned()),
                ..Leaf::new("Release v1.2", "Release v1.2.md")
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_missing_degrades() {
        let store = store();
        let resolver = LinkResolver::new(&store, "Structure.md", false);

        let leaf = resolver.resolve(&link("Missing", "Missing")).await.unwrap();

        assert_eq!(leaf, Leaf::new("Missing", "Missing.md"));
    }

    #[tokio::test]
    async fn test_resolve_missing_strict_fails() {
        let store = store();
        let resolver = LinkResolver::new(&store, "Structure.md", true);

        let err = resolver
            .resolve(&link("Missing", "Missing"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::UnresolvedLink { ref path, ref target }
                if path == "Structure.md" && target == "Missing"
        ));
    }

    #[tokio::test]
    async fn test_resolve_external_skips_lookup() {
        let store = MockStorage::new();
        let resolver = LinkResolver::new(&store, "Structure.md", true);

        let leaf = resolver
            .resolve(&link("https://github.com/org/site", "GitHub"))
            .await
            .unwrap();

        assert_eq!(leaf, Leaf::new("GitHub", "https://github.com/org/site"));
    }
}
