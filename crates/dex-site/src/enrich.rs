//! Document body loading.

use dex_storage::{ContentStore, FileRef, StorageError};
use futures::future::try_join_all;

use crate::model::Site;

/// Load the body of every blog post and doc page into `content`.
///
/// Loads run concurrently, each writing only its own document.
///
/// # Errors
///
/// Returns the first [`StorageError`], e.g. a not-found error naming an
/// indexed document missing from the corpus.
pub async fn enrich_content(store: &dyn ContentStore, site: &mut Site) -> Result<(), StorageError> {
    let docs = site
        .blog
        .posts
        .values_mut()
        .chain(site.pages.docs.values_mut());

    let loads = docs.map(|doc| async move {
        let file = store.load(&FileRef::new(doc.source_path.clone())).await?;
        doc.content = Some(file.body);
        Ok::<_, StorageError>(())
    });
    let loaded = try_join_all(loads).await?.len();

    tracing::debug!(documents = loaded, "Content loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use dex_storage::MockStorage;

    use super::*;
    use crate::model::{Document, Leaf};

    fn site(posts: &[&str], docs: &[&str]) -> Site {
        let mut site = Site::default();
        for path in posts {
            site.blog
                .posts
                .insert((*path).to_owned(), Document::from(Leaf::new(*path, *path)));
        }
        for path in docs {
            site.pages
                .docs
                .insert((*path).to_owned(), Document::from(Leaf::new(*path, *path)));
        }
        site
    }

    #[tokio::test]
    async fn test_enrich_loads_bodies() {
        let store = MockStorage::new()
            .with_file("Blog Simple.md", "Simplest post.")
            .with_file("Page Simple.md", "Simplest page.");
        let mut site = site(&["Blog Simple.md"], &["Page Simple.md"]);

        enrich_content(&store, &mut site).await.unwrap();

        assert_eq!(
            site.blog.posts["Blog Simple.md"].content.as_deref(),
            Some("Simplest post.")
        );
        assert_eq!(
            site.pages.docs["Page Simple.md"].content.as_deref(),
            Some("Simplest page.")
        );
    }

    #[tokio::test]
    async fn test_enrich_missing_document_fails() {
        let store = MockStorage::new();
        let mut site = site(&[], &["Missing.md"]);

        let err = enrich_content(&store, &mut site).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.path.as_deref(), Some(std::path::Path::new("Missing.md")));
    }

    #[tokio::test]
    async fn test_enrich_empty_site() {
        let mut site = Site::default();

        enrich_content(&MockStorage::new(), &mut site).await.unwrap();

        assert_eq!(site, Site::default());
    }
}
