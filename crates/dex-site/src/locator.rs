//! Structure manifest discovery.

use dex_storage::{ContentStore, File, StorageError};
use futures::future::try_join_all;

/// A document marked as the structure manifest of one site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteFile {
    /// Site id from the `#<tag>/<id>/_` marker.
    pub id: String,
    pub structure_file: File,
}

/// Site id of the first `#<tag>/<id>/_` marker in `body`.
///
/// The marker must be a whole whitespace-delimited token.
fn marker_id<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    body.split_whitespace().find_map(|token| {
        token
            .strip_prefix('#')?
            .strip_prefix(tag)?
            .strip_prefix('/')?
            .strip_suffix("/_")
            .filter(|id| !id.is_empty() && !id.contains('/'))
    })
}

/// Find every text document carrying a manifest marker for `tag`.
///
/// Documents are loaded concurrently. The result keeps the store's listing
/// order and holds one entry per matching document.
pub async fn find_structure_files(
    store: &dyn ContentStore,
    tag: &str,
) -> Result<Vec<SiteFile>, StorageError> {
    let refs = store.text_files().await?;
    let files = try_join_all(refs.iter().map(|file| store.load(file))).await?;

    let found: Vec<SiteFile> = files
        .into_iter()
        .filter_map(|file| {
            let id = marker_id(&file.body, tag)?.to_owned();
            Some(SiteFile {
                id,
                structure_file: file,
            })
        })
        .collect();

    tracing::debug!(tag, scanned = refs.len(), found = found.len(), "Manifest scan completed");
    Ok(found)
}
