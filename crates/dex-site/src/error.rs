//! Error types for site assembly and export.

use dex_storage::StorageError;

/// Error raised while assembling a [`Site`](crate::Site).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No document carries the manifest marker.
    #[error("No structure manifest tagged #{tag}/<id>/_ found")]
    StructureNotFound {
        /// Marker tag that was searched for.
        tag: String,
    },

    /// More than one document carries the manifest marker.
    #[error("Found {} structure manifests tagged #{tag}: {}", .paths.len(), .paths.join(", "))]
    AmbiguousStructure {
        /// Marker tag that was searched for.
        tag: String,
        /// Paths of every matching manifest.
        paths: Vec<String>,
    },

    /// A list item's parent reference can't be attached.
    #[error("Malformed outline in {path} at line {}: {reason}", .line + 1)]
    MalformedOutline {
        /// Manifest document path.
        path: String,
        /// 0-based start line of the offending list item.
        line: usize,
        reason: String,
    },

    /// A link target is not a document in the corpus.
    #[error("Unresolved link to '{target}' in {path}")]
    UnresolvedLink {
        /// Document containing the link.
        path: String,
        /// Link target as written.
        target: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error raised while exporting a [`Site`](crate::Site).
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize site: {0}")]
    Serialize(#[from] serde_json::Error),
}
