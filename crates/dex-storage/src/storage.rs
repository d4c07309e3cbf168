//! Content store trait and error types.
//!
//! Provides the core [`ContentStore`] trait for listing and reading corpus
//! documents and writing exported files, along with [`StorageError`] for
//! unified error handling across backends.
//!
//! # Path Convention
//!
//! Document paths ([`FileRef::path`]) are `/`-separated and relative to the
//! corpus root, e.g. `"Page Simple.md"` or `"notes/Guide.md"`. They are the
//! canonical identity of a document. Destination paths passed to `copy`,
//! `write` and `mkdir` are filesystem paths chosen by the caller.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dex_meta::{Outline, extract_outline};

/// Reference to a document in the corpus.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRef {
    /// Display name, usually the file name.
    pub title: String,
    /// Path relative to the corpus root.
    pub path: String,
}

impl FileRef {
    /// Create a reference whose title is the last path segment.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let title = path.rsplit('/').next().unwrap_or_default().to_owned();
        Self { title, path }
    }
}

/// A loaded document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    pub title: String,
    pub path: String,
    /// Full document text.
    pub body: String,
}

impl File {
    /// Reference to this document.
    #[must_use]
    pub fn file_ref(&self) -> FileRef {
        FileRef {
            title: self.title.clone(),
            path: self.path.clone(),
        }
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource already exists.
    AlreadyExists,
    /// Invalid path or identifier.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Whether the error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Access to the corpus and to the export destination.
///
/// Reads are keyed by [`FileRef`]; all operations are independent and may be
/// awaited concurrently.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// List every text document in the corpus.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the corpus cannot be listed.
    async fn text_files(&self) -> Result<Vec<FileRef>, StorageError>;

    /// Load a document with its full body.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or can't be read.
    async fn load(&self, file: &FileRef) -> Result<File, StorageError>;

    /// Positional outline of a document.
    ///
    /// The default implementation loads the document and extracts the outline
    /// from its markdown body.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or can't be read.
    async fn outline(&self, file: &FileRef) -> Result<Outline, StorageError> {
        let file = self.load(file).await?;
        Ok(extract_outline(&file.body))
    }

    /// Copy a corpus document to a destination path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the source is missing or the copy fails.
    async fn copy(&self, file: &FileRef, dest: &Path) -> Result<(), StorageError>;

    /// Write text to a destination path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    async fn write(&self, data: &str, dest: &Path) -> Result<(), StorageError>;

    /// Create a directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory can't be created.
    async fn mkdir(&self, path: &Path) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_ref_title_is_file_name() {
        let file = FileRef::new("notes/Page Simple.md");

        assert_eq!(file.title, "Page Simple.md");
        assert_eq!(file.path, "notes/Page Simple.md");
    }

    #[test]
    fn test_file_ref_root_file() {
        let file = FileRef::new("Structure.md");

        assert_eq!(file.title, "Structure.md");
    }

    #[test]
    fn test_file_to_ref() {
        let file = File {
            title: "A.md".to_owned(),
            path: "A.md".to_owned(),
            body: "text".to_owned(),
        };

        assert_eq!(file.file_ref(), FileRef::new("A.md"));
    }

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert!(err.path.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_not_found() {
        let err = StorageError::not_found("A.md");

        assert!(err.is_not_found());
        assert_eq!(err.path.as_deref(), Some(Path::new("A.md")));
    }

    #[test]
    fn test_storage_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound).with_source(io_err);

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("file not found"));
    }

    #[test]
    fn test_storage_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::io(io_err, None);

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_storage_error_io_other() {
        let io_err = std::io::Error::other("disk full");
        let err = StorageError::io(io_err, Some(PathBuf::from("out/a.md")));

        assert_eq!(err.kind, StorageErrorKind::Other);
        assert_eq!(err.path.as_deref(), Some(Path::new("out/a.md")));
    }

    #[test]
    fn test_storage_error_display_simple() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("/vault/A.md")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: /vault/A.md)"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
