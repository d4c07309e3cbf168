//! Filesystem vault backend for dex.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`ContentStore`](dex_storage::ContentStore) trait. It handles:
//!
//! - Recursive discovery of markdown documents under a vault root
//! - Document loading through `tokio::fs`
//! - Export copies and writes with parent directory creation
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use dex_storage::ContentStore;
//! use dex_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("vault"));
//! for file in storage.text_files().await? {
//!     println!("{}", file.path);
//! }
//! ```

mod scanner;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dex_storage::{ContentStore, File, FileRef, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Document paths are relative to `root`. Relative destination paths for
/// copies and writes also resolve against `root`; absolute destinations are
/// used as given.
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at a vault directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a document path stays inside the vault.
    ///
    /// Absolute paths and `..` segments are rejected.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        if Path::new(path).has_root() || path.split('/').any(|segment| segment == "..") {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a document path inside the vault.
    fn document_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        Ok(self.root.join(path))
    }

    fn destination(&self, dest: &Path) -> PathBuf {
        self.root.join(dest)
    }

    async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(e, Some(parent.to_path_buf())).with_backend(BACKEND))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FsStorage {
    async fn text_files(&self) -> Result<Vec<FileRef>, StorageError> {
        let root = self.root.clone();
        let paths = tokio::task::spawn_blocking(move || scanner::scan_markdown(&root))
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Other)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        tracing::debug!(root = %self.root.display(), count = paths.len(), "Vault scan completed");
        Ok(paths.into_iter().map(FileRef::new).collect())
    }

    async fn load(&self, file: &FileRef) -> Result<File, StorageError> {
        let full_path = self.document_path(&file.path)?;
        let body = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(&file.path))).with_backend(BACKEND))?;
        Ok(File {
            title: file.title.clone(),
            path: file.path.clone(),
            body,
        })
    }

    async fn copy(&self, file: &FileRef, dest: &Path) -> Result<(), StorageError> {
        let source = self.document_path(&file.path)?;
        let dest = self.destination(dest);
        Self::ensure_parent(&dest).await?;
        tokio::fs::copy(&source, &dest)
            .await
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(&file.path))).with_backend(BACKEND))?;
        Ok(())
    }

    async fn write(&self, data: &str, dest: &Path) -> Result<(), StorageError> {
        let dest = self.destination(dest);
        Self::ensure_parent(&dest).await?;
        tokio::fs::write(&dest, data)
            .await
            .map_err(|e| StorageError::io(e, Some(dest.clone())).with_backend(BACKEND))
    }

    async fn mkdir(&self, path: &Path) -> Result<(), StorageError> {
        let dir = self.destination(path);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(e, Some(dir.clone())).with_backend(BACKEND))
    }
}
