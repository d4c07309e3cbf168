//! Mock content store for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use dex_meta::{Outline, extract_outline};

use crate::storage::{ContentStore, File, FileRef, StorageError};

const BACKEND: &str = "Mock";

/// Mock content store for testing.
///
/// Stores documents in memory and records every copy, write and mkdir so
/// tests can assert on exported output. Use the builder methods to
/// configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use dex_storage::{ContentStore, FileRef, MockStorage};
///
/// let storage = MockStorage::new()
///     .with_file("Structure.md", "#docusaurus/test/_\n")
///     .with_file("Page Simple.md", "Simplest page.");
///
/// let files = storage.text_files().await?;
/// let page = storage.load(&FileRef::new("Page Simple.md")).await?;
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    outlines: RwLock<HashMap<String, Outline>>,
    writes: Mutex<BTreeMap<PathBuf, Vec<String>>>,
    copies: Mutex<BTreeMap<String, Vec<PathBuf>>>,
    dirs: Mutex<Vec<PathBuf>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given corpus path and body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.files.write().unwrap().insert(path.into(), body.into());
        self
    }

    /// Override the outline returned for a path.
    ///
    /// Lets tests feed outlines the markdown extractor would never produce.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_outline(self, path: impl Into<String>, outline: Outline) -> Self {
        self.outlines.write().unwrap().insert(path.into(), outline);
        self
    }

    /// Recorded writes, keyed by destination.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> BTreeMap<PathBuf, Vec<String>> {
        self.writes.lock().unwrap().clone()
    }

    /// Recorded copies, keyed by source document path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn copies(&self) -> BTreeMap<String, Vec<PathBuf>> {
        self.copies.lock().unwrap().clone()
    }

    /// Recorded directory creations, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().unwrap().clone()
    }

    fn body(&self, path: &str) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}

#[async_trait]
impl ContentStore for MockStorage {
    async fn text_files(&self) -> Result<Vec<FileRef>, StorageError> {
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|p| p.ends_with(".md"))
            .map(FileRef::new)
            .collect())
    }

    async fn load(&self, file: &FileRef) -> Result<File, StorageError> {
        let body = self.body(&file.path)?;
        Ok(File {
            title: file.title.clone(),
            path: file.path.clone(),
            body,
        })
    }

    async fn outline(&self, file: &FileRef) -> Result<Outline, StorageError> {
        if let Some(outline) = self.outlines.read().unwrap().get(&file.path) {
            return Ok(outline.clone());
        }
        let body = self.body(&file.path)?;
        Ok(extract_outline(&body))
    }

    async fn copy(&self, file: &FileRef, dest: &Path) -> Result<(), StorageError> {
        self.body(&file.path)?;
        self.copies
            .lock()
            .unwrap()
            .entry(file.path.clone())
            .or_default()
            .push(dest.to_path_buf());
        Ok(())
    }

    async fn write(&self, data: &str, dest: &Path) -> Result<(), StorageError> {
        self.writes
            .lock()
            .unwrap()
            .entry(dest.to_path_buf())
            .or_default()
            .push(data.to_owned());
        Ok(())
    }

    async fn mkdir(&self, path: &Path) -> Result<(), StorageError> {
        self.dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
