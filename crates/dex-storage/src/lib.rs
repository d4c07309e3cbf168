//! Content store abstraction for dex.
//!
//! This crate provides a [`ContentStore`] trait over the corpus a site is
//! exported from. The site assembler only talks to this trait, so it can run
//! against a vault directory, an in-memory fixture, or any other backend.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentStore`] trait with listing, loading, outline, copy and write methods
//! - [`StorageError`] with semantic [`StorageErrorKind`] categories
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! Filesystem access lives in the `dex-storage-fs` crate.

#[cfg(feature = "mock")]
mod mock;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{ContentStore, File, FileRef, StorageError, StorageErrorKind};
