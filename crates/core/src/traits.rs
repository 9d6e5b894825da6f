//! ObjectStore trait definition
//!
//! The single-object primitives every store adapter provides. Everything
//! directory-shaped (recursive listing, synchronization, copying) is built on
//! top of these in this crate, so adapters stay small.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::path::RemotePath;

/// Single-object operations against an object store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the direct children of a directory, one level deep
    ///
    /// Names are relative to `dir`. Children the store reports as
    /// directories end with `/`; some stores omit the separator for part of
    /// their directory entries, which callers must probe for.
    async fn list_dir(&self, dir: &RemotePath) -> Result<Vec<String>>;

    /// Check whether an object (file path) or any key under a prefix
    /// (directory path) exists
    async fn exists(&self, path: &RemotePath) -> Result<bool>;

    /// Download one object into a local file, replacing it
    async fn get_file(&self, src: &RemotePath, dst: &Path) -> Result<()>;

    /// Upload one local file as an object
    async fn put_file(&self, src: &Path, dst: &RemotePath) -> Result<()>;

    /// Create a directory marker; creating an existing directory succeeds
    async fn make_dirs(&self, dir: &RemotePath) -> Result<()>;

    /// Read one object fully into memory
    async fn get_object(&self, path: &RemotePath) -> Result<Vec<u8>>;
}
