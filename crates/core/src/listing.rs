//! Recursive enumeration of the files under a remote directory
//!
//! Enumeration is best-effort: a subdirectory that cannot be listed is logged
//! and skipped, the rest of the tree is still returned.

use crate::error::Result;
use crate::path::{RemotePath, SEPARATOR};
use crate::traits::ObjectStore;

/// Depth limit guarding against cyclic or pathological listings
pub const DEFAULT_MAX_DEPTH: u32 = 20;

/// A child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Directory(RemotePath),
    File(RemotePath),
}

/// Decide whether a listed child is a directory or a file
///
/// Names ending in the separator are directories. Other names are probed for
/// a key under `name/`, since some stores list directories without the
/// trailing separator.
pub async fn classify_child<S>(store: &S, dir: &RemotePath, name: &str) -> Result<ListEntry>
where
    S: ObjectStore + ?Sized,
{
    let path = dir.join(name);
    if name.ends_with(SEPARATOR) {
        return Ok(ListEntry::Directory(path));
    }

    let marker = path.as_dir();
    if store.exists(&marker).await? {
        Ok(ListEntry::Directory(marker))
    } else {
        Ok(ListEntry::File(path))
    }
}

/// List every file under `dir`, descending at most `max_depth` levels
///
/// Files come back sorted by key.
pub async fn list_files_recursive<S>(store: &S, dir: &RemotePath, max_depth: u32) -> Vec<RemotePath>
where
    S: ObjectStore + ?Sized,
{
    let mut files = Vec::new();
    let mut pending = vec![(dir.as_dir(), max_depth)];

    while let Some((dir, depth)) = pending.pop() {
        if depth == 0 {
            tracing::warn!(dir = %dir, "Maximum listing depth reached, not descending further");
            continue;
        }

        match store.exists(&dir).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(dir = %dir, "Directory does not exist, skipping");
                continue;
            }
            Err(e) => {
                tracing::error!(dir = %dir, error = %e, "Failed to check directory, skipping");
                continue;
            }
        }

        let children = match store.list_dir(&dir).await {
            Ok(children) => children,
            Err(e) => {
                tracing::error!(dir = %dir, error = %e, "Failed to list directory, skipping");
                continue;
            }
        };

        for name in children {
            // A child made only of separators would resolve back to `dir`
            if name.trim_matches(SEPARATOR).is_empty() {
                tracing::warn!(dir = %dir, child = %name, "Skipping entry with an empty name");
                continue;
            }

            match classify_child(store, &dir, &name).await {
                Ok(ListEntry::Directory(sub)) => pending.push((sub, depth - 1)),
                Ok(ListEntry::File(file)) => files.push(file),
                Err(e) => {
                    tracing::error!(dir = %dir, child = %name, error = %e, "Failed to inspect entry, skipping");
                }
            }
        }
    }

    files.sort();
    files.dedup();
    files
}
