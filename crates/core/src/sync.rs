//! Directory synchronization between local disk and the object store
//!
//! Files are transferred one at a time. The two directions have different
//! failure policies:
//! - download tolerates partial failure and only errors when every file failed
//! - upload errors if any file failed, after attempting all of them

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::listing::{DEFAULT_MAX_DEPTH, list_files_recursive};
use crate::path::{RemotePath, SEPARATOR};
use crate::traits::ObjectStore;
use crate::transfer::{download, upload};

/// Local subdirectory holding index artifacts, never uploaded
pub const INDEX_DIR_NAME: &str = "index_parquet";

/// Outcome counts of a directory operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Bytes moved by the successful transfers
    pub bytes: u64,
}

impl TransferSummary {
    fn record(&mut self, outcome: &Result<u64>) {
        self.attempted += 1;
        match outcome {
            Ok(bytes) => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            Err(_) => self.failed += 1,
        }
    }

    /// Byte total in binary units, e.g. `1.5 MiB`
    pub fn human_bytes(&self) -> String {
        humansize::format_size(self.bytes, humansize::BINARY)
    }

    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

impl fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} file(s) succeeded, {} failed",
            self.succeeded, self.attempted, self.failed
        )
    }
}

/// Check that `dir` names an existing remote directory
///
/// A path without the trailing separator, or one that only exists as a file,
/// is reported as a path type mismatch rather than as missing.
pub async fn require_remote_dir<S>(store: &S, dir: &RemotePath) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    if !dir.is_dir() {
        return if store.exists(dir).await? {
            Err(Error::PathType(format!(
                "{dir} is a file, not a directory (directory paths must end with '/')"
            )))
        } else if store.exists(&dir.as_dir()).await? {
            Err(Error::PathType(format!(
                "{dir} is a directory but the path is missing its trailing '/'"
            )))
        } else {
            Err(Error::NotFound(format!("remote directory {dir}")))
        };
    }

    if store.exists(dir).await? {
        return Ok(());
    }

    if let Some(file) = dir.as_file()
        && store.exists(&file).await?
    {
        return Err(Error::PathType(format!(
            "{file} is a file, not a directory (directory paths must end with '/')"
        )));
    }

    Err(Error::NotFound(format!("remote directory {dir}")))
}

/// Download every file under `remote_dir` into `local_dir`
///
/// Returns normally when only some files failed; the failures are logged.
/// Returns `Error::AggregateTransfer` when every file failed.
pub async fn download_directory<S>(
    store: &S,
    remote_dir: &RemotePath,
    local_dir: &Path,
    retries: u32,
) -> Result<TransferSummary>
where
    S: ObjectStore + ?Sized,
{
    require_remote_dir(store, remote_dir).await?;
    tokio::fs::create_dir_all(local_dir).await?;

    let files = list_files_recursive(store, remote_dir, DEFAULT_MAX_DEPTH).await;
    if files.is_empty() {
        tracing::warn!(source = %remote_dir, "No files to download");
        return Ok(TransferSummary::default());
    }

    tracing::info!(
        source = %remote_dir,
        target = %local_dir.display(),
        files = files.len(),
        "Downloading directory"
    );

    let mut summary = TransferSummary::default();
    for file in &files {
        let outcome = match file.relative_to(remote_dir).map(|rel| local_target(local_dir, rel)) {
            Some(Ok(local)) => download(store, file, &local, retries).await,
            Some(Err(e)) => Err(e),
            None => Err(Error::InvalidPath(format!("{file} is outside {remote_dir}"))),
        };
        if let Err(e) = &outcome {
            tracing::error!(file = %file, error = %e, "Failed to download file");
        }
        summary.record(&outcome);
    }

    tracing::info!(
        succeeded = summary.succeeded,
        attempted = summary.attempted,
        failed = summary.failed,
        size = %summary.human_bytes(),
        "Directory download complete"
    );

    if summary.all_failed() {
        return Err(Error::AggregateTransfer {
            operation: "download_directory",
            summary,
        });
    }
    if summary.failed > 0 {
        tracing::warn!(
            failed = summary.failed,
            attempted = summary.attempted,
            "Some files failed to download, continuing with the rest"
        );
    }

    Ok(summary)
}

/// Map a relative object key to a path under `root`
///
/// Keys that would step outside `root` are rejected.
fn local_target(root: &Path, relative: &str) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in relative.split(SEPARATOR) {
        match segment {
            "" | "." | ".." => {
                return Err(Error::InvalidPath(format!(
                    "refusing to map key segment '{segment}' in '{relative}' to a local path"
                )));
            }
            s => path.push(s),
        }
    }
    Ok(path)
}

/// Upload every file under `local_dir` to `remote_dir`
///
/// Files below an `index_parquet` directory are skipped. All files are
/// attempted; if any failed, `Error::AggregateTransfer` is returned.
pub async fn upload_directory<S>(
    store: &S,
    local_dir: &Path,
    remote_dir: &RemotePath,
    retries: u32,
) -> Result<TransferSummary>
where
    S: ObjectStore + ?Sized,
{
    match tokio::fs::metadata(local_dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(Error::PathType(format!(
                "{} is not a directory",
                local_dir.display()
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(format!(
                "local directory {}",
                local_dir.display()
            )));
        }
        Err(e) => return Err(e.into()),
    }

    if !remote_dir.is_dir() {
        return Err(Error::PathType(format!(
            "{remote_dir} is not a directory path (directory paths must end with '/')"
        )));
    }

    let root = local_dir.to_path_buf();
    let files = tokio::task::spawn_blocking(move || collect_local_files(&root))
        .await
        .map_err(|e| Error::General(format!("directory walk aborted: {e}")))??;

    if files.is_empty() {
        tracing::warn!(source = %local_dir.display(), "No files to upload");
        return Ok(TransferSummary::default());
    }

    if let Err(e) = store.make_dirs(remote_dir).await {
        tracing::debug!(dir = %remote_dir, error = %e, "Could not create remote directory");
    }

    tracing::info!(
        source = %local_dir.display(),
        target = %remote_dir,
        files = files.len(),
        "Uploading directory"
    );

    let mut summary = TransferSummary::default();
    for (path, relative) in &files {
        let remote = remote_dir.join(relative);
        let outcome = upload(store, path, &remote, retries).await;
        if let Err(e) = &outcome {
            tracing::error!(file = %path.display(), error = %e, "Failed to upload file");
        }
        summary.record(&outcome);
    }

    tracing::info!(
        succeeded = summary.succeeded,
        attempted = summary.attempted,
        failed = summary.failed,
        size = %summary.human_bytes(),
        "Directory upload complete"
    );

    if summary.failed > 0 {
        return Err(Error::AggregateTransfer {
            operation: "upload_directory",
            summary,
        });
    }

    Ok(summary)
}

/// Collect `(path, relative key)` for every file under `root`, sorted by path
fn collect_local_files(root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir() && entry.file_name() == INDEX_DIR_NAME)
        });

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::General(e.to_string()))?;
        let key = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        files.push((entry.path().to_path_buf(), key));
    }

    Ok(files)
}
