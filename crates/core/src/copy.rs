//! Store-to-store copies staged through local temporary storage
//!
//! No server-side copy is assumed: objects are downloaded into a temporary
//! file or directory and uploaded from there. Staging areas are removed when
//! the operation returns, whether it succeeded or not.

use std::path::Path;

use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::sync::{TransferSummary, download_directory, require_remote_dir, upload_directory};
use crate::traits::ObjectStore;
use crate::transfer::{download, upload};

const STAGING_PREFIX: &str = "obsync-";

/// Copy one object, staging it in the system temporary directory
pub async fn copy<S>(store: &S, src: &RemotePath, dst: &RemotePath, retries: u32) -> Result<u64>
where
    S: ObjectStore + ?Sized,
{
    copy_in(store, src, dst, retries, &std::env::temp_dir()).await
}

/// Copy one object, staging it under `staging_root`
pub async fn copy_in<S>(
    store: &S,
    src: &RemotePath,
    dst: &RemotePath,
    retries: u32,
    staging_root: &Path,
) -> Result<u64>
where
    S: ObjectStore + ?Sized,
{
    if !store.exists(src).await? {
        return Err(Error::NotFound(format!("source object {src}")));
    }

    let staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(staging_root)?
        .into_temp_path();

    download(store, src, &staged, retries).await?;
    let bytes = upload(store, &staged, dst, retries).await?;

    tracing::debug!(source = %src, target = %dst, bytes, "Copied object");
    Ok(bytes)
}

/// Copy a directory tree, staging it in the system temporary directory
pub async fn copy_directory<S>(
    store: &S,
    src_dir: &RemotePath,
    dst_dir: &RemotePath,
    retries: u32,
) -> Result<TransferSummary>
where
    S: ObjectStore + ?Sized,
{
    copy_directory_in(store, src_dir, dst_dir, retries, &std::env::temp_dir()).await
}

/// Copy a directory tree, staging it under `staging_root`
///
/// The download phase keeps its partial-failure tolerance, so the upload
/// phase copies whatever was retrieved. The returned summary is the upload
/// summary with source files that could not be downloaded counted as
/// attempted and failed.
pub async fn copy_directory_in<S>(
    store: &S,
    src_dir: &RemotePath,
    dst_dir: &RemotePath,
    retries: u32,
    staging_root: &Path,
) -> Result<TransferSummary>
where
    S: ObjectStore + ?Sized,
{
    require_remote_dir(store, src_dir).await?;
    if !dst_dir.is_dir() {
        return Err(Error::PathType(format!(
            "{dst_dir} is not a directory path (directory paths must end with '/')"
        )));
    }

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(staging_root)?;

    let result = async {
        let fetched = download_directory(store, src_dir, staging.path(), retries).await?;
        let mut summary = upload_directory(store, staging.path(), dst_dir, retries).await?;

        if fetched.failed > 0 {
            tracing::warn!(
                source = %src_dir,
                failed = fetched.failed,
                "Source files missing from directory copy"
            );
            summary.attempted += fetched.failed;
            summary.failed += fetched.failed;
        }
        Ok::<_, Error>(summary)
    }
    .await;

    if let Err(e) = &result {
        tracing::error!(source = %src_dir, target = %dst_dir, error = %e, "Directory copy failed");
    }

    result
}
