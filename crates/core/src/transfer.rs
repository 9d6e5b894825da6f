//! Single-object transfer with retries and post-transfer verification

use std::path::Path;

use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::retry::retry_transfer;
use crate::traits::ObjectStore;

/// Download one object to a local file
///
/// Parent directories of `local` are created first. An attempt counts as
/// successful if the store reported success and the local file exists
/// afterwards; zero-byte objects are valid. Transport errors of the final
/// attempt are returned unchanged, and whatever the failed attempts left at
/// `local` is removed. Returns the size of the downloaded file.
pub async fn download<S>(store: &S, remote: &RemotePath, local: &Path, retries: u32) -> Result<u64>
where
    S: ObjectStore + ?Sized,
{
    if remote.is_dir() {
        return Err(Error::PathType(format!(
            "{remote} is a directory, expected a file path"
        )));
    }

    if let Some(parent) = local.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let label = remote.to_string();
    let label_ref = label.as_str();

    let result = retry_transfer(retries, label_ref, move |attempt| async move {
        store.get_file(remote, local).await?;
        verify_local(local, label_ref, attempt).await
    })
    .await;

    if result.is_err() {
        discard_partial(local).await;
    }
    result
}

async fn verify_local(local: &Path, label: &str, attempt: u32) -> Result<u64> {
    match tokio::fs::metadata(local).await {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(Error::Transfer {
            path: format!("{label} -> {}", local.display()),
            attempts: attempt,
            message: "download target is not a regular file".to_string(),
        }),
        Err(e) => Err(Error::Transfer {
            path: format!("{label} -> {}", local.display()),
            attempts: attempt,
            message: format!("downloaded file is missing: {e}"),
        }),
    }
}

/// Remove a file left behind by failed download attempts
async fn discard_partial(local: &Path) {
    match tokio::fs::remove_file(local).await {
        Ok(()) => {
            tracing::debug!(path = %local.display(), "Removed incomplete download");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %local.display(), error = %e, "Could not remove incomplete download");
        }
    }
}

/// Upload one local file as an object
///
/// Fails before any transfer if the local file is missing or empty. The
/// remote parent directory is created on a best-effort basis. Each attempt
/// is verified by checking that the object exists afterwards. Returns the
/// number of bytes uploaded.
pub async fn upload<S>(store: &S, local: &Path, remote: &RemotePath, retries: u32) -> Result<u64>
where
    S: ObjectStore + ?Sized,
{
    let meta = match tokio::fs::metadata(local).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(format!(
                "local file {}",
                local.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if !meta.is_file() {
        return Err(Error::PathType(format!(
            "{} is not a regular file",
            local.display()
        )));
    }
    if meta.len() == 0 {
        return Err(Error::EmptyFile(local.to_path_buf()));
    }
    if remote.is_dir() {
        return Err(Error::PathType(format!(
            "{remote} is a directory, expected a file path"
        )));
    }

    // The marker only helps listings; the upload itself does not depend on it.
    let parent = remote.parent();
    if !parent.is_root()
        && let Err(e) = store.make_dirs(&parent).await
    {
        tracing::debug!(dir = %parent, error = %e, "Could not create remote directory");
    }

    let label = format!("{} -> {remote}", local.display());

    let result = retry_transfer(retries, &label, move |_| async move {
        store.put_file(local, remote).await?;
        if store.exists(remote).await? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("{remote} after upload")))
        }
    })
    .await;

    match result {
        Ok(()) => Ok(meta.len()),
        Err(e) => {
            let attempts = retries.max(1);
            tracing::error!(path = %label, attempts, error = %e, "Upload failed");
            Err(Error::Transfer {
                path: label,
                attempts,
                message: e.to_string(),
            })
        }
    }
}
