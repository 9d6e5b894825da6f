//! Reading files regardless of where they live

use std::path::Path;

use crate::error::{Error, Result};
use crate::path::{ParsedPath, parse_path};
use crate::traits::ObjectStore;

/// Read a local file or a remote object fully into memory
///
/// Strings starting with `obs://` are read through `store`, anything else
/// from local disk.
pub async fn read_file<S>(store: &S, path: &str) -> Result<Vec<u8>>
where
    S: ObjectStore + ?Sized,
{
    let result = match parse_path(path)? {
        ParsedPath::Remote(remote) => {
            if remote.is_dir() {
                return Err(Error::PathType(format!("{remote} is a directory")));
            }
            store.get_object(&remote).await
        }
        ParsedPath::Local(local) => tokio::fs::read(&local).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("local file {}", local.display()))
            } else {
                Error::Io(e)
            }
        }),
    };

    match &result {
        Ok(data) => tracing::debug!(path, bytes = data.len(), "Read file"),
        Err(e) => tracing::error!(path, error = %e, "Failed to read file"),
    }
    result
}

/// Create a local directory and its parents; an existing directory is fine
pub async fn ensure_local_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
