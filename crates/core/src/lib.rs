//! obsync-core: Core library for moving files between local disk and an
//! S3-compatible object store
//!
//! This crate provides:
//! - Path parsing for `obs://bucket/key` locations
//! - Connection settings loaded from the environment
//! - The ObjectStore trait with single-object primitives
//! - Retried single-object transfers with verification
//! - Recursive listing, directory synchronization and store-to-store copies
//! - Task directory naming
//!
//! It does not depend on any storage SDK; adapters implement [`ObjectStore`].

pub mod config;
pub mod copy;
pub mod error;
pub mod file;
pub mod listing;
pub mod path;
pub mod retry;
pub mod sync;
pub mod task;
pub mod traits;
pub mod transfer;

#[cfg(test)]
mod test_support;

pub use config::ObsConfig;
pub use copy::{copy, copy_directory, copy_directory_in, copy_in};
pub use error::{Error, Result};
pub use file::{ensure_local_dir, read_file};
pub use listing::{DEFAULT_MAX_DEPTH, ListEntry, classify_child, list_files_recursive};
pub use path::{ParsedPath, RemotePath, SCHEME, is_remote_path, parse_path};
pub use retry::{DEFAULT_RETRIES, retry_transfer};
pub use sync::{
    INDEX_DIR_NAME, TransferSummary, download_directory, require_remote_dir, upload_directory,
};
pub use task::{create_task_directory, extract_task_dir, generate_name, is_task_name};
pub use traits::ObjectStore;
pub use transfer::{download, upload};
