//! Path parsing for local and remote locations
//!
//! Remote paths use the `obs://bucket/key` syntax. Directory paths end with
//! `/`, file paths never do. Parsing adds the scheme when it is missing but
//! never adds or strips the trailing separator: that distinction is how a
//! caller says "directory" versus "file".

use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Scheme prefix of every remote path
pub const SCHEME: &str = "obs://";

/// Separator used inside object keys
pub const SEPARATOR: char = '/';

/// A location inside the object store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemotePath {
    /// Bucket name
    pub bucket: String,
    /// Object key or prefix inside the bucket (empty for the bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new remote path
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse `obs://bucket/key` or `bucket/key`
    pub fn parse(path: &str) -> Result<Self> {
        let rest = path.strip_prefix(SCHEME).unwrap_or(path);
        let rest = rest.trim_start_matches(SEPARATOR);

        let (bucket, key) = match rest.split_once(SEPARATOR) {
            Some((bucket, key)) => (bucket, key),
            None => (rest, ""),
        };

        if bucket.is_empty() {
            return Err(Error::InvalidPath(format!("missing bucket in '{path}'")));
        }
        if key.starts_with(SEPARATOR) || key.contains("//") {
            return Err(Error::InvalidPath(format!("empty segment in '{path}'")));
        }

        Ok(Self::new(bucket, key))
    }

    /// Returns true for directory paths (bucket root or trailing separator)
    pub fn is_dir(&self) -> bool {
        self.key.is_empty() || self.key.ends_with(SEPARATOR)
    }

    /// Returns true if this is the bucket root
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// The same location in directory form
    pub fn as_dir(&self) -> Self {
        if self.is_dir() {
            self.clone()
        } else {
            Self::new(&self.bucket, format!("{}{SEPARATOR}", self.key))
        }
    }

    /// The same location in file form, or `None` for the bucket root
    pub fn as_file(&self) -> Option<Self> {
        let key = self.key.trim_end_matches(SEPARATOR);
        if key.is_empty() {
            None
        } else {
            Some(Self::new(&self.bucket, key))
        }
    }

    /// Append a relative key to a directory path
    pub fn join(&self, relative: &str) -> Self {
        let base = self.as_dir();
        let relative = relative.trim_start_matches(SEPARATOR);
        Self::new(base.bucket, format!("{}{relative}", base.key))
    }

    /// The directory containing this path
    pub fn parent(&self) -> Self {
        let key = self.key.trim_end_matches(SEPARATOR);
        match key.rfind(SEPARATOR) {
            Some(idx) => Self::new(&self.bucket, &key[..=idx]),
            None => Self::new(&self.bucket, ""),
        }
    }

    /// Key of `self` relative to the directory `base`
    pub fn relative_to(&self, base: &RemotePath) -> Option<&str> {
        if self.bucket != base.bucket || !base.is_dir() {
            return None;
        }
        self.key.strip_prefix(base.key.as_str())
    }

    /// Last non-empty segment of the key
    pub fn file_name(&self) -> Option<&str> {
        self.key
            .trim_end_matches(SEPARATOR)
            .rsplit(SEPARATOR)
            .next()
            .filter(|s| !s.is_empty())
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            write!(f, "{SCHEME}{}{SEPARATOR}", self.bucket)
        } else {
            write!(f, "{SCHEME}{}{SEPARATOR}{}", self.bucket, self.key)
        }
    }
}

impl std::str::FromStr for RemotePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A path that is either on local disk or in the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    Local(PathBuf),
    Remote(RemotePath),
}

impl ParsedPath {
    pub fn is_remote(&self) -> bool {
        matches!(self, ParsedPath::Remote(_))
    }
}

/// Returns true if the string uses the remote scheme
pub fn is_remote_path(path: &str) -> bool {
    path.starts_with(SCHEME)
}

/// Classify a path string as local or remote
///
/// Only strings carrying the scheme are remote; everything else is a local
/// filesystem path.
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("path cannot be empty".to_string()));
    }

    if is_remote_path(path) {
        RemotePath::parse(path).map(ParsedPath::Remote)
    } else {
        Ok(ParsedPath::Local(PathBuf::from(path)))
    }
}
