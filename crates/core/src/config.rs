//! Object store connection settings
//!
//! Settings come from the process environment once, at startup, and are then
//! handed explicitly to the client constructor.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};

pub const ENV_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENV_USE_HTTPS: &str = "S3_USE_HTTPS";
pub const ENV_ACCESS_KEY: &str = "ACCESS_KEY_ID";
pub const ENV_SECRET_KEY: &str = "SECRET_ACCESS_KEY";
pub const ENV_REGION: &str = "S3_REGION";

/// Region used when none is configured; most S3-compatible stores ignore it
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the object store
#[derive(Clone, PartialEq, Eq)]
pub struct ObsConfig {
    /// Endpoint URL, always carrying an `http://` or `https://` scheme
    pub endpoint: String,
    pub use_tls: bool,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl ObsConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("missing required environment variable {key}")))
        };

        let endpoint = required(ENV_ENDPOINT)?;
        let access_key = required(ENV_ACCESS_KEY)?;
        let secret_key = required(ENV_SECRET_KEY)?;
        let use_tls = lookup(ENV_USE_HTTPS)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let region = lookup(ENV_REGION)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            endpoint: normalize_endpoint(&endpoint, use_tls)?,
            use_tls,
            access_key,
            secret_key,
            region,
        })
    }
}

impl fmt::Debug for ObsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObsConfig")
            .field("endpoint", &self.endpoint)
            .field("use_tls", &self.use_tls)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("region", &self.region)
            .finish()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Give a bare `host[:port]` endpoint the scheme implied by the TLS flag
fn normalize_endpoint(endpoint: &str, use_tls: bool) -> Result<String> {
    let endpoint = if endpoint.contains("://") {
        endpoint.to_string()
    } else if use_tls {
        format!("https://{endpoint}")
    } else {
        format!("http://{endpoint}")
    };

    let url = Url::parse(&endpoint)
        .map_err(|e| Error::Config(format!("invalid {ENV_ENDPOINT} '{endpoint}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(endpoint.trim_end_matches('/').to_string()),
        other => Err(Error::Config(format!(
            "unsupported endpoint scheme '{other}' in {ENV_ENDPOINT}"
        ))),
    }
}
