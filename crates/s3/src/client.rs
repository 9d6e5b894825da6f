//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from obsync-core.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::byte_stream::ByteStream;
use obsync_core::{Error, ObjectStore, ObsConfig, RemotePath, Result};
use tokio::io::AsyncWriteExt;

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    endpoint: String,
}

impl S3Client {
    /// Create a new S3 client from explicit connection settings
    pub async fn new(config: &ObsConfig) -> Result<Self> {
        // Build credentials provider
        let credentials = aws_credential_types::Credentials::new(
            &config.access_key,
            &config.secret_key,
            None, // session token
            None, // expiry
            "obsync-static-credentials",
        );

        // Build SDK config
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .load()
            .await;

        // Path-style addressing works with every S3-compatible store
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        tracing::debug!(endpoint = %config.endpoint, region = %config.region, "Created S3 client");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Format AWS SDK error into a detailed error message
    fn format_sdk_error<E: std::fmt::Display>(error: &SdkError<E, HttpResponse>) -> String {
        match error {
            SdkError::ServiceError(service_err) => {
                let err = service_err.err();
                let meta = service_err.raw();
                let mut msg = format!("Service error: {}", err);
                if let Some(code) = meta.headers().get("x-amz-error-code") {
                    msg.push_str(&format!(" (code: {})", code));
                }
                msg
            }
            SdkError::ConstructionFailure(err) => {
                format!("Request construction failed: {:?}", err)
            }
            SdkError::TimeoutError(_) => "Request timeout".to_string(),
            SdkError::DispatchFailure(err) => {
                format!("Network dispatch error: {:?}", err)
            }
            SdkError::ResponseError(err) => {
                format!("Response error: {:?}", err)
            }
            _ => error.to_string(),
        }
    }

    fn is_not_found<E: ProvideErrorMetadata>(error: &SdkError<E, HttpResponse>) -> bool {
        if error.raw_response().map(|r| r.status().as_u16()) == Some(404) {
            return true;
        }
        matches!(
            error.code(),
            Some("NotFound" | "NoSuchKey" | "NoSuchBucket")
        )
    }

    /// Map an SDK error to NotFound for missing targets, Network otherwise
    fn map_error<E>(error: SdkError<E, HttpResponse>, path: &RemotePath) -> Error
    where
        E: ProvideErrorMetadata + std::fmt::Display,
    {
        if Self::is_not_found(&error) {
            Error::NotFound(path.to_string())
        } else {
            Error::Network(Self::format_sdk_error(&error))
        }
    }

    async fn prefix_exists(&self, dir: &RemotePath) -> Result<bool> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(&dir.bucket)
            .prefix(&dir.key)
            .max_keys(1)
            .send()
            .await
            .map_err(|e| Self::map_error(e, dir))?;

        Ok(response.key_count().unwrap_or(0) > 0 || !response.contents().is_empty())
    }

    async fn bucket_exists(&self, root: &RemotePath) -> Result<bool> {
        match self.inner.head_bucket().bucket(&root.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if Self::is_not_found(&e) => Ok(false),
            Err(e) => Err(Error::Network(Self::format_sdk_error(&e))),
        }
    }

    async fn object_exists(&self, path: &RemotePath) -> Result<bool> {
        match self
            .inner
            .head_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if Self::is_not_found(&e) => Ok(false),
            Err(e) => Err(Error::Network(Self::format_sdk_error(&e))),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_dir(&self, dir: &RemotePath) -> Result<Vec<String>> {
        let prefix = dir.as_dir().key;
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .inner
                .list_objects_v2()
                .bucket(&dir.bucket)
                .delimiter("/");

            if !prefix.is_empty() {
                request = request.prefix(&prefix);
            }
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| Self::map_error(e, dir))?;

            // Common prefixes are the subdirectories
            for common in response.common_prefixes() {
                if let Some(p) = common.prefix()
                    && let Some(name) = p.strip_prefix(prefix.as_str())
                    && !name.is_empty()
                {
                    names.push(name.to_string());
                }
            }

            // The directory's own marker shows up with an empty name
            for object in response.contents() {
                if let Some(key) = object.key()
                    && let Some(name) = key.strip_prefix(prefix.as_str())
                    && !name.is_empty()
                {
                    names.push(name.to_string());
                }
            }

            continuation_token = response.next_continuation_token().map(str::to_string);
            if !response.is_truncated().unwrap_or(false) || continuation_token.is_none() {
                break;
            }
        }

        Ok(names)
    }

    async fn exists(&self, path: &RemotePath) -> Result<bool> {
        if path.is_root() {
            self.bucket_exists(path).await
        } else if path.is_dir() {
            self.prefix_exists(path).await
        } else {
            self.object_exists(path).await
        }
    }

    async fn get_file(&self, src: &RemotePath, dst: &Path) -> Result<()> {
        let response = self
            .inner
            .get_object()
            .bucket(&src.bucket)
            .key(&src.key)
            .send()
            .await
            .map_err(|e| Self::map_error(e, src))?;

        let mut file = tokio::fs::File::create(dst).await?;
        let mut body = response.body.into_async_read();
        tokio::io::copy(&mut body, &mut file)
            .await
            .map_err(|e| Error::Network(format!("reading body of {src}: {e}")))?;
        file.flush().await?;

        Ok(())
    }

    async fn put_file(&self, src: &Path, dst: &RemotePath) -> Result<()> {
        let body = ByteStream::from_path(src)
            .await
            .map_err(|e| Error::General(format!("opening {}: {e}", src.display())))?;

        let mut request = self
            .inner
            .put_object()
            .bucket(&dst.bucket)
            .key(&dst.key)
            .body(body);

        if let Some(content_type) = mime_guess::from_path(src).first_raw() {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        Ok(())
    }

    async fn make_dirs(&self, dir: &RemotePath) -> Result<()> {
        if dir.is_root() {
            return Ok(());
        }

        // Putting the marker again just overwrites an empty object
        let marker = dir.as_dir();
        self.inner
            .put_object()
            .bucket(&marker.bucket)
            .key(&marker.key)
            .body(ByteStream::from(Vec::new()))
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        Ok(())
    }

    async fn get_object(&self, path: &RemotePath) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(|e| Self::map_error(e, path))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }
}
