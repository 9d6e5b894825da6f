//! download command - Fetch model and dataset directories
//!
//! Each requested remote directory lands in `<root>/<last segment>`, e.g.
//! `obs://bucket/models/Alpamayo/` goes to `./data/models/Alpamayo`.

use std::path::{Path, PathBuf};

use clap::Args;
use obsync_core::{
    DEFAULT_RETRIES, Error, ObjectStore, ObsConfig, RemotePath, TransferSummary,
    download_directory,
};
use obsync_s3::S3Client;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download model and dataset directories from the object store
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Remote model directory (obs://bucket/prefix/)
    #[arg(long, value_parser = parse_remote)]
    pub model: Option<RemotePath>,

    /// Remote dataset directory (obs://bucket/prefix/)
    #[arg(long, value_parser = parse_remote)]
    pub dataset: Option<RemotePath>,

    /// Local root for downloaded models
    #[arg(long, default_value = "./data/models")]
    pub model_dir: PathBuf,

    /// Local root for downloaded datasets
    #[arg(long, default_value = "./data/datasets")]
    pub dataset_dir: PathBuf,

    /// Attempts per file before giving up
    #[arg(long, default_value_t = DEFAULT_RETRIES, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: u32,
}

fn parse_remote(value: &str) -> Result<RemotePath, String> {
    RemotePath::parse(value).map_err(|e| e.to_string())
}

/// One remote directory and where it goes locally
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: &'static str,
    pub source: RemotePath,
    pub destination: PathBuf,
}

impl Target {
    fn new(kind: &'static str, source: &RemotePath, root: &Path) -> Self {
        // A bucket root has no last segment; fall back to the bucket name
        let name = source.file_name().unwrap_or(&source.bucket);
        Self {
            kind,
            source: source.clone(),
            destination: root.join(name),
        }
    }
}

impl DownloadArgs {
    /// Requested downloads, model first
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        if let Some(model) = &self.model {
            targets.push(Target::new("model", model, &self.model_dir));
        }
        if let Some(dataset) = &self.dataset {
            targets.push(Target::new("dataset", dataset, &self.dataset_dir));
        }
        targets
    }
}

#[derive(Debug, Serialize)]
struct TargetOutput {
    kind: &'static str,
    source: String,
    destination: String,
    #[serde(flatten)]
    summary: TransferSummary,
    size_human: String,
}

#[derive(Debug, Serialize)]
struct DownloadOutput {
    status: &'static str,
    downloads: Vec<TargetOutput>,
}

/// A target that could not be downloaded
#[derive(Debug)]
struct TargetFailure {
    kind: &'static str,
    source: RemotePath,
    error: Error,
}

/// Execute the download command
pub async fn execute(args: DownloadArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let config = match ObsConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to initialize object store: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let client = match S3Client::new(&config).await {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::GeneralError;
        }
    };
    tracing::info!(endpoint = %client.endpoint(), "Object store client ready");

    match download_targets(&client, &args.targets(), args.retries, &formatter).await {
        Ok(downloads) => {
            print_completion(&formatter, downloads);
            ExitCode::Success
        }
        Err(failure) => {
            formatter.error(&format!(
                "Failed to download {} {}: {}",
                failure.kind, failure.source, failure.error
            ));
            ExitCode::GeneralError
        }
    }
}

/// Download each target in order, stopping at the first one that fails
async fn download_targets<S>(
    store: &S,
    targets: &[Target],
    retries: u32,
    formatter: &Formatter,
) -> Result<Vec<TargetOutput>, TargetFailure>
where
    S: ObjectStore + ?Sized,
{
    let mut downloads = Vec::with_capacity(targets.len());

    for target in targets {
        formatter.println(&format!(
            "Downloading {} {} -> {}",
            formatter.style_key(target.kind),
            formatter.style_name(&target.source.to_string()),
            formatter.style_name(&target.destination.display().to_string()),
        ));

        let summary = download_directory(store, &target.source, &target.destination, retries)
            .await
            .map_err(|error| TargetFailure {
                kind: target.kind,
                source: target.source.clone(),
                error,
            })?;

        formatter.success(&format!(
            "{}: {} ({})",
            target.kind,
            summary,
            formatter.style_size(&summary.human_bytes())
        ));
        if summary.failed > 0 {
            formatter.warning(&format!(
                "{} file(s) from {} could not be downloaded, see log for details",
                summary.failed, target.source
            ));
        }

        downloads.push(TargetOutput {
            kind: target.kind,
            source: target.source.to_string(),
            destination: target.destination.display().to_string(),
            size_human: summary.human_bytes(),
            summary,
        });
    }

    Ok(downloads)
}

fn print_completion(formatter: &Formatter, downloads: Vec<TargetOutput>) {
    if formatter.is_json() {
        formatter.json(&DownloadOutput {
            status: "complete",
            downloads,
        });
        return;
    }

    formatter.println("");
    formatter.banner("Download complete");
    for download in &downloads {
        formatter.println(&format!(
            "{:<8} {}",
            formatter.style_key(download.kind),
            formatter.style_name(&download.destination)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// Read-only store over a fixed set of keys in bucket "b"
    struct FixedStore {
        objects: BTreeMap<String, Vec<u8>>,
    }

    impl FixedStore {
        fn new(entries: &[(&str, &[u8])]) -> Self {
            Self {
                objects: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_vec()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for FixedStore {
        async fn list_dir(&self, dir: &RemotePath) -> obsync_core::Result<Vec<String>> {
            let mut names: Vec<String> = self
                .objects
                .keys()
                .filter_map(|key| key.strip_prefix(dir.key.as_str()))
                .filter(|rest| !rest.is_empty())
                .map(|rest| match rest.split_once('/') {
                    Some((first, _)) => format!("{first}/"),
                    None => rest.to_string(),
                })
                .collect();
            names.dedup();
            Ok(names)
        }

        async fn exists(&self, path: &RemotePath) -> obsync_core::Result<bool> {
            if path.is_dir() {
                Ok(self.objects.keys().any(|k| k.starts_with(path.key.as_str())))
            } else {
                Ok(self.objects.contains_key(&path.key))
            }
        }

        async fn get_file(&self, src: &RemotePath, dst: &Path) -> obsync_core::Result<()> {
            let data = self
                .objects
                .get(&src.key)
                .ok_or_else(|| Error::NotFound(src.to_string()))?;
            tokio::fs::write(dst, data).await?;
            Ok(())
        }

        async fn put_file(&self, _src: &Path, dst: &RemotePath) -> obsync_core::Result<()> {
            Err(Error::General(format!("read-only store: {dst}")))
        }

        async fn make_dirs(&self, dir: &RemotePath) -> obsync_core::Result<()> {
            Err(Error::General(format!("read-only store: {dir}")))
        }

        async fn get_object(&self, path: &RemotePath) -> obsync_core::Result<Vec<u8>> {
            self.objects
                .get(&path.key)
                .cloned()
                .ok_or_else(|| Error::NotFound(path.to_string()))
        }
    }

    fn quiet() -> Formatter {
        Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        })
    }

    fn args(model: Option<&str>, dataset: Option<&str>, root: &Path) -> DownloadArgs {
        DownloadArgs {
            model: model.map(|m| RemotePath::parse(m).unwrap()),
            dataset: dataset.map(|d| RemotePath::parse(d).unwrap()),
            model_dir: root.join("models"),
            dataset_dir: root.join("datasets"),
            retries: 1,
        }
    }

    #[test]
    fn test_targets_use_last_segment() {
        let root = Path::new("/data");
        let targets = args(Some("obs://b/models/Alpamayo/"), Some("obs://b/sets/clips/"), root)
            .targets();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].kind, "model");
        assert_eq!(targets[0].destination, root.join("models").join("Alpamayo"));
        assert_eq!(targets[1].kind, "dataset");
        assert_eq!(targets[1].destination, root.join("datasets").join("clips"));
    }

    #[test]
    fn test_bucket_root_target_uses_bucket_name() {
        let root = Path::new("/data");
        let targets = args(None, Some("obs://b/"), root).targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].destination, root.join("datasets").join("b"));
    }

    #[tokio::test]
    async fn test_download_targets_fetches_model_and_dataset() {
        let store = FixedStore::new(&[
            ("models/m/config.json", b"{}"),
            ("models/m/weights/shard-0.bin", b"0123456789"),
            ("sets/d/clip.mp4", b"frames"),
        ]);
        let dir = TempDir::new().unwrap();
        let targets = args(Some("obs://b/models/m/"), Some("obs://b/sets/d/"), dir.path()).targets();

        let downloads = download_targets(&store, &targets, 1, &quiet()).await.unwrap();

        assert_eq!(downloads.len(), 2);
        assert_eq!(downloads[0].summary.succeeded, 2);
        assert_eq!(downloads[0].summary.bytes, 12);
        assert_eq!(downloads[1].summary.succeeded, 1);
        assert_eq!(
            std::fs::read(dir.path().join("models/m/weights/shard-0.bin")).unwrap(),
            b"0123456789"
        );
        assert_eq!(
            std::fs::read(dir.path().join("datasets/d/clip.mp4")).unwrap(),
            b"frames"
        );
    }

    #[tokio::test]
    async fn test_missing_model_stops_before_dataset() {
        let store = FixedStore::new(&[("sets/d/clip.mp4", b"frames")]);
        let dir = TempDir::new().unwrap();
        let targets = args(Some("obs://b/models/absent/"), Some("obs://b/sets/d/"), dir.path())
            .targets();

        let failure = download_targets(&store, &targets, 1, &quiet())
            .await
            .unwrap_err();

        assert_eq!(failure.kind, "model");
        assert!(failure.error.is_not_found());
        assert!(!dir.path().join("datasets").exists());
    }

    #[test]
    fn test_output_serializes_flat_summary() {
        let output = DownloadOutput {
            status: "complete",
            downloads: vec![TargetOutput {
                kind: "model",
                source: "obs://b/models/m/".to_string(),
                destination: "./data/models/m".to_string(),
                summary: TransferSummary {
                    attempted: 2,
                    succeeded: 2,
                    failed: 0,
                    bytes: 2048,
                },
                size_human: "2 KiB".to_string(),
            }],
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["status"], "complete");
        assert_eq!(value["downloads"][0]["kind"], "model");
        assert_eq!(value["downloads"][0]["succeeded"], 2);
        assert_eq!(value["downloads"][0]["bytes"], 2048);
    }
}
