//! obsync - download model and dataset directories from an S3-compatible
//! object store
//!
//! Connection settings come from S3_ENDPOINT, S3_USE_HTTPS, ACCESS_KEY_ID,
//! SECRET_ACCESS_KEY and S3_REGION.

mod commands;
mod exit_code;
mod logging;
mod output;

use clap::{ArgGroup, Args, Parser};

use commands::download::DownloadArgs;
use output::OutputConfig;

/// Download model and dataset directories from an S3-compatible object store
#[derive(Parser, Debug)]
#[command(name = "obsync", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("source")
        .args(["model", "dataset"])
        .required(true)
        .multiple(true)
))]
struct Cli {
    #[command(flatten)]
    download: DownloadArgs,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Print a JSON summary instead of human-readable output
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Warning: {e:#}");
    }

    let output_config = OutputConfig {
        json: cli.global.json,
        no_color: cli.global.no_color,
        quiet: cli.global.quiet,
    };

    commands::download::execute(cli.download, output_config)
        .await
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_model_or_dataset() {
        let err = Cli::try_parse_from(["obsync"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["obsync", "--retries", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["obsync", "--model", "obs://b/models/m/"]).unwrap();
        assert_eq!(cli.download.model_dir, std::path::PathBuf::from("./data/models"));
        assert_eq!(
            cli.download.dataset_dir,
            std::path::PathBuf::from("./data/datasets")
        );
        assert_eq!(cli.download.retries, 3);
        assert!(cli.download.dataset.is_none());
        assert!(!cli.global.json);
    }

    #[test]
    fn test_both_sources_and_overrides() {
        let cli = Cli::try_parse_from([
            "obsync",
            "--model",
            "b/models/m/",
            "--dataset",
            "obs://b/sets/d/",
            "--dataset-dir",
            "/mnt/sets",
            "--retries",
            "5",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.download.model.unwrap().to_string(), "obs://b/models/m/");
        assert_eq!(cli.download.dataset.unwrap().key, "sets/d/");
        assert_eq!(cli.download.dataset_dir, std::path::PathBuf::from("/mnt/sets"));
        assert_eq!(cli.download.retries, 5);
        assert!(cli.global.json);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Cli::try_parse_from(["obsync", "--model", "obs://"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["obsync", "--model", "obs://b/m/", "--retries", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["obsync", "--model", "obs://b/m/", "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
