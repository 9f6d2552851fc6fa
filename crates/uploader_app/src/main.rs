use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use engine_logging::engine_info;
use log::LevelFilter;
use uploader_app::platform::logging;
use uploader_app::{AppConfig, PickedFiles, TerminalStatus, UploadTrigger, DEFAULT_CONFIG_FILE};

/// Upload a syllabus to the course server and print the server's reply.
#[derive(Debug, Parser)]
#[command(name = "syllabus-upload", version)]
struct Cli {
    /// RON config file (defaults to ./uploader.ron when present).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Server root URL, overriding the config file.
    #[arg(long)]
    server: Option<String>,
    /// Request timeout in seconds, overriding the config file.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
    /// Files to select; only the first one is uploaded.
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.server, cli.timeout);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(config.log_destination, level);
    engine_info!(
        "Config: {} server_url={} request_timeout_secs={:?}",
        cli.config
            .as_deref()
            .map_or_else(|| format!("{DEFAULT_CONFIG_FILE} (optional)"), |path| path.display().to_string()),
        config.server_url,
        config.request_timeout_secs
    );

    let settings = config.upload_settings()?;
    let input = PickedFiles::from_paths(&cli.files).context("reading selected files")?;
    let status = TerminalStatus::new();
    let mut trigger = UploadTrigger::new(settings.clone()).context("starting upload engine")?;

    engine_info!(
        "Triggering upload to {} with {} file(s) selected",
        settings.endpoint,
        cli.files.len()
    );
    trigger.trigger(&input, &status);
    trigger.settle(&status, None);
    Ok(())
}
