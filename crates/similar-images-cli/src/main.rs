use anyhow::Context;
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use similar_images_core::{logging, Config, ImageScanner, LogLevel};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// Scan a directory tree for JPEG images and report likely duplicates
#[derive(Parser)]
#[command(name = "find-similar-images")]
#[command(version)]
struct Cli {
    /// Directory to scan
    #[arg(required_unless_present = "generate_config")]
    directory: Option<PathBuf>,

    /// Report images whose fingerprints differ by at most this many bits
    #[arg(short, long)]
    threshold: Option<u32>,

    /// Number of fingerprinting workers (default: one per CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Capacity of the discovery queue (0 = hand paths over one at a time)
    #[arg(long)]
    channel_capacity: Option<usize>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show a spinner while fingerprinting
    #[arg(long)]
    progress: bool,

    /// Verbosity level
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    generate_config: Option<PathBuf>,
}

impl Cli {
    /// Configuration file values, overridden by command line arguments
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file.clone();
        }
        config.log_level = match self.verbose {
            0 => config.log_level,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };

        config.validate()?;
        Ok(config)
    }
}

fn spinner() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner} {pos} images fingerprinted [{elapsed_precise}]",
    )?);
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    if let Some(path) = &cli.generate_config {
        Config::default().save_to_file(path)?;
        println!("Configuration file generated at: {}", path.display());
        return Ok(());
    }

    let config = cli.config()?;
    logging::init_logger(config.log_level.into(), config.log_file.as_deref())?;

    let directory = cli
        .directory
        .as_ref()
        .context("no directory given")?;

    let mut scanner = ImageScanner::new(config);
    if cli.progress {
        scanner = scanner.with_progress(spinner()?);
    }

    if let Err(e) = scanner.run(directory) {
        error!("{}", e);
        process::exit(1);
    }

    Ok(())
}
