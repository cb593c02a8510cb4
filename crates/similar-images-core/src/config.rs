use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Largest meaningful distance between two 64-bit fingerprints
const MAX_THRESHOLD: u32 = 64;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Configuration for a similarity scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fingerprint distance at or below which two images are reported
    pub threshold: u32,

    /// Number of fingerprinting workers (0 = one per CPU)
    pub workers: usize,

    /// Capacity of the discoverer → worker hand-off (0 = rendezvous)
    pub channel_capacity: usize,

    /// File extensions treated as images, compared case-insensitively
    pub extensions: Vec<String>,

    /// Log level
    pub log_level: LogLevel,

    /// Also write log lines to this file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 5,
            workers: 0, // Auto
            channel_capacity: 0,
            extensions: vec!["jpg".to_string(), "jpeg".to_string()],
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.threshold > MAX_THRESHOLD {
            return Err(Error::Configuration(format!(
                "Threshold must be between 0 and {}",
                MAX_THRESHOLD
            )));
        }

        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(Error::Configuration(
                "At least one image extension must be given".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolved worker count
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}
