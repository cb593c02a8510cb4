use std::path::PathBuf;
use thiserror::Error;

use crate::processing::HashError;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the similar-images library
#[derive(Error, Debug)]
pub enum Error {
    /// Directory traversal failure (missing root, permission denied, ...)
    #[error("Traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    /// A discovered file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A discovered file is not a decodable image
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The perceptual hasher rejected decoded pixel data
    #[error("Failed to fingerprint {}: {source}", path.display())]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: HashError,
    },

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Logger could not be set up
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

