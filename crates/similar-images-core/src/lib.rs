//! Core functionality for finding visually similar images.
//!
//! This library provides the components of a similarity scan:
//! - File discovery
//! - Image decoding and perceptual hash generation
//! - A similarity index reporting duplicates against sorted-order neighbours
//! - A concurrent scan pipeline with first-error cancellation

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::*;
pub use error::{Error, Result};
pub use scanner::{ImageScanner, ScanSummary};
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod deduplication;
pub mod discovery;
pub mod group;
pub mod logging;
pub mod processing;
pub mod scanner;
pub mod types;

// -- Test Modules --
#[cfg(test)]
pub mod test_utils;
