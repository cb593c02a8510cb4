//! Duplicate detection: the similarity index and where its findings go.

pub mod index;
pub mod report;

pub use index::SimilarityIndex;
pub use report::{CollectingReporter, LogReporter, Reporter};
