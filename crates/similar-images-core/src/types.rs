use std::fmt;
use std::path::{Path, PathBuf};

/// A perceptual hash represented as a 64-bit value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PHash(pub u64);

impl PHash {
    /// Calculate the Hamming distance between two perceptual hashes
    pub fn distance(&self, other: &PHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::LowerHex for PHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for PHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// A fingerprinted image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Perceptual hash of the decoded image
    pub fingerprint: PHash,

    /// Path the image was read from
    pub path: PathBuf,
}

impl Record {
    pub fn new(fingerprint: PHash, path: impl Into<PathBuf>) -> Self {
        Self {
            fingerprint,
            path: path.into(),
        }
    }
}

/// A duplicate or near-duplicate detected while indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Two files with identical fingerprints
    ExactDuplicate {
        /// Newly scanned file
        path: PathBuf,
        /// File already in the index
        other: PathBuf,
        fingerprint: PHash,
    },

    /// Two files whose fingerprints are within the threshold
    CloseMatch {
        /// Newly scanned file
        path: PathBuf,
        /// File already in the index
        other: PathBuf,
        /// Fingerprint of the newly scanned file
        fingerprint: PHash,
        distance: u32,
    },
}

impl Finding {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::ExactDuplicate { .. })
    }

    /// The newly scanned file and the indexed file it matched
    pub fn paths(&self) -> (&Path, &Path) {
        match self {
            Self::ExactDuplicate { path, other, .. } | Self::CloseMatch { path, other, .. } => {
                (path, other)
            }
        }
    }

    pub fn involves(&self, path: &Path) -> bool {
        let (a, b) = self.paths();
        a == path || b == path
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactDuplicate {
                path,
                other,
                fingerprint,
            } => write!(
                f,
                "possible duplicate: {:?} has the same phash ({:x}) as {:?}",
                path, fingerprint, other
            ),
            Self::CloseMatch {
                path,
                other,
                fingerprint,
                distance,
            } => write!(
                f,
                "close match: {:?} has phash close ({:x}, dist={}) to {:?}",
                path, fingerprint, distance, other
            ),
        }
    }
}
