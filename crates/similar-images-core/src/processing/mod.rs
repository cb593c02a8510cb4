// Perceptual hashing boundary
pub mod perceptual;

// Per-file decode and fingerprint
pub mod file_processing;

pub use file_processing::{fingerprint_file, lanczos_resize, load_image};
pub use perceptual::{DctHasher, DistanceMetric, Hamming, HashError, PerceptualHasher, Resize};
