//! # Perceptual Hashing Module
//!
//! The fingerprint boundary of the scanner. A [`PerceptualHasher`] turns decoded
//! pixels into a 64-bit [`PHash`]; a [`DistanceMetric`] says how far apart two
//! hashes are. Any scheme with a numeric fingerprint and a distance may be
//! plugged in; [`DctHasher`] with [`Hamming`] distance is the default.
//!
//! ## Hamming Distance Interpretation
//!
//! - 0: identical fingerprints (same image, possibly re-encoded)
//! - 1-5: near duplicates (resized, recompressed, lightly edited)
//! - >10: different images
//!
//! ## DCT pHash
//!
//! 1. Resize to 32×32 through the caller-supplied resampling callback
//! 2. Convert to luma and run a separable 2-D DCT-II
//! 3. Keep the top-left 8×8 block of low frequencies
//! 4. Set one bit per coefficient that lies above the block median

use image::DynamicImage;
use rustdct::{Dct2, DctPlanner, TransformType2And3};
use std::sync::Arc;
use thiserror::Error;

use crate::types::PHash;

const DCT_SIZE: usize = 32;
const LOW_FREQ: usize = 8;

/// Resampling callback handed to a hasher: `(image, width, height) -> resized`
pub type Resize<'a> = &'a dyn Fn(&DynamicImage, u32, u32) -> DynamicImage;

/// Errors raised by a perceptual hasher on otherwise valid pixel data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("resampler returned {width}x{height}, expected {expected}x{expected}")]
    UnexpectedSize {
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("transform produced a non-finite coefficient")]
    NonFinite,
}

/// Computes a fingerprint from decoded pixels
pub trait PerceptualHasher: Send + Sync {
    fn hash(&self, img: &DynamicImage, resize: Resize<'_>) -> Result<PHash, HashError>;
}

/// Distance between two fingerprints; must be symmetric and zero for equal hashes
pub trait DistanceMetric: Send + Sync {
    fn distance(&self, a: PHash, b: PHash) -> u32;
}

/// Bit-count distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

impl DistanceMetric for Hamming {
    #[inline]
    fn distance(&self, a: PHash, b: PHash) -> u32 {
        a.distance(&b)
    }
}

/// DCT-based perceptual hash
pub struct DctHasher {
    dct: Arc<dyn TransformType2And3<f32>>,
}

impl DctHasher {
    pub fn new() -> Self {
        let mut planner = DctPlanner::new();
        Self {
            dct: planner.plan_dct2(DCT_SIZE),
        }
    }

    /// In-place 2-D DCT-II on a square `DCT_SIZE` × `DCT_SIZE` buffer
    fn transform(&self, pixels: &mut [f32]) {
        for row in pixels.chunks_exact_mut(DCT_SIZE) {
            self.dct.process_dct2(row);
        }
        transpose(pixels);
        for column in pixels.chunks_exact_mut(DCT_SIZE) {
            self.dct.process_dct2(column);
        }
        transpose(pixels);
    }
}

impl Default for DctHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DctHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DctHasher").field("size", &DCT_SIZE).finish()
    }
}

impl PerceptualHasher for DctHasher {
    fn hash(&self, img: &DynamicImage, resize: Resize<'_>) -> Result<PHash, HashError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(HashError::EmptyImage {
                width: img.width(),
                height: img.height(),
            });
        }

        let small = resize(img, DCT_SIZE as u32, DCT_SIZE as u32).to_luma8();
        if small.width() as usize != DCT_SIZE || small.height() as usize != DCT_SIZE {
            return Err(HashError::UnexpectedSize {
                width: small.width(),
                height: small.height(),
                expected: DCT_SIZE as u32,
            });
        }

        let mut pixels: Vec<f32> = small.pixels().map(|p| p[0] as f32).collect();
        self.transform(&mut pixels);

        let mut block = [0.0f32; LOW_FREQ * LOW_FREQ];
        for y in 0..LOW_FREQ {
            block[y * LOW_FREQ..(y + 1) * LOW_FREQ]
                .copy_from_slice(&pixels[y * DCT_SIZE..y * DCT_SIZE + LOW_FREQ]);
        }
        if block.iter().any(|c| !c.is_finite()) {
            return Err(HashError::NonFinite);
        }

        let median = median(&block);
        let hash = block
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > median)
            .fold(0u64, |acc, (bit, _)| acc | (1u64 << bit));

        Ok(PHash(hash))
    }
}

fn transpose(m: &mut [f32]) {
    for y in 0..DCT_SIZE {
        for x in (y + 1)..DCT_SIZE {
            m.swap(y * DCT_SIZE + x, x * DCT_SIZE + y);
        }
    }
}

fn median(values: &[f32]) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
