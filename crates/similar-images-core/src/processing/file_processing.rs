/// Decoding and fingerprinting of a single file
///
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use log::trace;
use std::path::Path;

use super::perceptual::PerceptualHasher;
use crate::error::{Error, Result};
use crate::types::PHash;

/// Open and decode an image, applying the orientation stored in its EXIF data
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let open_err = |source: std::io::Error| Error::Open {
        path: path.to_path_buf(),
        source,
    };
    let decode_err = |source: image::ImageError| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    // Sniff the real format; the extension is only a fallback
    let reader = ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?;

    let mut decoder = reader.into_decoder().map_err(decode_err)?;
    let orientation = decoder.orientation().map_err(decode_err)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    img.apply_orientation(orientation);

    Ok(img)
}

/// Resampling callback used for fingerprinting
pub fn lanczos_resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Calculate a perceptual hash from an image file
pub fn fingerprint_file<P: AsRef<Path>>(path: P, hasher: &dyn PerceptualHasher) -> Result<PHash> {
    let path = path.as_ref();
    let img = load_image(path)?;

    let hash = hasher
        .hash(&img, &lanczos_resize)
        .map_err(|source| Error::Fingerprint {
            path: path.to_path_buf(),
            source,
        })?;

    trace!("{} -> {:x}", path.display(), hash);
    Ok(hash)
}
