use image::{DynamicImage, Rgb, RgbImage};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// An 8x8 grid of pseudo-random coloured blocks; different seeds give unrelated images
pub fn block_pattern(seed: u64, size: u32) -> DynamicImage {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut cells = [[0u8; 3]; 64];
    for cell in cells.iter_mut() {
        for channel in cell.iter_mut() {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            *channel = (state >> 56) as u8;
        }
    }

    let block = (size / 8).max(1);
    let img = RgbImage::from_fn(size, size, |x, y| {
        let cx = (x / block).min(7) as usize;
        let cy = (y / block).min(7) as usize;
        Rgb(cells[cy * 8 + cx])
    });
    DynamicImage::ImageRgb8(img)
}

/// Save `img` as a JPEG named `name` inside `dir`
pub fn write_jpeg(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Jpeg).unwrap();
    path
}

/// Create a file with a JPEG extension that holds no image data
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(b"DUMMY IMAGE DATA").unwrap();
    path
}
