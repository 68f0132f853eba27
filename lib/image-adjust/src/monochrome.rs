use crate::{ImageAdjustResult, buffer_from_raw, ensure_not_empty};
use image::{GrayImage, Rgb, RgbImage};
use rayon::prelude::*;

// BT.601 weights 0.299 / 0.587 / 0.114 in 14-bit fixed point
const LUMA_SHIFT: u32 = 14;
const LUMA_RED: u32 = 4899;
const LUMA_GREEN: u32 = 9617;
const LUMA_BLUE: u32 = 1868;

/// Perceived brightness of one pixel, rounded half up.
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0.map(u32::from);
    let weighted = r * LUMA_RED + g * LUMA_GREEN + b * LUMA_BLUE;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Convert a color image to a single-channel luma image
pub fn grayscale(image: &RgbImage) -> ImageAdjustResult<GrayImage> {
    ensure_not_empty(image)?;

    let (width, height) = image.dimensions();
    let samples = image
        .as_raw()
        .par_chunks_exact(3)
        .map(|p| luma(&Rgb([p[0], p[1], p[2]])))
        .collect::<Vec<u8>>();

    buffer_from_raw(width, height, samples)
}
