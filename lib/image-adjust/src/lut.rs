use crate::{ImageAdjustResult, ensure_not_empty, map_subpixels};
use image::RgbImage;

/// Number of distinct 8-bit intensities.
pub const LUT_SIZE: usize = 256;

/// Per-intensity remap table, applied to every channel alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable([u8; LUT_SIZE]);

impl LookupTable {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(u8) -> u8,
    {
        Self(std::array::from_fn(|i| f(i as u8)))
    }

    pub fn identity() -> Self {
        Self::from_fn(|i| i)
    }

    pub fn get(&self, intensity: u8) -> u8 {
        self.0[intensity as usize]
    }

    pub fn entries(&self) -> &[u8; LUT_SIZE] {
        &self.0
    }

    /// True when no entry is smaller than the one before it.
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0] <= pair[1])
    }

    pub fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;
        map_subpixels(image, |sample| self.get(sample))
    }
}
