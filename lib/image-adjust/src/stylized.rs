use crate::{
    Effect, ImageAdjustError, ImageAdjustResult, MAX_CHANNEL_VALUE, blur::gaussian_blur,
    buffer_from_raw, ensure_not_empty, ensure_not_nan,
};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;
use rayon::prelude::*;

/// Top of the documented sharpness range.
pub const SHARPEN_MAX: f64 = 100.0;

/// Blur weight used for any sharpness above [`SHARPEN_MAX`] in legacy mode.
pub const SHARPEN_LEGACY_WEIGHT: f64 = -10.0;

const SHARPEN_DIVISOR: f64 = -10.0;
const SHARPEN_KERNEL_SIZE: u32 = 3;
const SHARPEN_SIGMA: f64 = 3.0;

/// Unsharp-mask `image` with strength `beta` in `[0, 100]`
pub fn sharpness(image: &RgbImage, beta: f64) -> ImageAdjustResult<RgbImage> {
    SharpenConfig::new().with_sharpness(beta).apply(image)
}

/// `clamp(first * alpha + second * beta + gamma)` per sample, rounded half to even.
pub fn add_weighted(
    first: &RgbImage,
    alpha: f64,
    second: &RgbImage,
    beta: f64,
    gamma: f64,
) -> ImageAdjustResult<RgbImage> {
    ensure_not_empty(first)?;
    if first.dimensions() != second.dimensions() {
        return Err(ImageAdjustError::InvalidParameter(format!(
            "cannot blend {:?} with {:?}",
            first.dimensions(),
            second.dimensions()
        )));
    }

    let max = MAX_CHANNEL_VALUE as f64;
    let samples = first
        .as_raw()
        .par_iter()
        .zip(second.as_raw().par_iter())
        .map(|(&a, &b)| {
            (a as f64 * alpha + b as f64 * beta + gamma)
                .round_ties_even()
                .clamp(0.0, max) as u8
        })
        .collect::<Vec<u8>>();

    let (width, height) = first.dimensions();
    buffer_from_raw(width, height, samples)
}

/// How a sharpness above [`SHARPEN_MAX`] is treated.
///
/// `Legacy` pins the blur weight to [`SHARPEN_LEGACY_WEIGHT`], `Clamp`
/// clamps the input to [`SHARPEN_MAX`] first. Both land on a weight of
/// -10, so the output is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharpenOverflow {
    #[default]
    Legacy,
    Clamp,
}

/// Unsharp-mask configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SharpenConfig {
    #[derivative(Default(value = "0.0"))]
    sharpness: f64, // [0, 100]

    #[derivative(Default(value = "SharpenOverflow::Legacy"))]
    overflow: SharpenOverflow,
}

impl SharpenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight of the blurred copy: 0 down to -10, never positive.
    pub fn blur_weight(&self) -> ImageAdjustResult<f64> {
        ensure_not_nan("sharpness", self.sharpness)?;

        let beta = self.sharpness;
        if beta < 0.0 {
            return Ok(0.0);
        }

        if beta > SHARPEN_MAX {
            log::debug!("sharpness {beta} above {SHARPEN_MAX}, {:?} overflow", self.overflow);
            return Ok(match self.overflow {
                SharpenOverflow::Legacy => SHARPEN_LEGACY_WEIGHT,
                SharpenOverflow::Clamp => SHARPEN_MAX / SHARPEN_DIVISOR,
            });
        }

        Ok(beta / SHARPEN_DIVISOR)
    }
}

impl Effect for SharpenConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;

        let weight = self.blur_weight()?;
        if weight == 0.0 {
            return Ok(image.clone());
        }

        log::trace!("sharpness {} -> blur weight {weight}", self.sharpness);

        let blurred = gaussian_blur(image, SHARPEN_KERNEL_SIZE, SHARPEN_SIGMA)?;
        add_weighted(image, 1.0 - weight, &blurred, weight, 0.0)
    }
}
