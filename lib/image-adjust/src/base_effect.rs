use crate::{
    CONTRAST_KAPPA, Effect, ImageAdjustResult, MAX_CHANNEL_VALUE, MID_CHANNEL_VALUE,
    ensure_not_empty, ensure_not_nan, lut::LookupTable, map_subpixels,
};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

/// Maps the user-facing gamma slider onto the exponent scale.
pub const GAMMA_SLIDER_SCALE: f64 = 0.05;

/// Shift every channel by a constant, saturating at 0 and 255
pub fn brightness(image: &RgbImage, beta: i32) -> ImageAdjustResult<RgbImage> {
    BrightnessConfig::new().with_brightness(beta).apply(image)
}

/// Stretch or squash channel values around mid gray
pub fn contrast(image: &RgbImage, beta: f64) -> ImageAdjustResult<RgbImage> {
    ContrastConfig::new().with_contrast(beta).apply(image)
}

/// Remap intensities through a power curve
pub fn gamma(image: &RgbImage, g: f64) -> ImageAdjustResult<RgbImage> {
    GammaConfig::new().with_gamma(g).apply(image)
}

/// Brightness adjustment configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BrightnessConfig {
    #[derivative(Default(value = "0"))]
    brightness: i32, // [-255, 255]
}

impl BrightnessConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for BrightnessConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;

        let beta = self.brightness;
        map_subpixels(image, |sample| {
            (sample as i32)
                .saturating_add(beta)
                .clamp(0, MAX_CHANNEL_VALUE as i32) as u8
        })
    }
}

/// Contrast adjustment configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ContrastConfig {
    #[derivative(Default(value = "0.0"))]
    contrast: f64, // [-255, 255], clamped
}

impl ContrastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slope of the contrast curve: 0 at -255, 1 at 0, 129.5 at 255.
    pub fn factor(&self) -> ImageAdjustResult<f64> {
        ensure_not_nan("contrast", self.contrast)?;

        let max = MAX_CHANNEL_VALUE as f64;
        let beta = self.contrast.clamp(-max, max);
        Ok((CONTRAST_KAPPA * (beta + max)) / (max * (CONTRAST_KAPPA - beta)))
    }
}

impl Effect for ContrastConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;

        let factor = self.factor()?;
        log::trace!("contrast {} -> factor {factor:.4}", self.contrast);

        let mid = MID_CHANNEL_VALUE as f64;
        map_subpixels(image, |sample| {
            // new = factor * (old - 128) + 128
            let offset = (factor * (sample as f64 - mid)).round_ties_even();
            (offset + mid).clamp(0.0, MAX_CHANNEL_VALUE as f64) as u8
        })
    }
}

/// Gamma adjustment configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GammaConfig {
    #[derivative(Default(value = "0.0"))]
    gamma: f64, // [-100, 100], negative brightens, positive darkens
}

impl GammaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exponent applied to normalised intensities. Always positive for
    /// finite input; the negative branch divides by at most -1.
    pub fn effective_gamma(&self) -> ImageAdjustResult<f64> {
        ensure_not_nan("gamma", self.gamma)?;

        let scaled = self.gamma * GAMMA_SLIDER_SCALE;
        Ok(if scaled < 0.0 {
            -1.0 / (scaled - 1.0)
        } else {
            scaled + 1.0
        })
    }

    pub fn lookup_table(&self) -> ImageAdjustResult<LookupTable> {
        let exponent = self.effective_gamma()?;
        let max = MAX_CHANNEL_VALUE as f64;

        Ok(LookupTable::from_fn(|i| {
            ((i as f64 / max).powf(exponent) * max)
                .clamp(0.0, max)
                .round_ties_even() as u8
        }))
    }
}

impl Effect for GammaConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;

        let table = self.lookup_table()?;
        log::trace!("gamma {} -> lookup table built", self.gamma);
        table.apply(image)
    }
}
