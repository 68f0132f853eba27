pub mod base_effect;
pub mod blur;
pub mod colour_space;
pub mod lut;
pub mod monochrome;
pub mod stylized;
pub mod sweep;

pub use base_effect::{brightness, contrast, gamma};
pub use colour_space::{hue, saturation};
pub use monochrome::grayscale;
pub use stylized::sharpness;

use image::{
    ImageBuffer, Pixel, RgbImage,
    error::{ImageError, ParameterError, ParameterErrorKind},
};
use rayon::prelude::*;

/// Largest value an 8-bit channel can hold.
pub const MAX_CHANNEL_VALUE: u8 = 255;

/// Pivot of the contrast curve.
pub const MID_CHANNEL_VALUE: u8 = 128;

/// The higher it is, the weaker a given contrast step becomes.
pub const CONTRAST_KAPPA: f64 = 259.0;

/// Number of hue buckets on the 8-bit hue wheel (two degrees per bucket).
pub const HUE_STEPS: u8 = 180;

pub type ImageAdjustResult<T> = Result<T, ImageAdjustError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageAdjustError {
    #[error("Empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}

/// A pure transform: reads `image`, returns a new image of the same size.
pub trait Effect {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage>;
}

#[derive(Debug, Clone)]
pub enum ImageAdjustment {
    // Tone
    Brightness(base_effect::BrightnessConfig),
    Contrast(base_effect::ContrastConfig),
    Gamma(base_effect::GammaConfig),

    // HSV
    Saturation(colour_space::SaturationConfig),
    HueRotate(colour_space::HueRotateConfig),

    // Convolution
    GaussianBlur(blur::GaussianBlurConfig),
    Sharpen(stylized::SharpenConfig),
}

impl Effect for ImageAdjustment {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        match self {
            ImageAdjustment::Brightness(config) => config.apply(image),
            ImageAdjustment::Contrast(config) => config.apply(image),
            ImageAdjustment::Gamma(config) => config.apply(image),

            ImageAdjustment::Saturation(config) => config.apply(image),
            ImageAdjustment::HueRotate(config) => config.apply(image),

            ImageAdjustment::GaussianBlur(config) => config.apply(image),
            ImageAdjustment::Sharpen(config) => config.apply(image),
        }
    }
}

pub(crate) fn ensure_not_empty(image: &RgbImage) -> ImageAdjustResult<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageAdjustError::EmptyImage { width, height });
    }

    Ok(())
}

pub(crate) fn ensure_not_nan(name: &str, value: f64) -> ImageAdjustResult<()> {
    if value.is_nan() {
        return Err(ImageAdjustError::InvalidParameter(format!(
            "{name} must be a number"
        )));
    }

    Ok(())
}

pub(crate) fn buffer_from_raw<P: Pixel>(
    width: u32,
    height: u32,
    samples: Vec<P::Subpixel>,
) -> ImageAdjustResult<ImageBuffer<P, Vec<P::Subpixel>>> {
    ImageBuffer::from_raw(width, height, samples).ok_or_else(|| {
        ImageAdjustError::Image(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        )))
    })
}

/// Runs `f` over every channel sample of a copy of `image`.
pub(crate) fn map_subpixels<F>(image: &RgbImage, f: F) -> ImageAdjustResult<RgbImage>
where
    F: Fn(u8) -> u8 + Sync + Send,
{
    let (width, height) = image.dimensions();
    let mut samples = image.as_raw().clone();
    samples.par_iter_mut().for_each(|sample| *sample = f(*sample));

    buffer_from_raw(width, height, samples)
}

/// Runs `f` over every `[r, g, b]` pixel of a copy of `image`.
pub(crate) fn map_pixels<F>(image: &RgbImage, f: F) -> ImageAdjustResult<RgbImage>
where
    F: Fn([u8; 3]) -> [u8; 3] + Sync + Send,
{
    let (width, height) = image.dimensions();
    let mut samples = image.as_raw().clone();
    samples.par_chunks_exact_mut(3).for_each(|pixel| {
        let [r, g, b] = f([pixel[0], pixel[1], pixel[2]]);
        pixel[0] = r;
        pixel[1] = g;
        pixel[2] = b;
    });

    buffer_from_raw(width, height, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_empty_image_rejected() {
        let image = RgbImage::new(0, 4);
        let err = ensure_not_empty(&image).unwrap_err();
        assert!(matches!(
            err,
            ImageAdjustError::EmptyImage {
                width: 0,
                height: 4
            }
        ));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(ensure_not_nan("gamma", f64::NAN).is_err());
        assert!(ensure_not_nan("gamma", f64::INFINITY).is_ok());
    }

    #[test]
    fn test_map_pixels_leaves_input_untouched() {
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let swapped = map_pixels(&image, |[r, g, b]| [b, g, r]).unwrap();

        assert_eq!(image.get_pixel(0, 0), &Rgb([10, 20, 30]));
        assert_eq!(swapped.get_pixel(2, 1), &Rgb([30, 20, 10]));
        assert_eq!(swapped.dimensions(), (3, 2));
    }

    #[test]
    fn test_buffer_from_raw_mismatch() {
        let err = buffer_from_raw::<Rgb<u8>>(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, ImageAdjustError::Image(_)));
    }

    #[test]
    fn test_adjustment_dispatch() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));
        let effect =
            ImageAdjustment::Brightness(base_effect::BrightnessConfig::new().with_brightness(20));
        let result = effect.apply(&image).unwrap();
        assert_eq!(result.get_pixel(1, 1), &Rgb([120, 120, 120]));
    }
}
