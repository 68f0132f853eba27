use crate::{
    Effect, ImageAdjustError, ImageAdjustResult, MAX_CHANNEL_VALUE, buffer_from_raw,
    ensure_not_empty, ensure_not_nan,
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgb, RgbImage};
use imageproc::filter::separable_filter_equal;
use rayon::prelude::*;

/// Normalised 1-D Gaussian weights for an odd `size`.
pub fn gaussian_kernel(size: u32, sigma: f64) -> ImageAdjustResult<Vec<f32>> {
    if size % 2 == 0 {
        return Err(ImageAdjustError::InvalidParameter(format!(
            "kernel size must be odd, got {size}"
        )));
    }

    ensure_not_nan("sigma", sigma)?;
    if sigma <= 0.0 {
        return Err(ImageAdjustError::InvalidParameter(format!(
            "sigma must be positive, got {sigma}"
        )));
    }

    let radius = (size / 2) as f64;
    let weights = (0..size)
        .map(|i| {
            let x = i as f64 - radius;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect::<Vec<f64>>();

    let sum: f64 = weights.iter().sum();
    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

/// Separable Gaussian blur through `imageproc`, filtered in `f32` and
/// rounded back to `u8`. Borders repeat the edge pixel.
pub fn gaussian_blur(
    image: &RgbImage,
    kernel_size: u32,
    sigma: f64,
) -> ImageAdjustResult<RgbImage> {
    ensure_not_empty(image)?;

    let kernel = gaussian_kernel(kernel_size, sigma)?;
    let (width, height) = image.dimensions();

    let samples = image.as_raw().par_iter().map(|&s| s as f32).collect::<Vec<f32>>();
    let float_image = buffer_from_raw::<Rgb<f32>>(width, height, samples)?;

    let filtered = separable_filter_equal(&float_image, &kernel);

    let max = MAX_CHANNEL_VALUE as f32;
    let samples = filtered
        .as_raw()
        .par_iter()
        .map(|s| s.round().clamp(0.0, max) as u8)
        .collect::<Vec<u8>>();

    buffer_from_raw(width, height, samples)
}

/// Gaussian blur configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "3"))]
    kernel_size: u32, // odd

    #[derivative(Default(value = "3.0"))]
    sigma: f64,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        gaussian_blur(image, self.kernel_size, self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_three_by_sigma_three() {
        let kernel = gaussian_kernel(3, 3.0).unwrap();
        assert_eq!(kernel.len(), 3);
        assert_eq!(kernel[0], kernel[2]);
        assert!((kernel[0] - 0.327_104).abs() < 1e-5);
        assert!((kernel[1] - 0.345_792).abs() < 1e-5);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_rejects_bad_input() {
        assert!(gaussian_kernel(4, 3.0).is_err());
        assert!(gaussian_kernel(0, 3.0).is_err());
        assert!(gaussian_kernel(3, 0.0).is_err());
        assert!(gaussian_kernel(3, f64::NAN).is_err());
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let image = RgbImage::from_pixel(6, 5, Rgb([128, 40, 250]));
        let blurred = gaussian_blur(&image, 3, 3.0).unwrap();
        assert_eq!(blurred, image);
    }

    #[test]
    fn test_single_bright_pixel_spreads() {
        let mut image = RgbImage::new(5, 5);
        image.put_pixel(2, 2, Rgb([255, 255, 255]));

        let blurred = GaussianBlurConfig::new().apply(&image).unwrap();

        // 255 * 0.3458^2, 255 * 0.3458 * 0.3271, 255 * 0.3271^2
        assert_eq!(blurred.get_pixel(2, 2)[0], 30);
        assert_eq!(blurred.get_pixel(1, 2)[0], 29);
        assert_eq!(blurred.get_pixel(1, 1)[0], 27);
        assert_eq!(blurred.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_edges_repeat_border_pixel() {
        // Bright left column: the border pixel counts for both its own tap
        // and the missing one, so it keeps 0.3271 + 0.3458 of its level
        let image = RgbImage::from_fn(4, 3, |x, _| {
            if x == 0 {
                Rgb([200, 200, 200])
            } else {
                Rgb([0, 0, 0])
            }
        });

        let blurred = gaussian_blur(&image, 3, 3.0).unwrap();
        for y in 0..3 {
            assert_eq!(blurred.get_pixel(0, y)[0], 135);
            assert_eq!(blurred.get_pixel(1, y)[0], 65);
            assert_eq!(blurred.get_pixel(2, y)[0], 0);
        }
    }

    #[test]
    fn test_single_pixel_image() {
        let image = RgbImage::from_pixel(1, 1, Rgb([17, 99, 201]));
        assert_eq!(gaussian_blur(&image, 3, 3.0).unwrap(), image);
    }
}
