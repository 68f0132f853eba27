//! Step one adjustment across its parameter range.
//!
//! Each step is an independent [`Effect`] call on the same source image,
//! so frames can be produced lazily, collected, or farmed out to threads.

use crate::{
    Effect, ImageAdjustResult, ImageAdjustment,
    base_effect::{BrightnessConfig, ContrastConfig, GammaConfig},
    colour_space::{HueRotateConfig, SaturationConfig},
    stylized::SharpenConfig,
};
use image::RgbImage;
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum AdjustmentKind {
    Brightness = 0,
    Contrast,
    Saturation,
    Hue,
    Gamma,
    Sharpness,
}

impl AdjustmentKind {
    pub fn name(&self) -> &'static str {
        match self {
            AdjustmentKind::Brightness => "brightness",
            AdjustmentKind::Contrast => "contrast",
            AdjustmentKind::Saturation => "saturation",
            AdjustmentKind::Hue => "hue",
            AdjustmentKind::Gamma => "gamma",
            AdjustmentKind::Sharpness => "sharpness",
        }
    }

    /// The range the preview walks for this adjustment.
    pub fn range(&self) -> SweepRange {
        match self {
            AdjustmentKind::Brightness | AdjustmentKind::Contrast | AdjustmentKind::Saturation => {
                SweepRange::inclusive(-255.0, 255.0, 2.0)
            }
            AdjustmentKind::Hue => SweepRange::inclusive(0.0, 180.0, 1.0),
            AdjustmentKind::Gamma => SweepRange::exclusive(-100.0, 100.0, 1.0),
            AdjustmentKind::Sharpness => SweepRange::exclusive(0.0, 100.0, 0.5),
        }
    }

    /// Build the adjustment for one step. Integer parameters truncate.
    pub fn effect(&self, value: f64) -> ImageAdjustment {
        match self {
            AdjustmentKind::Brightness => {
                ImageAdjustment::Brightness(BrightnessConfig::new().with_brightness(value as i32))
            }
            AdjustmentKind::Contrast => {
                ImageAdjustment::Contrast(ContrastConfig::new().with_contrast(value))
            }
            AdjustmentKind::Saturation => {
                ImageAdjustment::Saturation(SaturationConfig::new().with_amount(value as i32))
            }
            AdjustmentKind::Hue => {
                ImageAdjustment::HueRotate(HueRotateConfig::new().with_shift(value as i32))
            }
            AdjustmentKind::Gamma => ImageAdjustment::Gamma(GammaConfig::new().with_gamma(value)),
            AdjustmentKind::Sharpness => {
                ImageAdjustment::Sharpen(SharpenConfig::new().with_sharpness(value))
            }
        }
    }

    pub fn all() -> &'static [AdjustmentKind] {
        &[
            AdjustmentKind::Brightness,
            AdjustmentKind::Contrast,
            AdjustmentKind::Saturation,
            AdjustmentKind::Hue,
            AdjustmentKind::Gamma,
            AdjustmentKind::Sharpness,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub inclusive: bool,
}

impl SweepRange {
    pub fn inclusive(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            step,
            inclusive: true,
        }
    }

    pub fn exclusive(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            step,
            inclusive: false,
        }
    }

    /// `start + i * step` while within `end`. A non-positive step yields nothing.
    pub fn values(&self) -> impl Iterator<Item = f64> + use<> {
        let SweepRange {
            start,
            end,
            step,
            inclusive,
        } = *self;

        (0u64..)
            .map(move |i| start + i as f64 * step)
            .take_while(move |value| {
                step > 0.0 && if inclusive { *value <= end } else { *value < end }
            })
    }

    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }
}

#[derive(Debug, Clone)]
pub struct SweepFrame {
    pub kind: AdjustmentKind,
    pub value: f64,
    pub image: RgbImage,
}

/// Lazily apply `kind` at every step of its default range.
pub fn sweep(
    image: &RgbImage,
    kind: AdjustmentKind,
) -> impl Iterator<Item = ImageAdjustResult<SweepFrame>> + '_ {
    sweep_range(image, kind, kind.range())
}

/// Lazily apply `kind` at every step of `range`.
pub fn sweep_range(
    image: &RgbImage,
    kind: AdjustmentKind,
    range: SweepRange,
) -> impl Iterator<Item = ImageAdjustResult<SweepFrame>> + '_ {
    log::debug!("{} sweep over {range:?}", kind.name());

    range.values().map(move |value| {
        log::debug!("{} step {value}", kind.name());

        let image = kind.effect(value).apply(image)?;
        Ok(SweepFrame { kind, value, image })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_default_range_lengths() {
        assert_eq!(AdjustmentKind::Brightness.range().len(), 256);
        assert_eq!(AdjustmentKind::Contrast.range().len(), 256);
        assert_eq!(AdjustmentKind::Saturation.range().len(), 256);
        assert_eq!(AdjustmentKind::Hue.range().len(), 181);
        assert_eq!(AdjustmentKind::Gamma.range().len(), 200);
        assert_eq!(AdjustmentKind::Sharpness.range().len(), 200);
    }

    #[test]
    fn test_range_bounds() {
        let values = AdjustmentKind::Brightness.range().values().collect::<Vec<_>>();
        assert_eq!(values.first(), Some(&-255.0));
        assert_eq!(values.last(), Some(&255.0));

        let values = AdjustmentKind::Gamma.range().values().collect::<Vec<_>>();
        assert_eq!(values.last(), Some(&99.0));
    }

    #[test]
    fn test_non_positive_step_is_empty() {
        assert!(SweepRange::inclusive(0.0, 10.0, 0.0).is_empty());
        assert!(SweepRange::inclusive(0.0, 10.0, -1.0).is_empty());
    }

    #[test]
    fn test_kind_round_trips_through_u8() {
        for kind in AdjustmentKind::all() {
            let raw: u8 = (*kind).into();
            assert_eq!(AdjustmentKind::try_from(raw).unwrap(), *kind);
        }
        assert!(AdjustmentKind::try_from(42u8).is_err());
    }

    #[test]
    fn test_sweep_frames() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));
        let frames = sweep_range(
            &image,
            AdjustmentKind::Brightness,
            SweepRange::inclusive(-20.0, 20.0, 20.0),
        )
        .collect::<ImageAdjustResult<Vec<_>>>()
        .unwrap();

        let levels = frames
            .iter()
            .map(|frame| (frame.value, frame.image.get_pixel(0, 0)[0]))
            .collect::<Vec<_>>();
        assert_eq!(levels, vec![(-20.0, 80), (0.0, 100), (20.0, 120)]);
    }

    #[test]
    fn test_sweep_reports_empty_image() {
        let image = RgbImage::new(0, 0);
        let first = sweep(&image, AdjustmentKind::Hue).next().unwrap();
        assert!(first.is_err());
    }
}
