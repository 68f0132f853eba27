//! 8-bit HSV conversion and the adjustments that work in HSV.
//!
//! Hue uses a 180-step wheel so it fits a byte: bucket `h` covers
//! `2h` degrees. Saturation and value span the full `0..=255`.

use crate::{Effect, HUE_STEPS, ImageAdjustResult, MAX_CHANNEL_VALUE, ensure_not_empty, map_pixels};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);

    let s = if v == 0 {
        0
    } else {
        (MAX_CHANNEL_VALUE as f32 * diff as f32 / v as f32).round() as i32
    };

    let h = if diff == 0 {
        0
    } else {
        // Offset within the six sectors, in units of `diff`
        let sector_offset = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };

        let steps_per_sector = HUE_STEPS as f32 / 6.0;
        let h = (steps_per_sector * sector_offset as f32 / diff as f32).round() as i32;
        h.rem_euclid(HUE_STEPS as i32)
    };

    Hsv {
        h: h as u8,
        s: s as u8,
        v: v as u8,
    }
}

pub fn hsv_to_rgb(Hsv { h, s, v }: Hsv) -> [u8; 3] {
    if s == 0 {
        return [v; 3];
    }

    let max = MAX_CHANNEL_VALUE as f32;
    let (s, v) = (s as f32 / max, v as f32 / max);

    let h = (h as f32 * 6.0 / HUE_STEPS as f32).rem_euclid(6.0);
    let sector = h.floor();
    let fraction = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * fraction);
    let t = v * (1.0 - s * (1.0 - fraction));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [r, g, b].map(|c| (c * max).round().clamp(0.0, max) as u8)
}

/// Convert every pixel to HSV, apply `f`, and convert back.
pub fn map_hsv<F>(image: &RgbImage, f: F) -> ImageAdjustResult<RgbImage>
where
    F: Fn(Hsv) -> Hsv + Sync + Send,
{
    ensure_not_empty(image)?;
    map_pixels(image, |rgb| hsv_to_rgb(f(rgb_to_hsv(rgb))))
}

/// Add `shift` to the saturation channel, saturating at 0 and 255
pub fn saturation(image: &RgbImage, shift: i32) -> ImageAdjustResult<RgbImage> {
    SaturationConfig::new().with_amount(shift).apply(image)
}

/// Rotate hue by `shift` buckets on the 180-step wheel
pub fn hue(image: &RgbImage, shift: i32) -> ImageAdjustResult<RgbImage> {
    HueRotateConfig::new().with_shift(shift).apply(image)
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SaturationConfig {
    #[derivative(Default(value = "0"))]
    amount: i32, // [-255, 255]
}

impl SaturationConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SaturationConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;

        // Skip the HSV round trip so a zero shift is exact
        if self.amount == 0 {
            return Ok(image.clone());
        }

        let amount = self.amount;
        map_hsv(image, |hsv| Hsv {
            s: (hsv.s as i32)
                .saturating_add(amount)
                .clamp(0, MAX_CHANNEL_VALUE as i32) as u8,
            ..hsv
        })
    }
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct HueRotateConfig {
    #[derivative(Default(value = "0"))]
    shift: i32, // [0, 180], any integer wraps
}

impl HueRotateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shift folded into `0..180`.
    pub fn wrapped_shift(&self) -> u8 {
        self.shift.rem_euclid(HUE_STEPS as i32) as u8
    }
}

impl Effect for HueRotateConfig {
    fn apply(&self, image: &RgbImage) -> ImageAdjustResult<RgbImage> {
        ensure_not_empty(image)?;

        let shift = self.wrapped_shift();
        if shift == 0 {
            return Ok(image.clone());
        }

        map_hsv(image, |hsv| Hsv {
            h: ((hsv.h as u16 + shift as u16) % HUE_STEPS as u16) as u8,
            ..hsv
        })
    }
}
