// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Injected model capabilities — object detection and background segmentation.
//
// The pipeline depends only on these traits; real model backends and test
// doubles plug in behind them.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use ikonwerk_core::error::Result;
use ikonwerk_core::types::PixelRect;

/// Background segmentation capability.
///
/// Implementations return an image of the same dimensions with background
/// pixels cleared to transparent (the alpha channel marks foreground).
/// Failure surfaces as [`ikonwerk_core::IkonwerkError::MaskProvider`].
pub trait MaskProvider {
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage>;
}

impl<M: MaskProvider + ?Sized> MaskProvider for &M {
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage> {
        (**self).remove_background(image)
    }
}

/// Object detection capability: bounding boxes for icons in a source image.
///
/// Failure surfaces as [`ikonwerk_core::IkonwerkError::Detection`].
pub trait DetectionProvider {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<PixelRect>>;
}

impl<D: DetectionProvider + ?Sized> DetectionProvider for &D {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<PixelRect>> {
        (**self).detect(image)
    }
}

/// Model-free fallback segmenter.
///
/// Computes a global Otsu threshold over the luminance histogram and treats
/// the darker side (luminance at or below the threshold) as foreground:
/// those pixels keep their color with full alpha, everything else becomes
/// transparent black. A crude stand-in for a real segmentation model —
/// adequate for dark icons on a light background and for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtsuMaskProvider;

impl MaskProvider for OtsuMaskProvider {
    fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage> {
        let gray = DynamicImage::ImageRgba8(image.clone()).to_luma8();
        let threshold = otsu_threshold(&gray);

        let output = RgbaImage::from_fn(image.width(), image.height(), |x, y| {
            let luma = gray.get_pixel(x, y).0[0];
            if luma <= threshold {
                let Rgba([r, g, b, _]) = *image.get_pixel(x, y);
                Rgba([r, g, b, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        Ok(output)
    }
}

/// Compute the Otsu threshold for a grayscale image.
///
/// Finds the threshold value that minimises the intra-class variance of the
/// dark and bright pixel groups.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let mut sum_total: f64 = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        sum_total += i as f64 * count as f64;
    }

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
