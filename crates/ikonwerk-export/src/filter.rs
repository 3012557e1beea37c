// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pluggable post-processing filters applied to icon sequences before
// packaging. These operate in RGBA and preserve the alpha channel.

use image::{Rgba, RgbaImage};
use tracing::instrument;

/// A post-processing filter applied uniformly to a batch of icons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IconFilter {
    /// Replace color with Rec. 709 luminance.
    Grayscale,
    /// Invert the color channels.
    Invert,
    /// Scale contrast around the midpoint; 1.0 is a no-op, 2.0 doubles it.
    Contrast { factor: f32 },
    /// Binarize luminance: strictly above `cutoff` becomes white, else black.
    Threshold { cutoff: u8 },
}

impl IconFilter {
    /// Apply the filter to one icon, returning a new image.
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        match *self {
            Self::Grayscale => map_pixels(image, |r, g, b, a| {
                let l = luminance(r, g, b);
                Rgba([l, l, l, a])
            }),
            Self::Invert => map_pixels(image, |r, g, b, a| {
                Rgba([255 - r, 255 - g, 255 - b, a])
            }),
            Self::Contrast { factor } => map_pixels(image, |r, g, b, a| {
                let adjust = |c: u8| -> u8 {
                    let val = factor * (c as f32 - 128.0) + 128.0;
                    val.clamp(0.0, 255.0) as u8
                };
                Rgba([adjust(r), adjust(g), adjust(b), a])
            }),
            Self::Threshold { cutoff } => map_pixels(image, |r, g, b, a| {
                let v = if luminance(r, g, b) > cutoff { 255 } else { 0 };
                Rgba([v, v, v, a])
            }),
        }
    }

    /// Apply the filter across a whole batch, preserving order.
    #[instrument(skip(self, images), fields(filter = ?self, images = images.len()))]
    pub fn apply_all(&self, images: &[RgbaImage]) -> Vec<RgbaImage> {
        images.iter().map(|image| self.apply(image)).collect()
    }
}

fn map_pixels(image: &RgbaImage, f: impl Fn(u8, u8, u8, u8) -> Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        f(r, g, b, a)
    })
}

/// Rec. 709 luminance, integer arithmetic.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((2126 * r as u32 + 7152 * g as u32 + 722 * b as u32) / 10000) as u8
}
