// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotation-search deskew — finds the rotation angle minimizing the
// axis-aligned bounding box of the dominant foreground region, then rotates
// and crops the original image accordingly.
//
// The search covers integer degrees in [-45, 45], lowest magnitude first.
// Minimizing the enclosing box over small rotations deskews a roughly
// rectangular or symbolic icon without a dedicated contour-orientation
// estimator: an exhaustive 91-trial search, deterministic by construction.

use image::RgbaImage;
use imageproc::geometric_transformations::Interpolation;
use ikonwerk_core::error::Result;
use ikonwerk_core::types::{AlignOutcome, PixelRect};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::align::components::{binarize_mask, dominant_component};
use crate::image::processor::{crop_to_rect, rotate_expanded};
use crate::provider::MaskProvider;

/// Half-width of the angle search window, degrees.
const ANGLE_LIMIT_DEG: i32 = 45;

/// Deskews icons by exhaustive rotation search over the foreground mask.
///
/// The mask provider is consulted once per image for shape analysis only;
/// the output image keeps the caller's pixels (the normalizer never applies
/// background removal to the result, it only uses the mask to find the
/// rotation and crop box).
pub struct OrientationNormalizer<M> {
    provider: M,
}

impl<M: MaskProvider> OrientationNormalizer<M> {
    pub fn new(provider: M) -> Self {
        Self { provider }
    }

    /// Rotate `image` to the angle minimizing the dominant foreground
    /// region's bounding-box area, and crop to that box.
    ///
    /// Falls back to the rotated-but-uncropped image (angle 0 when the mask
    /// is empty at every angle) with [`AlignOutcome::EmptyMask`]; this is a
    /// recorded outcome, not an error. Provider failures propagate.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn align(&self, image: &RgbaImage) -> Result<(RgbaImage, AlignOutcome)> {
        let mask_source = self.provider.remove_background(image)?;

        let best = best_angle(&mask_source).unwrap_or(0);
        debug!(angle = best, "rotation search complete");

        // Rotate the original (not the mask source) for output, then
        // recompute the mask at the winning angle to find the crop box —
        // the search only tracked areas, not regions.
        let rotated = rotate_expanded(image, best, Interpolation::Bilinear);
        let rotated_mask = rotate_expanded(&mask_source, best, Interpolation::Nearest);
        let mask = binarize_mask(&rotated_mask);

        match dominant_component(&mask) {
            Some(region) => {
                let crop = PixelRect::new(
                    region.min_col as i32,
                    region.min_row as i32,
                    region.max_col as i32 + 1,
                    region.max_row as i32 + 1,
                );
                let cropped = crop_to_rect(&rotated, &crop);
                info!(
                    angle = best,
                    width = cropped.width(),
                    height = cropped.height(),
                    "icon aligned"
                );
                Ok((cropped, AlignOutcome::Aligned { angle_deg: best }))
            }
            None => {
                warn!("foreground mask is empty; returning uncropped image");
                Ok((rotated, AlignOutcome::EmptyMask))
            }
        }
    }
}

/// Candidate angles in lowest-magnitude-first order: `0, -1, 1, …, -45, 45`.
fn search_angles() -> impl Iterator<Item = i32> {
    std::iter::once(0).chain((1..=ANGLE_LIMIT_DEG).flat_map(|m| [-m, m]))
}

/// One trial: the bounding-box area of the dominant foreground region after
/// rotating the mask source by `angle`. `None` when the mask is empty at
/// this angle (no candidate produced).
fn bounding_trial(mask_source: &RgbaImage, angle: i32) -> Option<(i32, u64)> {
    let rotated = rotate_expanded(mask_source, angle, Interpolation::Nearest);
    let mask = binarize_mask(&rotated);
    dominant_component(&mask).map(|region| (angle, region.bbox_area()))
}

/// Fold trial results to the winning angle: minimum area, first on tie.
fn fold_best(trials: Vec<(i32, u64)>) -> Option<i32> {
    trials
        .into_iter()
        .fold(None, |best: Option<(i32, u64)>, (angle, area)| match best {
            Some((_, best_area)) if best_area <= area => best,
            _ => Some((angle, area)),
        })
        .map(|(angle, _)| angle)
}

/// Run all 91 trials and reduce to the winning angle.
///
/// The trials share no mutable state, so the `parallel` feature may evaluate
/// them concurrently; `fold_best` consumes them in search order either way,
/// keeping the winner deterministic.
fn best_angle(mask_source: &RgbaImage) -> Option<i32> {
    fold_best(run_trials(mask_source))
}

#[cfg(feature = "parallel")]
fn run_trials(mask_source: &RgbaImage) -> Vec<(i32, u64)> {
    let angles: Vec<i32> = search_angles().collect();
    angles
        .into_par_iter()
        .filter_map(|angle| bounding_trial(mask_source, angle))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_trials(mask_source: &RgbaImage) -> Vec<(i32, u64)> {
    search_angles()
        .filter_map(|angle| bounding_trial(mask_source, angle))
        .collect()
}
