// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Icon extractor — per-box cropping with optional background removal and
// orientation normalization.

use image::RgbaImage;
use ikonwerk_core::error::Result;
use ikonwerk_core::types::{AlignOutcome, ExtractOptions, PixelRect};
use tracing::{debug, info, instrument};

use crate::align::normalizer::OrientationNormalizer;
use crate::image::processor::crop_to_rect;
use crate::provider::MaskProvider;

/// Extracts independent icon images from a source image.
///
/// Each box is processed in isolation: crop (clamped to image bounds) →
/// optional background removal → optional deskew. When deskew is requested
/// the normalizer computes its own foreground mask from the current image,
/// whether or not background removal was applied for display — the two
/// concerns are independent.
pub struct IconExtractor<M> {
    provider: M,
}

impl<M: MaskProvider> IconExtractor<M> {
    pub fn new(provider: M) -> Self {
        Self { provider }
    }

    /// Extract one icon per box, isolating per-icon failures.
    ///
    /// A failing icon (segmentation unavailable, say) yields an `Err` in its
    /// slot; the rest of the batch is unaffected. Out-of-range boxes yield
    /// smaller or empty crops, never errors.
    pub fn extract(
        &self,
        source: &RgbaImage,
        boxes: &[PixelRect],
        opts: ExtractOptions,
    ) -> Vec<Result<RgbaImage>> {
        self.extract_with_outcomes(source, boxes, opts)
            .into_iter()
            .map(|slot| slot.map(|(image, _)| image))
            .collect()
    }

    /// As [`extract`](Self::extract), also reporting each icon's alignment
    /// outcome (`None` when deskew was not requested).
    #[instrument(skip_all, fields(boxes = boxes.len(), opts = ?opts))]
    pub fn extract_with_outcomes(
        &self,
        source: &RgbaImage,
        boxes: &[PixelRect],
        opts: ExtractOptions,
    ) -> Vec<Result<(RgbaImage, Option<AlignOutcome>)>> {
        info!(
            width = source.width(),
            height = source.height(),
            boxes = boxes.len(),
            "extracting icons"
        );
        boxes
            .iter()
            .enumerate()
            .map(|(index, rect)| {
                let result = self.extract_one(source, rect, opts);
                if let Err(err) = &result {
                    debug!(index, %rect, %err, "icon extraction failed");
                }
                result
            })
            .collect()
    }

    /// All-or-nothing variant: the first failing icon aborts the batch.
    pub fn extract_all(
        &self,
        source: &RgbaImage,
        boxes: &[PixelRect],
        opts: ExtractOptions,
    ) -> Result<Vec<RgbaImage>> {
        self.extract(source, boxes, opts).into_iter().collect()
    }

    fn extract_one(
        &self,
        source: &RgbaImage,
        rect: &PixelRect,
        opts: ExtractOptions,
    ) -> Result<(RgbaImage, Option<AlignOutcome>)> {
        let mut icon = crop_to_rect(source, rect);
        debug!(%rect, width = icon.width(), height = icon.height(), "icon cropped");

        if opts.remove_background {
            icon = self.provider.remove_background(&icon)?;
        }

        if opts.align {
            let normalizer = OrientationNormalizer::new(&self.provider);
            let (aligned, outcome) = normalizer.align(&icon)?;
            return Ok((aligned, Some(outcome)));
        }

        Ok((icon, None))
    }
}
