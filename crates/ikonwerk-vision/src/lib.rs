// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ikonwerk-vision — Icon extraction for the Ikonwerk engine.
//
// Provides the normalized-coordinate decoder, the injected provider traits
// (object detection, background segmentation), raster operations (clamped
// cropping, canvas-expanding rotation), the rotation-search orientation
// normalizer, and the per-box icon extractor.

pub mod align;
pub mod annotate;
pub mod decode;
pub mod extract;
pub mod image;
pub mod provider;

// Re-export the primary types so callers can use `ikonwerk_vision::IconExtractor` etc.
pub use align::normalizer::OrientationNormalizer;
pub use extract::IconExtractor;
pub use image::processor::IconProcessor;
pub use provider::{DetectionProvider, MaskProvider, OtsuMaskProvider};
