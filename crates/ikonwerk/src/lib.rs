// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ikonwerk — icon extraction engine.
//
// Crops detector-located icons out of a source image, deskews each one by
// rotation search over its foreground mask, and packages the results as a
// loose PNG set, a ZIP archive, or a grid-laid-out PDF. This umbrella crate
// re-exports the subsystem crates and wires them into an end-to-end
// pipeline behind injected detection/segmentation capabilities.

pub mod pipeline;

pub use ikonwerk_core::{
    AlignOutcome, ExtractOptions, GridSpec, IkonwerkError, PageOrientation, PaperSize,
    PipelineConfig, PixelRect,
};
pub use ikonwerk_export::{IconFilter, PdfComposer, archive_icons, layout_pages, save_icon_set};
pub use ikonwerk_vision::{
    DetectionProvider, IconExtractor, IconProcessor, MaskProvider, OrientationNormalizer,
    OtsuMaskProvider,
};
pub use pipeline::IconPipeline;
