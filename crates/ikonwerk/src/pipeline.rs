// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end pipeline — detection, extraction, and packaging behind one
// request-scoped object.

use image::RgbaImage;
use ikonwerk_core::PipelineConfig;
use ikonwerk_core::error::Result;
use ikonwerk_export::pdf::PdfComposer;
use ikonwerk_export::{archive_icons, write_bytes};
use ikonwerk_vision::annotate::draw_detections;
use ikonwerk_vision::extract::IconExtractor;
use ikonwerk_vision::provider::{DetectionProvider, MaskProvider};
use tracing::{info, instrument, warn};

/// One configured pipeline: detector + segmenter + settings.
///
/// All state is request-scoped and explicit — construct one per source image
/// or share one across a batch; there is no ambient global state. Provider
/// failures during detection abort the call; per-icon segmentation failures
/// are isolated and logged, and the affected icon is dropped from the batch.
pub struct IconPipeline<D, M> {
    detector: D,
    segmenter: M,
    config: PipelineConfig,
}

impl<D: DetectionProvider, M: MaskProvider> IconPipeline<D, M> {
    pub fn new(detector: D, segmenter: M, config: PipelineConfig) -> Self {
        Self {
            detector,
            segmenter,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Detect and extract icons, keeping insertion order.
    ///
    /// Icons whose extraction fails (e.g. the segmentation model is
    /// unavailable for one crop) are dropped with a warning; the rest of the
    /// batch is returned.
    #[instrument(skip_all, fields(width = source.width(), height = source.height()))]
    pub fn extract_icons(&self, source: &RgbaImage) -> Result<Vec<RgbaImage>> {
        let boxes = self.detector.detect(source)?;
        info!(boxes = boxes.len(), "detection complete");

        let extractor = IconExtractor::new(&self.segmenter);
        let results = extractor.extract(source, &boxes, self.config.extract);

        let mut icons = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(icon) => icons.push(icon),
                Err(err) => warn!(index, %err, "icon dropped from batch"),
            }
        }
        Ok(icons)
    }

    /// Detect, extract, and render the grid-laid-out PDF document.
    pub fn compose_pdf(&self, source: &RgbaImage) -> Result<Vec<u8>> {
        let icons = self.extract_icons(source)?;
        let mut composer = PdfComposer::new();
        composer.set_pixels_per_mm(self.config.pixels_per_mm);
        composer.compose(&icons, &self.config.grid)
    }

    /// Detect, extract, and package the ZIP archive of loose icons.
    pub fn compose_archive(&self, source: &RgbaImage) -> Result<Vec<u8>> {
        let icons = self.extract_icons(source)?;
        archive_icons(&icons)
    }

    /// Compose the PDF and write it to `path`, creating parent directories.
    pub fn write_pdf(&self, source: &RgbaImage, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.compose_pdf(source)?;
        write_bytes(path, &bytes)
    }

    /// Return a copy of the source with detection boxes outlined.
    pub fn annotate(&self, source: &RgbaImage) -> Result<RgbaImage> {
        let boxes = self.detector.detect(source)?;
        Ok(draw_detections(source, &boxes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use ikonwerk_core::IkonwerkError;
    use ikonwerk_core::types::{ExtractOptions, GridSpec, PixelRect};

    /// Detector double returning a fixed box list.
    struct FixedBoxes(Vec<PixelRect>);

    impl DetectionProvider for FixedBoxes {
        fn detect(&self, _image: &RgbaImage) -> Result<Vec<PixelRect>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDetector;

    impl DetectionProvider for BrokenDetector {
        fn detect(&self, _image: &RgbaImage) -> Result<Vec<PixelRect>> {
            Err(IkonwerkError::Detection("model not loaded".into()))
        }
    }

    struct IdentityMask;

    impl MaskProvider for IdentityMask {
        fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage> {
            Ok(image.clone())
        }
    }

    /// Fails for icons narrower than 100 px.
    struct NarrowFailMask;

    impl MaskProvider for NarrowFailMask {
        fn remove_background(&self, image: &RgbaImage) -> Result<RgbaImage> {
            if image.width() < 100 {
                Err(IkonwerkError::MaskProvider("icon too small".into()))
            } else {
                Ok(image.clone())
            }
        }
    }

    fn source_image() -> RgbaImage {
        RgbaImage::from_fn(800, 600, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
        })
    }

    fn grid_2x2() -> GridSpec {
        GridSpec {
            rows: 2,
            cols: 2,
            margin_mm: 10.0,
            ..GridSpec::default()
        }
    }

    #[test]
    fn end_to_end_crop_is_returned_unchanged() {
        let detector = FixedBoxes(vec![PixelRect::new(100, 100, 300, 250)]);
        let pipeline = IconPipeline::new(detector, IdentityMask, PipelineConfig::default());

        let source = source_image();
        let icons = pipeline.extract_icons(&source).unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].dimensions(), (200, 150));
        assert_eq!(*icons[0].get_pixel(0, 0), *source.get_pixel(100, 100));
    }

    #[test]
    fn end_to_end_pdf_composes() {
        let detector = FixedBoxes(vec![
            PixelRect::new(100, 100, 300, 250),
            PixelRect::new(400, 300, 500, 400),
        ]);
        let config = PipelineConfig {
            grid: grid_2x2(),
            ..PipelineConfig::default()
        };
        let pipeline = IconPipeline::new(detector, IdentityMask, config);

        let bytes = pipeline.compose_pdf(&source_image()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn end_to_end_archive_names_entries_in_order() {
        let detector = FixedBoxes(vec![
            PixelRect::new(0, 0, 100, 100),
            PixelRect::new(100, 0, 200, 100),
            PixelRect::new(200, 0, 300, 100),
        ]);
        let pipeline = IconPipeline::new(detector, IdentityMask, PipelineConfig::default());

        let bytes = pipeline.compose_archive(&source_image()).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        for index in 0..3 {
            assert_eq!(
                archive.by_index(index).unwrap().name(),
                format!("image_{index}.png")
            );
        }
    }

    #[test]
    fn failed_icons_are_dropped_not_fatal() {
        let detector = FixedBoxes(vec![
            PixelRect::new(0, 0, 200, 100), // wide enough for NarrowFailMask
            PixelRect::new(0, 0, 50, 50),   // too narrow — dropped
        ]);
        let config = PipelineConfig {
            extract: ExtractOptions {
                remove_background: true,
                align: false,
            },
            ..PipelineConfig::default()
        };
        let pipeline = IconPipeline::new(detector, NarrowFailMask, config);

        let icons = pipeline.extract_icons(&source_image()).unwrap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].dimensions(), (200, 100));
    }

    #[test]
    fn detection_failure_aborts_the_call() {
        let pipeline = IconPipeline::new(BrokenDetector, IdentityMask, PipelineConfig::default());
        assert!(matches!(
            pipeline.extract_icons(&source_image()),
            Err(IkonwerkError::Detection(_))
        ));
    }

    #[test]
    fn annotate_outlines_detections() {
        let detector = FixedBoxes(vec![PixelRect::new(10, 10, 60, 60)]);
        let pipeline = IconPipeline::new(detector, IdentityMask, PipelineConfig::default());

        let annotated = pipeline.annotate(&source_image()).unwrap();
        assert_eq!(*annotated.get_pixel(10, 10), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn write_pdf_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports/run1/icons.pdf");
        let detector = FixedBoxes(vec![PixelRect::new(0, 0, 120, 90)]);
        let pipeline = IconPipeline::new(detector, IdentityMask, PipelineConfig::default());

        pipeline.write_pdf(&source_image(), &path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}
