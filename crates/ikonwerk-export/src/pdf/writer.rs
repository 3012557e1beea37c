// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF composer — renders grid layouts into paginated documents using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use ikonwerk_core::error::Result;
use ikonwerk_core::types::{DEFAULT_PIXELS_PER_MM, GridSpec};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::layout::layout_pages;
use crate::sink::write_bytes;

/// Millimetres per inch, for deriving the placement DPI from the raster density.
const MM_PER_INCH: f32 = 25.4;

/// Composes grid-laid-out icon documents.
///
/// The page size and grid come from the [`GridSpec`] passed to
/// [`compose`](Self::compose); the composer itself carries presentation
/// settings: document title and the raster density used when scaling icons
/// for embedding (default 3.78 px/mm ≈ 96 DPI — a renderer-matching
/// configuration constant, not derived physics).
pub struct PdfComposer {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// Raster density for embedded icons, pixels per millimetre.
    pixels_per_mm: f32,
}

impl Default for PdfComposer {
    fn default() -> Self {
        Self {
            title: None,
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
        }
    }
}

impl PdfComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Override the raster density (pixels per millimetre).
    pub fn set_pixels_per_mm(&mut self, pixels_per_mm: f32) {
        self.pixels_per_mm = pixels_per_mm;
    }

    /// Render the icons into a paginated PDF per the grid spec.
    ///
    /// Runs the layout engine (so an unsatisfiable spec fails here, before
    /// any rendering), then places each icon at its computed position: the
    /// icon is Lanczos3-resized to the placement size at the configured
    /// raster density, flattened onto white for print, and embedded as an
    /// RGB XObject. An empty icon sequence produces a single blank page.
    ///
    /// Read-only with respect to the input images.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn compose(&self, images: &[RgbaImage], grid: &GridSpec) -> Result<Vec<u8>> {
        let dimensions: Vec<(u32, u32)> = images.iter().map(|image| image.dimensions()).collect();
        let layout = layout_pages(&dimensions, grid)?;

        let (page_w_mm, page_h_mm) = grid.page_dimensions_mm();
        let (page_w, page_h) = (Mm(page_w_mm), Mm(page_h_mm));
        let title = self.title.as_deref().unwrap_or("Ikonwerk Icons");
        // Physical size at placement is px / dpi inches, so this density
        // renders every icon at exactly its layout size.
        let dpi = self.pixels_per_mm * MM_PER_INCH;

        info!(
            paper = ?grid.paper,
            orientation = ?grid.orientation,
            pages = layout.len(),
            title,
            "composing icon PDF"
        );

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::new();

        for page_layout in &layout {
            let mut ops: Vec<Op> = Vec::new();

            for placement in &page_layout.placements {
                if placement.width_mm <= 0.0 || placement.height_mm <= 0.0 {
                    continue; // degenerate crop — occupies its cell, renders nothing
                }

                let px_w = (placement.width_mm * self.pixels_per_mm).round().max(1.0) as u32;
                let px_h = (placement.height_mm * self.pixels_per_mm).round().max(1.0) as u32;
                let resized = image::imageops::resize(
                    &images[placement.index],
                    px_w,
                    px_h,
                    image::imageops::FilterType::Lanczos3,
                );
                let rgb = flatten_onto_white(&resized);

                let raw = RawImage {
                    pixels: RawImageData::U8(rgb.into_raw()),
                    width: px_w as usize,
                    height: px_h as usize,
                    data_format: RawImageFormat::RGB8,
                    tag: Vec::new(),
                };
                let xobject_id = doc.add_image(&raw);

                // PDF origin is bottom-left; layout coordinates are top-down.
                let x_pt = Mm(placement.x_mm).into_pt();
                let y_pt = Mm(page_h_mm - placement.y_mm - placement.height_mm).into_pt();

                ops.push(Op::UseXobject {
                    id: xobject_id,
                    transform: XObjectTransform {
                        translate_x: Some(x_pt),
                        translate_y: Some(y_pt),
                        scale_x: None,
                        scale_y: None,
                        dpi: Some(dpi),
                        rotate: None,
                    },
                });
            }

            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        // Keep the document valid when there is nothing to place.
        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(bytes = output.len(), warnings = warnings.len(), "PDF serialised");

        Ok(output)
    }

    /// Compose and write the PDF to a file, creating parent directories as
    /// needed.
    pub fn write_to_file(
        &self,
        images: &[RgbaImage],
        grid: &GridSpec,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.compose(images, grid)?;
        write_bytes(path.as_ref(), &bytes)?;
        info!("Wrote icon PDF to {}", path.as_ref().display());
        Ok(())
    }
}

/// Flatten transparency onto a white background for print embedding.
fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |c: u8| -> u8 { ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8 };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ikonwerk_core::IkonwerkError;
    use ikonwerk_core::types::{PageOrientation, PaperSize};

    fn icons(n: usize) -> Vec<RgbaImage> {
        (0..n)
            .map(|i| RgbaImage::from_pixel(40 + i as u32 * 10, 30, Rgba([0, 0, 200, 255])))
            .collect()
    }

    #[test]
    fn compose_produces_a_pdf_header() {
        let composer = PdfComposer::new();
        let bytes = composer.compose(&icons(3), &GridSpec::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_sequence_yields_a_blank_single_page_document() {
        let composer = PdfComposer::new();
        let bytes = composer.compose(&[], &GridSpec::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn invalid_grid_fails_before_rendering() {
        let composer = PdfComposer::new();
        let grid = GridSpec {
            rows: 1,
            cols: 1,
            margin_mm: 200.0,
            paper: PaperSize::A4,
            orientation: PageOrientation::Portrait,
        };
        assert!(matches!(
            composer.compose(&icons(1), &grid),
            Err(IkonwerkError::InvalidGridSpec(_))
        ));
    }

    #[test]
    fn zero_sized_icons_are_skipped_not_fatal() {
        let mut images = icons(1);
        images.push(RgbaImage::new(0, 0));
        let composer = PdfComposer::new();
        let bytes = composer.compose(&images, &GridSpec::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn write_to_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/pdf/icons.pdf");

        let composer = PdfComposer::new();
        composer
            .write_to_file(&icons(2), &GridSpec::default(), &path)
            .unwrap();
        assert!(path.exists());
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn flatten_blends_transparency_onto_white() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([100, 100, 100, 255]));
        image.put_pixel(1, 0, Rgba([100, 100, 100, 0]));

        let rgb = flatten_onto_white(&image);
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([100, 100, 100]));
        assert_eq!(*rgb.get_pixel(1, 0), Rgb([255, 255, 255]));
    }
}
