// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection overlay — draws detector boxes onto a copy of the source image.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use ikonwerk_core::types::PixelRect;

const BOX_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Border thickness in pixels, drawn as nested hollow rects.
const BOX_THICKNESS: i32 = 2;

/// Return a copy of `image` with each detection box outlined.
///
/// Degenerate boxes are skipped; boxes hanging over the image edge are
/// clipped by the drawing routine.
pub fn draw_detections(image: &RgbaImage, boxes: &[PixelRect]) -> RgbaImage {
    let mut canvas = image.clone();
    for rect in boxes {
        for inset in 0..BOX_THICKNESS {
            let width = rect.width() as i32 - 2 * inset;
            let height = rect.height() as i32 - 2 * inset;
            if width <= 0 || height <= 0 {
                break;
            }
            let outline = Rect::at(rect.left + inset, rect.top + inset)
                .of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut canvas, outline, BOX_COLOR);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlines_box_and_leaves_interior_untouched() {
        let image = RgbaImage::from_pixel(20, 20, Rgba([10, 10, 10, 255]));
        let annotated = draw_detections(&image, &[PixelRect::new(2, 2, 16, 16)]);

        assert_eq!(*annotated.get_pixel(2, 2), BOX_COLOR);
        assert_eq!(*annotated.get_pixel(3, 3), BOX_COLOR); // second ring
        assert_eq!(*annotated.get_pixel(8, 8), Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn source_image_is_not_mutated() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let _ = draw_detections(&image, &[PixelRect::new(0, 0, 10, 10)]);
        assert!(image.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn degenerate_box_is_skipped() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let annotated = draw_detections(&image, &[PixelRect::new(5, 5, 5, 9)]);
        assert!(annotated.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }
}
