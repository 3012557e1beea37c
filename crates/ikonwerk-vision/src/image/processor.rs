// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster operations for icon images — clamped cropping, rotation with canvas
// expansion, exact resizing, PNG encoding. Operates on in-memory RGBA images
// using the `image` and `imageproc` crates.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use ikonwerk_core::error::{IkonwerkError, Result};
use ikonwerk_core::types::PixelRect;
use tracing::{debug, instrument};

/// Chainable raster pipeline over a single in-memory RGBA icon.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `IconProcessor` wrapping the transformed image.
///
/// ```ignore
/// let icon = IconProcessor::from_rgba(source)
///     .crop_rect(&rect)
///     .rotate_expanded(-12, Interpolation::Bilinear)
///     .to_png_bytes()?;
/// ```
pub struct IconProcessor {
    /// The current working image.
    image: RgbaImage,
}

impl IconProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path, converting to RGBA.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            IkonwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self {
            image: img.to_rgba8(),
        })
    }

    /// Decode raw encoded bytes (PNG, JPEG, etc.), converting to RGBA.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| IkonwerkError::ImageError(format!("failed to decode image: {}", err)))?;
        Ok(Self {
            image: img.to_rgba8(),
        })
    }

    /// Wrap an already-decoded RGBA image.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying image.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the processor and return the underlying image.
    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Crop to a signed pixel rectangle, clamped to image bounds.
    ///
    /// Out-of-range rectangles produce a smaller crop; an empty intersection
    /// produces a 0x0 image rather than an error.
    pub fn crop_rect(self, rect: &PixelRect) -> Self {
        Self {
            image: crop_to_rect(&self.image, rect),
        }
    }

    /// Rotate about the image center, expanding the canvas to fit the full
    /// rotated content. See [`rotate_expanded`].
    pub fn rotate_expanded(self, angle_deg: i32, interpolation: Interpolation) -> Self {
        Self {
            image: rotate_expanded(&self.image, angle_deg, interpolation),
        }
    }

    /// Resize to exactly `width` x `height` with Lanczos3 filtering.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        let resized = image::imageops::resize(
            &self.image,
            width,
            height,
            image::imageops::FilterType::Lanczos3,
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }

    /// Write the image to a file. The format is inferred from the extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            IkonwerkError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Crop `image` to the intersection of `rect` and the image bounds.
pub fn crop_to_rect(image: &RgbaImage, rect: &PixelRect) -> RgbaImage {
    let (x, y, w, h) = rect.clamp_to(image.width(), image.height());
    if w == 0 || h == 0 {
        debug!(%rect, "crop rectangle misses the image");
        return RgbaImage::new(0, 0);
    }
    image::imageops::crop_imm(image, x, y, w, h).to_image()
}

/// Rotate `image` by `angle_deg` degrees about its center, expanding the
/// canvas so the rotated content is never wrapped or clipped. New border
/// pixels are transparent black.
///
/// A 0° (mod 360) rotation is a fast-path clone, as are 0x0 inputs.
pub fn rotate_expanded(image: &RgbaImage, angle_deg: i32, interpolation: Interpolation) -> RgbaImage {
    let (w, h) = image.dimensions();
    if angle_deg.rem_euclid(360) == 0 || w == 0 || h == 0 {
        return image.clone();
    }

    let theta = (angle_deg as f32).to_radians();
    let (abs_sin, abs_cos) = (theta.sin().abs(), theta.cos().abs());

    // Expanded canvas; the epsilon guards against float noise producing an
    // extra pixel at axis-aligned angles.
    let new_w = ((w as f32 * abs_cos + h as f32 * abs_sin) - 1e-4).ceil().max(1.0) as u32;
    let new_h = ((w as f32 * abs_sin + h as f32 * abs_cos) - 1e-4).ceil().max(1.0) as u32;

    let projection = Projection::translate(new_w as f32 / 2.0, new_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(w as f32) / 2.0, -(h as f32) / 2.0);

    let mut output = RgbaImage::new(new_w, new_h);
    warp_into(
        image,
        &projection,
        interpolation,
        Rgba([0u8, 0, 0, 0]),
        &mut output,
    );
    output
}

/// Encode an RGBA image into PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| IkonwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        })
    }

    #[test]
    fn crop_matches_requested_region() {
        let source = gradient(800, 600);
        let cropped = crop_to_rect(&source, &PixelRect::new(100, 100, 300, 250));
        assert_eq!(cropped.dimensions(), (200, 150));
        assert_eq!(*cropped.get_pixel(0, 0), *source.get_pixel(100, 100));
        assert_eq!(*cropped.get_pixel(199, 149), *source.get_pixel(299, 249));
    }

    #[test]
    fn crop_clamps_out_of_range_rect() {
        let source = gradient(100, 80);
        let cropped = crop_to_rect(&source, &PixelRect::new(-50, -10, 120, 90));
        assert_eq!(cropped.dimensions(), (100, 80));
    }

    #[test]
    fn crop_outside_image_is_empty() {
        let source = gradient(100, 80);
        let cropped = crop_to_rect(&source, &PixelRect::new(200, 200, 300, 300));
        assert_eq!(cropped.dimensions(), (0, 0));
    }

    #[test]
    fn rotate_zero_is_identity() {
        let source = gradient(40, 30);
        let rotated = rotate_expanded(&source, 0, Interpolation::Nearest);
        assert_eq!(rotated, source);
        let full_turn = rotate_expanded(&source, 360, Interpolation::Nearest);
        assert_eq!(full_turn, source);
    }

    #[test]
    fn rotate_ninety_swaps_canvas_dimensions() {
        let source = gradient(30, 20);
        let rotated = rotate_expanded(&source, 90, Interpolation::Nearest);
        assert_eq!(rotated.dimensions(), (20, 30));
    }

    #[test]
    fn rotate_expands_canvas_for_oblique_angles() {
        let source = gradient(100, 50);
        let rotated = rotate_expanded(&source, 45, Interpolation::Nearest);
        let (w, h) = rotated.dimensions();
        assert!(w > 100 && h > 50, "expanded to {w}x{h}");
    }

    #[test]
    fn rotate_preserves_opaque_content() {
        // One opaque block on a transparent field; nearest-neighbour rotation
        // must keep roughly the same amount of opaque content, and the new
        // border must be transparent.
        let mut source = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 0]));
        for y in 20..30 {
            for x in 20..30 {
                source.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let rotated = rotate_expanded(&source, 30, Interpolation::Nearest);
        let opaque_after = rotated.pixels().filter(|p| p.0[3] > 0).count();

        // Rasterization shifts the boundary by at most a pixel ring around
        // the 10x10 block.
        assert!((60..=140).contains(&opaque_after), "opaque {opaque_after}");
        assert_eq!(rotated.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn png_round_trip() {
        let source = gradient(16, 16);
        let bytes = encode_png(&source).unwrap();
        let decoded = IconProcessor::from_bytes(&bytes).unwrap();
        assert_eq!(*decoded.as_rgba(), source);
    }

    #[test]
    fn processor_chains_crop_and_resize() {
        let icon = IconProcessor::from_rgba(gradient(200, 100))
            .crop_rect(&PixelRect::new(0, 0, 100, 100))
            .resize_exact(50, 50);
        assert_eq!((icon.width(), icon.height()), (50, 50));
    }
}
