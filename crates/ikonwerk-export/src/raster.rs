// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared PNG encoding for the packaging sinks.

use image::{DynamicImage, ImageFormat, RgbaImage};
use ikonwerk_core::error::{IkonwerkError, Result};

/// Encode an RGBA image into PNG bytes.
pub(crate) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| IkonwerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}
