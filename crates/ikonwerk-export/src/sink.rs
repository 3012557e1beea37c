// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem sinks — byte output with parent-directory creation, and the
// loose PNG icon set.

use std::path::Path;

use image::RgbaImage;
use ikonwerk_core::error::Result;
use tracing::{info, instrument};

use crate::archive::icon_file_name;
use crate::raster::encode_png;

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Save the icons as a loose PNG set: `<dir>/image_<index>.png`, zero-based,
/// insertion order. The directory is created if missing.
#[instrument(skip(images), fields(images = images.len(), dir = %dir.as_ref().display()))]
pub fn save_icon_set(images: &[RgbaImage], dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    for (index, image) in images.iter().enumerate() {
        let png = encode_png(image)?;
        std::fs::write(dir.join(icon_file_name(index)), &png)?;
    }

    info!("icon set saved");
    Ok(())
}
