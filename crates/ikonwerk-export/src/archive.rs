// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive packaging — serializes the icon sequence into a compressed ZIP
// with a stable, predictable naming scheme.

use std::io::{Cursor, Write};
use std::path::Path;

use image::RgbaImage;
use ikonwerk_core::error::{IkonwerkError, Result};
use tracing::{debug, info, instrument};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::raster::encode_png;
use crate::sink::write_bytes;

/// Entry name for icon `index`: `image_<index>.png`, zero-based.
pub fn icon_file_name(index: usize) -> String {
    format!("image_{index}.png")
}

/// Package the icons into an in-memory ZIP archive (Deflate), one PNG entry
/// per icon in insertion order.
///
/// Read-only with respect to the input; N images produce exactly N entries.
#[instrument(skip(images), fields(images = images.len()))]
pub fn archive_icons(images: &[RgbaImage]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, image) in images.iter().enumerate() {
        let png = encode_png(image)?;
        writer
            .start_file(icon_file_name(index), options)
            .map_err(|err| IkonwerkError::ArchiveError(format!("failed to start entry: {err}")))?;
        writer
            .write_all(&png)
            .map_err(|err| IkonwerkError::ArchiveError(format!("failed to write entry: {err}")))?;
        debug!(index, bytes = png.len(), "entry added");
    }

    let cursor = writer
        .finish()
        .map_err(|err| IkonwerkError::ArchiveError(format!("failed to finalize archive: {err}")))?;
    let bytes = cursor.into_inner();
    info!(bytes = bytes.len(), "archive packaged");
    Ok(bytes)
}

/// Package the icons and write the archive to `path`, creating parent
/// directories as needed.
pub fn write_archive(images: &[RgbaImage], path: impl AsRef<Path>) -> Result<()> {
    let bytes = archive_icons(images)?;
    write_bytes(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn icons(n: usize) -> Vec<RgbaImage> {
        (0..n)
            .map(|i| RgbaImage::from_pixel(4, 4, Rgba([i as u8, 0, 0, 255])))
            .collect()
    }

    #[test]
    fn archive_has_one_named_entry_per_icon() {
        let bytes = archive_icons(&icons(3)).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        for index in 0..3 {
            let entry = archive.by_index(index).unwrap();
            assert_eq!(entry.name(), format!("image_{index}.png"));
        }
    }

    #[test]
    fn empty_sequence_packs_empty_archive() {
        let bytes = archive_icons(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn entries_decode_back_to_the_icons() {
        use std::io::Read;

        let source = icons(2);
        let bytes = archive_icons(&source).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry_bytes = Vec::new();
        archive
            .by_name("image_1.png")
            .unwrap()
            .read_to_end(&mut entry_bytes)
            .unwrap();

        let decoded = image::load_from_memory(&entry_bytes).unwrap().to_rgba8();
        assert_eq!(decoded, source[1]);
    }

    #[test]
    fn write_archive_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/icons.zip");

        write_archive(&icons(1), &path).unwrap();
        assert!(path.exists());
    }
}
