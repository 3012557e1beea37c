// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid layout engine — packs variable-aspect-ratio images into a fixed
// rows×cols grid across paginated output, preserving aspect ratio and
// centering each image within its cell.

use ikonwerk_core::error::Result;
use ikonwerk_core::types::{GridSpec, PageLayout, Placement};
use tracing::{debug, instrument};

/// Compute placements for a sequence of images, given as pixel dimensions.
///
/// The grid spec is validated before any layout work; an unsatisfiable grid
/// (non-positive cell size) fails with `InvalidGridSpec`. Images are
/// assigned row-major, `rows*cols` per page, so `N` images produce
/// `ceil(N / (rows*cols))` pages. Each image is scaled to fit its cell with
/// exactly one axis touching the cell boundary, then centered.
///
/// Zero-area images receive a zero-size placement centered in their cell;
/// they occupy the slot but render nothing.
#[instrument(skip(dimensions), fields(images = dimensions.len()))]
pub fn layout_pages(dimensions: &[(u32, u32)], spec: &GridSpec) -> Result<Vec<PageLayout>> {
    let (cell_w, cell_h) = spec.cell_dimensions_mm()?;
    let cell_aspect = cell_w / cell_h;
    let per_page = spec.cells_per_page();

    let mut pages = Vec::with_capacity(dimensions.len().div_ceil(per_page.max(1)));
    for (page_index, chunk) in dimensions.chunks(per_page).enumerate() {
        let mut placements = Vec::with_capacity(chunk.len());
        for (slot, &(width, height)) in chunk.iter().enumerate() {
            let col = (slot % spec.cols as usize) as f32;
            let row = (slot / spec.cols as usize) as f32;

            let (new_w, new_h) = if width == 0 || height == 0 {
                (0.0, 0.0)
            } else {
                let aspect = width as f32 / height as f32;
                if aspect > cell_aspect {
                    (cell_w, cell_w / aspect)
                } else {
                    (cell_h * aspect, cell_h)
                }
            };

            placements.push(Placement {
                index: page_index * per_page + slot,
                x_mm: spec.margin_mm + col * (cell_w + spec.margin_mm) + (cell_w - new_w) / 2.0,
                y_mm: spec.margin_mm + row * (cell_h + spec.margin_mm) + (cell_h - new_h) / 2.0,
                width_mm: new_w,
                height_mm: new_h,
            });
        }
        pages.push(PageLayout { placements });
    }

    debug!(pages = pages.len(), "layout complete");
    Ok(pages)
}
