// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ikonwerk-export — Output packaging for the Ikonwerk engine.
//
// Provides the grid layout engine (aspect-preserving cell placement across
// paginated output), PDF composition, ZIP archive packaging, loose-set
// filesystem sinks, and the pluggable post-processing filters.

pub mod archive;
pub mod filter;
pub mod layout;
pub mod pdf;
pub mod sink;

mod raster;

// Re-export the primary entry points so callers can use `ikonwerk_export::PdfComposer` etc.
pub use archive::{archive_icons, icon_file_name, write_archive};
pub use filter::IconFilter;
pub use layout::layout_pages;
pub use pdf::writer::PdfComposer;
pub use sink::{save_icon_set, write_bytes};
