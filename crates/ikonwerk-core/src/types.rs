// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Ikonwerk icon extraction engine.

use serde::{Deserialize, Serialize};

use crate::error::{IkonwerkError, Result};

/// Raster density used when converting physical (millimetre) cell sizes into
/// raster pixels for PDF embedding: 3.78 px/mm, i.e. ≈96 DPI.
///
/// This is a configuration constant chosen to match the target renderer, not
/// a derived physical fact. Override it via [`crate::PipelineConfig`].
pub const DEFAULT_PIXELS_PER_MM: f32 = 3.78;

/// An absolute pixel rectangle: `left < right`, `top < bottom` for
/// non-degenerate rects.
///
/// Coordinates are signed because decoder output may fall outside the image
/// (a detector box hanging over an edge); cropping clamps to image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels; zero for degenerate rects.
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    /// Height in pixels; zero for degenerate rects.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// Intersect with an image of the given size, returning the clamped
    /// `(x, y, width, height)` crop region. Empty intersections yield a
    /// zero-sized region rather than an error.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let x0 = self.left.clamp(0, image_width as i32) as u32;
        let y0 = self.top.clamp(0, image_height as i32) as u32;
        let x1 = self.right.clamp(0, image_width as i32) as u32;
        let y1 = self.bottom.clamp(0, image_height as i32) as u32;
        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Standard paper sizes for PDF output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height), portrait orientation.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Page orientation for the grid-laid-out document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// Apply the orientation to portrait paper dimensions.
    pub fn apply(&self, (width_mm, height_mm): (u32, u32)) -> (u32, u32) {
        match self {
            Self::Portrait => (width_mm, height_mm),
            Self::Landscape => (height_mm, width_mm),
        }
    }
}

/// Configuration of the grid layout: a fixed rows×cols grid with uniform
/// margins on a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    /// Margin between cells and around the page edge, millimetres.
    pub margin_mm: f32,
    pub paper: PaperSize,
    pub orientation: PageOrientation,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 3,
            margin_mm: 10.0,
            paper: PaperSize::A4,
            orientation: PageOrientation::Portrait,
        }
    }
}

impl GridSpec {
    /// Page dimensions in millimetres (width, height), orientation applied.
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.orientation.apply(self.paper.dimensions_mm());
        (w as f32, h as f32)
    }

    /// Number of cells per page.
    pub fn cells_per_page(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Computed cell dimensions in millimetres (width, height).
    ///
    /// Fails with [`IkonwerkError::InvalidGridSpec`] if the grid is empty,
    /// the margin is negative, or the margins leave no positive cell area:
    /// `margin*(cols+1)` must stay below the page width and
    /// `margin*(rows+1)` below the page height.
    pub fn cell_dimensions_mm(&self) -> Result<(f32, f32)> {
        if self.rows == 0 || self.cols == 0 {
            return Err(IkonwerkError::InvalidGridSpec(format!(
                "grid must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.margin_mm < 0.0 {
            return Err(IkonwerkError::InvalidGridSpec(format!(
                "margin must be non-negative, got {}",
                self.margin_mm
            )));
        }

        let (page_w, page_h) = self.page_dimensions_mm();
        let cell_w = (page_w - self.margin_mm * (self.cols + 1) as f32) / self.cols as f32;
        let cell_h = (page_h - self.margin_mm * (self.rows + 1) as f32) / self.rows as f32;

        if cell_w <= 0.0 || cell_h <= 0.0 {
            return Err(IkonwerkError::InvalidGridSpec(format!(
                "margins leave no room for cells: {}x{} grid with {} mm margin on a {}x{} mm page",
                self.rows, self.cols, self.margin_mm, page_w, page_h
            )));
        }

        Ok((cell_w, cell_h))
    }
}

/// Position and size of one image on one page, millimetres from the page's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the image in the original input sequence.
    pub index: usize,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// One output page: an ordered sequence of placements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub placements: Vec<Placement>,
}

/// Per-batch extraction switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Replace each cropped icon with the mask provider's alpha-carrying output.
    pub remove_background: bool,
    /// Deskew each icon via the rotation-search orientation normalizer.
    pub align: bool,
}

/// Recorded outcome of one orientation-normalization run.
///
/// `EmptyMask` is a fallback, not an error: the foreground mask had no
/// connected component at the winning angle, so the image was returned
/// rotated (by 0° when no angle won) but uncropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignOutcome {
    Aligned { angle_deg: i32 },
    EmptyMask,
}
