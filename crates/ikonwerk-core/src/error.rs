// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Ikonwerk.

use thiserror::Error;

/// Top-level error type for all Ikonwerk operations.
///
/// Per-icon failures (detection, segmentation) are recoverable: the extractor
/// isolates them so one bad icon does not invalidate the batch. Configuration
/// failures (`InvalidGridSpec`) are raised before any work begins and are
/// fatal to the whole call.
#[derive(Debug, Error)]
pub enum IkonwerkError {
    // -- External providers --
    #[error("object detection failed: {0}")]
    Detection(String),

    #[error("background segmentation failed: {0}")]
    MaskProvider(String),

    // -- Layout / export --
    #[error("invalid grid spec: {0}")]
    InvalidGridSpec(String),

    #[error("PDF composition failed: {0}")]
    PdfError(String),

    #[error("archive packaging failed: {0}")]
    ArchiveError(String),

    // -- Imaging --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IkonwerkError>;
