// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_PIXELS_PER_MM, ExtractOptions, GridSpec};

/// Caller-supplied pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extraction switches (background removal, deskew).
    pub extract: ExtractOptions,
    /// Grid layout for PDF export.
    pub grid: GridSpec,
    /// Raster density for PDF embedding, pixels per millimetre.
    pub pixels_per_mm: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            grid: GridSpec::default(),
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grid, config.grid);
        assert_eq!(back.extract, config.extract);
        assert_eq!(back.pixels_per_mm, config.pixels_per_mm);
    }
}
