// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate decoder — converts normalized detector records into absolute
// pixel rectangles.
//
// Record format: `class_id x_center y_center width height`, five
// whitespace-separated numeric fields, all coordinates normalized to [0,1].
// The parser is tolerant, not validating: malformed lines are skipped.

use std::path::Path;

use ikonwerk_core::error::Result;
use ikonwerk_core::types::PixelRect;
use tracing::{debug, instrument};

/// Decode normalized box records against a known image size.
///
/// Each well-formed line yields one [`PixelRect`]:
///
/// ```text
/// left   = trunc((x_center - width/2)  * image_width)
/// top    = trunc((y_center - height/2) * image_height)
/// right  = trunc((x_center + width/2)  * image_width)
/// bottom = trunc((y_center + height/2) * image_height)
/// ```
///
/// The rounding rule is truncation toward zero (integer-cast semantics);
/// this is an observable boundary behavior and deliberate. Lines with the
/// wrong field count or non-numeric fields are skipped. Empty input yields
/// an empty vec, never an error.
pub fn decode_normalized(text: &str, image_width: u32, image_height: u32) -> Vec<PixelRect> {
    let mut rects = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 5 {
            debug!(line = line_no + 1, fields = fields.len(), "skipping malformed record");
            continue;
        }

        let mut values = [0.0f64; 5];
        let mut numeric = true;
        for (slot, field) in values.iter_mut().zip(&fields) {
            match field.parse::<f64>() {
                Ok(v) => *slot = v,
                Err(_) => {
                    numeric = false;
                    break;
                }
            }
        }
        if !numeric {
            debug!(line = line_no + 1, "skipping non-numeric record");
            continue;
        }

        // values[0] is the class id — the layout does not use it.
        let [_, x_center, y_center, width, height] = values;
        rects.push(PixelRect {
            left: ((x_center - width / 2.0) * image_width as f64) as i32,
            top: ((y_center - height / 2.0) * image_height as f64) as i32,
            right: ((x_center + width / 2.0) * image_width as f64) as i32,
            bottom: ((y_center + height / 2.0) * image_height as f64) as i32,
        });
    }

    rects
}

/// Read a detector record file and decode it against the image size.
///
/// Only the file read itself can fail; record-level problems are skipped as
/// in [`decode_normalized`].
#[instrument(skip_all, fields(path = %path.as_ref().display(), image_width, image_height))]
pub fn decode_file(
    path: impl AsRef<Path>,
    image_width: u32,
    image_height: u32,
) -> Result<Vec<PixelRect>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let rects = decode_normalized(&text, image_width, image_height);
    debug!(boxes = rects.len(), "decoded record file");
    Ok(rects)
}
