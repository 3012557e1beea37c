// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation normalization — foreground-mask connected components and the
// rotation-search deskew algorithm.

pub mod components;
pub mod normalizer;

pub use components::RegionBounds;
pub use normalizer::OrientationNormalizer;
