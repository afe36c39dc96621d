// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kante-detect — Document corner detection for live crop guides.
//
// Takes a binary edge map and the polar lines a Hough transform found in it,
// collapses near-duplicate lines, intersects the survivors, searches every
// closed four-edge cycle for the one best supported by edge pixels, and labels
// its corners. An optional front end produces both inputs from a photo, and an
// analysis slot runs the whole thing per camera frame with keep-only-latest
// backpressure.

pub mod analysis;
pub mod corners;
pub mod dedup;
pub mod detector;
pub mod edge_map;
pub mod geometry;
pub mod intersections;
pub mod preprocess;
pub mod search;

// Re-export the primary types so callers can use `kante_detect::CornerDetector` etc.
pub use analysis::{AnalysisSlot, SlotStats};
pub use corners::{corners_overlap, label_corners, points_overlap};
pub use detector::{CornerDetector, Detection, DetectionReport, NotFoundReason};
pub use edge_map::EdgeMap;
pub use geometry::{ExtremePoints, Line, LineId, RawLine, clip_to_bounds};
pub use intersections::{Intersection, IntersectionSet};
pub use preprocess::{EdgeExtractor, FrameInput};
pub use search::{QuadrilateralCandidate, QuadrilateralSearch};
