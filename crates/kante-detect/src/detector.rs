// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner detection pipeline — deduplicate lines, intersect, search, label.

use kante_core::error::Result;
use kante_core::{Corners, DetectionConfig, ImageSize};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::corners::{corners_overlap, label_corners};
use crate::dedup::{DegenerateLine, group_similar_lines};
use crate::edge_map::EdgeMap;
use crate::geometry::{ExtremePoints, LineId, RawLine};
use crate::intersections::{Intersection, find_intersections};
use crate::search::{QuadrilateralCandidate, QuadrilateralSearch};

/// A quadrilateral needs at least four distinct lines.
const MIN_LINES: usize = 4;

/// Why a frame produced no corners. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// Fewer than four unique lines survived deduplication.
    TooFewLines,
    /// No four-cycle of intersections satisfied the edge and angle limits.
    NoQuadrilateral,
    /// The best quadrilateral had two corners on top of each other.
    OverlappingCorners,
}

/// Outcome of one detection: all four corners, or none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Detection {
    Found(Corners),
    NotFound { reason: NotFoundReason },
}

impl Detection {
    pub fn corners(&self) -> Option<&Corners> {
        match self {
            Detection::Found(corners) => Some(corners),
            Detection::NotFound { .. } => None,
        }
    }

    pub fn into_corners(self) -> Option<Corners> {
        match self {
            Detection::Found(corners) => Some(corners),
            Detection::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Detection::Found(_))
    }
}

/// A unique line as drawn by a debug overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLine {
    pub id: LineId,
    pub rho: f64,
    pub theta: f64,
    pub extreme_points: ExtremePoints,
}

/// The intermediate geometry of a detection, for drawing over the preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineOverlay {
    pub lines: Vec<OverlayLine>,
    pub intersections: Vec<Intersection>,
}

/// Data-quality counters collected along the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub degenerate_lines: Vec<DegenerateLine>,
    /// Positions in the raw input of lines with non-finite parameters.
    pub rejected_raw_lines: Vec<usize>,
    pub merged_lines: usize,
    pub candidates: usize,
    pub scored_edges: usize,
}

/// Everything one detection run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub detection: Detection,
    pub image_size: ImageSize,
    /// The winning quadrilateral before labeling, if the search found one.
    pub best: Option<QuadrilateralCandidate>,
    pub overlay: LineOverlay,
    pub diagnostics: Diagnostics,
}

/// Finds the document quadrilateral in one frame.
///
/// A detector holds only its configuration; every call to
/// [`detect`](Self::detect) is independent and treats its inputs as
/// read-only, so one detector can serve any number of frames and threads.
#[derive(Debug, Clone)]
pub struct CornerDetector {
    config: DetectionConfig,
    search: QuadrilateralSearch,
}

impl Default for CornerDetector {
    fn default() -> Self {
        let config = DetectionConfig::default();
        let search = QuadrilateralSearch::from_config(&config);
        Self { config, search }
    }
}

impl CornerDetector {
    /// Create a detector, rejecting an invalid configuration.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        let search = QuadrilateralSearch::from_config(&config);
        Ok(Self { config, search })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run the full pipeline on one frame.
    ///
    /// `raw_lines` must be in the order the line detector reported them
    /// (strongest first); deduplication keeps the first line it sees in each
    /// rho neighbourhood.
    #[instrument(skip_all, fields(size = %edges.size(), raw_lines = raw_lines.len()))]
    pub fn detect(&self, edges: &EdgeMap, raw_lines: &[RawLine]) -> DetectionReport {
        let size = edges.size();
        let (x_max, y_max) = (size.x_max(), size.y_max());

        // Step 1: Collapse near-duplicate lines.
        let dedup = group_similar_lines(raw_lines, self.config.group_similar_threshold, size);
        for line in &dedup.degenerate {
            warn!(
                line = line.id.0,
                rho = line.rho,
                theta = line.theta,
                extreme_points = line.extreme_points,
                "Invalid number of extreme points; line excluded from edge scoring"
            );
        }
        if !dedup.rejected.is_empty() {
            warn!(
                rejected = dedup.rejected.len(),
                "Raw lines with non-finite parameters ignored"
            );
        }

        let mut diagnostics = Diagnostics {
            degenerate_lines: dedup.degenerate.clone(),
            rejected_raw_lines: dedup.rejected.clone(),
            merged_lines: dedup.merged,
            ..Diagnostics::default()
        };
        let unique = dedup.unique;
        let mut overlay = LineOverlay {
            lines: unique
                .iter()
                .map(|(id, line)| OverlayLine {
                    id,
                    rho: line.rho(),
                    theta: line.theta(),
                    extreme_points: unique.extremes(id).clone(),
                })
                .collect(),
            intersections: Vec::new(),
        };

        if unique.len() < MIN_LINES {
            debug!(unique = unique.len(), "Too few unique lines for a quadrilateral");
            return DetectionReport {
                detection: Detection::NotFound {
                    reason: NotFoundReason::TooFewLines,
                },
                image_size: size,
                best: None,
                overlay,
                diagnostics,
            };
        }

        // Step 2: Candidate corners.
        let intersections =
            find_intersections(&unique, self.config.angle_threshold, x_max, y_max);
        overlay.intersections = intersections.as_slice().to_vec();

        // Step 3: Best-supported four-cycle.
        let outcome = self.search.run(&intersections, &unique, edges);
        diagnostics.candidates = outcome.candidates;
        diagnostics.scored_edges = outcome.scored_edges;

        // Step 4: Label and sanity-check the corners.
        let detection = match &outcome.best {
            None => Detection::NotFound {
                reason: NotFoundReason::NoQuadrilateral,
            },
            Some(best) => {
                let corners = label_corners(best.points(), size);
                if corners_overlap(&corners, self.config.overlap_tolerance) {
                    warn!(
                        top_left = %corners.top_left,
                        top_right = %corners.top_right,
                        bottom_right = %corners.bottom_right,
                        bottom_left = %corners.bottom_left,
                        "Detected corners overlap; discarding detection"
                    );
                    Detection::NotFound {
                        reason: NotFoundReason::OverlappingCorners,
                    }
                } else {
                    Detection::Found(corners)
                }
            }
        };

        match &detection {
            Detection::Found(corners) => info!(
                top_left = %corners.top_left,
                top_right = %corners.top_right,
                bottom_right = %corners.bottom_right,
                bottom_left = %corners.bottom_left,
                score = outcome.best.as_ref().map(|b| b.score),
                "Document corners detected"
            ),
            Detection::NotFound { reason } => debug!(?reason, "No document corners in frame"),
        }

        DetectionReport {
            detection,
            image_size: size,
            best: outcome.best,
            overlay,
            diagnostics,
        }
    }
}
