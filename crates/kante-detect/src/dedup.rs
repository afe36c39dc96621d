// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line deduplication — collapse the many near-identical lines a Hough
// transform reports for one physical edge into a small unique set.
//
// Grouping is greedy and order-dependent: raw lines are visited in the order
// the detector reported them, and a line is dropped as soon as an already
// accepted line lies within the rho threshold. Later near-duplicates are never
// compared with each other. This is a contract with the line detector, which
// reports its strongest lines first; feeding lines in another order changes
// which line survives.

use kante_core::ImageSize;
use serde::Serialize;
use tracing::debug;

use crate::geometry::{ExtremePoints, Line, LineId, RawLine, clip_to_bounds};

/// A unique line whose clipped extent is not exactly two points.
///
/// The line stays in the unique set but cannot be used for edge scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegenerateLine {
    pub id: LineId,
    pub rho: f64,
    pub theta: f64,
    pub extreme_points: usize,
}

/// The deduplicated lines of one frame together with their clipped extents.
#[derive(Debug, Clone, Default)]
pub struct UniqueLines {
    lines: Vec<Line>,
    extremes: Vec<ExtremePoints>,
}

impl UniqueLines {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    pub fn extremes(&self, id: LineId) -> &ExtremePoints {
        &self.extremes[id.0]
    }

    /// Whether edge pixels may be sampled along this line.
    pub fn is_scorable(&self, id: LineId) -> bool {
        !self.extremes[id.0].is_degenerate()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (LineId(index), line))
    }

    /// Unique lines built directly, bypassing grouping. Extreme points are
    /// computed against `size` as usual.
    pub fn from_lines(lines: Vec<Line>, size: ImageSize) -> Self {
        let extremes = lines
            .iter()
            .map(|line| clip_to_bounds(line, size.x_max(), size.y_max()))
            .collect();
        Self { lines, extremes }
    }
}

/// Everything deduplication learned about one frame's raw lines.
#[derive(Debug, Clone, Default)]
pub struct Deduplication {
    pub unique: UniqueLines,
    /// Unique lines that cannot be scored against the edge map.
    pub degenerate: Vec<DegenerateLine>,
    /// Positions of raw lines rejected for non-finite parameters.
    pub rejected: Vec<usize>,
    /// Number of raw lines dropped as duplicates.
    pub merged: usize,
}

/// Greedily group `raw` lines whose rho lies within `threshold` of an
/// already accepted line, then clip the survivors to the frame.
pub fn group_similar_lines(raw: &[RawLine], threshold: f64, size: ImageSize) -> Deduplication {
    let mut accepted: Vec<Line> = Vec::new();
    let mut rejected = Vec::new();
    let mut merged = 0;

    for (index, raw_line) in raw.iter().enumerate() {
        if !raw_line.rho.is_finite() || !raw_line.theta.is_finite() {
            rejected.push(index);
            continue;
        }
        let line = Line::from(*raw_line);
        match line.closest_by_rho(&accepted) {
            Some((_, closest)) if (line.rho() - closest.rho()).abs() <= threshold => {
                merged += 1;
            }
            _ => accepted.push(line),
        }
    }

    let unique = UniqueLines::from_lines(accepted, size);
    let degenerate: Vec<DegenerateLine> = unique
        .iter()
        .filter(|(id, _)| !unique.is_scorable(*id))
        .map(|(id, line)| DegenerateLine {
            id,
            rho: line.rho(),
            theta: line.theta(),
            extreme_points: unique.extremes(id).len(),
        })
        .collect();

    debug!(
        raw = raw.len(),
        unique = unique.len(),
        merged,
        degenerate = degenerate.len(),
        "Lines grouped"
    );

    Deduplication {
        unique,
        degenerate,
        rejected,
        merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const SIZE: ImageSize = ImageSize::new(400, 300);

    #[test]
    fn near_duplicates_collapse_to_first_line() {
        let raw = [
            RawLine::new(100.0, 0.0),
            RawLine::new(110.0, 0.02),
            RawLine::new(130.0, 0.01),
            RawLine::new(95.0, 0.03),
            RawLine::new(140.0, 0.0),
        ];
        let result = group_similar_lines(&raw, 45.0, SIZE);
        assert_eq!(result.unique.len(), 1);
        assert_eq!(result.unique.lines()[0], Line::new(100.0, 0.0));
        assert_eq!(result.merged, 4);
    }

    #[test]
    fn distant_rhos_stay_separate() {
        let raw = [RawLine::new(50.0, 0.0), RawLine::new(200.0, 0.0)];
        let result = group_similar_lines(&raw, 45.0, SIZE);
        assert_eq!(result.unique.len(), 2);
        assert_eq!(result.merged, 0);
    }

    #[test]
    fn grouping_ignores_theta() {
        // A horizontal and a vertical line with similar rho are still merged.
        let raw = [RawLine::new(100.0, 0.0), RawLine::new(120.0, FRAC_PI_2)];
        let result = group_similar_lines(&raw, 45.0, SIZE);
        assert_eq!(result.unique.len(), 1);
    }

    #[test]
    fn order_decides_which_line_survives() {
        let forward = [RawLine::new(100.0, 0.0), RawLine::new(140.0, 0.0)];
        let backward = [RawLine::new(140.0, 0.0), RawLine::new(100.0, 0.0)];
        let a = group_similar_lines(&forward, 45.0, SIZE);
        let b = group_similar_lines(&backward, 45.0, SIZE);
        assert_eq!(a.unique.lines()[0].rho(), 100.0);
        assert_eq!(b.unique.lines()[0].rho(), 140.0);
    }

    #[test]
    fn chained_lines_are_compared_only_with_accepted_ones() {
        // 60 is merged into 20; 100 is 80 away from 20 (the only accepted
        // line) and so is kept even though it is within 45 of 60.
        let raw = [
            RawLine::new(20.0, 0.0),
            RawLine::new(60.0, 0.0),
            RawLine::new(100.0, 0.0),
        ];
        let result = group_similar_lines(&raw, 45.0, SIZE);
        let rhos: Vec<f64> = result.unique.lines().iter().map(Line::rho).collect();
        assert_eq!(rhos, vec![20.0, 100.0]);
    }

    #[test]
    fn degenerate_lines_are_kept_and_reported() {
        // rho = 1000 lies entirely outside a 400x300 frame.
        let raw = [RawLine::new(50.0, 0.0), RawLine::new(1000.0, 0.0)];
        let result = group_similar_lines(&raw, 45.0, SIZE);
        assert_eq!(result.unique.len(), 2);
        assert_eq!(result.degenerate.len(), 1);
        assert_eq!(result.degenerate[0].id, LineId(1));
        assert_eq!(result.degenerate[0].extreme_points, 0);
        assert!(result.unique.is_scorable(LineId(0)));
        assert!(!result.unique.is_scorable(LineId(1)));
    }

    #[test]
    fn non_finite_raw_lines_are_rejected() {
        let raw = [
            RawLine::new(f64::NAN, 0.0),
            RawLine::new(50.0, f64::INFINITY),
            RawLine::new(50.0, 0.0),
        ];
        let result = group_similar_lines(&raw, 45.0, SIZE);
        assert_eq!(result.rejected, vec![0, 1]);
        assert_eq!(result.unique.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let result = group_similar_lines(&[], 45.0, SIZE);
        assert!(result.unique.is_empty());
        assert!(result.degenerate.is_empty());
    }
}
