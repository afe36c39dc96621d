// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Clipping an infinite line to the image rectangle.

use kante_core::Point;
use serde::Serialize;

use super::line::Line;

/// Where a line crosses the borders of the image rectangle.
///
/// A well-conditioned line crosses exactly twice. Any other count means the
/// line is numerically degenerate for this frame (typically axis-aligned and
/// grazing a border, or passing through a corner).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtremePoints(Vec<Point>);

impl ExtremePoints {
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the count differs from the expected two crossings.
    pub fn is_degenerate(&self) -> bool {
        self.0.len() != 2
    }

    /// The two crossings, when the line is well-conditioned.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self.0.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }
}

/// Clip `line` to the rectangle `[0, x_max] x [0, y_max]`.
///
/// The borders are tested in the order left (`x = 0`), right (`x = x_max`),
/// top (`y = 0`), bottom (`y = y_max`); a crossing is kept when its other
/// coordinate lies within the rectangle. Undefined evaluations (vertical
/// lines against the left/right borders, horizontal lines against top/bottom)
/// are skipped rather than producing non-finite points.
pub fn clip_to_bounds(line: &Line, x_max: f64, y_max: f64) -> ExtremePoints {
    let on_vertical_border = |x: f64| {
        line.y_at(x)
            .filter(|y| (0.0..=y_max).contains(y))
            .map(|y| Point::new(x, y))
    };
    let on_horizontal_border = |y: f64| {
        line.x_at(y)
            .filter(|x| (0.0..=x_max).contains(x))
            .map(|x| Point::new(x, y))
    };

    let points = [
        on_vertical_border(0.0),
        on_vertical_border(x_max),
        on_horizontal_border(0.0),
        on_horizontal_border(y_max),
    ]
    .into_iter()
    .flatten()
    .collect();

    ExtremePoints(points)
}
