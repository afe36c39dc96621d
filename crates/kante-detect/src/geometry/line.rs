// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polar (rho, theta) line model.
//
// A line is the set of points satisfying `x * cos(theta) + y * sin(theta) = rho`,
// the parameterisation produced by a Hough transform. Evaluating it for a
// missing coordinate divides by `sin(theta)` or `cos(theta)`, so every solver
// here returns `None` instead of letting a near-zero divisor turn into
// `NaN`/`±Infinity`.

use kante_core::Point;
use serde::{Deserialize, Serialize};

/// Divisors with a smaller magnitude are treated as zero.
const DIVISOR_EPSILON: f64 = 1e-9;

/// A `(rho, theta)` pair exactly as reported by the line detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub rho: f64,
    pub theta: f64,
}

impl RawLine {
    pub const fn new(rho: f64, theta: f64) -> Self {
        Self { rho, theta }
    }
}

/// Position of a line in the unique-line list of one detection run.
///
/// Lines are compared by identity, not by value: two geometrically
/// coincident lines are still distinct unless deduplication merged them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineId(pub usize);

/// An immutable infinite line in polar form with its trigonometry cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    rho: f64,
    theta: f64,
    cos_theta: f64,
    sin_theta: f64,
}

impl Line {
    pub fn new(rho: f64, theta: f64) -> Self {
        Self {
            rho,
            theta,
            cos_theta: theta.cos(),
            sin_theta: theta.sin(),
        }
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Solve the line equation for `y` at the given `x`.
    ///
    /// Returns `None` for (near) vertical lines, where `sin(theta)` vanishes.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        solve(self.rho - x * self.cos_theta, self.sin_theta)
    }

    /// Solve the line equation for `x` at the given `y`.
    ///
    /// Returns `None` for (near) horizontal lines, where `cos(theta)` vanishes.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        solve(self.rho - y * self.sin_theta, self.cos_theta)
    }

    /// Find the line in `candidates` whose rho is nearest to this one.
    ///
    /// Distances are truncated to whole image units before comparing, and the
    /// first candidate reaching the minimum wins. Returns the candidate's index
    /// alongside it, or `None` when `candidates` is empty.
    pub fn closest_by_rho<'a>(&self, candidates: &'a [Line]) -> Option<(usize, &'a Line)> {
        let mut best: Option<(usize, &Line)> = None;
        let mut best_distance = i64::MAX;
        for (index, candidate) in candidates.iter().enumerate() {
            let distance = (candidate.rho - self.rho).abs() as i64;
            if distance < best_distance {
                best_distance = distance;
                best = Some((index, candidate));
            }
        }
        best
    }

    /// Intersect with another line by solving both polar equations at once.
    ///
    /// Returns `None` when the lines are parallel or nearly so. Callers are
    /// expected to have filtered near-parallel pairs already; this is the last
    /// line of defence against a vanishing determinant.
    pub fn intersect(&self, other: &Line) -> Option<Point> {
        let determinant =
            self.sin_theta * other.cos_theta - self.cos_theta * other.sin_theta;
        let y = solve(
            self.rho * other.cos_theta - other.rho * self.cos_theta,
            determinant,
        )?;
        // A horizontal line cannot give x back from y; its partner can.
        let x = self.x_at(y).or_else(|| other.x_at(y))?;
        let point = Point::new(x, y);
        point.is_finite().then_some(point)
    }
}

impl From<RawLine> for Line {
    fn from(raw: RawLine) -> Self {
        Line::new(raw.rho, raw.theta)
    }
}

/// Absolute theta difference between two lines, used as the corner angle
/// between two quadrilateral edges.
pub fn angle_between(a: &Line, b: &Line) -> f64 {
    (a.theta - b.theta).abs()
}

fn solve(numerator: f64, divisor: f64) -> Option<f64> {
    if divisor.abs() < DIVISOR_EPSILON {
        return None;
    }
    let value = numerator / divisor;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

    fn satisfies(line: &Line, p: Point) -> bool {
        (p.x * line.theta().cos() + p.y * line.theta().sin() - line.rho()).abs() < 1e-6
    }

    #[test]
    fn vertical_line_has_no_y() {
        let line = Line::new(5.0, 0.0);
        assert_eq!(line.y_at(10.0), None);
        assert_eq!(line.x_at(42.0), Some(5.0));
    }

    #[test]
    fn horizontal_line_has_no_x() {
        let line = Line::new(30.0, FRAC_PI_2);
        assert_eq!(line.x_at(0.0), None);
        let y = line.y_at(17.0).expect("horizontal line has y everywhere");
        assert!((y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_line_round_trips() {
        let line = Line::new(50.0, FRAC_PI_4);
        let y = line.y_at(20.0).expect("finite y");
        let x = line.x_at(y).expect("finite x");
        assert!((x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_lines_intersect_on_both() {
        let vertical = Line::new(50.0, 0.0);
        let horizontal = Line::new(100.0, FRAC_PI_2);
        let p = vertical.intersect(&horizontal).expect("intersection");
        assert!((p.x - 50.0).abs() < 1e-9, "got {p}");
        assert!((p.y - 100.0).abs() < 1e-9, "got {p}");

        // Order of the operands must not matter.
        let q = horizontal.intersect(&vertical).expect("intersection");
        assert!((q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn oblique_intersection_satisfies_both_equations() {
        let pairs = [
            (Line::new(120.0, FRAC_PI_6), Line::new(80.0, FRAC_PI_3 + FRAC_PI_4)),
            (Line::new(40.0, 0.2), Line::new(300.0, 1.4)),
            (Line::new(-25.0, 2.9), Line::new(60.0, 1.1)),
        ];
        for (a, b) in pairs {
            let p = a.intersect(&b).expect("non-parallel lines intersect");
            assert!(satisfies(&a, p), "{p} not on {a:?}");
            assert!(satisfies(&b, p), "{p} not on {b:?}");
        }
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = Line::new(10.0, 0.7);
        let b = Line::new(90.0, 0.7);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn closest_by_rho_prefers_first_minimum() {
        let line = Line::new(100.0, 0.0);
        let candidates = [
            Line::new(10.0, 0.0),
            Line::new(110.4, 1.0),
            Line::new(89.6, 0.5),
        ];
        // |110.4 - 100| and |89.6 - 100| both truncate to 10.
        let (index, closest) = line.closest_by_rho(&candidates).expect("non-empty");
        assert_eq!(index, 1);
        assert_eq!(closest.theta(), 1.0);
    }

    #[test]
    fn closest_by_rho_of_empty_set_is_none() {
        assert!(Line::new(1.0, 1.0).closest_by_rho(&[]).is_none());
    }

    #[test]
    fn angle_between_is_absolute_theta_difference() {
        let a = Line::new(0.0, 0.25);
        let b = Line::new(0.0, 1.75);
        assert!((angle_between(&a, &b) - 1.5).abs() < 1e-12);
        assert!((angle_between(&b, &a) - 1.5).abs() < 1e-12);
    }
}
