// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner labeling — name the four points of a detected quadrilateral.
//
// Labels come from projections onto the two diagonals: the extremes of
// `y - x` give top-left (max) and bottom-right (min), the extremes of `y + x`
// give top-right (max) and bottom-left (min). This assumes the document is
// roughly axis-aligned and breaks down as rotation approaches 45 degrees,
// where two corners project almost equally. The heuristic deliberately
// mirrors the scanner's original labeling convention.

use std::cmp::Ordering;

use kante_core::{Corners, ImageSize, Point};

/// Label four unordered points. The result does not depend on input order.
pub fn label_corners(points: [Point; 4], image_size: ImageSize) -> Corners {
    let diff = |p: &Point| p.y - p.x;
    let sum = |p: &Point| p.y + p.x;

    Corners {
        top_left: select(&points, diff, Ordering::Greater),
        top_right: select(&points, sum, Ordering::Greater),
        bottom_right: select(&points, diff, Ordering::Less),
        bottom_left: select(&points, sum, Ordering::Less),
        image_size,
    }
}

/// Whether two points are within `tolerance` of each other on both axes.
pub fn points_overlap(a: &Point, b: &Point, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// Whether any two of the four corners coincide within `tolerance`.
///
/// Overlapping corners mean the detection collapsed and must be discarded
/// as a whole.
pub fn corners_overlap(corners: &Corners, tolerance: f64) -> bool {
    let points = corners.points();
    (0..points.len()).any(|i| {
        ((i + 1)..points.len()).any(|j| points_overlap(&points[i], &points[j], tolerance))
    })
}

/// Pick the point whose projection is the extreme in direction `want`.
fn select(points: &[Point; 4], key: impl Fn(&Point) -> f64, want: Ordering) -> Point {
    let mut best = points[0];
    for point in &points[1..] {
        if rank(point, &best, &key) == want {
            best = *point;
        }
    }
    best
}

/// Total order on points by projection, broken by coordinates so that equal
/// projections still resolve the same way whatever the input order.
fn rank(a: &Point, b: &Point, key: &impl Fn(&Point) -> f64) -> Ordering {
    key(a)
        .total_cmp(&key(b))
        .then_with(|| a.x.total_cmp(&b.x))
        .then_with(|| a.y.total_cmp(&b.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ImageSize = ImageSize::new(640, 480);

    fn quad() -> [Point; 4] {
        [
            Point::new(100.0, 80.0),
            Point::new(520.0, 95.0),
            Point::new(540.0, 400.0),
            Point::new(90.0, 390.0),
        ]
    }

    #[test]
    fn labels_by_diagonal_projection() {
        let corners = label_corners(quad(), SIZE);
        assert_eq!(corners.top_left, Point::new(90.0, 390.0));
        assert_eq!(corners.bottom_right, Point::new(520.0, 95.0));
        assert_eq!(corners.top_right, Point::new(540.0, 400.0));
        assert_eq!(corners.bottom_left, Point::new(100.0, 80.0));
        assert_eq!(corners.image_size, SIZE);
    }

    #[test]
    fn labeling_ignores_input_order() {
        let expected = label_corners(quad(), SIZE);
        let q = quad();
        let permutations = [
            [q[3], q[2], q[1], q[0]],
            [q[1], q[3], q[0], q[2]],
            [q[2], q[0], q[3], q[1]],
            [q[0], q[2], q[1], q[3]],
        ];
        for points in permutations {
            assert_eq!(label_corners(points, SIZE), expected);
        }
    }

    #[test]
    fn equal_projections_resolve_deterministically() {
        // A diamond: two points share each diagonal projection.
        let diamond = [
            Point::new(50.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 50.0),
        ];
        let expected = label_corners(diamond, SIZE);
        let reversed = [diamond[3], diamond[2], diamond[1], diamond[0]];
        assert_eq!(label_corners(reversed, SIZE), expected);
    }

    #[test]
    fn overlap_is_per_axis_and_inclusive() {
        let a = Point::new(10.0, 10.0);
        assert!(points_overlap(&a, &Point::new(15.0, 5.0), 5.0));
        assert!(!points_overlap(&a, &Point::new(15.1, 10.0), 5.0));
        assert!(!points_overlap(&a, &Point::new(10.0, 4.0), 5.0));
    }

    #[test]
    fn distinct_corners_do_not_overlap() {
        let corners = label_corners(quad(), SIZE);
        assert!(!corners_overlap(&corners, 5.0));
    }

    #[test]
    fn any_coincident_pair_overlaps() {
        let mut points = quad();
        points[3] = Point::new(538.0, 397.0); // within 5 px of points[2]
        let corners = Corners {
            top_left: points[0],
            top_right: points[1],
            bottom_right: points[2],
            bottom_left: points[3],
            image_size: SIZE,
        };
        assert!(corners_overlap(&corners, 5.0));
    }
}
