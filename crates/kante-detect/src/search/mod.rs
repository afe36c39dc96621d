// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral search — exhaustive scan over closed four-edge cycles of
// intersections, scored by edge-map support.

pub mod score;

use kante_core::{DetectionConfig, Point};
use serde::Serialize;
use tracing::debug;

use crate::dedup::UniqueLines;
use crate::edge_map::EdgeMap;
use crate::geometry::{LineId, angle_between};
use crate::intersections::{Intersection, IntersectionSet};

pub use score::{EMPTY_EDGE_SCORE, EdgeScorer, count_on_pixels};

/// Four intersections forming a closed cycle, with the line along each edge.
///
/// `edges[k]` joins `vertices[k]` and `vertices[(k + 1) % 4]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrilateralCandidate {
    pub vertices: [Intersection; 4],
    pub edges: [LineId; 4],
    /// Sum of the four edge scores.
    pub score: f64,
}

impl QuadrilateralCandidate {
    pub fn points(&self) -> [Point; 4] {
        self.vertices.map(|v| v.point)
    }
}

/// Result of one search, including the counters worth logging.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub best: Option<QuadrilateralCandidate>,
    /// Number of complete candidates that satisfied every constraint.
    pub candidates: usize,
    /// Number of distinct edges sampled against the edge map.
    pub scored_edges: usize,
}

/// Geometric constraints on candidate quadrilaterals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrilateralSearch {
    min_edge_length: f64,
    min_angle: f64,
    max_angle: f64,
}

impl QuadrilateralSearch {
    pub fn new(min_edge_length: f64, min_angle: f64, max_angle: f64) -> Self {
        Self {
            min_edge_length,
            min_angle,
            max_angle,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.min_edge_length, config.min_angle, config.max_angle)
    }

    /// Find the four-cycle with the highest total edge support.
    ///
    /// Vertex `v1` is always the lowest-indexed intersection of a cycle and
    /// every other vertex has a higher index. Partial paths are abandoned at
    /// the first edge or corner that fails a constraint. Ties keep the
    /// candidate found first. An empty outcome is a normal result: the frame
    /// simply shows no document.
    pub fn run(
        &self,
        intersections: &IntersectionSet,
        lines: &UniqueLines,
        edges: &EdgeMap,
    ) -> SearchOutcome {
        let vertices = intersections.as_slice();
        let n = vertices.len();
        let mut scorer = EdgeScorer::new(edges, lines, vertices);
        let mut best: Option<QuadrilateralCandidate> = None;
        let mut best_score = 0.0;
        let mut candidates = 0;

        for i1 in 0..n {
            for i2 in (i1 + 1)..n {
                let Some(e12) = self.edge(vertices, i1, i2) else {
                    continue;
                };
                let w12 = scorer.score(i1, i2, e12);

                for i3 in (i1 + 1)..n {
                    if i3 == i2 {
                        continue;
                    }
                    let Some(e23) = self.edge(vertices, i2, i3) else {
                        continue;
                    };
                    if !self.corner(lines, e12, e23) {
                        continue;
                    }

                    for i4 in (i1 + 1)..n {
                        if i4 == i2 || i4 == i3 {
                            continue;
                        }
                        let Some(e34) = self.edge(vertices, i3, i4) else {
                            continue;
                        };
                        if !self.corner(lines, e23, e34) {
                            continue;
                        }
                        let Some(e41) = self.edge(vertices, i4, i1) else {
                            continue;
                        };
                        if !self.corner(lines, e34, e41) || !self.corner(lines, e41, e12) {
                            continue;
                        }

                        candidates += 1;
                        let score = w12
                            + scorer.score(i2, i3, e23)
                            + scorer.score(i3, i4, e34)
                            + scorer.score(i4, i1, e41);
                        if score > best_score {
                            best_score = score;
                            best = Some(QuadrilateralCandidate {
                                vertices: [vertices[i1], vertices[i2], vertices[i3], vertices[i4]],
                                edges: [e12, e23, e34, e41],
                                score,
                            });
                        }
                    }
                }
            }
        }

        debug!(
            intersections = n,
            candidates,
            scored_edges = scorer.cached_edges(),
            best_score,
            "Quadrilateral search finished"
        );

        SearchOutcome {
            best,
            candidates,
            scored_edges: scorer.cached_edges(),
        }
    }

    /// The line joining two intersections, if they are adjacent and far
    /// enough apart to form an edge.
    fn edge(&self, vertices: &[Intersection], i: usize, j: usize) -> Option<LineId> {
        let (a, b) = (&vertices[i], &vertices[j]);
        a.shared_line(b)
            .filter(|_| a.distance(b) > self.min_edge_length)
    }

    /// Whether two consecutive edges meet at an acceptable corner angle.
    fn corner(&self, lines: &UniqueLines, first: LineId, second: LineId) -> bool {
        let angle = angle_between(lines.line(first), lines.line(second));
        (self.min_angle..=self.max_angle).contains(&angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Line;
    use crate::intersections::find_intersections;
    use kante_core::ImageSize;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const SIZE: ImageSize = ImageSize::new(300, 300);

    fn draw_rect(map: &mut EdgeMap, x0: i64, y0: i64, x1: i64, y1: i64) {
        for x in x0..=x1 {
            map.set_on(x, y0);
            map.set_on(x, y1);
        }
        for y in y0..=y1 {
            map.set_on(x0, y);
            map.set_on(x1, y);
        }
    }

    fn run(lines: Vec<Line>, map: &EdgeMap) -> SearchOutcome {
        let unique = UniqueLines::from_lines(lines, SIZE);
        let set = find_intersections(&unique, FRAC_PI_4, SIZE.x_max(), SIZE.y_max());
        QuadrilateralSearch::new(75.0, FRAC_PI_4, PI).run(&set, &unique, map)
    }

    fn assert_near(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-6 && (actual.y - y).abs() < 1e-6,
            "expected ({x}, {y}), got {actual}"
        );
    }

    #[test]
    fn finds_rectangle_from_its_four_lines() {
        let mut map = EdgeMap::blank(SIZE.width, SIZE.height).expect("valid map");
        draw_rect(&mut map, 50, 60, 250, 240);
        let outcome = run(
            vec![
                Line::new(50.0, 0.0),
                Line::new(250.0, 0.0),
                Line::new(60.0, FRAC_PI_2),
                Line::new(240.0, FRAC_PI_2),
            ],
            &map,
        );

        let best = outcome.best.expect("rectangle found");
        // Each side is fully supported: 201 + 181 + 201 + 181 pixels.
        assert_eq!(best.score, 764.0);
        let mut points = best.points().to_vec();
        points.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).expect("finite"));
        assert_near(points[0], 50.0, 60.0);
        assert_near(points[1], 50.0, 240.0);
        assert_near(points[2], 250.0, 60.0);
        assert_near(points[3], 250.0, 240.0);
        // The same rectangle is reachable in both winding directions.
        assert_eq!(outcome.candidates, 2);
    }

    #[test]
    fn prefers_full_border_over_sub_rectangle() {
        let mut map = EdgeMap::blank(SIZE.width, SIZE.height).expect("valid map");
        draw_rect(&mut map, 20, 30, 280, 270);
        let outcome = run(
            vec![
                Line::new(20.0, 0.0),
                Line::new(280.0, 0.0),
                Line::new(30.0, FRAC_PI_2),
                Line::new(270.0, FRAC_PI_2),
                // An unsupported vertical line splitting the page in two.
                Line::new(150.0, 0.0),
            ],
            &map,
        );

        let best = outcome.best.expect("quadrilateral found");
        let xs: Vec<f64> = best.points().iter().map(|p| p.x.round()).collect();
        assert!(xs.contains(&20.0) && xs.contains(&280.0), "got {xs:?}");
        assert!(!xs.contains(&150.0), "sub-rectangle chosen: {xs:?}");
        // Three rectangles exist (full, left half, right half), two windings each.
        assert_eq!(outcome.candidates, 6);
    }

    #[test]
    fn short_edges_are_rejected() {
        let map = EdgeMap::blank(SIZE.width, SIZE.height).expect("valid map");
        // A 50x50 square is below the 75 px minimum edge length.
        let outcome = run(
            vec![
                Line::new(100.0, 0.0),
                Line::new(150.0, 0.0),
                Line::new(100.0, FRAC_PI_2),
                Line::new(150.0, FRAC_PI_2),
            ],
            &map,
        );
        assert!(outcome.best.is_none());
        assert_eq!(outcome.candidates, 0);
    }

    #[test]
    fn acute_corners_are_rejected() {
        let map = EdgeMap::blank(SIZE.width, SIZE.height).expect("valid map");
        let search = QuadrilateralSearch::new(75.0, 1.0, PI);
        // Two line families only 0.9 rad apart: every corner is too sharp.
        let unique = UniqueLines::from_lines(
            vec![
                Line::new(40.0, 0.0),
                Line::new(220.0, 0.0),
                Line::new(60.0, 0.9),
                Line::new(240.0, 0.9),
            ],
            SIZE,
        );
        let set = find_intersections(&unique, 0.5, SIZE.x_max(), SIZE.y_max());
        assert!(!set.is_empty());
        let outcome = search.run(&set, &unique, &map);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn unsupported_rectangle_is_still_found_with_floor_score() {
        let map = EdgeMap::blank(SIZE.width, SIZE.height).expect("valid map");
        let outcome = run(
            vec![
                Line::new(50.0, 0.0),
                Line::new(250.0, 0.0),
                Line::new(60.0, FRAC_PI_2),
                Line::new(240.0, FRAC_PI_2),
            ],
            &map,
        );
        let best = outcome.best.expect("geometry alone admits the rectangle");
        assert!((best.score - 4.0 * EMPTY_EDGE_SCORE).abs() < 1e-12);
    }

    #[test]
    fn too_few_intersections_find_nothing() {
        let map = EdgeMap::blank(SIZE.width, SIZE.height).expect("valid map");
        let outcome = run(vec![Line::new(50.0, 0.0), Line::new(60.0, FRAC_PI_2)], &map);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.scored_edges, 0);
    }
}
