// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-pixel support of candidate quadrilateral edges.

use std::collections::HashMap;

use kante_core::Point;

use crate::dedup::UniqueLines;
use crate::edge_map::EdgeMap;
use crate::geometry::{Line, LineId};
use crate::intersections::Intersection;

/// Score given to an edge with no supporting pixels, so that a tested but
/// empty edge is distinguishable from an untested one.
pub const EMPTY_EDGE_SCORE: f64 = 1e-6;

/// Count edge-map samples that are on along `line` between `a` and `b`.
///
/// Steps one pixel at a time along whichever axis the segment spans further,
/// solving `line` for the other coordinate at each step. Samples that fall
/// outside the map, or where the line cannot be solved, do not count.
pub fn count_on_pixels(a: &Point, b: &Point, line: &Line, edges: &EdgeMap) -> u32 {
    let x_min = a.x.min(b.x).round() as i64;
    let x_max = a.x.max(b.x).round() as i64;
    let y_min = a.y.min(b.y).round() as i64;
    let y_max = a.y.max(b.y).round() as i64;

    let mut count = 0;
    if x_max - x_min > y_max - y_min {
        for x in x_min..=x_max {
            let Some(y) = line.y_at(x as f64) else {
                continue;
            };
            if edges.is_on(x, y.round() as i64) {
                count += 1;
            }
        }
    } else {
        for y in y_min..=y_max {
            let Some(x) = line.x_at(y as f64) else {
                continue;
            };
            if edges.is_on(x.round() as i64, y) {
                count += 1;
            }
        }
    }
    count
}

/// Memoised edge scores for one quadrilateral search.
///
/// The same edge recurs in many candidate quadrilaterals, so each unordered
/// pair of intersections is sampled at most once. A scorer lives for a single
/// search and is dropped with it.
pub struct EdgeScorer<'a> {
    edges: &'a EdgeMap,
    lines: &'a UniqueLines,
    vertices: &'a [Intersection],
    cache: HashMap<(usize, usize), f64>,
}

impl<'a> EdgeScorer<'a> {
    pub fn new(edges: &'a EdgeMap, lines: &'a UniqueLines, vertices: &'a [Intersection]) -> Self {
        Self {
            edges,
            lines,
            vertices,
            cache: HashMap::new(),
        }
    }

    /// Score of the edge joining vertices `i` and `j` along `line`.
    ///
    /// Lines without a proper two-point extent in the frame are not sampled
    /// and score [`EMPTY_EDGE_SCORE`].
    pub fn score(&mut self, i: usize, j: usize, line: LineId) -> f64 {
        let key = if i <= j { (i, j) } else { (j, i) };
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }

        let count = if self.lines.is_scorable(line) {
            count_on_pixels(
                &self.vertices[i].point,
                &self.vertices[j].point,
                self.lines.line(line),
                self.edges,
            )
        } else {
            0
        };
        let score = if count == 0 {
            EMPTY_EDGE_SCORE
        } else {
            f64::from(count)
        };

        self.cache.insert(key, score);
        score
    }

    /// Number of distinct edges sampled so far.
    pub fn cached_edges(&self) -> usize {
        self.cache.len()
    }
}
