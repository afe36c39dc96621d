// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intersection finder — candidate document corners from pairs of unique lines.

use std::collections::HashSet;

use kante_core::Point;
use serde::Serialize;
use tracing::debug;

use crate::dedup::UniqueLines;
use crate::geometry::{LineId, angle_between};

/// The point where two specific unique lines cross.
///
/// The owning lines are kept so the quadrilateral search can tell whether two
/// intersections lie on a common line. `line_a` is always the smaller id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Intersection {
    pub line_a: LineId,
    pub line_b: LineId,
    pub point: Point,
}

impl Intersection {
    pub fn new(first: LineId, second: LineId, point: Point) -> Self {
        let (line_a, line_b) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            line_a,
            line_b,
            point,
        }
    }

    pub fn lines(&self) -> [LineId; 2] {
        [self.line_a, self.line_b]
    }

    pub fn distance(&self, other: &Intersection) -> f64 {
        self.point.distance(&other.point)
    }

    /// The single line both intersections lie on, i.e. the edge that would
    /// join them in a quadrilateral.
    ///
    /// Returns `None` when they share no line, and also when they share both
    /// (the same pair of lines cannot bound an edge).
    pub fn shared_line(&self, other: &Intersection) -> Option<LineId> {
        let mut shared = self
            .lines()
            .into_iter()
            .filter(|line| other.lines().contains(line));
        match (shared.next(), shared.next()) {
            (Some(line), None) => Some(line),
            _ => None,
        }
    }

    fn key(&self) -> IntersectionKey {
        // Adding 0.0 folds -0.0 into 0.0 so equal points hash equally.
        (
            self.line_a,
            self.line_b,
            (self.point.x + 0.0).to_bits(),
            (self.point.y + 0.0).to_bits(),
        )
    }
}

type IntersectionKey = (LineId, LineId, u64, u64);

/// Insertion-ordered set of intersections, deduplicated by value.
#[derive(Debug, Clone, Default)]
pub struct IntersectionSet {
    items: Vec<Intersection>,
    seen: HashSet<IntersectionKey>,
}

impl IntersectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intersection; returns `false` if an equal one is present.
    pub fn insert(&mut self, intersection: Intersection) -> bool {
        if self.seen.insert(intersection.key()) {
            self.items.push(intersection);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Intersection] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection> {
        self.items.iter()
    }
}

/// Intersect every pair of unique lines that are at least `angle_threshold`
/// apart in theta, keeping points inside `[0, x_max] x [0, y_max]`.
///
/// Near-parallel pairs are skipped before intersecting; they would either
/// divide by a vanishing determinant or land far outside the frame.
pub fn find_intersections(
    lines: &UniqueLines,
    angle_threshold: f64,
    x_max: f64,
    y_max: f64,
) -> IntersectionSet {
    let mut set = IntersectionSet::new();
    let mut near_parallel = 0usize;

    for (id_a, line_a) in lines.iter() {
        for (id_b, line_b) in lines.iter().skip(id_a.0 + 1) {
            if angle_between(line_a, line_b) < angle_threshold {
                near_parallel += 1;
                continue;
            }
            let Some(point) = line_a.intersect(line_b) else {
                continue;
            };
            if (0.0..=x_max).contains(&point.x) && (0.0..=y_max).contains(&point.y) {
                set.insert(Intersection::new(id_a, id_b, point));
            }
        }
    }

    debug!(
        lines = lines.len(),
        intersections = set.len(),
        near_parallel,
        "Intersections found"
    );
    set
}
