// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Kante.

use serde::{Deserialize, Serialize};

/// A point in image coordinates (x to the right, y downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Pixel dimensions of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest valid x coordinate (`width - 1`).
    pub fn x_max(&self) -> f64 {
        self.width.saturating_sub(1) as f64
    }

    /// Largest valid y coordinate (`height - 1`).
    pub fn y_max(&self) -> f64 {
        self.height.saturating_sub(1) as f64
    }

    /// Number of pixels in the frame.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether integer pixel coordinates fall inside the frame.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The four labeled corners of a detected document, in the coordinates of
/// the frame they were detected in.
///
/// A `Corners` value is only ever produced complete. A frame without a
/// usable document yields no `Corners` at all rather than a partial set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
    /// Size of the frame the corners refer to.
    pub image_size: ImageSize,
}

impl Corners {
    /// Corners in clockwise order starting at the top-left.
    pub fn points(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Map the corners onto a frame of a different size (e.g. the preview
    /// view the crop guide is drawn on), scaling each axis independently.
    pub fn scaled_to(&self, target: ImageSize) -> Corners {
        let ratio_x = ratio(target.width, self.image_size.width);
        let ratio_y = ratio(target.height, self.image_size.height);
        let scale = |p: Point| Point::new(p.x * ratio_x, p.y * ratio_y);

        Corners {
            top_left: scale(self.top_left),
            top_right: scale(self.top_right),
            bottom_right: scale(self.bottom_right),
            bottom_left: scale(self.bottom_left),
            image_size: target,
        }
    }
}

fn ratio(target: u32, source: u32) -> f64 {
    if source == 0 {
        1.0
    } else {
        target as f64 / source as f64
    }
}
