// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection and front-end configuration.

use std::f64::consts::{FRAC_PI_4, PI};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KanteError, Result};

/// Tunable parameters of the quadrilateral search.
///
/// Every field has a default, so a JSON document only needs to name the
/// options it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Rho distance (image units) at or below which a detected line is
    /// treated as a duplicate of an already accepted one.
    pub group_similar_threshold: f64,
    /// Minimum theta separation (radians) for two lines to be intersected.
    pub angle_threshold: f64,
    /// Minimum distance (image units) between adjacent corners.
    pub min_edge_length: f64,
    /// Smallest accepted corner angle (radians).
    pub min_angle: f64,
    /// Largest accepted corner angle (radians).
    pub max_angle: f64,
    /// Per-axis distance (pixels) below which two final corners coincide.
    pub overlap_tolerance: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            group_similar_threshold: 45.0,
            angle_threshold: FRAC_PI_4,
            min_edge_length: 75.0,
            min_angle: FRAC_PI_4,
            max_angle: PI,
            overlap_tolerance: 5.0,
        }
    }
}

impl DetectionConfig {
    /// Reject values that would make the search meaningless.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("group_similar_threshold", self.group_similar_threshold),
            ("angle_threshold", self.angle_threshold),
            ("min_edge_length", self.min_edge_length),
            ("min_angle", self.min_angle),
            ("max_angle", self.max_angle),
            ("overlap_tolerance", self.overlap_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(KanteError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.min_angle > self.max_angle {
            return Err(KanteError::InvalidConfig(format!(
                "min_angle ({}) exceeds max_angle ({})",
                self.min_angle, self.max_angle
            )));
        }
        Ok(())
    }
}

/// Parameters of the image → (edge map, raw lines) front end.
///
/// The Hough vote threshold of 75 matches the quadrilateral search's minimum
/// edge length; blur and Canny thresholds suit `imageproc`'s 3x3 Sobel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Minimum accumulator votes for a Hough line.
    pub hough_vote_threshold: u32,
    /// Non-maximum suppression radius in the Hough accumulator.
    pub suppression_radius: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            hough_vote_threshold: 75,
            suppression_radius: 8,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(KanteError::InvalidConfig(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if self.canny_low > self.canny_high {
            return Err(KanteError::InvalidConfig(format!(
                "canny_low ({}) exceeds canny_high ({})",
                self.canny_low, self.canny_high
            )));
        }
        Ok(())
    }
}

/// Complete configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanteConfig {
    pub detection: DetectionConfig,
    pub preprocess: PreprocessConfig,
}

impl KanteConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: KanteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;
        self.preprocess.validate()
    }
}
