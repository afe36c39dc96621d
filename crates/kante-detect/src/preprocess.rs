// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image front end: turn a decoded photo into an edge map and an ordered list
// of polar lines.
//
// Pipeline: grayscale → Gaussian blur → Canny → Hough. The detector itself
// never needs this module; it only consumes the two outputs.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use kante_core::{KanteError, PreprocessConfig, Result};
use tracing::{debug, info, instrument};

use crate::edge_map::EdgeMap;
use crate::geometry::{Line, RawLine, clip_to_bounds};
use crate::search::count_on_pixels;

/// Everything the detector needs from one frame.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub edges: EdgeMap,
    /// Polar lines, strongest first.
    pub lines: Vec<RawLine>,
}

/// Extracts [`FrameInput`]s from images.
#[derive(Debug, Clone, Default)]
pub struct EdgeExtractor {
    config: PreprocessConfig,
}

impl EdgeExtractor {
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Decode an image file and extract its frame input.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(&self, path: impl AsRef<Path>) -> Result<FrameInput> {
        let image = image::open(path.as_ref()).map_err(|e| KanteError::ImageError(e.to_string()))?;
        info!(
            width = image.width(),
            height = image.height(),
            "Decoded image"
        );
        self.extract(&image)
    }

    /// Run the edge and line pipeline on a decoded image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract(&self, image: &DynamicImage) -> Result<FrameInput> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(KanteError::EmptyImage { width, height });
        }

        let gray = image.to_luma8();
        let blurred = gaussian_blur_f32(&gray, self.config.blur_sigma);
        let edge_image = canny(&blurred, self.config.canny_low, self.config.canny_high);

        let options = LineDetectionOptions {
            vote_threshold: self.config.hough_vote_threshold,
            suppression_radius: self.config.suppression_radius,
        };
        let polar = detect_lines(&edge_image, options);
        debug!(
            line_count = polar.len(),
            vote_threshold = self.config.hough_vote_threshold,
            "Hough lines detected"
        );

        let edges = EdgeMap::from_gray_image(edge_image)?;
        let lines = rank_by_support(polar.iter().map(to_raw_line).collect(), &edges);
        debug!(on_pixels = edges.count_on(), "Edge map ready");

        Ok(FrameInput { edges, lines })
    }

    /// Same as [`extract`](Self::extract) for an already grayscale frame.
    pub fn extract_gray(&self, gray: GrayImage) -> Result<FrameInput> {
        self.extract(&DynamicImage::ImageLuma8(gray))
    }
}

fn to_raw_line(line: &PolarLine) -> RawLine {
    RawLine::new(
        f64::from(line.r),
        f64::from(line.angle_in_degrees).to_radians(),
    )
}

/// Order lines by the number of edge pixels along their in-frame extent.
///
/// The Hough accumulator reports lines in scan order, while deduplication
/// keeps the first of every group and expects the strongest line there. The
/// sort is stable, so equally supported lines keep the accumulator order.
fn rank_by_support(lines: Vec<RawLine>, edges: &EdgeMap) -> Vec<RawLine> {
    let size = edges.size();
    let mut ranked: Vec<(u32, RawLine)> = lines
        .into_iter()
        .map(|raw| {
            let line = Line::from(raw);
            let support = clip_to_bounds(&line, size.x_max(), size.y_max())
                .endpoints()
                .map_or(0, |(a, b)| count_on_pixels(&a, &b, &line, edges));
            (support, raw)
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().map(|(_, raw)| raw).collect()
}
