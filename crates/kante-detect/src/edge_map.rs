// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary edge map — the per-pixel "edge present" grid candidate edges are
// scored against.

use image::GrayImage;
use kante_core::error::{KanteError, Result};
use kante_core::ImageSize;

/// A row-major grid of edge samples; any non-zero sample is "on".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    size: ImageSize,
    samples: Vec<u8>,
}

impl EdgeMap {
    /// Wrap raw row-major samples, checking that they cover the frame exactly.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(KanteError::EmptyImage { width, height });
        }
        let size = ImageSize::new(width, height);
        if samples.len() != size.area() {
            return Err(KanteError::EdgeMapSize {
                width,
                height,
                expected: size.area(),
                actual: samples.len(),
            });
        }
        Ok(Self { size, samples })
    }

    /// An edge map with every sample off.
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, vec![0; width as usize * height as usize])
    }

    /// Adopt the output of an edge detector (e.g. Canny) as an edge map.
    pub fn from_gray_image(image: GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Whether the sample at integer coordinates is on. Out-of-bounds
    /// coordinates are simply off.
    pub fn is_on(&self, x: i64, y: i64) -> bool {
        if !self.size.contains(x, y) {
            return false;
        }
        self.samples[y as usize * self.size.width as usize + x as usize] != 0
    }

    /// Switch a sample on. Out-of-bounds coordinates are ignored.
    pub fn set_on(&mut self, x: i64, y: i64) {
        if self.size.contains(x, y) {
            let index = y as usize * self.size.width as usize + x as usize;
            self.samples[index] = u8::MAX;
        }
    }

    /// Number of on samples in the whole map.
    pub fn count_on(&self) -> usize {
        self.samples.iter().filter(|&&s| s != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn rejects_mismatched_sample_count() {
        let result = EdgeMap::new(4, 4, vec![0; 15]);
        assert!(matches!(
            result,
            Err(KanteError::EdgeMapSize {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(matches!(
            EdgeMap::blank(0, 10),
            Err(KanteError::EmptyImage { .. })
        ));
    }

    #[test]
    fn reads_row_major_samples() {
        let mut samples = vec![0u8; 6];
        samples[5] = 255; // (x=2, y=1)
        let map = EdgeMap::new(3, 2, samples).expect("valid map");
        assert!(map.is_on(2, 1));
        assert!(!map.is_on(1, 2));
        assert!(!map.is_on(-1, 0));
        assert!(!map.is_on(3, 1));
    }

    #[test]
    fn from_gray_image_keeps_dimensions() {
        let mut img = GrayImage::new(5, 7);
        img.put_pixel(4, 6, Luma([1]));
        let map = EdgeMap::from_gray_image(img).expect("valid map");
        assert_eq!(map.size(), ImageSize::new(5, 7));
        assert!(map.is_on(4, 6));
        assert_eq!(map.count_on(), 1);
    }

    #[test]
    fn set_on_ignores_out_of_bounds() {
        let mut map = EdgeMap::blank(3, 3).expect("valid map");
        map.set_on(1, 1);
        map.set_on(10, 10);
        assert_eq!(map.count_on(), 1);
    }
}
