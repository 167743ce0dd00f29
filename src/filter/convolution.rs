//! Stroke-edges convolution filter.
//!
//! A 5x5 Laplacian-like kernel is correlated with every channel using
//! reflect-101 borders and saturated to `u8`. The result is inverted and
//! multiplied with the source, which darkens pixels on the dark side of
//! strong edges and leaves flat regions unchanged.

use crate::filter::Filter;
use crate::image::frame::assert_same_shape;
use crate::image::{Frame, CHANNELS};
use crate::util::math::{mul_div255, reflect101, saturate_u8};

const RADIUS: usize = 2;
const TAPS_PER_AXIS: usize = 2 * RADIUS + 1;

/// Non-zero taps of
/// `[0 0 1 0 0; 0 1 2 1 0; 1 2 -16 2 1; 0 1 2 1 0; 0 0 1 0 0]` as `(row, col, weight)`.
const TAPS: [(usize, usize, i32); 13] = [
    (0, 2, 1),
    (1, 1, 1),
    (1, 2, 2),
    (1, 3, 1),
    (2, 0, 1),
    (2, 1, 2),
    (2, 2, -16),
    (2, 3, 2),
    (2, 4, 1),
    (3, 1, 1),
    (3, 2, 2),
    (3, 3, 1),
    (4, 2, 1),
];

/// Stroke-edges filter with reusable border tables.
#[derive(Clone, Debug, Default)]
pub struct StrokeEdgesFilter {
    shape: (usize, usize),
    cols: Vec<[usize; TAPS_PER_AXIS]>,
    rows: Vec<[usize; TAPS_PER_AXIS]>,
    scratch: Vec<u8>,
}

impl StrokeEdgesFilter {
    /// Creates the filter.
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, width: usize, height: usize) {
        if self.shape == (width, height) && !self.cols.is_empty() {
            return;
        }
        self.shape = (width, height);
        self.cols = border_table(width);
        self.rows = border_table(height);
    }
}

fn border_table(len: usize) -> Vec<[usize; TAPS_PER_AXIS]> {
    (0..len)
        .map(|i| {
            std::array::from_fn(|k| reflect101(i as isize + k as isize - RADIUS as isize, len))
        })
        .collect()
}

fn stroke(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    cols: &[[usize; TAPS_PER_AXIS]],
    rows: &[[usize; TAPS_PER_AXIS]],
) {
    for (y, ry) in rows.iter().enumerate() {
        for (x, cx) in cols.iter().enumerate() {
            let base = (y * width + x) * CHANNELS;
            for c in 0..CHANNELS {
                let mut acc = 0i32;
                for &(ky, kx, weight) in &TAPS {
                    let idx = (ry[ky] * width + cx[kx]) * CHANNELS + c;
                    acc += weight * i32::from(src[idx]);
                }
                let edge = 255 - saturate_u8(acc);
                dst[base + c] = mul_div255(src[base + c], edge);
            }
        }
    }
}

impl Filter for StrokeEdgesFilter {
    fn name(&self) -> &str {
        "stroke-edges"
    }

    fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        assert_same_shape(src, dst);
        self.prepare(src.width(), src.height());
        stroke(src.data(), dst.data_mut(), src.width(), &self.cols, &self.rows);
    }

    fn apply_in_place(&mut self, frame: &mut Frame) {
        self.prepare(frame.width(), frame.height());
        self.scratch.clear();
        self.scratch.extend_from_slice(frame.data());
        let width = frame.width();
        stroke(&self.scratch, frame.data_mut(), width, &self.cols, &self.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::{StrokeEdgesFilter, TAPS};
    use crate::filter::Filter;
    use crate::image::Frame;

    #[test]
    fn kernel_sums_to_zero() {
        assert_eq!(TAPS.iter().map(|t| t.2).sum::<i32>(), 0);
    }

    #[test]
    fn flat_frames_are_unchanged() {
        for rgba in [[0, 0, 0, 255], [0, 0, 0, 0], [90, 140, 10, 255]] {
            let src = Frame::filled(7, 5, rgba).unwrap();
            let mut dst = Frame::filled(7, 5, [1; 4]).unwrap();
            StrokeEdgesFilter::new().apply(&src, &mut dst);
            assert_eq!(dst, src);
        }
    }

    #[test]
    fn dark_side_of_step_is_stroked() {
        let (w, h) = (10, 6);
        let mut src = Frame::filled(w, h, [100, 100, 100, 255]).unwrap();
        for y in 0..h {
            for x in 5..w {
                src.put_pixel(x, y, [200, 200, 200, 255]);
            }
        }
        let mut filter = StrokeEdgesFilter::new();
        let mut dst = Frame::filled(w, h, [0; 4]).unwrap();
        filter.apply(&src, &mut dst);
        assert_eq!(dst.pixel(4, 3), Some([0, 0, 0, 255]));
        assert_eq!(dst.pixel(5, 3), Some([200, 200, 200, 255]));
        assert_eq!(dst.pixel(0, 3), Some([100, 100, 100, 255]));
        assert_eq!(dst.pixel(9, 3), Some([200, 200, 200, 255]));

        let mut in_place = src.clone();
        filter.apply_in_place(&mut in_place);
        assert_eq!(in_place, dst);
    }

    #[test]
    fn single_column_frames_use_reflection() {
        let src = Frame::filled(1, 3, [50, 60, 70, 255]).unwrap();
        let mut dst = Frame::filled(1, 3, [0; 4]).unwrap();
        StrokeEdgesFilter::new().apply(&src, &mut dst);
        assert_eq!(dst, src);
    }
}
