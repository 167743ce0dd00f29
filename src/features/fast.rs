//! FAST-9 corner detection with 3x3 non-maximum suppression.
//!
//! A pixel is a corner when at least nine contiguous samples on the radius-3
//! Bresenham circle are all brighter than `center + threshold` or all darker
//! than `center - threshold`. The circle wraps, so index 15 neighbours index 0.

use crate::features::Keypoint;
use crate::image::ImageView;
use std::cmp::Ordering;

/// Bresenham circle of radius 3, clockwise from 12 o'clock.
const CIRCLE_OFFSETS: [(isize, isize); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];

const ARC_LENGTH: usize = 9;

/// Scratch buffers reused across detections.
#[derive(Debug, Default)]
pub(crate) struct FastScratch {
    scores: Vec<f32>,
    candidates: Vec<(usize, usize, f32)>,
}

/// Detects corners at least `border` pixels away from every image edge.
///
/// Results are sorted by descending score (ties broken by row, then column)
/// and truncated to `max_keypoints`. Orientation is left at zero.
pub(crate) fn detect_fast(
    image: ImageView<'_, u8>,
    threshold: u8,
    border: usize,
    max_keypoints: usize,
    scratch: &mut FastScratch,
    out: &mut Vec<Keypoint>,
) {
    out.clear();
    let w = image.width();
    let h = image.height();
    let border = border.max(3);
    if w <= 2 * border || h <= 2 * border {
        return;
    }

    scratch.scores.clear();
    scratch.scores.resize(w * h, 0.0);
    scratch.candidates.clear();

    for y in border..h - border {
        for x in border..w - border {
            if let Some(score) = corner_score(image, x, y, i16::from(threshold)) {
                scratch.scores[y * w + x] = score;
                scratch.candidates.push((x, y, score));
            }
        }
    }

    for &(x, y, score) in &scratch.candidates {
        if is_local_max(&scratch.scores, w, x, y, score) {
            out.push(Keypoint {
                x: x as f32,
                y: y as f32,
                score,
                angle: 0.0,
            });
        }
    }

    out.sort_by(keypoint_cmp_desc);
    out.truncate(max_keypoints);
}

fn keypoint_cmp_desc(a: &Keypoint, b: &Keypoint) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.x.total_cmp(&b.x))
}

/// Returns the corner score if `(x, y)` passes the segment test.
fn corner_score(image: ImageView<'_, u8>, x: usize, y: usize, threshold: i16) -> Option<f32> {
    let center = i16::from(image.at(x, y));
    let hi = center + threshold;
    let lo = center - threshold;

    // Cardinal samples: a 9-arc always covers at least two of them.
    let mut bright_cardinals = 0;
    let mut dark_cardinals = 0;
    for idx in [0usize, 4, 8, 12] {
        let v = sample(image, x, y, idx);
        bright_cardinals += usize::from(v > hi);
        dark_cardinals += usize::from(v < lo);
    }
    if bright_cardinals < 2 && dark_cardinals < 2 {
        return None;
    }

    let mut values = [0i16; 16];
    for (idx, slot) in values.iter_mut().enumerate() {
        *slot = sample(image, x, y, idx);
    }

    let bright = longest_arc(&values, |v| v > hi) >= ARC_LENGTH;
    let dark = longest_arc(&values, |v| v < lo) >= ARC_LENGTH;
    if !bright && !dark {
        return None;
    }

    let mut bright_sum = 0i32;
    let mut dark_sum = 0i32;
    for &v in &values {
        if v > hi {
            bright_sum += i32::from(v - hi);
        } else if v < lo {
            dark_sum += i32::from(lo - v);
        }
    }
    Some(bright_sum.max(dark_sum) as f32)
}

#[inline]
fn sample(image: ImageView<'_, u8>, x: usize, y: usize, idx: usize) -> i16 {
    let (dx, dy) = CIRCLE_OFFSETS[idx];
    let sx = (x as isize + dx) as usize;
    let sy = (y as isize + dy) as usize;
    i16::from(image.at(sx, sy))
}

/// Longest run of samples satisfying `pred`, wrapping around the circle.
fn longest_arc(values: &[i16; 16], pred: impl Fn(i16) -> bool) -> usize {
    let mut best = 0;
    let mut run = 0;
    for i in 0..32 {
        if pred(values[i % 16]) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best.min(16)
}

/// Strict local maximum in the 3x3 neighbourhood; equal scores keep the
/// first pixel in raster order.
fn is_local_max(scores: &[f32], width: usize, x: usize, y: usize, score: f32) -> bool {
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            if nx == x && ny == y {
                continue;
            }
            let other = scores[ny * width + nx];
            if other > score {
                return false;
            }
            let before = (ny, nx) < (y, x);
            if other == score && before {
                return false;
            }
        }
    }
    true
}
