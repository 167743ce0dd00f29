//! Area-averaging resize for RGBA frames.
//!
//! Each destination pixel is the coverage-weighted mean of the source pixels
//! its footprint overlaps. When shrinking this is a box filter over the
//! footprint; when enlarging it degrades to near-nearest sampling with
//! blended seams.

use crate::image::{Frame, CHANNELS};
use crate::util::math::round_u8;
use crate::util::CamFilterResult;

/// Resizes `src` to `dst_width x dst_height` by area averaging.
pub fn resize_area(src: &Frame, dst_width: usize, dst_height: usize) -> CamFilterResult<Frame> {
    let mut dst = Frame::filled(dst_width, dst_height, [0; 4])?;
    let src_w = src.width();
    let src_h = src.height();
    let scale_x = src_w as f64 / dst_width as f64;
    let scale_y = src_h as f64 / dst_height as f64;
    let src_data = src.data();

    let x_spans: Vec<Vec<(usize, f64)>> = (0..dst_width)
        .map(|dx| footprint(dx, scale_x, src_w))
        .collect();

    for dy in 0..dst_height {
        let y_span = footprint(dy, scale_y, src_h);
        for (dx, x_span) in x_spans.iter().enumerate() {
            let mut acc = [0.0f64; CHANNELS];
            let mut total = 0.0f64;
            for &(sy, wy) in &y_span {
                let row = sy * src_w;
                for &(sx, wx) in x_span {
                    let w = wx * wy;
                    let idx = (row + sx) * CHANNELS;
                    for (c, slot) in acc.iter_mut().enumerate() {
                        *slot += w * f64::from(src_data[idx + c]);
                    }
                    total += w;
                }
            }
            let out = (dy * dst_width + dx) * CHANNELS;
            let px = &mut dst.data_mut()[out..out + CHANNELS];
            for (c, value) in px.iter_mut().enumerate() {
                *value = if total > 0.0 {
                    round_u8(acc[c] / total)
                } else {
                    0
                };
            }
        }
    }

    Ok(dst)
}

/// Source indices and overlap weights covered by destination index `d`.
fn footprint(d: usize, scale: f64, src_len: usize) -> Vec<(usize, f64)> {
    let start = d as f64 * scale;
    let end = (start + scale).min(src_len as f64);
    let first = start.floor() as usize;
    let last = (end.ceil() as usize).min(src_len).max(first + 1);
    let mut out = Vec::with_capacity(last - first);
    for s in first..last.min(src_len) {
        let lo = start.max(s as f64);
        let hi = end.min(s as f64 + 1.0);
        let w = hi - lo;
        if w > 0.0 {
            out.push((s, w));
        }
    }
    if out.is_empty() {
        out.push((first.min(src_len - 1), 1.0));
    }
    out
}
