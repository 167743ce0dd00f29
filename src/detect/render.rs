//! Overlay rendering: the tracked outline or the "target not visible" thumbnail.

use crate::geometry::{Point2, Quad};
use crate::image::resize::resize_area;
use crate::image::{Frame, CHANNELS};
use crate::util::CamFilterResult;

/// Draws the closed outline of `quad`.
pub fn draw_quad(frame: &mut Frame, quad: &Quad, color: [u8; 4], thickness: u32) {
    for (a, b) in quad.edges() {
        draw_line(frame, a, b, color, thickness);
    }
}

/// Draws a segment with round caps, `thickness` pixels wide.
///
/// Pixels whose centres lie within `thickness / 2` of the segment are painted;
/// parts outside the frame are clipped.
pub fn draw_line(frame: &mut Frame, a: Point2, b: Point2, color: [u8; 4], thickness: u32) {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return;
    }
    let radius = (thickness.max(1) as f32) / 2.0;
    let max_x = (frame.width() - 1) as f32;
    let max_y = (frame.height() - 1) as f32;

    let lo_x = a.x.min(b.x) - radius;
    let hi_x = a.x.max(b.x) + radius;
    let lo_y = a.y.min(b.y) - radius;
    let hi_y = a.y.max(b.y) + radius;
    if hi_x < 0.0 || hi_y < 0.0 || lo_x > max_x || lo_y > max_y {
        return;
    }
    let x0 = lo_x.floor().clamp(0.0, max_x) as usize;
    let x1 = hi_x.ceil().clamp(0.0, max_x) as usize;
    let y0 = lo_y.floor().clamp(0.0, max_y) as usize;
    let y1 = hi_y.ceil().clamp(0.0, max_y) as usize;

    let r_sq = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            if segment_distance_sq(Point2::new(x as f32, y as f32), a, b) <= r_sq {
                frame.put_pixel(x, y, color);
            }
        }
    }
}

fn segment_distance_sq(p: Point2, a: Point2, b: Point2) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dx = a.x + t * abx - p.x;
    let dy = a.y + t * aby - p.y;
    dx * dx + dy * dy
}

/// Thumbnail size for a `ref_width x ref_height` image inside a frame.
///
/// The longer reference side is set to half of `min(frame_width, frame_height)`
/// and the other side follows the aspect ratio, truncated.
pub fn thumbnail_size(
    ref_width: usize,
    ref_height: usize,
    frame_width: usize,
    frame_height: usize,
) -> (usize, usize) {
    let max_dim = frame_width.min(frame_height) / 2;
    let aspect = ref_width as f64 / ref_height as f64;
    if ref_height > ref_width {
        ((max_dim as f64 * aspect) as usize, max_dim)
    } else {
        (max_dim, (max_dim as f64 / aspect) as usize)
    }
}

/// Resizes `reference` for `frame_width x frame_height`, or `None` when the
/// thumbnail would be empty.
pub fn make_thumbnail(
    reference: &Frame,
    frame_width: usize,
    frame_height: usize,
) -> CamFilterResult<Option<Frame>> {
    let (w, h) = thumbnail_size(
        reference.width(),
        reference.height(),
        frame_width,
        frame_height,
    );
    if w == 0 || h == 0 {
        return Ok(None);
    }
    resize_area(reference, w, h).map(Some)
}

/// Copies `thumbnail` into the top-left corner of `frame`.
pub fn blit_top_left(frame: &mut Frame, thumbnail: &Frame) {
    let w = thumbnail.width().min(frame.width());
    let h = thumbnail.height().min(frame.height());
    let frame_width = frame.width();
    let dst = frame.data_mut();
    for y in 0..h {
        let src_start = y * thumbnail.width() * CHANNELS;
        let dst_start = y * frame_width * CHANNELS;
        dst[dst_start..dst_start + w * CHANNELS]
            .copy_from_slice(&thumbnail.data()[src_start..src_start + w * CHANNELS]);
    }
}
