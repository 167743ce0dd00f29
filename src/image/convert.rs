//! Colour to intensity conversion.

use crate::image::{Frame, GrayImage, CHANNELS};

// BT.601 luma weights in Q14 fixed point.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;

/// Converts one RGB triple to intensity with rounding.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = u32::from(r) * R_WEIGHT + u32::from(g) * G_WEIGHT + u32::from(b) * B_WEIGHT;
    ((sum + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Converts an RGBA frame into `dst`, reshaping `dst` to the frame size.
///
/// Alpha is ignored.
pub fn rgba_to_gray(src: &Frame, dst: &mut GrayImage) {
    dst.reset(src.width(), src.height());
    for (out, px) in dst
        .data_mut()
        .iter_mut()
        .zip(src.data().chunks_exact(CHANNELS))
    {
        *out = luma(px[0], px[1], px[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::{luma, rgba_to_gray};
    use crate::image::{Frame, GrayImage};

    #[test]
    fn luma_preserves_gray_levels() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn green_dominates_luma() {
        assert!(luma(0, 255, 0) > luma(255, 0, 0));
        assert!(luma(255, 0, 0) > luma(0, 0, 255));
    }

    #[test]
    fn conversion_reshapes_scratch() {
        let frame = Frame::filled(3, 2, [10, 10, 10, 0]).unwrap();
        let mut gray = GrayImage::default();
        rgba_to_gray(&frame, &mut gray);
        assert_eq!((gray.width(), gray.height()), (3, 2));
        assert!(gray.data().iter().all(|&v| v == 10));
    }
}
