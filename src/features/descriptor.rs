//! Oriented binary descriptors.
//!
//! Each keypoint gets an orientation from the intensity centroid of a disc
//! around it, then 256 pixel-pair comparisons are sampled from a fixed pattern
//! rotated by that orientation. Comparisons read a box-smoothed copy of the
//! image so single-pixel noise does not flip bits.

use crate::features::Keypoint;
use crate::image::{GrayImage, ImageView};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Descriptor length in bytes.
pub const DESCRIPTOR_BYTES: usize = 32;

/// Radius of the disc used for the intensity-centroid orientation.
pub(crate) const ORIENTATION_RADIUS: isize = 15;

/// Radius of the disc the sampling pattern is drawn from.
const PATTERN_RADIUS: i32 = 13;

/// Pixels a keypoint must keep from the image edge for both steps above.
pub const EDGE_BORDER: usize = 16;

const PATTERN_SEED: u64 = 0x5eed_b41e_f00d_0001;
const BOX_RADIUS: usize = 2;

/// A 256-bit binary descriptor compared by Hamming distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Descriptor(pub [u8; DESCRIPTOR_BYTES]);

impl Descriptor {
    /// Number of differing bits between two descriptors.
    pub fn hamming(&self, other: &Descriptor) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Fixed sampling pattern of point pairs inside a disc.
#[derive(Clone, Debug)]
pub(crate) struct BriefPattern {
    pairs: Vec<[(f32, f32); 2]>,
}

impl BriefPattern {
    /// Builds the pattern from a fixed seed, so every instance agrees.
    pub(crate) fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let mut pairs = Vec::with_capacity(DESCRIPTOR_BYTES * 8);
        while pairs.len() < DESCRIPTOR_BYTES * 8 {
            let a = sample_in_disc(&mut rng);
            let b = sample_in_disc(&mut rng);
            if a != b {
                pairs.push([a, b]);
            }
        }
        Self { pairs }
    }
}

fn sample_in_disc(rng: &mut StdRng) -> (f32, f32) {
    loop {
        let x = rng.random_range(-PATTERN_RADIUS..=PATTERN_RADIUS);
        let y = rng.random_range(-PATTERN_RADIUS..=PATTERN_RADIUS);
        if x * x + y * y <= PATTERN_RADIUS * PATTERN_RADIUS {
            return (x as f32, y as f32);
        }
    }
}

/// Separable 5x5 box mean with clamped borders.
pub(crate) fn box_blur(src: ImageView<'_, u8>, tmp: &mut Vec<u16>, dst: &mut GrayImage) {
    let w = src.width();
    let h = src.height();
    let r = BOX_RADIUS as isize;
    let taps = (2 * BOX_RADIUS + 1) as u32;

    tmp.clear();
    tmp.resize(w * h, 0);
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u16;
            for dx in -r..=r {
                let sx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                sum += u16::from(src.at(sx, y));
            }
            tmp[y * w + x] = sum;
        }
    }

    dst.reset(w, h);
    let norm = taps * taps;
    let out = dst.data_mut();
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for dy in -r..=r {
                let sy = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                sum += u32::from(tmp[sy * w + x]);
            }
            out[y * w + x] = ((sum + norm / 2) / norm) as u8;
        }
    }
}

/// Intensity-centroid orientation in radians.
///
/// Callers guarantee the disc of radius [`ORIENTATION_RADIUS`] fits inside the image.
pub(crate) fn orientation(image: ImageView<'_, u8>, x: usize, y: usize) -> f32 {
    let r = ORIENTATION_RADIUS;
    let mut m10 = 0i64;
    let mut m01 = 0i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let v = i64::from(image.at((x as isize + dx) as usize, (y as isize + dy) as usize));
            m10 += dx as i64 * v;
            m01 += dy as i64 * v;
        }
    }
    (m01 as f32).atan2(m10 as f32)
}

/// Computes the rotated binary descriptor at `kp` over a smoothed image.
pub(crate) fn describe(
    smoothed: ImageView<'_, u8>,
    pattern: &BriefPattern,
    kp: &Keypoint,
) -> Descriptor {
    let (sin, cos) = kp.angle.sin_cos();
    let cx = kp.x;
    let cy = kp.y;
    let read = |(px, py): (f32, f32)| -> u8 {
        let rx = (cos * px - sin * py + cx).round() as usize;
        let ry = (sin * px + cos * py + cy).round() as usize;
        smoothed.at(rx, ry)
    };

    let mut bytes = [0u8; DESCRIPTOR_BYTES];
    for (bit, pair) in pattern.pairs.iter().enumerate() {
        if read(pair[0]) < read(pair[1]) {
            bytes[bit / 8] |= 1 << (bit % 8);
        }
    }
    Descriptor(bytes)
}
