//! Channel-mixer recolouring filters.
//!
//! Each mode rewrites only the blue channel from the pixel's own red, green
//! and blue values; red, green and alpha pass through.

use crate::filter::Filter;
use crate::image::frame::assert_same_shape;
use crate::image::{Frame, CHANNELS};

/// How the blue channel is recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MixerMode {
    /// Blue becomes the average of green and blue (red/cyan look).
    Rc,
    /// Blue becomes the minimum of red, green and blue.
    Rgv,
    /// Blue becomes the maximum of red, green and blue.
    Cmv,
}

impl MixerMode {
    /// All modes in chain order.
    pub const ALL: [MixerMode; 3] = [MixerMode::Rc, MixerMode::Rgv, MixerMode::Cmv];

    /// Display name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            MixerMode::Rc => "recolor-rc",
            MixerMode::Rgv => "recolor-rgv",
            MixerMode::Cmv => "recolor-cmv",
        }
    }

    /// New blue value for one pixel.
    #[inline]
    pub fn blue(self, r: u8, g: u8, b: u8) -> u8 {
        match self {
            MixerMode::Rc => half_even_average(g, b),
            MixerMode::Rgv => r.min(g).min(b),
            MixerMode::Cmv => r.max(g).max(b),
        }
    }
}

/// `(a + b) / 2` rounded half to even.
#[inline]
fn half_even_average(a: u8, b: u8) -> u8 {
    let sum = u16::from(a) + u16::from(b);
    let half = sum / 2;
    let bump = sum & half & 1;
    (half + bump) as u8
}

/// Channel-mixer filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MixerFilter {
    mode: MixerMode,
}

impl MixerFilter {
    /// Creates a mixer for `mode`.
    pub fn new(mode: MixerMode) -> Self {
        Self { mode }
    }

    /// Returns the mixing mode.
    pub fn mode(&self) -> MixerMode {
        self.mode
    }
}

impl Filter for MixerFilter {
    fn name(&self) -> &str {
        self.mode.name()
    }

    fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        assert_same_shape(src, dst);
        for (s, d) in src
            .data()
            .chunks_exact(CHANNELS)
            .zip(dst.data_mut().chunks_exact_mut(CHANNELS))
        {
            d[0] = s[0];
            d[1] = s[1];
            d[2] = self.mode.blue(s[0], s[1], s[2]);
            d[3] = s[3];
        }
    }

    fn apply_in_place(&mut self, frame: &mut Frame) {
        for px in frame.data_mut().chunks_exact_mut(CHANNELS) {
            px[2] = self.mode.blue(px[0], px[1], px[2]);
        }
    }
}
