//! Tone-curve filters built from spline control points.
//!
//! Each curve is baked into a 256-entry lookup table. A [`CurveFilter`] holds
//! one table per colour channel with the composite curve already folded in,
//! so applying it is a single lookup per channel. Alpha is never touched.

use crate::filter::Filter;
use crate::image::frame::assert_same_shape;
use crate::image::{Frame, CHANNELS};
use crate::util::math::round_u8;
use crate::util::{CamFilterError, CamFilterResult};

/// A 256-entry tone curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneCurve {
    lut: [u8; 256],
}

impl ToneCurve {
    /// The identity curve.
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self { lut }
    }

    /// Interpolates the control points `(xs[i], ys[i])`.
    ///
    /// Two points give a straight line, more give a natural cubic spline.
    /// Inputs outside `[xs[0], xs[n-1]]` take the end values; outputs are
    /// rounded and clamped to `[0, 255]`.
    pub fn from_points(xs: &[f64], ys: &[f64]) -> CamFilterResult<Self> {
        if xs.len() != ys.len() {
            return Err(CamFilterError::InvalidCurve {
                reason: "xs and ys differ in length",
            });
        }
        if xs.len() < 2 {
            return Err(CamFilterError::InvalidCurve {
                reason: "at least two control points are required",
            });
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(CamFilterError::InvalidCurve {
                reason: "control points must be finite",
            });
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CamFilterError::InvalidCurve {
                reason: "xs must be strictly increasing",
            });
        }
        Ok(Self {
            lut: bake(xs, ys),
        })
    }

    /// Returns the lookup table.
    pub fn lut(&self) -> &[u8; 256] {
        &self.lut
    }

    /// Maps one value through the curve.
    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.lut[usize::from(value)]
    }

    /// Returns the curve `x -> self(first(x))`.
    pub fn after(&self, first: &ToneCurve) -> ToneCurve {
        let mut lut = [0u8; 256];
        for (out, &v) in lut.iter_mut().zip(first.lut.iter()) {
            *out = self.map(v);
        }
        ToneCurve { lut }
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::identity()
    }
}

/// Film-emulation presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurvePreset {
    CrossProcess,
    Portra,
    Provia,
    Velvia,
}

impl CurvePreset {
    /// All presets in chain order.
    pub const ALL: [CurvePreset; 4] = [
        CurvePreset::CrossProcess,
        CurvePreset::Portra,
        CurvePreset::Provia,
        CurvePreset::Velvia,
    ];

    /// Display name of the preset.
    pub fn name(self) -> &'static str {
        match self {
            CurvePreset::CrossProcess => "cross-process",
            CurvePreset::Portra => "portra",
            CurvePreset::Provia => "provia",
            CurvePreset::Velvia => "velvia",
        }
    }

    /// Builds the filter for this preset.
    pub fn filter(self) -> CurveFilter {
        // (composite, red, green, blue) as (xs, ys) pairs.
        type Points = (&'static [f64], &'static [f64]);
        const ID: Points = (&[0.0, 255.0], &[0.0, 255.0]);
        let (v, r, g, b): (Points, Points, Points, Points) = match self {
            CurvePreset::CrossProcess => (
                ID,
                (&[0.0, 56.0, 211.0, 255.0], &[0.0, 22.0, 255.0, 255.0]),
                (&[0.0, 56.0, 208.0, 255.0], &[0.0, 39.0, 226.0, 255.0]),
                (&[0.0, 255.0], &[20.0, 235.0]),
            ),
            CurvePreset::Portra => (
                (&[0.0, 23.0, 157.0, 255.0], &[0.0, 20.0, 173.0, 255.0]),
                (&[0.0, 69.0, 213.0, 255.0], &[0.0, 69.0, 218.0, 255.0]),
                (&[0.0, 52.0, 189.0, 255.0], &[0.0, 47.0, 196.0, 255.0]),
                (&[0.0, 41.0, 231.0, 255.0], &[0.0, 46.0, 228.0, 255.0]),
            ),
            CurvePreset::Provia => (
                ID,
                (&[0.0, 59.0, 202.0, 255.0], &[0.0, 54.0, 210.0, 255.0]),
                (&[0.0, 27.0, 196.0, 255.0], &[0.0, 21.0, 207.0, 255.0]),
                (&[0.0, 35.0, 205.0, 255.0], &[0.0, 25.0, 227.0, 255.0]),
            ),
            CurvePreset::Velvia => (
                (&[0.0, 128.0, 221.0, 255.0], &[0.0, 118.0, 215.0, 255.0]),
                (
                    &[0.0, 25.0, 122.0, 165.0, 255.0],
                    &[0.0, 21.0, 153.0, 206.0, 255.0],
                ),
                (
                    &[0.0, 25.0, 95.0, 181.0, 255.0],
                    &[0.0, 21.0, 102.0, 208.0, 255.0],
                ),
                (&[0.0, 35.0, 205.0, 255.0], &[0.0, 25.0, 227.0, 255.0]),
            ),
        };
        let curve = |(xs, ys): Points| ToneCurve { lut: bake(xs, ys) };
        CurveFilter::new(self.name(), curve(v), [curve(r), curve(g), curve(b)])
    }
}

/// Per-channel tone-curve filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveFilter {
    name: String,
    channels: [ToneCurve; 3],
}

impl CurveFilter {
    /// Creates a filter applying `composite` and then `channels[c]` to colour channel `c`.
    pub fn new(name: impl Into<String>, composite: ToneCurve, channels: [ToneCurve; 3]) -> Self {
        let [r, g, b] = channels;
        Self {
            name: name.into(),
            channels: [r.after(&composite), g.after(&composite), b.after(&composite)],
        }
    }

    /// Returns the effective per-channel curves.
    pub fn channels(&self) -> &[ToneCurve; 3] {
        &self.channels
    }

    fn map_pixel(&self, src: &[u8], dst: &mut [u8]) {
        for c in 0..3 {
            dst[c] = self.channels[c].map(src[c]);
        }
        dst[3] = src[3];
    }
}

impl Filter for CurveFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        assert_same_shape(src, dst);
        for (s, d) in src
            .data()
            .chunks_exact(CHANNELS)
            .zip(dst.data_mut().chunks_exact_mut(CHANNELS))
        {
            self.map_pixel(s, d);
        }
    }

    fn apply_in_place(&mut self, frame: &mut Frame) {
        for px in frame.data_mut().chunks_exact_mut(CHANNELS) {
            let s = [px[0], px[1], px[2], px[3]];
            self.map_pixel(&s, px);
        }
    }
}

fn bake(xs: &[f64], ys: &[f64]) -> [u8; 256] {
    let n = xs.len();
    let m = second_derivatives(xs, ys);
    let mut lut = [0u8; 256];
    let mut seg = 0usize;
    for (i, out) in lut.iter_mut().enumerate() {
        let x = (i as f64).clamp(xs[0], xs[n - 1]);
        while seg + 2 < n && x > xs[seg + 1] {
            seg += 1;
        }
        let h = xs[seg + 1] - xs[seg];
        let a = (xs[seg + 1] - x) / h;
        let b = (x - xs[seg]) / h;
        let y = a * ys[seg]
            + b * ys[seg + 1]
            + ((a * a * a - a) * m[seg] + (b * b * b - b) * m[seg + 1]) * h * h / 6.0;
        *out = round_u8(y);
    }
    lut
}

/// Second derivatives of the natural cubic spline (zero at both ends).
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }
    // Thomas algorithm on the interior knots.
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        let rhs = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
        let denom = 2.0 * (h0 + h1) - h0 * c_prime[i - 1];
        c_prime[i] = h1 / denom;
        d_prime[i] = (rhs - h0 * d_prime[i - 1]) / denom;
    }
    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}
