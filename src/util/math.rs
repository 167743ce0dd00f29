//! Small numeric helpers shared by the filters and the detector.

/// Clamps an integer to the `u8` range.
#[inline]
pub(crate) fn saturate_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Rounds and clamps a float to the `u8` range.
#[inline]
pub(crate) fn round_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Computes `round(a * b / 255)` for two 8-bit values.
#[inline]
pub(crate) fn mul_div255(a: u8, b: u8) -> u8 {
    let prod = u32::from(a) * u32::from(b);
    ((prod + 127) / 255) as u8
}

/// Reflects an index into `[0, len)` without repeating the edge sample.
///
/// Matches the `gfedcb|abcdefgh|gfedcba` border convention.
pub(crate) fn reflect101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let n = len as isize;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * (n - 1) - i;
        } else {
            return i as usize;
        }
    }
}
