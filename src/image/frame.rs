//! Owned RGBA8 frame buffer.

use crate::util::{CamFilterError, CamFilterResult};

/// Number of interleaved channels per frame pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A `width x height` buffer of row-major RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Frame {
    /// Creates a frame from an interleaved RGBA buffer of exactly
    /// `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> CamFilterResult<Self> {
        let needed = byte_len(width, height)?;
        if data.len() < needed {
            return Err(CamFilterError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(CamFilterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a frame filled with one RGBA colour.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> CamFilterResult<Self> {
        let needed = byte_len(width, height)?;
        let mut data = Vec::with_capacity(needed);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the interleaved RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the interleaved RGBA bytes mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * CHANNELS;
        let px = &self.data[idx..idx + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Writes the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgba);
    }

    /// Returns true when both frames have the same width and height.
    pub fn same_shape(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Copies `src` into this frame.
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn copy_from(&mut self, src: &Frame) {
        assert_same_shape(src, self);
        self.data.copy_from_slice(&src.data);
    }
}

/// Precondition shared by every `Filter::apply` implementation.
#[track_caller]
pub(crate) fn assert_same_shape(src: &Frame, dst: &Frame) {
    assert!(
        src.same_shape(dst),
        "frame shape mismatch: src {}x{}, dst {}x{}",
        src.width,
        src.height,
        dst.width,
        dst.height
    );
}

fn byte_len(width: usize, height: usize) -> CamFilterResult<usize> {
    if width == 0 || height == 0 {
        return Err(CamFilterError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(CamFilterError::InvalidDimensions { width, height })
}
