//! Frame buffers and grayscale image views.
//!
//! `Frame` is the owned RGBA8 buffer that flows through the filter chain.
//! `GrayImage` is an owned single-channel buffer used as detector scratch, and
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows.

use crate::util::{CamFilterError, CamFilterResult};

pub mod convert;
pub mod frame;
#[cfg(feature = "image-io")]
pub mod io;
pub mod resize;

pub use frame::{Frame, CHANNELS};

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> CamFilterResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> CamFilterResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(CamFilterError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }
}

impl ImageView<'_, u8> {
    /// Reads a pixel without bounds checks beyond the slice index.
    ///
    /// Callers guarantee `x < width` and `y < height`.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> CamFilterResult<usize> {
    if width == 0 || height == 0 {
        return Err(CamFilterError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(CamFilterError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(CamFilterError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image buffer.
///
/// A default-constructed image is empty and acts as reusable scratch space;
/// [`GrayImage::reset`] reshapes it without shrinking the allocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrayImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl GrayImage {
    /// Creates an image from a contiguous buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> CamFilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(CamFilterError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(CamFilterError::InvalidDimensions { width, height })?;
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

    /// Reshapes the buffer to `width x height`, zero-filled.
    pub(crate) fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, 0);
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel data in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}
