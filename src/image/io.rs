//! Convenience helpers for loading and saving frames via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::Frame;
use crate::util::{CamFilterError, CamFilterResult};
use std::path::Path;

/// Creates an owned frame from an RGBA image buffer.
pub fn frame_from_rgba_image(img: &image::RgbaImage) -> CamFilterResult<Frame> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Frame::from_rgba(img.as_raw().clone(), width, height)
}

/// Creates an owned frame from a dynamic image, converting to RGBA.
pub fn frame_from_dynamic_image(img: &image::DynamicImage) -> CamFilterResult<Frame> {
    let rgba = img.to_rgba8();
    frame_from_rgba_image(&rgba)
}

/// Loads an image from disk and converts it to an RGBA frame.
pub fn load_frame<P: AsRef<Path>>(path: P) -> CamFilterResult<Frame> {
    let img = image::open(path).map_err(|err| CamFilterError::ImageIo {
        reason: err.to_string(),
    })?;
    frame_from_dynamic_image(&img)
}

/// Writes a frame to disk; the format follows the file extension.
pub fn save_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> CamFilterResult<()> {
    let img = image::RgbaImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.data().to_vec(),
    )
    .ok_or(CamFilterError::InvalidDimensions {
        width: frame.width(),
        height: frame.height(),
    })?;
    img.save(path).map_err(|err| CamFilterError::ImageIo {
        reason: err.to_string(),
    })
}
