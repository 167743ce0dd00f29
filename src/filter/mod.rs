//! Frame filters and the closed set of variants the chain can hold.
//!
//! Every filter maps an RGBA frame to an RGBA frame of the same shape.
//! Passing buffers of different shapes is a caller bug and panics.

pub mod convolution;
pub mod curve;
pub mod mixer;

pub use convolution::StrokeEdgesFilter;
pub use curve::{CurveFilter, CurvePreset, ToneCurve};
pub use mixer::{MixerFilter, MixerMode};

use crate::detect::ImageDetector;
use crate::image::frame::assert_same_shape;
use crate::image::Frame;

/// A frame-to-frame transformation.
pub trait Filter {
    /// Short display name.
    fn name(&self) -> &str;

    /// Writes the filtered version of `src` into `dst`.
    ///
    /// # Panics
    /// Panics when `src` and `dst` differ in shape.
    fn apply(&mut self, src: &Frame, dst: &mut Frame);

    /// Filters `frame` in place.
    fn apply_in_place(&mut self, frame: &mut Frame) {
        let src = frame.clone();
        self.apply(&src, frame);
    }
}

/// Pass-through filter; the first entry of every category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityFilter;

impl Filter for IdentityFilter {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        assert_same_shape(src, dst);
        dst.copy_from(src);
    }

    fn apply_in_place(&mut self, _frame: &mut Frame) {}
}

/// Any filter the chain can hold.
#[derive(Debug)]
pub enum AnyFilter {
    Identity(IdentityFilter),
    ToneCurve(CurveFilter),
    ChannelMixer(MixerFilter),
    Convolution(StrokeEdgesFilter),
    Detection(Box<ImageDetector>),
}

impl AnyFilter {
    /// Returns the detector when this is a detection filter.
    pub fn as_detector(&self) -> Option<&ImageDetector> {
        match self {
            AnyFilter::Detection(detector) => Some(detector.as_ref()),
            _ => None,
        }
    }

    /// Mutable variant of [`AnyFilter::as_detector`].
    pub fn as_detector_mut(&mut self) -> Option<&mut ImageDetector> {
        match self {
            AnyFilter::Detection(detector) => Some(detector.as_mut()),
            _ => None,
        }
    }

    fn inner(&mut self) -> &mut dyn Filter {
        match self {
            AnyFilter::Identity(f) => f,
            AnyFilter::ToneCurve(f) => f,
            AnyFilter::ChannelMixer(f) => f,
            AnyFilter::Convolution(f) => f,
            AnyFilter::Detection(f) => f.as_mut(),
        }
    }
}

impl Filter for AnyFilter {
    fn name(&self) -> &str {
        match self {
            AnyFilter::Identity(f) => f.name(),
            AnyFilter::ToneCurve(f) => f.name(),
            AnyFilter::ChannelMixer(f) => f.name(),
            AnyFilter::Convolution(f) => f.name(),
            AnyFilter::Detection(f) => f.name(),
        }
    }

    fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        self.inner().apply(src, dst);
    }

    fn apply_in_place(&mut self, frame: &mut Frame) {
        self.inner().apply_in_place(frame);
    }
}

impl From<IdentityFilter> for AnyFilter {
    fn from(f: IdentityFilter) -> Self {
        AnyFilter::Identity(f)
    }
}

impl From<CurveFilter> for AnyFilter {
    fn from(f: CurveFilter) -> Self {
        AnyFilter::ToneCurve(f)
    }
}

impl From<MixerFilter> for AnyFilter {
    fn from(f: MixerFilter) -> Self {
        AnyFilter::ChannelMixer(f)
    }
}

impl From<StrokeEdgesFilter> for AnyFilter {
    fn from(f: StrokeEdgesFilter) -> Self {
        AnyFilter::Convolution(f)
    }
}

impl From<ImageDetector> for AnyFilter {
    fn from(f: ImageDetector) -> Self {
        AnyFilter::Detection(Box::new(f))
    }
}

#[cfg(test)]
mod tests {
    use super::{AnyFilter, Filter, IdentityFilter};
    use crate::image::Frame;

    #[test]
    fn identity_copies_exactly() {
        let data: Vec<u8> = (0..3 * 2 * 4).map(|v| v as u8).collect();
        let src = Frame::from_rgba(data, 3, 2).unwrap();
        let mut dst = Frame::filled(3, 2, [0; 4]).unwrap();
        let mut filter = AnyFilter::from(IdentityFilter);
        filter.apply(&src, &mut dst);
        assert_eq!(dst, src);
        assert_eq!(filter.name(), "identity");
        assert!(filter.as_detector().is_none());
    }

    #[test]
    #[should_panic(expected = "frame shape mismatch")]
    fn identity_rejects_mismatched_shapes() {
        let src = Frame::filled(3, 2, [0; 4]).unwrap();
        let mut dst = Frame::filled(2, 3, [0; 4]).unwrap();
        IdentityFilter.apply(&src, &mut dst);
    }
}
