//! The planar reference image and its one-time feature extraction.

use crate::features::{FeatureConfig, FeatureExtractor, FeatureSet};
use crate::geometry::Quad;
use crate::image::convert::rgba_to_gray;
use crate::image::{Frame, GrayImage};
use crate::trace::{trace_event, trace_span};
use crate::util::CamFilterResult;

/// Immutable reference target: image, features and corner polygon.
#[derive(Clone, Debug)]
pub struct ReferenceTarget {
    image: Frame,
    features: FeatureSet,
    corners: Quad,
}

impl ReferenceTarget {
    /// Extracts features from an RGBA reference image.
    pub fn from_frame(image: Frame, cfg: &FeatureConfig) -> Self {
        let _span = trace_span!(
            "reference_extract",
            width = image.width(),
            height = image.height()
        )
        .entered();

        let mut gray = GrayImage::default();
        rgba_to_gray(&image, &mut gray);
        let mut features = FeatureSet::default();
        FeatureExtractor::new(cfg.clone()).extract(gray.view(), &mut features);
        let corners = Quad::from_size(image.width() as f32, image.height() as f32);

        trace_event!("reference_features", count = features.len());
        Self {
            image,
            features,
            corners,
        }
    }

    /// Builds a reference from a raw interleaved RGBA buffer.
    pub fn from_rgba(
        data: Vec<u8>,
        width: usize,
        height: usize,
        cfg: &FeatureConfig,
    ) -> CamFilterResult<Self> {
        let image = Frame::from_rgba(data, width, height)?;
        Ok(Self::from_frame(image, cfg))
    }

    /// Decodes a reference image from disk.
    #[cfg(feature = "image-io")]
    pub fn load<P: AsRef<std::path::Path>>(path: P, cfg: &FeatureConfig) -> CamFilterResult<Self> {
        let image = crate::image::io::load_frame(path)?;
        Ok(Self::from_frame(image, cfg))
    }

    /// Builds a reference from an already decoded image.
    #[cfg(feature = "image-io")]
    pub fn from_dynamic_image(img: &image::DynamicImage, cfg: &FeatureConfig) -> CamFilterResult<Self> {
        let image = crate::image::io::frame_from_dynamic_image(img)?;
        Ok(Self::from_frame(image, cfg))
    }

    /// Returns the reference image.
    pub fn image(&self) -> &Frame {
        &self.image
    }

    /// Returns the reference features.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Returns the reference corners: `(0,0)`, `(w,0)`, `(w,h)`, `(0,h)`.
    pub fn corners(&self) -> &Quad {
        &self.corners
    }

    /// Returns the reference width in pixels.
    pub fn width(&self) -> usize {
        self.image.width()
    }

    /// Returns the reference height in pixels.
    pub fn height(&self) -> usize {
        self.image.height()
    }
}
