//! Keypoint detection, description and matching.
//!
//! The extractor runs FAST-9 on the intensity image, keeps the strongest
//! corners, assigns each an intensity-centroid orientation and computes a
//! rotated 256-bit descriptor on a box-smoothed copy. Matching is brute-force
//! Hamming nearest neighbour from scene to reference.

mod descriptor;
mod fast;
mod matcher;

pub use descriptor::{Descriptor, DESCRIPTOR_BYTES, EDGE_BORDER};
pub use matcher::{match_nearest, Match};

use crate::image::{GrayImage, ImageView};
use descriptor::{box_blur, describe, orientation, BriefPattern};
use fast::{detect_fast, FastScratch};

/// Configuration for feature extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureConfig {
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Upper bound on keypoints kept per image, strongest first.
    pub max_keypoints: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            fast_threshold: 20,
            max_keypoints: 500,
        }
    }
}

/// A detected keypoint in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Column of the keypoint.
    pub x: f32,
    /// Row of the keypoint.
    pub y: f32,
    /// FAST corner response.
    pub score: f32,
    /// Orientation in radians.
    pub angle: f32,
}

/// Ordered keypoints with one descriptor each.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    keypoints: Vec<Keypoint>,
    descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Returns true when the set holds no features.
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Returns the keypoints in order.
    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// Returns the descriptors, index-aligned with [`FeatureSet::keypoints`].
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    fn clear(&mut self) {
        self.keypoints.clear();
        self.descriptors.clear();
    }
}

/// Reusable feature extractor.
///
/// Holds the sampling pattern and scratch buffers so repeated calls do not
/// allocate once the buffers have grown to the frame size.
#[derive(Debug)]
pub struct FeatureExtractor {
    cfg: FeatureConfig,
    pattern: BriefPattern,
    fast: FastScratch,
    smoothed: GrayImage,
    blur_tmp: Vec<u16>,
}

impl FeatureExtractor {
    /// Creates an extractor with the given configuration.
    pub fn new(cfg: FeatureConfig) -> Self {
        Self {
            cfg,
            pattern: BriefPattern::new(),
            fast: FastScratch::default(),
            smoothed: GrayImage::default(),
            blur_tmp: Vec::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FeatureConfig {
        &self.cfg
    }

    /// Extracts features from an intensity image into `out`.
    ///
    /// Images too small to hold a described keypoint produce an empty set.
    pub fn extract(&mut self, gray: ImageView<'_, u8>, out: &mut FeatureSet) {
        out.clear();
        detect_fast(
            gray,
            self.cfg.fast_threshold,
            EDGE_BORDER,
            self.cfg.max_keypoints,
            &mut self.fast,
            &mut out.keypoints,
        );
        if out.keypoints.is_empty() {
            return;
        }

        box_blur(gray, &mut self.blur_tmp, &mut self.smoothed);
        let smoothed = self.smoothed.view();
        for kp in out.keypoints.iter_mut() {
            kp.angle = orientation(gray, kp.x as usize, kp.y as usize);
            out.descriptors.push(describe(smoothed, &self.pattern, kp));
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}
