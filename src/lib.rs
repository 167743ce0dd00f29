//! CamFilter is a CPU video-frame filter chain with a planar target tracker.
//!
//! Frames are RGBA8 buffers. A [`FilterChain`] holds four categories (tone
//! curve, channel mixer, convolution, detection) with one active filter each.
//! The detection category locates a reference image in each frame with
//! FAST/BRIEF-style features, robust homography fitting and a small state
//! machine that keeps the overlay stable across inconclusive frames.
//! Decoding images from disk is available behind the `image-io` feature and
//! tracing spans behind the `tracing` feature.

mod trace;

pub mod chain;
pub mod detect;
pub mod features;
pub mod filter;
pub mod geometry;
pub mod image;
pub mod util;

pub use chain::{Category, FilterChain, FilterSlot, Selection};
pub use detect::{
    Correspondence, DetectorConfig, ImageDetector, ReferenceTarget, TrackedQuad, Tracker,
    TrackerConfig, Transition,
};
pub use features::FeatureConfig;
pub use filter::{AnyFilter, Filter, IdentityFilter};
pub use geometry::{Homography, Point2, Quad, RansacConfig};
pub use crate::image::{Frame, GrayImage, ImageView};
pub use util::{CamFilterError, CamFilterResult};
