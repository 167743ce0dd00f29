//! Planar target detection and tracking.
//!
//! [`ImageDetector`] is the stateful filter of the detection category. Per
//! frame it converts to intensity, extracts scene features, matches them to
//! the reference features, feeds the correspondences to the [`Tracker`] state
//! machine and renders either the tracked outline or the reference thumbnail.
//! All per-frame buffers live in an owned workspace, so one instance must not
//! be shared between concurrent callers.

mod reference;
pub mod render;
mod tracker;

pub use reference::ReferenceTarget;
pub use tracker::{Correspondence, TrackedQuad, Tracker, TrackerConfig, Transition};

use crate::features::{match_nearest, FeatureConfig, FeatureExtractor, FeatureSet, Match};
use crate::filter::Filter;
use crate::geometry::Point2;
use crate::image::convert::rgba_to_gray;
use crate::image::frame::assert_same_shape;
use crate::image::{Frame, GrayImage};
use crate::trace::{trace_event, trace_span};
use render::{blit_top_left, draw_quad, make_thumbnail};

/// Configuration for an [`ImageDetector`].
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Scene feature extraction parameters.
    pub features: FeatureConfig,
    /// Gating and fitting thresholds.
    pub tracker: TrackerConfig,
    /// RGBA colour of the tracked outline.
    pub line_color: [u8; 4],
    /// Outline thickness in pixels.
    pub line_thickness: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            tracker: TrackerConfig::default(),
            line_color: [0, 255, 0, 255],
            line_thickness: 4,
        }
    }
}

type ThumbnailCache = Option<((usize, usize), Option<Frame>)>;

#[derive(Debug, Default)]
struct Workspace {
    gray: GrayImage,
    scene: FeatureSet,
    matches: Vec<Match>,
    correspondences: Vec<Correspondence>,
    thumbnail: ThumbnailCache,
}

/// Detects a reference image in each frame and tracks its outline.
#[derive(Debug)]
pub struct ImageDetector {
    name: String,
    reference: ReferenceTarget,
    cfg: DetectorConfig,
    extractor: FeatureExtractor,
    tracker: Tracker,
    ws: Workspace,
    last_transition: Option<Transition>,
}

impl ImageDetector {
    /// Creates a detector for an already extracted reference.
    pub fn new(name: impl Into<String>, reference: ReferenceTarget, cfg: DetectorConfig) -> Self {
        Self {
            name: name.into(),
            extractor: FeatureExtractor::new(cfg.features.clone()),
            reference,
            cfg,
            tracker: Tracker::new(),
            ws: Workspace::default(),
            last_transition: None,
        }
    }

    /// Loads and extracts a reference image from disk.
    ///
    /// A failure here only affects this detector; leave it out of the chain.
    #[cfg(feature = "image-io")]
    pub fn load<P: AsRef<std::path::Path>>(
        name: impl Into<String>,
        path: P,
        cfg: DetectorConfig,
    ) -> crate::util::CamFilterResult<Self> {
        let reference = ReferenceTarget::load(path, &cfg.features)?;
        Ok(Self::new(name, reference, cfg))
    }

    /// Returns the reference target.
    pub fn reference(&self) -> &ReferenceTarget {
        &self.reference
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the currently tracked quad.
    pub fn tracked(&self) -> TrackedQuad {
        self.tracker.state()
    }

    /// Returns the outcome of the most recent frame, if any frame was processed.
    pub fn last_transition(&self) -> Option<Transition> {
        self.last_transition
    }

    /// Forgets the tracked target.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.last_transition = None;
    }

    /// Runs detection on `frame` and updates the tracked quad without drawing.
    pub fn process(&mut self, frame: &Frame) -> Transition {
        let _span = trace_span!(
            "detect_frame",
            detector = self.name.as_str(),
            width = frame.width(),
            height = frame.height()
        )
        .entered();

        rgba_to_gray(frame, &mut self.ws.gray);
        self.extractor
            .extract(self.ws.gray.view(), &mut self.ws.scene);
        match_nearest(
            self.ws.scene.descriptors(),
            self.reference.features().descriptors(),
            &mut self.ws.matches,
        );

        let scene_kps = self.ws.scene.keypoints();
        let reference_kps = self.reference.features().keypoints();
        self.ws.correspondences.clear();
        for m in &self.ws.matches {
            let r = reference_kps[m.reference_idx];
            let s = scene_kps[m.scene_idx];
            self.ws.correspondences.push(Correspondence {
                reference: Point2::new(r.x, r.y),
                scene: Point2::new(s.x, s.y),
                distance: m.distance,
            });
        }
        trace_event!(
            "scene_features",
            keypoints = scene_kps.len(),
            matches = self.ws.matches.len()
        );

        let transition = self.tracker.update(
            &self.ws.correspondences,
            self.reference.corners(),
            &self.cfg.tracker,
        );
        self.last_transition = Some(transition);
        transition
    }

    /// Draws the tracked outline, or the reference thumbnail when nothing is tracked.
    pub fn render(&mut self, frame: &mut Frame) {
        match self.tracker.state() {
            TrackedQuad::Present(quad) => {
                draw_quad(frame, &quad, self.cfg.line_color, self.cfg.line_thickness);
            }
            TrackedQuad::Absent => {
                if let Some(thumb) = self.thumbnail_for(frame.width(), frame.height()) {
                    blit_top_left(frame, thumb);
                }
            }
        }
    }

    fn thumbnail_for(&mut self, width: usize, height: usize) -> Option<&Frame> {
        let fresh = matches!(&self.ws.thumbnail, Some((size, _)) if *size == (width, height));
        if !fresh {
            let thumb = make_thumbnail(self.reference.image(), width, height)
                .ok()
                .flatten();
            self.ws.thumbnail = Some(((width, height), thumb));
        }
        self.ws.thumbnail.as_ref().and_then(|(_, t)| t.as_ref())
    }
}

impl Filter for ImageDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&mut self, src: &Frame, dst: &mut Frame) {
        assert_same_shape(src, dst);
        dst.copy_from(src);
        self.process(src);
        self.render(dst);
    }

    fn apply_in_place(&mut self, frame: &mut Frame) {
        self.process(frame);
        self.render(frame);
    }
}
