//! Frame-to-frame state machine over the tracked quadrilateral.
//!
//! The tracker favours a stable overlay: only a confidently negative frame
//! (closest match worse than `absent_distance`) clears a tracked target;
//! every other inconclusive frame keeps the previous quad untouched.

use crate::geometry::{find_homography_ransac, Point2, Quad, RansacConfig, RansacWorkspace};
use crate::trace::trace_event;

/// Last known location of the reference target in scene coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TrackedQuad {
    /// No target is being tracked.
    #[default]
    Absent,
    /// A convex quadrilateral, corners ordered as the reference corners.
    Present(Quad),
}

impl TrackedQuad {
    /// Returns true when a quad is being tracked.
    pub fn is_present(&self) -> bool {
        matches!(self, TrackedQuad::Present(_))
    }

    /// Returns the tracked quad, if any.
    pub fn quad(&self) -> Option<&Quad> {
        match self {
            TrackedQuad::Present(quad) => Some(quad),
            TrackedQuad::Absent => None,
        }
    }
}

/// One scene-to-reference match expressed in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correspondence {
    /// Keypoint location in the reference image.
    pub reference: Point2,
    /// Keypoint location in the scene frame.
    pub scene: Point2,
    /// Descriptor distance; lower is more similar.
    pub distance: f32,
}

/// Outcome of one tracker update. None of these are failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Fewer matches than a homography needs; state kept.
    TooFewMatches,
    /// Best match too weak; state cleared to absent.
    Cleared,
    /// Best match in the ambiguous band; state kept.
    Ambiguous,
    /// Not enough matches passed the ratio gate; state kept.
    TooFewGood,
    /// Robust fitting produced no model or an unprojectable quad; state kept.
    NoModel,
    /// Candidate quad failed the convexity test; state kept.
    RejectedNonConvex,
    /// State replaced by a new convex quad.
    Updated,
}

impl Transition {
    /// Stable snake_case name for logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::TooFewMatches => "too_few_matches",
            Transition::Cleared => "cleared",
            Transition::Ambiguous => "ambiguous",
            Transition::TooFewGood => "too_few_good",
            Transition::NoModel => "no_model",
            Transition::RejectedNonConvex => "rejected_non_convex",
            Transition::Updated => "updated",
        }
    }
}

/// Gating thresholds for the tracker.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Minimum number of matches (and of good matches) to attempt a fit.
    pub min_matches: usize,
    /// Best-match distance above which the target is declared absent.
    pub absent_distance: f32,
    /// Best-match distance above which the frame is ambiguous.
    pub ambiguous_distance: f32,
    /// Good matches have distance strictly below `good_match_ratio * minDist`.
    pub good_match_ratio: f32,
    /// Robust fitting parameters.
    pub ransac: RansacConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_matches: 4,
            absent_distance: 50.0,
            ambiguous_distance: 25.0,
            good_match_ratio: 1.75,
            ransac: RansacConfig::default(),
        }
    }
}

/// Owns the tracked quad and the buffers used to update it.
#[derive(Debug, Default)]
pub struct Tracker {
    state: TrackedQuad,
    good_reference: Vec<Point2>,
    good_scene: Vec<Point2>,
    ransac: RansacWorkspace,
}

impl Tracker {
    /// Creates a tracker with no target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current tracked quad.
    pub fn state(&self) -> TrackedQuad {
        self.state
    }

    /// Forgets the tracked quad.
    pub fn reset(&mut self) {
        self.state = TrackedQuad::Absent;
    }

    /// Advances the state machine with one frame of evidence.
    ///
    /// `corners` are the reference corners in reference coordinates. The
    /// state only changes on [`Transition::Cleared`] and
    /// [`Transition::Updated`]; it is replaced as a whole, never partially.
    pub fn update(
        &mut self,
        matches: &[Correspondence],
        corners: &Quad,
        cfg: &TrackerConfig,
    ) -> Transition {
        let transition = self.step(matches, corners, cfg);
        trace_event!(
            "tracker_transition",
            transition = transition.as_str(),
            present = self.state.is_present()
        );
        transition
    }

    fn step(&mut self, matches: &[Correspondence], corners: &Quad, cfg: &TrackerConfig) -> Transition {
        let min_matches = cfg.min_matches.max(4);
        if matches.len() < min_matches {
            return Transition::TooFewMatches;
        }

        let (min_dist, max_dist) = matches
            .iter()
            .fold((f32::MAX, 0.0f32), |(lo, hi), m| {
                (lo.min(m.distance), hi.max(m.distance))
            });
        trace_event!("match_distances", min = min_dist, max = max_dist);

        if min_dist > cfg.absent_distance {
            self.state = TrackedQuad::Absent;
            return Transition::Cleared;
        }
        if min_dist > cfg.ambiguous_distance {
            return Transition::Ambiguous;
        }

        let good_limit = cfg.good_match_ratio * min_dist;
        self.good_reference.clear();
        self.good_scene.clear();
        for m in matches.iter().filter(|m| m.distance < good_limit) {
            self.good_reference.push(m.reference);
            self.good_scene.push(m.scene);
        }
        if self.good_reference.len() < min_matches {
            return Transition::TooFewGood;
        }

        let Some(fit) = find_homography_ransac(
            &self.good_reference,
            &self.good_scene,
            &cfg.ransac,
            &mut self.ransac,
        ) else {
            return Transition::NoModel;
        };
        let Some(candidate) = fit.homography.project_quad(corners) else {
            return Transition::NoModel;
        };

        if !candidate.is_convex() {
            return Transition::RejectedNonConvex;
        }
        self.state = TrackedQuad::Present(candidate);
        Transition::Updated
    }
}
