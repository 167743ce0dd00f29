//! RANSAC homography estimation.
//!
//! Minimal four-point samples are drawn without replacement, each candidate
//! is scored by the number of correspondences it reprojects within the
//! threshold, and the iteration budget shrinks adaptively as the best inlier
//! ratio grows. The winner is refit on all of its inliers.

use crate::geometry::{Homography, Point2};
use crate::trace::{trace_event, trace_span};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

const SAMPLE_SIZE: usize = 4;

/// Configuration for robust homography fitting.
#[derive(Clone, Debug, PartialEq)]
pub struct RansacConfig {
    /// Maximum reprojection error in pixels for a correspondence to count as an inlier.
    pub reproj_threshold: f32,
    /// Hard cap on sampling iterations.
    pub max_iterations: usize,
    /// Desired probability of drawing at least one outlier-free sample.
    pub confidence: f64,
    /// Seed for the sampler; every fit starts from this seed.
    pub seed: u64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            reproj_threshold: 5.0,
            max_iterations: 2000,
            confidence: 0.995,
            seed: 0x5eed,
        }
    }
}

/// Result of a successful robust fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RansacFit {
    /// Homography refit on the consensus set.
    pub homography: Homography,
    /// Size of the consensus set.
    pub inliers: usize,
    /// Iterations actually run.
    pub iterations: usize,
}

/// Scratch buffers reused across fits.
#[derive(Debug, Default)]
pub struct RansacWorkspace {
    mask: Vec<bool>,
    best_mask: Vec<bool>,
    inlier_src: Vec<Point2>,
    inlier_dst: Vec<Point2>,
}

/// Robustly fits a homography mapping `src[i]` to `dst[i]`.
///
/// Returns `None` when fewer than four pairs are given, the slices differ in
/// length, or no sample yields a model.
pub fn find_homography_ransac(
    src: &[Point2],
    dst: &[Point2],
    cfg: &RansacConfig,
    ws: &mut RansacWorkspace,
) -> Option<RansacFit> {
    let n = src.len();
    if n < SAMPLE_SIZE || n != dst.len() {
        return None;
    }
    let _span = trace_span!("ransac", points = n).entered();

    let threshold_sq = f64::from(cfg.reproj_threshold) * f64::from(cfg.reproj_threshold);
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    ws.mask.clear();
    ws.mask.resize(n, false);
    ws.best_mask.clear();
    ws.best_mask.resize(n, false);

    let mut best: Option<Homography> = None;
    let mut best_count = 0usize;
    let mut budget = cfg.max_iterations.max(1);
    let mut iterations = 0usize;

    while iterations < budget {
        iterations += 1;

        let picks = sample(&mut rng, n, SAMPLE_SIZE);
        let mut sample_src = [Point2::default(); SAMPLE_SIZE];
        let mut sample_dst = [Point2::default(); SAMPLE_SIZE];
        for (slot, idx) in picks.iter().enumerate() {
            sample_src[slot] = src[idx];
            sample_dst[slot] = dst[idx];
        }
        if has_collinear_triple(&sample_src) || has_collinear_triple(&sample_dst) {
            continue;
        }
        let Some(model) = Homography::fit(&sample_src, &sample_dst) else {
            continue;
        };

        let mut count = 0usize;
        for (i, flag) in ws.mask.iter_mut().enumerate() {
            *flag = model.reprojection_error_sq(src[i], dst[i]) <= threshold_sq;
            count += usize::from(*flag);
        }

        if count > best_count {
            best_count = count;
            best = Some(model);
            ws.best_mask.copy_from_slice(&ws.mask);
            budget = adaptive_budget(count, n, cfg).max(iterations);
        }
    }

    let model = best?;
    ws.inlier_src.clear();
    ws.inlier_dst.clear();
    for i in 0..n {
        if ws.best_mask[i] {
            ws.inlier_src.push(src[i]);
            ws.inlier_dst.push(dst[i]);
        }
    }
    let homography = Homography::fit(&ws.inlier_src, &ws.inlier_dst).unwrap_or(model);

    trace_event!("ransac_done", inliers = best_count, iterations = iterations);
    Some(RansacFit {
        homography,
        inliers: best_count,
        iterations,
    })
}

/// Iterations needed to hit `cfg.confidence` at the observed inlier ratio.
fn adaptive_budget(inliers: usize, total: usize, cfg: &RansacConfig) -> usize {
    let w = inliers as f64 / total as f64;
    let p_good = w.powi(SAMPLE_SIZE as i32);
    if p_good >= 1.0 {
        return 1;
    }
    let p_fail = (1.0 - p_good).max(1e-15);
    let needed = (1.0 - cfg.confidence).max(1e-15).ln() / p_fail.ln();
    if !needed.is_finite() {
        return cfg.max_iterations;
    }
    (needed.ceil() as usize).clamp(1, cfg.max_iterations.max(1))
}

fn has_collinear_triple(points: &[Point2; SAMPLE_SIZE]) -> bool {
    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    TRIPLES.iter().any(|&(a, b, c)| {
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        let cross = (f64::from(pb.x) - f64::from(pa.x)) * (f64::from(pc.y) - f64::from(pa.y))
            - (f64::from(pb.y) - f64::from(pa.y)) * (f64::from(pc.x) - f64::from(pa.x));
        cross.abs() < 1e-6
    })
}
