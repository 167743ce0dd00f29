//! Projective transforms between planes.
//!
//! Fitting uses the normalized direct linear transform: both point sets are
//! translated to their centroid and scaled to a mean distance of sqrt(2),
//! the 9-vector of the normalized homography is the eigenvector of `AᵀA`
//! with the smallest eigenvalue, and the result is denormalized.

use crate::geometry::{Point2, Quad};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f64 = 1e-12;

/// A 3x3 projective transform mapping source points to destination points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: Matrix3<f64>,
}

impl Homography {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Wraps a matrix; the matrix is used as given.
    pub fn from_matrix(m: Matrix3<f64>) -> Self {
        Self { m }
    }

    /// Returns the underlying matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    /// Maps one point, or returns `None` when it lands on the line at infinity
    /// or outside the `f32` range.
    pub fn project(&self, p: Point2) -> Option<Point2> {
        let v = self.m * Vector3::new(f64::from(p.x), f64::from(p.y), 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
            return None;
        }
        let x = (v[0] / w) as f32;
        let y = (v[1] / w) as f32;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Point2::new(x, y))
    }

    /// Maps all four corners of a quad.
    pub fn project_quad(&self, quad: &Quad) -> Option<Quad> {
        let mut corners = [Point2::default(); 4];
        for (out, &p) in corners.iter_mut().zip(quad.corners.iter()) {
            *out = self.project(p)?;
        }
        Some(Quad::new(corners))
    }

    /// Squared distance between `project(src)` and `dst`.
    pub fn reprojection_error_sq(&self, src: Point2, dst: Point2) -> f64 {
        match self.project(src) {
            Some(p) => {
                let dx = f64::from(p.x) - f64::from(dst.x);
                let dy = f64::from(p.y) - f64::from(dst.y);
                dx * dx + dy * dy
            }
            None => f64::INFINITY,
        }
    }

    /// Least-squares fit from at least four correspondences.
    ///
    /// Returns `None` for fewer than four pairs, mismatched slice lengths, or
    /// a degenerate configuration (coincident points).
    pub fn fit(src: &[Point2], dst: &[Point2]) -> Option<Self> {
        if src.len() < 4 || src.len() != dst.len() {
            return None;
        }
        let t_src = normalization(src)?;
        let t_dst = normalization(dst)?;

        let mut ata = SMatrix::<f64, 9, 9>::zeros();
        for (s, d) in src.iter().zip(dst.iter()) {
            let (x, y) = apply(&t_src, *s);
            let (u, v) = apply(&t_dst, *d);
            let r1 = SVector::<f64, 9>::from_column_slice(&[
                -x,
                -y,
                -1.0,
                0.0,
                0.0,
                0.0,
                u * x,
                u * y,
                u,
            ]);
            let r2 = SVector::<f64, 9>::from_column_slice(&[
                0.0,
                0.0,
                0.0,
                -x,
                -y,
                -1.0,
                v * x,
                v * y,
                v,
            ]);
            ata += r1 * r1.transpose();
            ata += r2 * r2.transpose();
        }

        let eigen = ata.symmetric_eigen();
        let idx = eigen.eigenvalues.iamin();
        let h = eigen.eigenvectors.column(idx);
        let hn = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);

        let t_dst_inv = t_dst.try_inverse()?;
        let mut m = t_dst_inv * hn * t_src;
        let scale = if m[(2, 2)].abs() > EPS {
            m[(2, 2)]
        } else {
            m.norm()
        };
        if scale.abs() <= EPS {
            return None;
        }
        m /= scale;
        if m.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self { m })
    }
}

/// Similarity transform moving the centroid to the origin with mean
/// distance sqrt(2).
fn normalization(points: &[Point2]) -> Option<Matrix3<f64>> {
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(ax, ay), p| {
        (ax + f64::from(p.x), ay + f64::from(p.y))
    });
    let cx = sx / n;
    let cy = sy / n;
    let mean_dist = points
        .iter()
        .map(|p| (f64::from(p.x) - cx).hypot(f64::from(p.y) - cy))
        .sum::<f64>()
        / n;
    if mean_dist <= EPS || !mean_dist.is_finite() {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    Some(Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0))
}

fn apply(t: &Matrix3<f64>, p: Point2) -> (f64, f64) {
    let x = t[(0, 0)] * f64::from(p.x) + t[(0, 2)];
    let y = t[(1, 1)] * f64::from(p.y) + t[(1, 2)];
    (x, y)
}
