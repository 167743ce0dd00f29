//! Planar geometry: points, quadrilaterals, homographies and robust fitting.

mod convex;
mod homography;
mod ransac;

pub use convex::is_convex_polygon;
pub use homography::Homography;
pub use ransac::{find_homography_ransac, RansacConfig, RansacFit, RansacWorkspace};

/// A 2D point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Rounds to the nearest integer pixel (half away from zero).
    pub fn rounded(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Four corners in order: top-left, top-right, bottom-right, bottom-left
/// of the source plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Point2; 4],
}

impl Quad {
    /// Creates a quad from its four corners.
    pub const fn new(corners: [Point2; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle `[0, width] x [0, height]`, clockwise from the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new([
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ])
    }

    /// Corners rounded to integer pixels.
    pub fn rounded(&self) -> [(i32, i32); 4] {
        self.corners.map(Point2::rounded)
    }

    /// Convexity of the integer-rounded polygon.
    pub fn is_convex(&self) -> bool {
        is_convex_polygon(&self.rounded())
    }

    /// The closed edge loop `0-1, 1-2, 2-3, 3-0`.
    pub fn edges(&self) -> [(Point2, Point2); 4] {
        let c = self.corners;
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }
}
