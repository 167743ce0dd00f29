//! Convexity test for integer polygons.

/// Returns true when the closed polygon is strictly convex.
///
/// Every turn must have the same orientation; a zero turn (repeated vertex
/// or three collinear vertices) counts as not convex, as does any polygon
/// with fewer than three vertices.
pub fn is_convex_polygon(points: &[(i32, i32)]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0i64;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        let (x2, y2) = points[(i + 2) % n];
        let ax = i64::from(x1) - i64::from(x0);
        let ay = i64::from(y1) - i64::from(y0);
        let bx = i64::from(x2) - i64::from(x1);
        let by = i64::from(y2) - i64::from(y1);
        let cross = ax * by - ay * bx;
        if cross == 0 {
            return false;
        }
        let turn = cross.signum();
        if sign == 0 {
            sign = turn;
        } else if turn != sign {
            return false;
        }
    }

    // Same-sign turns can still wind more than once (pentagram); the edge
    // directions of a simple convex polygon sweep exactly one full turn.
    winding_turns(points) == 1
}

fn winding_turns(points: &[(i32, i32)]) -> i32 {
    let n = points.len();
    let mut total = 0.0f64;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        let (x2, y2) = points[(i + 2) % n];
        let a = (f64::from(y1) - f64::from(y0)).atan2(f64::from(x1) - f64::from(x0));
        let b = (f64::from(y2) - f64::from(y1)).atan2(f64::from(x2) - f64::from(x1));
        let mut d = b - a;
        while d <= -std::f64::consts::PI {
            d += 2.0 * std::f64::consts::PI;
        }
        while d > std::f64::consts::PI {
            d -= 2.0 * std::f64::consts::PI;
        }
        total += d;
    }
    (total.abs() / (2.0 * std::f64::consts::PI)).round() as i32
}
