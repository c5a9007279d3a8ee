//! Plan-view geometric predicates used by the triangulation code.

use super::Point3;

/// Twice the signed plan area of triangle `abc`. Positive when the triangle
/// winds counter-clockwise.
pub fn orient2d(a: Point3, b: Point3, c: Point3) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` when `abc` is counter-clockwise with a plan area that is
/// not negligible relative to its edge lengths.
pub fn is_ccw_nondegenerate(a: Point3, b: Point3, c: Point3) -> bool {
    let det = orient2d(a, b, c);
    let scale = plan_length_sq(a, b)
        .max(plan_length_sq(b, c))
        .max(plan_length_sq(c, a));
    det > scale * 1e-12
}

/// In-circle test for `d` against the circumcircle of the counter-clockwise
/// triangle `abc`.
///
/// Returns `Some(true)` when `d` is strictly inside, `Some(false)` when it is
/// strictly outside and `None` when the four points are cocircular within
/// floating point tolerance. The tolerance depends only on the spread of the
/// four points, so both diagonals of a quad see the same band.
pub fn incircle(a: Point3, b: Point3, c: Point3, d: Point3) -> Option<bool> {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let bc = bdx * cdy - cdx * bdy;
    let ca = cdx * ady - adx * cdy;
    let ab = adx * bdy - bdx * ady;

    let det = alift * bc + blift * ca + clift * ab;
    let quad = [a, b, c, d];
    let mut spread: f64 = 0.0;
    for i in 0..4 {
        for j in i + 1..4 {
            spread = spread.max(plan_length_sq(quad[i], quad[j]));
        }
    }
    let tolerance = spread * spread * 1e-12;

    if det > tolerance {
        Some(true)
    } else if det < -tolerance {
        Some(false)
    } else {
        None
    }
}

/// Squared plan distance between two points.
pub fn plan_length_sq(a: Point3, b: Point3) -> f64 {
    (b.x - a.x).powi(2) + (b.y - a.y).powi(2)
}

/// Plan distance between two points, ignoring elevation.
pub fn plan_distance(a: Point3, b: Point3) -> f64 {
    plan_length_sq(a, b).sqrt()
}

/// Interior plan angle at `vertex` in degrees between the rays towards `a`
/// and `b`.
pub fn plan_angle_deg(a: Point3, vertex: Point3, b: Point3) -> f64 {
    let ux = a.x - vertex.x;
    let uy = a.y - vertex.y;
    let vx = b.x - vertex.x;
    let vy = b.y - vertex.y;
    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    cross.abs().atan2(dot).to_degrees()
}

/// Barycentric coordinates of plan position `(x, y)` with respect to
/// triangle `abc`. Returns `None` for a degenerate triangle.
pub fn barycentric(x: f64, y: f64, a: Point3, b: Point3, c: Point3) -> Option<(f64, f64, f64)> {
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < f64::EPSILON {
        return None;
    }
    let u = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / det;
    let v = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / det;
    let w = 1.0 - u - v;
    Some((u, v, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_sign() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!(orient2d(a, b, c) > 0.0);
        assert!(orient2d(a, c, b) < 0.0);
        assert!(is_ccw_nondegenerate(a, b, c));
        assert!(!is_ccw_nondegenerate(a, b, Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn incircle_cases() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        assert_eq!(incircle(a, b, c, Point3::new(0.5, 0.5, 0.0)), Some(true));
        assert_eq!(incircle(a, b, c, Point3::new(5.0, 5.0, 0.0)), Some(false));
        assert_eq!(incircle(a, b, c, Point3::new(0.0, 1.0, 0.0)), None);
    }

    #[test]
    fn near_cocircular_quad_ties_on_both_diagonals() {
        // three points bunched on a circle of radius 10, the fourth opposite
        // and pushed out by a hair
        let t: f64 = 0.01;
        let a = Point3::new(10.0 * t.cos(), -10.0 * t.sin(), 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);
        let c = Point3::new(10.0 * t.cos(), 10.0 * t.sin(), 0.0);
        let d = Point3::new(-10.0 - 1e-7, 0.0, 0.0);
        assert_eq!(incircle(a, b, c, d), None);
        assert_eq!(incircle(b, c, d, a), None);

        let far = Point3::new(-11.0, 0.0, 0.0);
        assert_eq!(incircle(a, b, c, far), Some(false));
        assert_eq!(incircle(b, c, far, a), Some(true));
    }

    #[test]
    fn right_angle() {
        let angle = plan_angle_deg(
            Point3::new(1.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, -3.0),
        );
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn barycentric_centroid() {
        let (u, v, w) = barycentric(
            1.0 / 3.0,
            1.0 / 3.0,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((u - 1.0 / 3.0).abs() < 1e-9);
        assert!((v - 1.0 / 3.0).abs() < 1e-9);
        assert!((w - 1.0 / 3.0).abs() < 1e-9);
    }
}
