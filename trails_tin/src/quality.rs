//! Triangle quality filtering by maximum edge length and interior angle.

use crate::error::{Result, TinError};
use crate::geometry::predicates::{plan_angle_deg, plan_distance};
use crate::geometry::Point3;
use crate::topology::Triangle;

/// Thresholds a triangle must satisfy to stay in the mesh. Both are
/// evaluated in plan view; elevation does not affect them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityFilter {
    /// Longest admissible edge.
    pub max_edge_length: f64,
    /// Largest admissible interior angle in degrees.
    pub max_angle: f64,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl QualityFilter {
    /// Creates a filter after validating both thresholds.
    pub fn new(max_edge_length: f64, max_angle: f64) -> Result<Self> {
        let filter = Self {
            max_edge_length,
            max_angle,
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Filter that admits every triangle.
    pub fn unbounded() -> Self {
        Self {
            max_edge_length: f64::MAX,
            max_angle: 180.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_edge_length.is_nan() || self.max_edge_length <= 0.0 {
            return Err(TinError::InvalidParameter(format!(
                "maximum edge length must be positive, got {}",
                self.max_edge_length
            )));
        }
        if !(self.max_angle > 0.0 && self.max_angle <= 180.0) {
            return Err(TinError::InvalidParameter(format!(
                "maximum angle must lie in (0, 180] degrees, got {}",
                self.max_angle
            )));
        }
        Ok(())
    }

    /// Returns `true` when triangle `abc` satisfies both thresholds.
    pub fn admits(&self, a: Point3, b: Point3, c: Point3) -> bool {
        let edges_ok = [(a, b), (b, c), (c, a)]
            .iter()
            .all(|&(p, q)| plan_distance(p, q) <= self.max_edge_length);
        edges_ok
            && [(c, a, b), (a, b, c), (b, c, a)]
                .iter()
                .all(|&(p, vertex, q)| plan_angle_deg(p, vertex, q) <= self.max_angle)
    }

    /// Keeps the triangles of `triangles` that satisfy the thresholds.
    pub fn filter(&self, points: &[Point3], triangles: Vec<Triangle>) -> Vec<Triangle> {
        let before = triangles.len();
        let kept: Vec<Triangle> = triangles
            .into_iter()
            .filter(|t| {
                let [a, b, c] = t.vertices();
                self.admits(points[a], points[b], points[c])
            })
            .collect();
        if kept.len() < before {
            log::debug!(
                "quality filter removed {} of {} triangles",
                before - kept.len(),
                before
            );
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 100.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.5, 0.0),
        ]
    }

    #[test]
    fn unbounded_admits_everything() {
        let p = pts();
        let f = QualityFilter::default();
        assert!(f.admits(p[0], p[1], p[2]));
        assert!(f.admits(p[0], p[1], p[3]));
    }

    #[test]
    fn edge_length_uses_plan_distance() {
        let p = pts();
        // plan edge 0-1 is 10 long although the 3D length is ~100
        assert!(QualityFilter::new(10.1, 180.0).unwrap().admits(p[0], p[1], p[2]));
        assert!(!QualityFilter::new(9.9, 180.0).unwrap().admits(p[0], p[1], p[2]));
    }

    #[test]
    fn obtuse_triangle_rejected_by_angle() {
        let p = pts();
        let f = QualityFilter::new(f64::MAX, 120.0).unwrap();
        assert!(!f.admits(p[0], p[1], p[3]));
        assert!(f.admits(p[0], p[1], p[2]));
    }

    #[test]
    fn filter_is_order_independent() {
        let p = pts();
        let f = QualityFilter::new(6.0, 180.0).unwrap();
        let tris = vec![Triangle::new(0, 3, 2), Triangle::new(0, 1, 2)];
        let mut rev = tris.clone();
        rev.reverse();
        let a = f.filter(&p, tris);
        let mut b = f.filter(&p, rev);
        b.reverse();
        assert_eq!(a, b);
        assert_eq!(a, vec![Triangle::new(0, 3, 2)]);
    }

    #[test]
    fn invalid_thresholds() {
        assert!(QualityFilter::new(0.0, 90.0).is_err());
        assert!(QualityFilter::new(1.0, 181.0).is_err());
        assert!(QualityFilter::new(f64::NAN, 90.0).is_err());
    }
}
