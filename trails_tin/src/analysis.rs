//! Per-triangle terrain analysis used for colouring a surface by elevation,
//! slope or facing direction.

use crate::error::{Result, TinError};
use crate::geometry::Point3;
use crate::mesh::TinMesh;

/// Quantity a surface is banded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnalysisKind {
    /// Mean triangle elevation over the surface elevation range.
    Elevation,
    /// Inclination from horizontal, 0 to 90 degrees.
    Slope,
    /// Downhill azimuth, counter-clockwise from +x, 0 to 360 degrees.
    Direction,
}

/// Upward unit normal of a counter-clockwise triangle.
fn unit_normal(a: Point3, b: Point3, c: Point3) -> Option<Point3> {
    let u = b - a;
    let v = c - a;
    let n = Point3::new(
        u.y * v.z - u.z * v.y,
        u.z * v.x - u.x * v.z,
        u.x * v.y - u.y * v.x,
    );
    let len = (n.x * n.x + n.y * n.y + n.z * n.z).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some(Point3::new(n.x / len, n.y / len, n.z / len))
}

fn slope_deg(n: Point3) -> f64 {
    n.z.clamp(-1.0, 1.0).acos().to_degrees()
}

fn band(value: f64, width: f64, ranges: usize) -> usize {
    if width.is_nan() || width <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / width).floor().max(0.0) as usize).min(ranges - 1)
}

impl TinMesh {
    /// Slope of every triangle in degrees from horizontal.
    pub fn triangle_slopes(&self) -> Vec<f64> {
        (0..self.triangle_count())
            .map(|t| {
                self.triangle_points(t)
                    .and_then(|[a, b, c]| unit_normal(a, b, c))
                    .map(slope_deg)
                    .unwrap_or(0.0)
            })
            .collect()
    }

    /// Downhill azimuth of every triangle in degrees, `None` for flat ones.
    pub fn triangle_directions(&self) -> Vec<Option<f64>> {
        (0..self.triangle_count())
            .map(|t| {
                let [a, b, c] = self.triangle_points(t)?;
                let n = unit_normal(a, b, c)?;
                if n.x.hypot(n.y) < 1e-12 {
                    return None;
                }
                Some(n.y.atan2(n.x).to_degrees().rem_euclid(360.0))
            })
            .collect()
    }
}

/// Assigns every triangle of `mesh` to one of `ranges` equal classes of the
/// chosen quantity. Direction classes are centred on multiples of
/// `360 / ranges`, so class 0 covers the azimuths around +x; flat triangles
/// fall into class 0.
pub fn analyze(mesh: &TinMesh, kind: AnalysisKind, ranges: usize) -> Result<Vec<usize>> {
    if ranges == 0 {
        return Err(TinError::InvalidParameter(
            "analysis needs at least one range".to_string(),
        ));
    }
    let classes = match kind {
        AnalysisKind::Elevation => {
            let Some((zmin, zmax)) = mesh.elevation_range() else {
                return Ok(Vec::new());
            };
            let width = (zmax - zmin) / ranges as f64;
            (0..mesh.triangle_count())
                .map(|t| match mesh.triangle_points(t) {
                    Some([a, b, c]) => band((a.z + b.z + c.z) / 3.0 - zmin, width, ranges),
                    None => 0,
                })
                .collect()
        }
        AnalysisKind::Slope => {
            let width = 90.0 / ranges as f64;
            mesh.triangle_slopes()
                .into_iter()
                .map(|s| band(s, width, ranges))
                .collect()
        }
        AnalysisKind::Direction => {
            let width = 360.0 / ranges as f64;
            mesh.triangle_directions()
                .into_iter()
                .map(|d| match d {
                    Some(az) => band((az + width / 2.0).rem_euclid(360.0), width, ranges),
                    None => 0,
                })
                .collect()
        }
    };
    log::debug!("{:?} analysis over {} ranges", kind, ranges);
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_tin;
    use crate::quality::QualityFilter;

    /// Plane rising towards +y at 45 degrees, with a flat square next to it.
    fn ramp() -> TinMesh {
        TinMesh::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 10.0),
                Point3::new(0.0, 10.0, 10.0),
                Point3::new(20.0, 0.0, 0.0),
                Point3::new(20.0, -10.0, 0.0),
                Point3::new(10.0, -10.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3], [1, 6, 5], [1, 5, 4]],
        )
        .unwrap()
    }

    #[test]
    fn zero_ranges_rejected() {
        assert!(matches!(
            analyze(&ramp(), AnalysisKind::Slope, 0),
            Err(TinError::InvalidParameter(_))
        ));
    }

    #[test]
    fn slopes_in_degrees() {
        let slopes = ramp().triangle_slopes();
        assert!((slopes[0] - 45.0).abs() < 1e-9);
        assert!((slopes[1] - 45.0).abs() < 1e-9);
        assert!(slopes[2].abs() < 1e-9);
        assert_eq!(analyze(&ramp(), AnalysisKind::Slope, 3).unwrap(), vec![1, 1, 0, 0]);
    }

    #[test]
    fn direction_points_downhill() {
        let mesh = ramp();
        let dirs = mesh.triangle_directions();
        // the ramp falls towards -y
        assert!((dirs[0].unwrap() - 270.0).abs() < 1e-9);
        assert_eq!(dirs[2], None);
        assert_eq!(
            analyze(&mesh, AnalysisKind::Direction, 4).unwrap(),
            vec![3, 3, 0, 0]
        );
    }

    #[test]
    fn elevation_bands() {
        let mesh = build_tin(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 30.0),
                Point3::new(0.0, 10.0, 30.0),
            ],
            &QualityFilter::default(),
        )
        .unwrap();
        let classes = analyze(&mesh, AnalysisKind::Elevation, 3).unwrap();
        // means are 10 and 20 over the range 0..30
        let mut sorted = classes.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2]);
    }
}
