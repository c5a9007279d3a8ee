//! Contour line extraction over a [`TinMesh`].
//!
//! For every contour level each triangle whose corners straddle the level
//! contributes one segment. Segments are chained through shared edges using
//! the neighbour table, so a contour only ends where the mesh ends.

use crate::geometry::{Point3, Polyline3};
use crate::georigin::GeoOrigin;
use crate::mesh::TinMesh;

/// Major contours are drawn at every major interval, minor ones in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContourKind {
    Major,
    Minor,
}

/// Polyline of constant elevation. Higher ground lies to the left when
/// walking along `points`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContourPolyline {
    pub elevation: f64,
    pub kind: ContourKind,
    pub points: Vec<Point3>,
    /// Closed loops do not repeat their first point.
    pub closed: bool,
}

impl ContourPolyline {
    /// Total plan length, including the closing segment of a loop.
    pub fn length(&self) -> f64 {
        let mut vertices = self.points.clone();
        if self.closed {
            if let Some(&first) = self.points.first() {
                vertices.push(first);
            }
        }
        Polyline3::new(vertices).plan_length()
    }

    /// Copy of this contour in absolute coordinates.
    pub fn to_global(&self, origin: &GeoOrigin) -> Self {
        Self {
            points: self.points.iter().map(|&p| origin.to_global(p)).collect(),
            ..self.clone()
        }
    }
}

/// Contours of one extraction, split by kind.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContourSet {
    pub major: Vec<ContourPolyline>,
    pub minor: Vec<ContourPolyline>,
}

impl ContourSet {
    pub fn is_empty(&self) -> bool {
        self.major.is_empty() && self.minor.is_empty()
    }

    pub fn len(&self) -> usize {
        self.major.len() + self.minor.len()
    }
}

/// Smallest multiple of `minor` that is at least `major`, and never less
/// than `minor` itself. Returns the number of minor steps per major step,
/// capped at `i64::MAX` so that huge ratios mean "no major level but zero".
pub fn coerce_major_steps(major: f64, minor: f64) -> u64 {
    if !major.is_finite() || major <= minor {
        return 1;
    }
    let ratio = major / minor;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= 1e-9 * ratio {
        nearest as u64
    } else {
        ratio.ceil() as u64
    };
    steps.min(i64::MAX as u64)
}

/// Crossing segment of one triangle at one level: entry and exit local
/// edges, oriented so that higher ground is on the left.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    entry: usize,
    exit: usize,
}

fn crossing(zs: [f64; 3], level: f64) -> Option<Crossing> {
    let above = zs.map(|z| z >= level);
    let mut entry = None;
    let mut exit = None;
    for i in 0..3 {
        let j = (i + 1) % 3;
        match (above[i], above[j]) {
            // counter-clockwise edge going downhill: contour enters here
            (true, false) => entry = Some(i),
            (false, true) => exit = Some(i),
            _ => {}
        }
    }
    Some(Crossing {
        entry: entry?,
        exit: exit?,
    })
}

impl TinMesh {
    fn edge_point(&self, t: usize, edge: usize, level: f64) -> Point3 {
        let (a, b) = self.triangles()[t].edge(edge);
        let pa = self.points()[a];
        let pb = self.points()[b];
        let dz = pb.z - pa.z;
        let s = if dz.abs() < f64::EPSILON {
            0.5
        } else {
            ((level - pa.z) / dz).clamp(0.0, 1.0)
        };
        let p = pa.lerp(pb, s);
        Point3::new(p.x, p.y, level)
    }

    /// Traces every contour at a single `level`.
    fn contours_at(&self, level: f64, kind: ContourKind) -> Vec<ContourPolyline> {
        let n = self.triangle_count();
        let crossings: Vec<Option<Crossing>> = (0..n)
            .map(|t| {
                let [a, b, c] = self.triangle_points(t)?;
                crossing([a.z, b.z, c.z], level)
            })
            .collect();
        let mut collected = vec![false; n];
        let mut lines = Vec::new();

        for start in 0..n {
            let Some(first) = crossings[start] else {
                continue;
            };
            if collected[start] {
                continue;
            }
            collected[start] = true;

            // forward through exit edges
            let mut forward = vec![
                self.edge_point(start, first.entry, level),
                self.edge_point(start, first.exit, level),
            ];
            let mut closed = false;
            let mut current = start;
            let mut exit = first.exit;
            while let Some(next) = self.neighbor(current, exit) {
                if next == start {
                    closed = true;
                    break;
                }
                let Some(cross) = crossings[next] else {
                    break;
                };
                if collected[next] {
                    break;
                }
                collected[next] = true;
                forward.push(self.edge_point(next, cross.exit, level));
                current = next;
                exit = cross.exit;
            }

            // backward through entry edges when the line is open
            let mut backward = Vec::new();
            if !closed {
                let mut current = start;
                let mut entry = first.entry;
                while let Some(prev) = self.neighbor(current, entry) {
                    let Some(cross) = crossings[prev] else {
                        break;
                    };
                    if collected[prev] {
                        break;
                    }
                    collected[prev] = true;
                    backward.push(self.edge_point(prev, cross.entry, level));
                    current = prev;
                    entry = cross.entry;
                }
            }

            let mut points: Vec<Point3> = backward.into_iter().rev().collect();
            points.extend(forward);
            if closed {
                // the closing edge point repeats the first one
                points.pop();
            }
            points.dedup();
            if closed && points.len() > 1 && points.first() == points.last() {
                points.pop();
            }
            if points.len() < 2 {
                continue;
            }
            lines.push(ContourPolyline {
                elevation: level,
                kind,
                points,
                closed,
            });
        }
        lines
    }

    /// Extracts major and minor contours.
    ///
    /// Minor contours lie at every multiple of `minor_interval`, major
    /// contours at every multiple of `major_interval`, which is first raised
    /// to the nearest multiple of the minor interval. A non-positive minor
    /// interval yields no contours.
    pub fn extract_contours(&self, major_interval: f64, minor_interval: f64) -> ContourSet {
        let mut set = ContourSet::default();
        if !(minor_interval.is_finite() && minor_interval > 0.0) {
            log::warn!("minor contour interval must be positive, got {}", minor_interval);
            return set;
        }
        let Some((zmin, zmax)) = self.elevation_range() else {
            return set;
        };
        let steps = coerce_major_steps(major_interval, minor_interval);
        if (steps as f64 * minor_interval - major_interval).abs() > 1e-9 * major_interval.abs() {
            log::debug!(
                "major interval {} coerced to {}",
                major_interval,
                steps as f64 * minor_interval
            );
        }

        let first = (zmin / minor_interval).ceil() as i64;
        let last = (zmax / minor_interval).floor() as i64;
        for k in first..=last {
            let level = k as f64 * minor_interval;
            let kind = if k.rem_euclid(i64::try_from(steps).unwrap_or(i64::MAX)) == 0 {
                ContourKind::Major
            } else {
                ContourKind::Minor
            };
            let lines = self.contours_at(level, kind);
            match kind {
                ContourKind::Major => set.major.extend(lines),
                ContourKind::Minor => set.minor.extend(lines),
            }
        }
        log::debug!(
            "extracted {} major and {} minor contours",
            set.major.len(),
            set.minor.len()
        );
        set
    }
}
