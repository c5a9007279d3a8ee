//! Deduplicated point storage feeding the triangulator.

use std::collections::HashMap;

use crate::geometry::Point3;
use crate::georigin::GeoOrigin;

/// Named group of survey points, aggregated into a terrain before
/// triangulation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointCluster {
    pub name: String,
    /// Absolute coordinates of the cluster points.
    pub points: Vec<Point3>,
}

impl PointCluster {
    pub fn new(name: impl Into<String>, points: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

fn plan_key(x: f64, y: f64) -> (u64, u64) {
    // -0.0 and 0.0 describe the same position
    let norm = |v: f64| if v == 0.0 { 0.0f64 } else { v };
    (norm(x).to_bits(), norm(y).to_bits())
}

/// Ordered set of points with unique plan positions.
///
/// Indices are assigned in insertion order and never change. Inserting a
/// point whose (x, y) already exists returns the existing index and keeps
/// the first elevation.
#[derive(Debug, Clone, Default)]
pub struct PlanarPointSet {
    points: Vec<Point3>,
    lookup: HashMap<(u64, u64), usize>,
}

impl PlanarPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from points already expressed in the local frame.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Self {
        let mut set = Self::new();
        let mut duplicates = 0usize;
        for p in points {
            if !set.insert(p).1 {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            log::debug!("dropped {} duplicate points", duplicates);
        }
        set
    }

    /// Builds a set from absolute coordinates, converting them into the local
    /// frame of `origin`.
    pub fn from_global(points: &[Point3], origin: &GeoOrigin) -> Self {
        Self::from_points(points.iter().map(|p| origin.to_local(*p)))
    }

    /// Concatenates clusters in order and converts them to the local frame.
    pub fn from_clusters(clusters: &[PointCluster], origin: &GeoOrigin) -> Self {
        Self::from_points(
            clusters
                .iter()
                .flat_map(|c| c.points.iter())
                .map(|p| origin.to_local(*p)),
        )
    }

    /// Inserts a point, returning its index and whether it was newly added.
    /// Points with non-finite coordinates are never stored; they map to
    /// `usize::MAX` and report `false`.
    pub fn insert(&mut self, p: Point3) -> (usize, bool) {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            log::warn!("ignoring non-finite point ({}, {}, {})", p.x, p.y, p.z);
            return (usize::MAX, false);
        }
        let key = plan_key(p.x, p.y);
        if let Some(&idx) = self.lookup.get(&key) {
            return (idx, false);
        }
        let idx = self.points.len();
        self.points.push(p);
        self.lookup.insert(key, idx);
        (idx, true)
    }

    /// Returns the index of the point at the exact plan position `(x, y)`.
    pub fn index_of(&self, x: f64, y: f64) -> Option<usize> {
        self.lookup.get(&plan_key(x, y)).copied()
    }

    /// Moves an existing point. Fails (returning `false`) when the target
    /// plan position is taken by another point.
    pub(crate) fn relocate(&mut self, index: usize, p: Point3) -> bool {
        let old = self.points[index];
        let new_key = plan_key(p.x, p.y);
        match self.lookup.get(&new_key) {
            Some(&other) if other != index => return false,
            _ => {}
        }
        self.lookup.remove(&plan_key(old.x, old.y));
        self.lookup.insert(new_key, index);
        self.points[index] = p;
        true
    }

    pub fn get(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }
}

impl std::ops::Index<usize> for PlanarPointSet {
    type Output = Point3;

    fn index(&self, index: usize) -> &Point3 {
        &self.points[index]
    }
}
