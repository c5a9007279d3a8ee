//! Editable triangulated irregular network.

use crate::delaunay::triangulate;
use crate::error::{Result, TinError};
use crate::geometry::predicates::{barycentric, is_ccw_nondegenerate, plan_angle_deg};
use crate::geometry::Point3;
use crate::georigin::GeoOrigin;
use crate::point_set::PlanarPointSet;
use crate::quality::QualityFilter;
use crate::topology::{build_neighbors, flip_edge, quad_around, shared_edge, Neighbors, Triangle};

/// Barycentric tolerance used when deciding whether a point lies inside,
/// on an edge of, or on a corner of a triangle.
const LOCATE_TOLERANCE: f64 = 1e-9;

/// Slack in degrees allowed on the interior angles summed around a vertex.
const ANGLE_SUM_TOLERANCE: f64 = 1e-6;

/// Lifecycle of a [`TinMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshState {
    /// No points and no triangles.
    Empty,
    /// Freshly triangulated and filtered.
    Built,
    /// Topology or geometry changed by an edit since the last build.
    Edited,
}

/// Plain vertex/triangle arrays of a mesh, suitable for export.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TinSnapshot {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
}

/// Triangulated Irregular Network with explicit neighbour topology.
///
/// Points live in the local frame of a [`GeoOrigin`]. Triangle handles are
/// positions in [`TinMesh::triangles`]; an edit only rewrites the slots of
/// the triangles it replaces and appends new ones, except
/// [`TinMesh::remove_triangles`] which compacts the list in order.
#[derive(Debug, Clone)]
pub struct TinMesh {
    points: PlanarPointSet,
    triangles: Vec<Triangle>,
    neighbors: Vec<Neighbors>,
    state: MeshState,
}

impl Default for TinMesh {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds a TIN from local points: deduplicate, triangulate, then drop the
/// triangles rejected by `filter`.
pub fn build_tin(points: &[Point3], filter: &QualityFilter) -> Result<TinMesh> {
    filter.validate()?;
    let set = PlanarPointSet::from_points(points.iter().copied());
    let triangles = triangulate(&set)?;
    let triangles = filter.filter(set.as_slice(), triangles);
    let mesh = TinMesh::from_parts(set, triangles, MeshState::Built);
    log::info!(
        "built TIN with {} points and {} triangles",
        mesh.point_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

impl TinMesh {
    pub fn empty() -> Self {
        Self {
            points: PlanarPointSet::new(),
            triangles: Vec::new(),
            neighbors: Vec::new(),
            state: MeshState::Empty,
        }
    }

    fn from_parts(points: PlanarPointSet, triangles: Vec<Triangle>, state: MeshState) -> Self {
        let neighbors = build_neighbors(&triangles);
        Self {
            points,
            triangles,
            neighbors,
            state,
        }
    }

    /// Builds a mesh from existing vertex and face arrays, e.g. a surface read
    /// from file. Vertices sharing a plan position are merged, faces are
    /// re-wound counter-clockwise and degenerate faces are dropped. Faces that
    /// repeat or overlap each other are rejected with
    /// [`TinError::InvalidMesh`].
    pub fn from_triangles(vertices: Vec<Point3>, faces: &[[usize; 3]]) -> Result<Self> {
        let mut set = PlanarPointSet::new();
        let mut remap = Vec::with_capacity(vertices.len());
        for v in &vertices {
            let (idx, _) = set.insert(*v);
            if idx == usize::MAX {
                return Err(TinError::InvalidMesh("non-finite vertex".to_string()));
            }
            remap.push(idx);
        }
        let mut triangles = Vec::with_capacity(faces.len());
        let mut dropped = 0usize;
        for face in faces {
            let mut ids = [0usize; 3];
            for (k, &f) in face.iter().enumerate() {
                ids[k] = *remap.get(f).ok_or_else(|| {
                    TinError::InvalidMesh(format!(
                        "face references vertex {} but only {} exist",
                        f,
                        vertices.len()
                    ))
                })?;
            }
            let [a, b, c] = ids;
            if is_ccw_nondegenerate(set[a], set[b], set[c]) {
                triangles.push(Triangle::new(a, b, c));
            } else if is_ccw_nondegenerate(set[a], set[c], set[b]) {
                triangles.push(Triangle::new(a, c, b));
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!("dropped {} degenerate faces", dropped);
        }
        let state = if set.is_empty() {
            MeshState::Empty
        } else {
            MeshState::Built
        };
        let mesh = Self::from_parts(set, triangles, state);
        mesh.validate()?;
        Ok(mesh)
    }

    /// Re-triangulates every current point. On failure the mesh is left
    /// unchanged.
    pub fn rebuild(&mut self, filter: &QualityFilter) -> Result<()> {
        filter.validate()?;
        let triangles = triangulate(&self.points)?;
        let triangles = filter.filter(self.points.as_slice(), triangles);
        self.neighbors = build_neighbors(&triangles);
        self.triangles = triangles;
        self.state = MeshState::Built;
        log::info!("rebuilt TIN with {} triangles", self.triangles.len());
        Ok(())
    }

    pub fn state(&self) -> MeshState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn points(&self) -> &[Point3] {
        self.points.as_slice()
    }

    pub fn point_set(&self) -> &PlanarPointSet {
        &self.points
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        self.triangles.get(index).copied()
    }

    /// Corner coordinates of triangle `index`.
    pub fn triangle_points(&self, index: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = self.triangles.get(index)?.vertices();
        Some([self.points[a], self.points[b], self.points[c]])
    }

    /// Neighbour slots of triangle `index`, by local edge.
    pub fn neighbors(&self, index: usize) -> Option<Neighbors> {
        self.neighbors.get(index).copied()
    }

    /// Triangle across local edge `edge` of triangle `index`.
    pub fn neighbor(&self, index: usize, edge: usize) -> Option<usize> {
        self.neighbors.get(index).and_then(|n| n[edge % 3])
    }

    /// Returns `true` when local edge `edge` of triangle `index` has no
    /// neighbour.
    pub fn is_boundary_edge(&self, index: usize, edge: usize) -> bool {
        index < self.triangles.len() && self.neighbors[index][edge % 3].is_none()
    }

    /// Vertex and triangle arrays for export.
    pub fn snapshot(&self) -> TinSnapshot {
        TinSnapshot {
            vertices: self.points.as_slice().to_vec(),
            triangles: self.triangles.iter().map(Triangle::vertices).collect(),
        }
    }

    /// Vertices expressed in absolute coordinates.
    pub fn global_points(&self, origin: &GeoOrigin) -> Vec<Point3> {
        self.points.iter().map(|p| origin.to_global(*p)).collect()
    }

    /// Minimum and maximum elevation over the vertices used by triangles.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for t in &self.triangles {
            for v in t.vertices() {
                let z = self.points[v].z;
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(z), hi.max(z)),
                    None => (z, z),
                });
            }
        }
        range
    }

    /// Index of a triangle containing plan position `(x, y)`.
    pub fn locate(&self, x: f64, y: f64) -> Option<usize> {
        self.triangles.iter().position(|t| {
            let [a, b, c] = t.vertices();
            match barycentric(x, y, self.points[a], self.points[b], self.points[c]) {
                Some((u, v, w)) => {
                    u >= -LOCATE_TOLERANCE && v >= -LOCATE_TOLERANCE && w >= -LOCATE_TOLERANCE
                }
                None => false,
            }
        })
    }

    /// Interpolated surface elevation at plan position `(x, y)`.
    pub fn elevation_at(&self, x: f64, y: f64) -> Option<f64> {
        let t = self.locate(x, y)?;
        let [a, b, c] = self.triangle_points(t)?;
        let (u, v, w) = barycentric(x, y, a, b, c)?;
        Some(u * a.z + v * b.z + w * c.z)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.triangles.len() {
            return Err(TinError::InvalidTriangleIndex {
                index,
                count: self.triangles.len(),
            });
        }
        Ok(())
    }

    /// Inserts `point` as a new vertex inside triangle `index` and returns
    /// the new vertex index.
    ///
    /// An interior point splits the triangle in three. A point lying on an
    /// edge splits that edge instead, together with the neighbouring triangle
    /// if there is one, so no zero-area triangle is ever created.
    pub fn insert_point(&mut self, index: usize, point: Point3) -> Result<usize> {
        self.check_index(index)?;
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return Err(TinError::InvalidParameter(
                "point coordinates must be finite".to_string(),
            ));
        }
        if let Some(existing) = self.points.index_of(point.x, point.y) {
            return Err(TinError::DuplicatePoint { index: existing });
        }

        let tri = self.triangles[index];
        let [a, b, c] = tri.vertices();
        let (pa, pb, pc) = (self.points[a], self.points[b], self.points[c]);
        let (u, v, w) = barycentric(point.x, point.y, pa, pb, pc)
            .ok_or(TinError::PointOutsideTriangle { triangle: index })?;
        let weights = [u, v, w];
        if weights.iter().any(|&l| l < -LOCATE_TOLERANCE) {
            log::warn!("rejected point ({}, {}) outside triangle {}", point.x, point.y, index);
            return Err(TinError::PointOutsideTriangle { triangle: index });
        }
        let on_zero: Vec<usize> = (0..3)
            .filter(|&k| weights[k].abs() <= LOCATE_TOLERANCE)
            .collect();
        if on_zero.len() >= 2 {
            // only one weight is non-zero: the point sits on that corner
            let corner = (0..3).find(|k| !on_zero.contains(k)).unwrap_or(0);
            return Err(TinError::DuplicatePoint {
                index: tri.vertices()[corner],
            });
        }

        let new_index = self.points.len();
        // (slot, triangle) replacements and appended triangles
        let mut replaced: Vec<(usize, Triangle)> = Vec::new();
        let mut appended: Vec<Triangle> = Vec::new();

        if let Some(&k) = on_zero.first() {
            // weight k belongs to vertex k, the point lies on the opposite edge
            let edge = (k + 1) % 3;
            let (eu, ew) = tri.edge(edge);
            let opposite = tri.opposite(edge);
            replaced.push((index, Triangle::new(eu, new_index, opposite)));
            appended.push(Triangle::new(new_index, ew, opposite));
            if let Some(n) = self.neighbors[index][edge] {
                let ntri = self.triangles[n];
                let j = ntri
                    .local_edge(ew, eu)
                    .ok_or_else(|| TinError::InvalidMesh("inconsistent neighbours".to_string()))?;
                let nopp = ntri.opposite(j);
                replaced.push((n, Triangle::new(ew, new_index, nopp)));
                appended.push(Triangle::new(new_index, eu, nopp));
            }
        } else {
            replaced.push((index, Triangle::new(a, b, new_index)));
            appended.push(Triangle::new(b, c, new_index));
            appended.push(Triangle::new(c, a, new_index));
        }

        let corner = |v: usize| if v == new_index { point } else { self.points[v] };
        let proper = replaced
            .iter()
            .map(|(_, t)| t)
            .chain(appended.iter())
            .all(|t| {
                let [x, y, z] = t.vertices();
                is_ccw_nondegenerate(corner(x), corner(y), corner(z))
            });
        if !proper {
            log::warn!("inserting point into triangle {} would create a degenerate triangle", index);
            return Err(TinError::PointOutsideTriangle { triangle: index });
        }

        self.points.insert(point);
        for (slot, t) in replaced {
            self.triangles[slot] = t;
        }
        self.triangles.extend(appended);
        self.neighbors = build_neighbors(&self.triangles);
        self.state = MeshState::Edited;
        log::info!("inserted vertex {} into triangle {}", new_index, index);
        Ok(new_index)
    }

    /// Deletes the given triangles, leaving a hole. The remaining triangles
    /// keep their relative order. Nothing is removed if any index is invalid.
    pub fn remove_triangles(&mut self, indices: &[usize]) -> Result<()> {
        for &i in indices {
            self.check_index(i)?;
        }
        if indices.is_empty() {
            return Ok(());
        }
        let mut doomed = vec![false; self.triangles.len()];
        for &i in indices {
            doomed[i] = true;
        }
        let before = self.triangles.len();
        let mut slot = 0;
        self.triangles.retain(|_| {
            let keep = !doomed[slot];
            slot += 1;
            keep
        });
        self.neighbors = build_neighbors(&self.triangles);
        self.state = MeshState::Edited;
        log::info!("removed {} triangles", before - self.triangles.len());
        Ok(())
    }

    /// Replaces the edge shared by triangles `a` and `b` with the other
    /// diagonal of their quadrilateral. The new triangles reuse slots `a` and
    /// `b`.
    pub fn swap_edge(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        let edge = if a == b {
            None
        } else {
            shared_edge(&self.neighbors, a, b)
        };
        let Some(i) = edge else {
            return Err(TinError::EdgeNotShared { a, b });
        };
        let (u, w, p, q) = quad_around(&self.triangles, a, i, b)
            .ok_or(TinError::EdgeNotShared { a, b })?;
        let (pu, pw, pp, pq) = (self.points[u], self.points[w], self.points[p], self.points[q]);
        if !is_ccw_nondegenerate(pp, pu, pq) || !is_ccw_nondegenerate(pq, pw, pp) {
            log::warn!("edge between triangles {} and {} is not swappable", a, b);
            return Err(TinError::NonConvexQuad { a, b });
        }
        flip_edge(&mut self.triangles, &mut self.neighbors, a, i, b);
        self.state = MeshState::Edited;
        log::info!("swapped edge {}-{} to {}-{}", u, w, p, q);
        Ok(())
    }

    /// Per-vertex flags: `(used by a triangle, on a boundary edge)`.
    fn vertex_flags(&self) -> (Vec<bool>, Vec<bool>) {
        let n = self.points.len();
        let mut used = vec![false; n];
        let mut boundary = vec![false; n];
        for (t, tri) in self.triangles.iter().enumerate() {
            for i in 0..3 {
                let (a, b) = tri.edge(i);
                used[a] = true;
                if self.neighbors[t][i].is_none() {
                    boundary[a] = true;
                    boundary[b] = true;
                }
            }
        }
        (used, boundary)
    }

    /// One Laplacian smoothing pass. Every interior vertex moves to the
    /// centroid of its edge-connected neighbours as they stood before the
    /// pass. Boundary vertices stay put, and a move that would flatten or
    /// flip an incident triangle is skipped. Returns the number of vertices
    /// moved; the triangle set never changes.
    pub fn smooth(&mut self) -> usize {
        let n = self.points.len();
        let (used, boundary) = self.vertex_flags();
        let mut adjacent: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (t, tri) in self.triangles.iter().enumerate() {
            for (a, b) in tri.edges() {
                if !adjacent[a].contains(&b) {
                    adjacent[a].push(b);
                }
                if !adjacent[b].contains(&a) {
                    adjacent[b].push(a);
                }
                incident[a].push(t);
            }
        }

        let before: Vec<Point3> = self.points.as_slice().to_vec();
        let mut moved = 0;
        let mut skipped = 0;
        for v in 0..n {
            if !used[v] || boundary[v] || adjacent[v].is_empty() {
                continue;
            }
            let count = adjacent[v].len() as f64;
            let sum = adjacent[v]
                .iter()
                .fold(Point3::new(0.0, 0.0, 0.0), |acc, &j| acc + before[j]);
            let target = Point3::new(sum.x / count, sum.y / count, sum.z / count);

            let keeps_area = incident[v].iter().all(|&t| {
                let corners = self.triangles[t]
                    .vertices()
                    .map(|k| if k == v { target } else { self.points[k] });
                is_ccw_nondegenerate(corners[0], corners[1], corners[2])
            });
            if keeps_area && self.points.relocate(v, target) {
                moved += 1;
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::debug!("smoothing skipped {} vertices", skipped);
        }
        if moved > 0 {
            self.state = MeshState::Edited;
        }
        log::info!("smoothing moved {} vertices", moved);
        moved
    }

    /// Checks the structural invariants: valid distinct vertex indices,
    /// counter-clockwise non-degenerate triangles, each directed edge used
    /// once (so no edge is shared by more than two triangles) and a
    /// neighbour table matching the triangles.
    ///
    /// Plan overlap is caught where it folds around a shared vertex: the
    /// interior angles meeting at a vertex may not exceed a full turn.
    pub fn validate(&self) -> Result<()> {
        let n = self.points.len();
        let mut angle_sum = vec![0.0; n];
        let mut directed = std::collections::HashSet::new();
        for (t, tri) in self.triangles.iter().enumerate() {
            let [a, b, c] = tri.vertices();
            if a >= n || b >= n || c >= n {
                return Err(TinError::InvalidMesh(format!(
                    "triangle {} references a missing vertex",
                    t
                )));
            }
            if a == b || b == c || c == a {
                return Err(TinError::InvalidMesh(format!(
                    "triangle {} repeats a vertex",
                    t
                )));
            }
            if !is_ccw_nondegenerate(self.points[a], self.points[b], self.points[c]) {
                return Err(TinError::InvalidMesh(format!(
                    "triangle {} is degenerate or clockwise",
                    t
                )));
            }
            for e in tri.edges() {
                if !directed.insert(e) {
                    return Err(TinError::InvalidMesh(format!(
                        "edge {:?} is used twice in the same direction",
                        e
                    )));
                }
            }
            let p = [self.points[a], self.points[b], self.points[c]];
            for (k, v) in tri.vertices().into_iter().enumerate() {
                angle_sum[v] += plan_angle_deg(p[(k + 2) % 3], p[k], p[(k + 1) % 3]);
            }
        }
        if let Some(v) = angle_sum
            .iter()
            .position(|&sum| sum > 360.0 + ANGLE_SUM_TOLERANCE)
        {
            return Err(TinError::InvalidMesh(format!(
                "triangles overlap around vertex {}",
                v
            )));
        }
        if self.neighbors != build_neighbors(&self.triangles) {
            return Err(TinError::InvalidMesh(
                "neighbour table is out of date".to_string(),
            ));
        }
        Ok(())
    }
}
