//! Boundary loop extraction over a [`TinMesh`].

use std::collections::HashMap;

use crate::geometry::{signed_polygon_area, Point, Point3};
use crate::georigin::GeoOrigin;
use crate::mesh::TinMesh;

/// Closed loop of boundary edges. The first vertex is not repeated at the
/// end. Outer loops run counter-clockwise and holes clockwise, so the mesh
/// always lies to the left.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundaryPolyline {
    pub vertices: Vec<usize>,
    pub points: Vec<Point3>,
}

impl BoundaryPolyline {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Signed plan area, positive for counter-clockwise loops.
    pub fn signed_area(&self) -> f64 {
        let plan: Vec<Point> = self.points.iter().map(|&p| Point::from(p)).collect();
        signed_polygon_area(&plan)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// A clockwise loop encloses a gap in the mesh.
    pub fn is_hole(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Copy of this loop in absolute coordinates.
    pub fn to_global(&self, origin: &GeoOrigin) -> Self {
        Self {
            vertices: self.vertices.clone(),
            points: self.points.iter().map(|&p| origin.to_global(p)).collect(),
        }
    }
}

impl TinMesh {
    /// Boundary edge leaving the end vertex of boundary edge `i` of
    /// triangle `t`, found by turning through the triangle fan around that
    /// vertex. Stays within the fan even where several loops pinch together.
    fn next_boundary_edge(&self, t: usize, i: usize) -> Option<(usize, usize)> {
        let (mut t, mut k) = (t, (i + 1) % 3);
        for _ in 0..self.triangle_count() {
            let Some(n) = self.neighbor(t, k) else {
                return Some((t, k));
            };
            let (v, x) = self.triangles()[t].edge(k);
            let j = self.triangles()[n].local_edge(x, v)?;
            t = n;
            k = (j + 1) % 3;
        }
        None
    }

    /// Chains every edge owned by a single triangle into closed loops.
    ///
    /// Loops are returned in the order their first boundary edge is found
    /// when scanning triangles and local edges by index. Loops touching at a
    /// single vertex stay separate: the walk continues along the boundary
    /// edge of the same triangle fan. An empty mesh has no boundary.
    pub fn extract_boundary(&self) -> Vec<BoundaryPolyline> {
        let mut edges: Vec<(usize, usize)> = Vec::new();
        let mut slots: HashMap<(usize, usize), usize> = HashMap::new();
        for t in 0..self.triangle_count() {
            for i in 0..3 {
                if self.is_boundary_edge(t, i) {
                    slots.insert((t, i), edges.len());
                    edges.push((t, i));
                }
            }
        }

        let mut used = vec![false; edges.len()];
        let mut loops = Vec::new();
        for first in 0..edges.len() {
            if used[first] {
                continue;
            }
            let mut vertices = Vec::new();
            let mut e = first;
            loop {
                used[e] = true;
                let (t, i) = edges[e];
                vertices.push(self.triangles()[t].edge(i).0);
                let next = self
                    .next_boundary_edge(t, i)
                    .and_then(|slot| slots.get(&slot).copied());
                match next {
                    Some(n) if n == first => break,
                    Some(n) if !used[n] => e = n,
                    _ => {
                        log::warn!("boundary walk from vertex {} did not close", vertices[0]);
                        break;
                    }
                }
            }
            let points = vertices.iter().map(|&v| self.points()[v]).collect();
            loops.push(BoundaryPolyline { vertices, points });
        }
        log::debug!("extracted {} boundary loops", loops.len());
        loops
    }
}
