//! Planar Delaunay triangulation of a [`PlanarPointSet`].
//!
//! The initial triangulation comes from `delaunator`. A Lawson legalisation
//! pass then makes the result reproducible for cocircular input: among
//! equally valid diagonals the one touching the lowest point index wins.

use crate::error::{Result, TinError};
use crate::geometry::predicates::{incircle, is_ccw_nondegenerate, orient2d};
use crate::point_set::PlanarPointSet;
use crate::topology::{build_neighbors, flip_edge, quad_around, Neighbors, Triangle};

/// Triangulates `points` in plan view. Elevations are carried but ignored.
///
/// Returns [`TinError::InsufficientPoints`] for fewer than three points or a
/// collinear set.
pub fn triangulate(points: &PlanarPointSet) -> Result<Vec<Triangle>> {
    if points.len() < 3 {
        return Err(TinError::InsufficientPoints {
            usable: points.len(),
        });
    }
    let coords: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point { x: p.x, y: p.y })
        .collect();
    let triangulation = delaunator::triangulate(&coords);

    let pts = points.as_slice();
    let mut triangles: Vec<Triangle> = triangulation
        .triangles
        .chunks_exact(3)
        .filter_map(|c| {
            let (a, b, c) = (c[0], c[1], c[2]);
            if is_ccw_nondegenerate(pts[a], pts[b], pts[c]) {
                Some(Triangle::new(a, b, c))
            } else if is_ccw_nondegenerate(pts[a], pts[c], pts[b]) {
                Some(Triangle::new(a, c, b))
            } else {
                None
            }
        })
        .collect();

    if triangles.is_empty() {
        log::warn!("{} points are collinear, nothing to triangulate", points.len());
        return Err(TinError::InsufficientPoints {
            usable: points.len(),
        });
    }

    let mut neighbors = build_neighbors(&triangles);
    let flips = legalize(points, &mut triangles, &mut neighbors);
    log::debug!(
        "triangulated {} points into {} triangles ({} legalising flips)",
        points.len(),
        triangles.len(),
        flips
    );
    Ok(triangles)
}

/// Decides whether the edge between `ta` (local edge `i`) and `tb` should be
/// replaced by the opposite diagonal.
fn should_flip(
    points: &PlanarPointSet,
    triangles: &[Triangle],
    ta: usize,
    i: usize,
    tb: usize,
) -> bool {
    let Some((u, w, p, q)) = quad_around(triangles, ta, i, tb) else {
        return false;
    };
    let (pu, pw, pp, pq) = (points[u], points[w], points[p], points[q]);
    // the new pair (p, u, q) and (q, w, p) must both be proper
    if !is_ccw_nondegenerate(pp, pu, pq) || !is_ccw_nondegenerate(pq, pw, pp) {
        return false;
    }
    match incircle(pu, pw, pp, pq) {
        Some(inside) => inside,
        None => p.min(q) < u.min(w),
    }
}

/// Flips edges until every internal edge is locally Delaunay and every
/// cocircular tie is resolved towards the lowest index. Returns the number of
/// flips performed.
pub(crate) fn legalize(
    points: &PlanarPointSet,
    triangles: &mut [Triangle],
    neighbors: &mut [Neighbors],
) -> usize {
    let max_passes = 64 + triangles.len();
    let mut flips = 0;
    for _ in 0..max_passes {
        let mut changed = false;
        for ta in 0..triangles.len() {
            for i in 0..3 {
                let Some(tb) = neighbors[ta][i] else {
                    continue;
                };
                if should_flip(points, triangles, ta, i, tb)
                    && flip_edge(triangles, neighbors, ta, i, tb)
                {
                    flips += 1;
                    changed = true;
                }
            }
        }
        if !changed {
            return flips;
        }
    }
    log::warn!("edge legalisation stopped after {} passes", max_passes);
    flips
}

/// Returns `true` when no point of `points` lies strictly inside the
/// circumcircle of any triangle.
pub fn is_delaunay(points: &PlanarPointSet, triangles: &[Triangle]) -> bool {
    triangles.iter().all(|t| {
        let [a, b, c] = t.vertices();
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        debug_assert!(orient2d(pa, pb, pc) > 0.0);
        points
            .iter()
            .enumerate()
            .filter(|(idx, _)| !t.contains(*idx))
            .all(|(_, &pd)| incircle(pa, pb, pc, pd) != Some(true))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    fn set(points: &[(f64, f64)]) -> PlanarPointSet {
        PlanarPointSet::from_points(points.iter().map(|&(x, y)| Point3::new(x, y, 0.0)))
    }

    #[test]
    fn too_few_points() {
        let pts = set(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(
            triangulate(&pts),
            Err(TinError::InsufficientPoints { usable: 2 })
        );
    }

    #[test]
    fn collinear_points() {
        let pts = set(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!(matches!(
            triangulate(&pts),
            Err(TinError::InsufficientPoints { .. })
        ));
    }

    #[test]
    fn square_uses_lowest_index_diagonal() {
        let pts = set(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let tris = triangulate(&pts).unwrap();
        assert_eq!(tris.len(), 2);
        assert!(tris.iter().all(|t| t.contains(0) && t.contains(2)));

        // same square, listed so that the lowest index sits on the other diagonal
        let pts = set(&[(10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        let tris = triangulate(&pts).unwrap();
        assert!(tris.iter().all(|t| t.contains(0) && t.contains(2)));
    }

    #[test]
    fn regular_hexagon_is_fanned_from_lowest_index() {
        let pts: Vec<(f64, f64)> = (0..6)
            .map(|k| {
                let a = std::f64::consts::PI / 3.0 * k as f64;
                (a.cos(), a.sin())
            })
            .collect();
        let tris = triangulate(&set(&pts)).unwrap();
        assert_eq!(tris.len(), 4);
        assert!(tris.iter().all(|t| t.contains(0)));
    }

    #[test]
    fn near_cocircular_quad_settles_on_lowest_index() {
        let t: f64 = 0.01;
        let pts = set(&[
            (-10.0 - 1e-7, 0.0),
            (10.0 * t.cos(), -10.0 * t.sin()),
            (10.0, 0.0),
            (10.0 * t.cos(), 10.0 * t.sin()),
        ]);
        let tris = triangulate(&pts).unwrap();
        assert_eq!(tris.len(), 2);
        assert!(tris.iter().all(|t| t.contains(0) && t.contains(2)));
        let mut neighbors = build_neighbors(&tris);
        let mut again = tris.clone();
        assert_eq!(legalize(&pts, &mut again, &mut neighbors), 0);
    }

    #[test]
    fn output_is_ccw_and_delaunay() {
        let pts = set(&[
            (0.0, 0.0),
            (4.0, 0.5),
            (8.0, 0.0),
            (1.5, 3.0),
            (5.0, 4.0),
            (7.5, 3.5),
            (3.0, 7.0),
            (6.0, 8.0),
        ]);
        let tris = triangulate(&pts).unwrap();
        for t in &tris {
            let [a, b, c] = t.vertices();
            assert!(orient2d(pts[a], pts[b], pts[c]) > 0.0);
        }
        assert!(is_delaunay(&pts, &tris));
    }
}
