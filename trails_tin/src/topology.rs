//! Triangle and neighbour bookkeeping shared by the triangulator and
//! [`TinMesh`](crate::mesh::TinMesh).
//!
//! Each triangle stores its three vertex indices counter-clockwise. Local
//! edge `i` runs from `vertices[i]` to `vertices[(i + 1) % 3]`, and
//! `neighbors[t][i]` is the triangle across that edge, if any.

use std::collections::HashMap;

/// Neighbour slots of one triangle, indexed by local edge.
pub type Neighbors = [Option<usize>; 3];

/// Ordered vertex triple, counter-clockwise in plan view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Triangle(pub [usize; 3]);

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self([a, b, c])
    }

    pub fn vertices(&self) -> [usize; 3] {
        self.0
    }

    /// Directed local edge `i`.
    pub fn edge(&self, i: usize) -> (usize, usize) {
        (self.0[i % 3], self.0[(i + 1) % 3])
    }

    /// The three directed edges e01, e12, e20.
    pub fn edges(&self) -> [(usize, usize); 3] {
        [self.edge(0), self.edge(1), self.edge(2)]
    }

    /// Vertex opposite local edge `i`.
    pub fn opposite(&self, i: usize) -> usize {
        self.0[(i + 2) % 3]
    }

    /// Local index of the directed edge `a -> b`.
    pub fn local_edge(&self, a: usize, b: usize) -> Option<usize> {
        (0..3).find(|&i| self.edge(i) == (a, b))
    }

    pub fn contains(&self, v: usize) -> bool {
        self.0.contains(&v)
    }

    /// Vertex indices sorted ascending, useful for comparing triangles
    /// regardless of rotation.
    pub fn sorted(&self) -> [usize; 3] {
        let mut v = self.0;
        v.sort_unstable();
        v
    }
}

/// Builds the neighbour table for `triangles`.
///
/// Edges shared by more than two triangles, or twice in the same direction,
/// are left unlinked for the extra triangles.
pub fn build_neighbors(triangles: &[Triangle]) -> Vec<Neighbors> {
    let mut directed: HashMap<(usize, usize), (usize, usize)> =
        HashMap::with_capacity(triangles.len() * 3);
    for (t, tri) in triangles.iter().enumerate() {
        for i in 0..3 {
            directed.entry(tri.edge(i)).or_insert((t, i));
        }
    }
    let mut neighbors = vec![[None; 3]; triangles.len()];
    for (t, tri) in triangles.iter().enumerate() {
        for i in 0..3 {
            let (a, b) = tri.edge(i);
            if directed.get(&(a, b)) != Some(&(t, i)) {
                continue;
            }
            if let Some(&(other, _)) = directed.get(&(b, a)) {
                neighbors[t][i] = Some(other);
            }
        }
    }
    neighbors
}

/// Local edge of `t` whose neighbour is `other`.
pub fn shared_edge(neighbors: &[Neighbors], t: usize, other: usize) -> Option<usize> {
    (0..3).find(|&i| neighbors[t][i] == Some(other))
}

/// Vertices of the quadrilateral around the edge shared by `ta` (local edge
/// `i`) and its neighbour `tb`: `(u, w, p, q)` where `u -> w` is the shared
/// edge of `ta`, `p` is opposite in `ta` and `q` is opposite in `tb`.
pub fn quad_around(
    triangles: &[Triangle],
    ta: usize,
    i: usize,
    tb: usize,
) -> Option<(usize, usize, usize, usize)> {
    let (u, w) = triangles[ta].edge(i);
    let p = triangles[ta].opposite(i);
    let j = triangles[tb].local_edge(w, u)?;
    let q = triangles[tb].opposite(j);
    Some((u, w, p, q))
}

fn relink(
    triangles: &[Triangle],
    neighbors: &mut [Neighbors],
    target: Option<usize>,
    edge: (usize, usize),
    to: usize,
) {
    if let Some(n) = target {
        // the neighbour sees the edge reversed
        if let Some(k) = triangles[n].local_edge(edge.1, edge.0) {
            neighbors[n][k] = Some(to);
        }
    }
}

/// Replaces the edge shared by `ta` (local edge `i`) and `tb` with the other
/// diagonal of their quadrilateral, updating neighbours in place.
///
/// Slot `ta` receives `(p, u, q)` and slot `tb` receives `(q, w, p)`. The
/// caller is responsible for checking convexity beforehand.
pub fn flip_edge(
    triangles: &mut [Triangle],
    neighbors: &mut [Neighbors],
    ta: usize,
    i: usize,
    tb: usize,
) -> bool {
    let Some((u, w, p, q)) = quad_around(triangles, ta, i, tb) else {
        return false;
    };
    let Some(j) = triangles[tb].local_edge(w, u) else {
        return false;
    };

    let a_wp = neighbors[ta][(i + 1) % 3];
    let a_pu = neighbors[ta][(i + 2) % 3];
    let b_uq = neighbors[tb][(j + 1) % 3];
    let b_qw = neighbors[tb][(j + 2) % 3];

    triangles[ta] = Triangle::new(p, u, q);
    triangles[tb] = Triangle::new(q, w, p);
    neighbors[ta] = [a_pu, b_uq, Some(tb)];
    neighbors[tb] = [b_qw, a_wp, Some(ta)];

    relink(triangles, neighbors, b_uq, (u, q), ta);
    relink(triangles, neighbors, a_wp, (w, p), tb);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Triangle> {
        // 3---2
        // | / |
        // 0---1
        vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]
    }

    #[test]
    fn neighbors_of_square() {
        let tris = square();
        let nbrs = build_neighbors(&tris);
        assert_eq!(nbrs[0], [None, None, Some(1)]);
        assert_eq!(nbrs[1], [Some(0), None, None]);
        assert_eq!(shared_edge(&nbrs, 0, 1), Some(2));
    }

    #[test]
    fn flip_square_diagonal() {
        let mut tris = square();
        let mut nbrs = build_neighbors(&tris);
        assert!(flip_edge(&mut tris, &mut nbrs, 0, 2, 1));
        assert_eq!(tris[0].sorted(), [0, 1, 3]);
        assert_eq!(tris[1].sorted(), [1, 2, 3]);
        assert_eq!(nbrs, build_neighbors(&tris));
    }

    #[test]
    fn flip_keeps_outer_links() {
        // strip of four triangles around the flipped pair
        let mut tris = vec![
            Triangle::new(0, 1, 2),
            Triangle::new(0, 2, 3),
            Triangle::new(1, 4, 2),
            Triangle::new(3, 2, 5),
        ];
        let mut nbrs = build_neighbors(&tris);
        assert!(flip_edge(&mut tris, &mut nbrs, 0, 2, 1));
        assert_eq!(nbrs, build_neighbors(&tris));
    }

    #[test]
    fn triangle_edges() {
        let t = Triangle::new(4, 7, 9);
        assert_eq!(t.edges(), [(4, 7), (7, 9), (9, 4)]);
        assert_eq!(t.opposite(0), 9);
        assert_eq!(t.local_edge(9, 4), Some(2));
        assert_eq!(t.local_edge(4, 9), None);
    }
}
