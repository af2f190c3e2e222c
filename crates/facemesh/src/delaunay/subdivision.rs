//! Incremental planar subdivision (Bowyer-Watson insertion).
//!
//! The subdivision is seeded with the bounding region's four corners split
//! into two triangles; every insertion carves the cavity of triangles whose
//! circumcircle contains the new point and fans the point to the cavity
//! boundary. The corner vertices stay in the output, which is what makes the
//! region choice observable in the border triangles.
//!
//! Each insertion scans all triangles for the cavity, O(n) per point and
//! O(n^2) total. A locate structure would amortize this to O(log n), but at
//! landmark counts (68 to 468 points) the scan is already microseconds and
//! keeps the structure free of adjacency bookkeeping.

use std::collections::HashMap;

use nalgebra::Vector2;

use super::types::{DelaunayCfg, Rect, Triangle};

pub(crate) struct Subdivision {
    cfg: DelaunayCfg,
    verts: Vec<Vector2<f64>>,
    /// Index triples, stored in counterclockwise order.
    tris: Vec<[usize; 3]>,
}

impl Subdivision {
    pub(crate) fn seeded(region: Rect, cfg: DelaunayCfg) -> Self {
        let mut sub = Self {
            cfg,
            verts: region.corners().to_vec(),
            tris: Vec::new(),
        };
        sub.push_tri(0, 1, 2);
        sub.push_tri(0, 2, 3);
        sub
    }

    #[inline]
    fn geom(&self, t: [usize; 3]) -> Triangle {
        Triangle {
            a: self.verts[t[0]],
            b: self.verts[t[1]],
            c: self.verts[t[2]],
        }
    }

    fn push_tri(&mut self, i: usize, j: usize, k: usize) {
        let t = self.geom([i, j, k]);
        if t.signed_area() < 0.0 {
            self.tris.push([i, k, j]);
        } else {
            self.tris.push([i, j, k]);
        }
    }

    /// Insert one point. Points coinciding with an existing vertex are
    /// skipped; fully degenerate neighborhoods (all predicates zero) drop
    /// the point rather than corrupt the subdivision.
    pub(crate) fn insert(&mut self, p: Vector2<f64>) {
        if self
            .verts
            .iter()
            .any(|v| (v - p).norm() < self.cfg.eps_coincident)
        {
            return;
        }

        let mut cavity: Vec<usize> = (0..self.tris.len())
            .filter(|&i| {
                self.geom(self.tris[i])
                    .circumcircle_contains(p, self.cfg.eps_incircle)
            })
            .collect();
        if cavity.is_empty() {
            match (0..self.tris.len())
                .find(|&i| self.geom(self.tris[i]).contains_point(p, self.cfg.eps_orient))
            {
                Some(i) => cavity.push(i),
                None => return,
            }
        }

        // Cavity boundary: edges owned by exactly one cavity triangle.
        let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
        for &ti in &cavity {
            let [i, j, k] = self.tris[ti];
            for (u, v) in [(i, j), (j, k), (k, i)] {
                *counts.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }

        cavity.sort_unstable_by(|a, b| b.cmp(a));
        for ti in cavity {
            self.tris.swap_remove(ti);
        }

        let pi = self.verts.len();
        self.verts.push(p);
        for ((u, v), n) in counts {
            if n == 1 {
                self.push_tri(u, v, pi);
            }
        }
    }

    /// Materialize the current triangles by value.
    pub(crate) fn triangles(&self) -> Vec<Triangle> {
        self.tris.iter().map(|&t| self.geom(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn seed_is_two_triangles() {
        let sub = Subdivision::seeded(Rect::new(0.0, 0.0, 10.0, 10.0), DelaunayCfg::default());
        assert_eq!(sub.triangles().len(), 2);
    }

    #[test]
    fn inserting_interior_point_splits_locally() {
        let mut sub =
            Subdivision::seeded(Rect::new(0.0, 0.0, 10.0, 10.0), DelaunayCfg::default());
        sub.insert(vector![5.0, 5.0]);
        // One interior point over a quad yields a fan of four triangles.
        assert_eq!(sub.triangles().len(), 4);
    }

    #[test]
    fn coincident_point_is_skipped() {
        let mut sub =
            Subdivision::seeded(Rect::new(0.0, 0.0, 10.0, 10.0), DelaunayCfg::default());
        sub.insert(vector![0.0, 0.0]);
        assert_eq!(sub.triangles().len(), 2);
        sub.insert(vector![5.0, 5.0]);
        sub.insert(vector![5.0, 5.0]);
        assert_eq!(sub.triangles().len(), 4);
    }

    #[test]
    fn triangle_count_matches_euler_formula() {
        // For a triangulated convex region with 4 hull corners and k interior
        // points: t = 2 + 2k.
        let mut sub =
            Subdivision::seeded(Rect::new(0.0, 0.0, 100.0, 100.0), DelaunayCfg::default());
        let pts = [
            vector![20.0, 30.0],
            vector![70.0, 10.0],
            vector![50.0, 60.0],
            vector![80.0, 80.0],
            vector![10.0, 90.0],
        ];
        for p in pts {
            sub.insert(p);
        }
        assert_eq!(sub.triangles().len(), 2 + 2 * pts.len());
    }
}
