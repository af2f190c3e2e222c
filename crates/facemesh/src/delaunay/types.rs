//! Basic triangulation types and tolerances.
//!
//! - `DelaunayCfg`: centralizes epsilons for the incircle and orientation
//!   predicates and the coincident-vertex cutoff.
//! - `Rect`: axis-aligned bounding region that seeds the subdivision.
//! - `Triangle`: value-type output triangle, normalized counterclockwise.

use nalgebra::{Matrix3, Vector2};

use crate::landmark::PointSet;

/// Triangulation configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct DelaunayCfg {
    /// Incircle determinant above this counts as strictly inside.
    pub eps_incircle: f64,
    /// Orientation cross products within this of zero count as collinear.
    pub eps_orient: f64,
    /// Points closer than this to an existing vertex are not re-inserted.
    pub eps_coincident: f64,
}

impl Default for DelaunayCfg {
    fn default() -> Self {
        Self {
            eps_incircle: 1e-9,
            eps_orient: 1e-12,
            eps_coincident: 1e-9,
        }
    }
}

/// Axis-aligned bounding region `(x, y, w, h)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Full-frame region of an image.
    #[inline]
    pub fn of_image(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    /// Tight extent of a point set. `None` when the set is empty.
    pub fn around_points(points: &PointSet) -> Option<Self> {
        let (min, max) = points.extent()?;
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Membership including the boundary.
    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    #[inline]
    pub fn corners(&self) -> [Vector2<f64>; 4] {
        [
            Vector2::new(self.x, self.y),
            Vector2::new(self.x + self.w, self.y),
            Vector2::new(self.x + self.w, self.y + self.h),
            Vector2::new(self.x, self.y + self.h),
        ]
    }
}

/// Bounding-region choice for triangulation. The tight point extent keeps
/// triangles off the image borders; the full frame extends the mesh to
/// them. The two modes report different border triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionPolicy {
    /// Region = bounding box of the points (default).
    #[default]
    PointExtent,
    /// Region = full image rectangle.
    FullFrame,
}

impl RegionPolicy {
    /// Resolve the policy against a point set and the image dimensions.
    pub fn resolve(self, points: &PointSet, dims: (u32, u32)) -> Option<Rect> {
        match self {
            RegionPolicy::PointExtent => Rect::around_points(points),
            RegionPolicy::FullFrame => Some(Rect::of_image(dims.0, dims.1)),
        }
    }
}

/// One output triangle, self-contained for rendering (no adjacency).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
    pub c: Vector2<f64>,
}

impl Triangle {
    /// Build a triangle, normalizing vertex order to counterclockwise so the
    /// incircle predicate has a fixed sign convention. Zero-area triangles
    /// are kept as given.
    pub fn new(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> Self {
        let t = Self { a, b, c };
        if t.signed_area() < 0.0 {
            Self { a, b: c, c: b }
        } else {
            t
        }
    }

    /// Half the cross product of the edge vectors; positive for CCW order.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        0.5 * (ab.x * ac.y - ab.y * ac.x)
    }

    #[inline]
    pub fn vertices(&self) -> [Vector2<f64>; 3] {
        [self.a, self.b, self.c]
    }

    /// Incircle predicate: is `p` strictly inside this triangle's
    /// circumcircle? Uses the lifted-determinant form; for a CCW triangle the
    /// determinant is positive exactly when `p` is inside. Degenerate
    /// (zero-area) triangles never report containment.
    pub fn circumcircle_contains(&self, p: Vector2<f64>, eps: f64) -> bool {
        let [a, b, c] = self.vertices();
        let (ax, ay) = (a.x - p.x, a.y - p.y);
        let (bx, by) = (b.x - p.x, b.y - p.y);
        let (cx, cy) = (c.x - p.x, c.y - p.y);
        let det = Matrix3::new(
            ax,
            ay,
            ax * ax + ay * ay,
            bx,
            by,
            bx * bx + by * by,
            cx,
            cy,
            cx * cx + cy * cy,
        )
        .determinant();
        det > eps
    }

    /// Loose point-in-triangle test (orientation signs agree up to `eps`).
    pub fn contains_point(&self, p: Vector2<f64>, eps: f64) -> bool {
        let d1 = edge_sign(self.a, self.b, p);
        let d2 = edge_sign(self.b, self.c, p);
        let d3 = edge_sign(self.c, self.a, p);
        let has_neg = d1 < -eps || d2 < -eps || d3 < -eps;
        let has_pos = d1 > eps || d2 > eps || d3 > eps;
        !(has_neg && has_pos)
    }
}

#[inline]
fn edge_sign(a: Vector2<f64>, b: Vector2<f64>, p: Vector2<f64>) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
