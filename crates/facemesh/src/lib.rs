//! Facial-landmark mesh geometry.
//!
//! Scope
//! - Landmark point sets with canonical detector indexing (`landmark`).
//! - Incremental Delaunay triangulation over a bounding region (`delaunay`).
//! - Raster rendering of points, triangles, and regions (`render`).
//! - Pseudo-3D rotation of an image plane via a perspective warp (`project`).
//!
//! The face/landmark detector itself is an external capability behind
//! `landmark::LandmarkSource`; this crate never depends on a concrete model.
//! All operations are synchronous and CPU-bound over caller-owned buffers.

pub mod api;
pub mod delaunay;
pub mod landmark;
pub mod project;
pub mod render;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Convenience re-export so geometry code reads uniformly across modules.
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::delaunay::{
        triangulate, DelaunayCfg, Rect, RegionPolicy, Triangle, TriangulateError,
    };
    pub use crate::landmark::{DetectError, Landmark, LandmarkSource, PointSet, StaticSource};
    pub use crate::project::rotate;
    pub use crate::render::{blank_canvas, render_points, render_region, render_triangles};
    pub use nalgebra::Vector2 as Vec2;
}
