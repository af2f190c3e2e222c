//! Curated internal API (UNSTABLE).
//!
//! Convenience surface for callers that want the whole pipeline in one
//! import. Prefer these re-exports for consistency across drivers; there is
//! no stability promise beyond the workspace.

// Landmark sets and detector capability
pub use crate::landmark::{
    synth::{draw_face, FaceToken, MarkerSource, SynthCfg},
    DetectError, Landmark, LandmarkSource, PointSet, StaticSource,
};
// Triangulation
pub use crate::delaunay::{
    triangulate, triangulate_with, DelaunayCfg, Rect, RegionPolicy, Triangle, TriangulateError,
};
// Rendering
pub use crate::render::{blank_canvas, render_points, render_region, render_triangles};
// Pseudo-3D projection
pub use crate::project::{rotate, FOCAL_LENGTH};
