//! Delaunay triangulation of a landmark set within a bounding region.
//!
//! Purpose
//! - Turn a `PointSet` into a flat list of triangles for drawing, using
//!   incremental insertion into a corner-seeded subdivision (the classical
//!   Bowyer-Watson cavity algorithm, empty-circumcircle criterion).
//!
//! Behavior
//! - The region must contain every point; a point outside it is a
//!   validation failure, never a crash.
//! - Exact coordinate duplicates are removed before insertion.
//! - Collinear runs may produce zero-area triangles in the output; that is
//!   accepted, and insertion stays bounded regardless.
//! - Output order carries no meaning beyond rendering.

use std::fmt;

use crate::landmark::{Landmark, PointSet};

mod subdivision;
mod types;

pub use types::{DelaunayCfg, Rect, RegionPolicy, Triangle};

use subdivision::Subdivision;

/// Triangulation failure. Terminal and reportable; never silently corrected.
#[derive(Debug, PartialEq, Eq)]
pub enum TriangulateError {
    /// Fewer than three distinct points were supplied.
    InsufficientPoints { got: usize },
    /// A point (canonical index given) lies outside the declared region.
    OutsideRegion { index: usize },
}

impl fmt::Display for TriangulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangulateError::InsufficientPoints { got } => {
                write!(f, "triangulation needs at least 3 distinct points, got {got}")
            }
            TriangulateError::OutsideRegion { index } => {
                write!(f, "landmark {index} lies outside the bounding region")
            }
        }
    }
}

impl std::error::Error for TriangulateError {}

/// Triangulate with default tolerances.
pub fn triangulate(points: &PointSet, region: Rect) -> Result<Vec<Triangle>, TriangulateError> {
    triangulate_with(points, region, DelaunayCfg::default())
}

/// Triangulate a point set within `region`.
///
/// The region's corners seed the subdivision and appear as vertices of the
/// output, so border triangles differ between the two `RegionPolicy` modes.
pub fn triangulate_with(
    points: &PointSet,
    region: Rect,
    cfg: DelaunayCfg,
) -> Result<Vec<Triangle>, TriangulateError> {
    let mut uniq: Vec<Landmark> = Vec::with_capacity(points.len());
    for m in points {
        if !uniq.iter().any(|u| u.at == m.at) {
            uniq.push(*m);
        }
    }
    if uniq.len() < 3 {
        return Err(TriangulateError::InsufficientPoints { got: uniq.len() });
    }
    for m in &uniq {
        if !region.contains(m.at) {
            return Err(TriangulateError::OutsideRegion { index: m.index });
        }
    }

    let mut sub = Subdivision::seeded(region, cfg);
    for m in &uniq {
        sub.insert(m.at);
    }
    Ok(sub.triangles())
}
