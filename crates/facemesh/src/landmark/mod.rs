//! Landmark point sets and the detector capability.
//!
//! Purpose
//! - `PointSet`: ordered 2D landmarks, each tagged with its index in the
//!   detector's canonical numbering (0..N, e.g. 68 or 468 points).
//! - `LandmarkSource`: the opaque face/landmark detector as a swappable
//!   trait. Absence of a face is a terminal `DetectError::NoFace` for that
//!   pass; the core never retries or falls back.
//!
//! Why a trait
//! - At least two detector families must be realizable behind the same
//!   contract (a fixed 68-point geometric detector, a variable-count mesh
//!   detector). Callers are written against the capability, never against a
//!   concrete model's internals.

use std::fmt;

use image::RgbImage;
use nalgebra::Vector2;

pub mod synth;

/// A canonical, indexed 2D point on a detected face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    /// Index into the detector's canonical numbering.
    pub index: usize,
    /// Pixel position.
    pub at: Vector2<f64>,
}

/// Ordered landmark collection, created fresh per detection call and
/// immutable once returned.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    marks: Vec<Landmark>,
}

impl PointSet {
    /// Wrap positions in detection order, numbering them 0..n.
    pub fn from_points(points: Vec<Vector2<f64>>) -> Self {
        let marks = points
            .into_iter()
            .enumerate()
            .map(|(index, at)| Landmark { index, at })
            .collect();
        Self { marks }
    }

    /// Wrap pre-indexed landmarks (detector-determined order).
    pub fn from_landmarks(marks: Vec<Landmark>) -> Self {
        Self { marks }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.marks.iter()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&Landmark> {
        self.marks.get(i)
    }

    /// Filter to the requested canonical indices.
    ///
    /// The result follows ascending canonical order regardless of request
    /// order; indices beyond the detector's true count simply select nothing.
    pub fn select(&self, wanted: &[usize]) -> PointSet {
        let mut keep: Vec<usize> = wanted.to_vec();
        keep.sort_unstable();
        keep.dedup();
        let marks = keep
            .iter()
            .filter_map(|&i| self.marks.iter().find(|m| m.index == i).copied())
            .collect();
        PointSet { marks }
    }

    /// Tight axis-aligned extent `(min, max)` of the positions.
    pub fn extent(&self) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let first = self.marks.first()?.at;
        let mut min = first;
        let mut max = first;
        for m in &self.marks[1..] {
            min.x = min.x.min(m.at.x);
            min.y = min.y.min(m.at.y);
            max.x = max.x.max(m.at.x);
            max.y = max.y.max(m.at.y);
        }
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;
    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}

/// Detection failure. Terminal for the pipeline pass that hit it.
#[derive(Debug, PartialEq, Eq)]
pub enum DetectError {
    /// The detector reported zero faces.
    NoFace,
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::NoFace => write!(f, "no face detected in the input image"),
        }
    }
}

impl std::error::Error for DetectError {}

/// Opaque detector capability: image in, canonical landmark set out.
pub trait LandmarkSource {
    /// Locate the landmarks of one face, or report that none is present.
    fn detect(&self, image: &RgbImage) -> Result<PointSet, DetectError>;

    /// Size of the canonical numbering, when the detector has a fixed one.
    /// Variable-count detectors (mesh families) return `None`.
    fn landmark_count(&self) -> Option<usize>;

    /// Detect, then keep only the requested canonical indices (ascending
    /// canonical order, capped at the detector's true output).
    fn detect_subset(
        &self,
        image: &RgbImage,
        wanted: &[usize],
    ) -> Result<PointSet, DetectError> {
        Ok(self.detect(image)?.select(wanted))
    }
}

/// Source that replays a fixed landmark set regardless of input.
///
/// Useful for tests and for re-running downstream stages on recorded
/// detections without the original detector.
#[derive(Clone, Debug)]
pub struct StaticSource {
    points: PointSet,
}

impl StaticSource {
    pub fn new(points: PointSet) -> Self {
        Self { points }
    }
}

impl LandmarkSource for StaticSource {
    fn detect(&self, _image: &RgbImage) -> Result<PointSet, DetectError> {
        if self.points.is_empty() {
            return Err(DetectError::NoFace);
        }
        Ok(self.points.clone())
    }

    fn landmark_count(&self) -> Option<usize> {
        Some(self.points.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn canonical68() -> PointSet {
        PointSet::from_points(
            (0..68)
                .map(|i| Vector2::new(10.0 + i as f64, 20.0 + (i % 7) as f64))
                .collect(),
        )
    }

    #[test]
    fn select_returns_canonical_order() {
        let set = canonical68();
        // Request order is scrambled; output must follow canonical numbering.
        let subset = set.select(&[10, 0, 5]);
        let indices: Vec<usize> = subset.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 5, 10]);
        assert_eq!(subset.len(), 3);
    }

    #[test]
    fn select_caps_at_detector_count() {
        let set = canonical68();
        let subset = set.select(&[2, 400, 67, 68]);
        let indices: Vec<usize> = subset.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![2, 67]);
    }

    #[test]
    fn select_ignores_duplicate_requests() {
        let set = canonical68();
        let subset = set.select(&[5, 5, 5]);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset.get(0).unwrap().index, 5);
    }

    #[test]
    fn extent_covers_all_points() {
        let set = PointSet::from_points(vec![
            Vector2::new(3.0, 9.0),
            Vector2::new(-1.0, 4.0),
            Vector2::new(7.0, 5.0),
        ]);
        let (min, max) = set.extent().unwrap();
        assert_eq!(min, Vector2::new(-1.0, 4.0));
        assert_eq!(max, Vector2::new(7.0, 9.0));
        assert!(PointSet::default().extent().is_none());
    }

    #[test]
    fn static_source_replays_and_reports_absence() {
        let img = image::RgbImage::new(4, 4);
        let set = canonical68();
        let src = StaticSource::new(set.clone());
        assert_eq!(src.landmark_count(), Some(68));
        assert_eq!(src.detect(&img).unwrap().len(), 68);

        let empty = StaticSource::new(PointSet::default());
        assert_eq!(empty.detect(&img).unwrap_err(), DetectError::NoFace);
    }

    #[test]
    fn detect_subset_goes_through_select() {
        let img = image::RgbImage::new(4, 4);
        let src = StaticSource::new(canonical68());
        let subset = src.detect_subset(&img, &[10, 5, 0]).unwrap();
        let indices: Vec<usize> = subset.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 5, 10]);
    }
}
