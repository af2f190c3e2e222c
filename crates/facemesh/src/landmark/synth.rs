//! Synthetic face patterns and a marker-blob detector (replayable).
//!
//! Purpose
//! - Provide a deterministic source of face-like marker images so the full
//!   pipeline (detect, triangulate, render, rotate, re-detect) can run
//!   without an external detector model. The layout follows the 68-point
//!   convention: jaw arc, brows, eyes, nose, mouth.
//!
//! Model
//! - A canonical layout in the unit square is scaled into the canvas, each
//!   marker jittered by a bounded amount. Determinism uses a replay token
//!   `(seed, index)` mixed into a single RNG.
//! - `MarkerSource` recovers markers from any image by luminance threshold
//!   plus 4-connected components, so a drawn face survives a warp and can
//!   be re-detected afterwards.

use std::collections::VecDeque;

use image::{Rgb, RgbImage};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DetectError, LandmarkSource, PointSet};
use crate::render;

/// Synthetic face configuration.
#[derive(Clone, Copy, Debug)]
pub struct SynthCfg {
    pub width: u32,
    pub height: u32,
    /// Disc radius of each marker, in pixels.
    pub marker_radius: u32,
    /// Per-coordinate jitter amplitude, in pixels.
    pub jitter: f64,
    pub marker_color: Rgb<u8>,
}

impl Default for SynthCfg {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            marker_radius: 2,
            jitter: 1.5,
            marker_color: Rgb([0, 255, 0]),
        }
    }
}

/// Replay token to make synthetic faces reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceToken {
    pub seed: u64,
    pub index: u64,
}

impl FaceToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Render a synthetic face onto a blank canvas and return the ground-truth
/// landmark layout (canonical order, 68 points).
pub fn draw_face(cfg: &SynthCfg, tok: FaceToken) -> (RgbImage, PointSet) {
    let mut rng = tok.to_std_rng();
    let w = cfg.width as f64;
    let h = cfg.height as f64;
    let margin = 0.12 * w.min(h);
    let r = cfg.marker_radius as f64;

    let points: Vec<Vector2<f64>> = canonical_layout()
        .into_iter()
        .map(|u| {
            let jx = (rng.gen::<f64>() * 2.0 - 1.0) * cfg.jitter;
            let jy = (rng.gen::<f64>() * 2.0 - 1.0) * cfg.jitter;
            let x = margin + u.x * (w - 2.0 * margin) + jx;
            let y = margin + u.y * (h - 2.0 * margin) + jy;
            // Keep the whole disc on-canvas.
            Vector2::new(
                x.clamp(r + 1.0, w - r - 2.0),
                y.clamp(r + 1.0, h - r - 2.0),
            )
        })
        .collect();

    let set = PointSet::from_points(points);
    let mut canvas = render::blank_canvas(cfg.width, cfg.height);
    render::render_points(&mut canvas, &set, cfg.marker_radius, cfg.marker_color);
    (canvas, set)
}

/// 68-point layout in the unit square: 17 jaw, 2x5 brows, 2x6 eyes,
/// 9 nose, 12+8 mouth. Canonical order follows the usual numbering
/// (jaw first, mouth last).
fn canonical_layout() -> Vec<Vector2<f64>> {
    let mut pts = Vec::with_capacity(68);
    let deg = std::f64::consts::PI / 180.0;

    // Jaw: ellipse arc from left ear through the chin to the right ear.
    for i in 0..17 {
        let th = (180.0 - 11.25 * i as f64) * deg;
        pts.push(Vector2::new(0.5 + 0.42 * th.cos(), 0.45 + 0.5 * th.sin()));
    }
    // Brows: two shallow arcs.
    for i in 0..5 {
        let t = i as f64 / 4.0;
        let lift = 0.02 * (1.0 - (2.0 * t - 1.0).powi(2));
        pts.push(Vector2::new(0.18 + 0.2 * t, 0.25 - lift));
    }
    for i in 0..5 {
        let t = i as f64 / 4.0;
        let lift = 0.02 * (1.0 - (2.0 * t - 1.0).powi(2));
        pts.push(Vector2::new(0.62 + 0.2 * t, 0.25 - lift));
    }
    // Eyes: hexagons around two centers.
    for &cx in &[0.32, 0.68] {
        for k in 0..6 {
            let th = (60.0 * k as f64) * deg;
            pts.push(Vector2::new(cx + 0.06 * th.cos(), 0.38 + 0.03 * th.sin()));
        }
    }
    // Nose: bridge plus nostril line.
    for i in 0..4 {
        pts.push(Vector2::new(0.5, 0.36 + 0.05 * i as f64));
    }
    for i in 0..5 {
        pts.push(Vector2::new(0.44 + 0.03 * i as f64, 0.57));
    }
    // Mouth: outer ring of 12, inner ring of 8.
    for k in 0..12 {
        let th = (30.0 * k as f64) * deg;
        pts.push(Vector2::new(0.5 + 0.13 * th.cos(), 0.72 + 0.05 * th.sin()));
    }
    for k in 0..8 {
        let th = (45.0 * k as f64) * deg;
        pts.push(Vector2::new(0.5 + 0.08 * th.cos(), 0.72 + 0.022 * th.sin()));
    }
    pts
}

/// Detector that recovers bright marker blobs from an image.
///
/// This is the variable-count realization of `LandmarkSource`: the canonical
/// numbering is the scan order of the blobs it finds (top to bottom, then
/// left to right), and the count depends on the image.
#[derive(Clone, Copy, Debug)]
pub struct MarkerSource {
    /// A pixel is part of a marker when its brightest channel reaches this.
    pub threshold: u8,
    /// Fewer surviving blobs than this reports `NoFace`.
    pub min_markers: usize,
}

impl Default for MarkerSource {
    fn default() -> Self {
        Self {
            threshold: 128,
            min_markers: 3,
        }
    }
}

impl MarkerSource {
    fn is_marker(&self, px: &Rgb<u8>) -> bool {
        px.0.iter().copied().max().unwrap_or(0) >= self.threshold
    }
}

impl LandmarkSource for MarkerSource {
    fn detect(&self, image: &RgbImage) -> Result<PointSet, DetectError> {
        let (w, h) = image.dimensions();
        let mut visited = vec![false; (w as usize) * (h as usize)];
        let idx = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;

        let mut centroids: Vec<Vector2<f64>> = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if visited[idx(x, y)] || !self.is_marker(image.get_pixel(x, y)) {
                    continue;
                }
                // Flood one 4-connected component and accumulate its centroid.
                let mut queue = VecDeque::new();
                visited[idx(x, y)] = true;
                queue.push_back((x, y));
                let mut sum = Vector2::zeros();
                let mut area = 0usize;
                while let Some((px, py)) = queue.pop_front() {
                    sum += Vector2::new(px as f64, py as f64);
                    area += 1;
                    let mut visit = |nx: u32, ny: u32| {
                        if !visited[idx(nx, ny)] && self.is_marker(image.get_pixel(nx, ny)) {
                            visited[idx(nx, ny)] = true;
                            queue.push_back((nx, ny));
                        }
                    };
                    if px > 0 {
                        visit(px - 1, py);
                    }
                    if px + 1 < w {
                        visit(px + 1, py);
                    }
                    if py > 0 {
                        visit(px, py - 1);
                    }
                    if py + 1 < h {
                        visit(px, py + 1);
                    }
                }
                centroids.push(sum / area as f64);
            }
        }

        if centroids.len() < self.min_markers {
            return Err(DetectError::NoFace);
        }
        centroids.sort_by(|a, b| {
            (a.y, a.x)
                .partial_cmp(&(b.y, b.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(PointSet::from_points(centroids))
    }

    fn landmark_count(&self) -> Option<usize> {
        None
    }
}
