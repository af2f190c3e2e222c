//! Run the whole pipeline on synthetic faces and print stage counts.
//!
//! Usage:
//!   cargo run -p facemesh --example synth_pipeline -- extent
//!   cargo run -p facemesh --example synth_pipeline -- frame

use facemesh::api::{
    blank_canvas, draw_face, render_points, render_triangles, rotate, triangulate, FaceToken,
    LandmarkSource, MarkerSource, RegionPolicy, SynthCfg,
};
use image::Rgb;

fn main() {
    let policy = match std::env::args().nth(1).as_deref() {
        Some("frame") => RegionPolicy::FullFrame,
        _ => RegionPolicy::PointExtent,
    };
    let cfg = SynthCfg::default();
    let source = MarkerSource::default();

    for i in 0..3u64 {
        let (photo, truth) = draw_face(&cfg, FaceToken { seed: 7, index: i });
        let found = source.detect(&photo).expect("markers");
        let region = policy.resolve(&found, photo.dimensions()).expect("region");
        let tris = triangulate(&found, region).expect("mesh");

        let mut canvas = blank_canvas(cfg.width, cfg.height);
        render_points(&mut canvas, &found, 2, Rgb([0, 255, 0]));
        render_triangles(&mut canvas, &tris, Rgb([255, 255, 255]), 1);

        let turned = rotate(&photo, 10.0, 12.0, 0.0);
        let redetected = source.detect(&turned).map(|s| s.len());
        println!(
            "face {i}: truth={}, detected={}, triangles={}, redetected after turn={:?}",
            truth.len(),
            found.len(),
            tris.len(),
            redetected
        );
    }
}
