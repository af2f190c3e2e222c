use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use image::{Rgb, RgbImage};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

use facemesh::api::{
    blank_canvas, draw_face, render_points, render_region, render_triangles, triangulate,
    FaceToken, LandmarkSource, MarkerSource, Rect, RegionPolicy, SynthCfg,
};

mod sidecar;

#[derive(Parser)]
#[command(name = "facemesh")]
#[command(about = "Landmark mesh pipeline runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write a synthetic face image (marker landmarks on a dark canvas)
    Synth {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
    },
    /// Detect landmarks and draw them as filled discs
    Points {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Draw over the photo or over a blank canvas of the same shape
        #[arg(long, value_enum, default_value = "photo")]
        canvas: Canvas,
        /// Canonical landmark indices to keep, e.g. --subset 0,5,10
        #[arg(long, value_delimiter = ',')]
        subset: Option<Vec<usize>>,
        #[arg(long, default_value_t = 2)]
        radius: u32,
    },
    /// Detect landmarks and draw their Delaunay mesh
    Mesh {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "photo")]
        canvas: Canvas,
        /// Bounding region: the landmark extent or the full image frame
        #[arg(long, value_enum, default_value = "extent")]
        region: Region,
    },
    /// Rotate the image plane in pseudo-3D (degrees per axis)
    Rotate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        #[arg(long, default_value_t = 0.0)]
        z: f64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Canvas {
    Photo,
    Blank,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Region {
    Extent,
    Frame,
}

impl From<Region> for RegionPolicy {
    fn from(r: Region) -> Self {
        match r {
            Region::Extent => RegionPolicy::PointExtent,
            Region::Frame => RegionPolicy::FullFrame,
        }
    }
}

#[derive(Serialize)]
struct MeshSummary {
    landmarks: usize,
    triangles: usize,
    region: [f64; 4],
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Synth { out, seed, index } => synth(&out, seed, index),
        Action::Points {
            input,
            out,
            canvas,
            subset,
            radius,
        } => points(&input, &out, canvas, subset.as_deref(), radius),
        Action::Mesh {
            input,
            out,
            canvas,
            region,
        } => mesh(&input, &out, canvas, region),
        Action::Rotate { input, out, x, y, z } => rotate(&input, &out, x, y, z),
    }
}

fn load(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)
        .with_context(|| format!("loading {}", path.display()))?
        .to_rgb8())
}

fn save(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn synth(out: &Path, seed: u64, index: u64) -> Result<()> {
    let cfg = SynthCfg::default();
    let (img, truth) = draw_face(&cfg, FaceToken { seed, index });
    tracing::info!(seed, index, markers = truth.len(), "synth");
    save(&img, out)?;
    sidecar::write_sidecar(out, json!({"seed": seed, "index": index, "markers": truth.len()}))?;
    Ok(())
}

fn points(
    input: &Path,
    out: &Path,
    canvas: Canvas,
    subset: Option<&[usize]>,
    radius: u32,
) -> Result<()> {
    let img = load(input)?;
    let source = MarkerSource::default();
    let set = match subset {
        Some(wanted) => source.detect_subset(&img, wanted),
        None => source.detect(&img),
    }
    .context("detecting landmarks")?;
    tracing::info!(landmarks = set.len(), canvas = ?canvas, "points");

    let mut target = match canvas {
        Canvas::Photo => img.clone(),
        Canvas::Blank => blank_canvas(img.width(), img.height()),
    };
    render_points(&mut target, &set, radius, Rgb([0, 255, 0]));
    if matches!(canvas, Canvas::Photo) {
        if let Some(region) = Rect::around_points(&set) {
            render_region(&mut target, region, Rgb([255, 0, 0]), 1);
        }
    }
    save(&target, out)?;
    sidecar::write_sidecar(out, json!({"landmarks": set.len(), "radius": radius}))?;
    Ok(())
}

fn mesh(input: &Path, out: &Path, canvas: Canvas, region: Region) -> Result<()> {
    let img = load(input)?;
    let set = MarkerSource::default()
        .detect(&img)
        .context("detecting landmarks")?;
    let rect = RegionPolicy::from(region)
        .resolve(&set, img.dimensions())
        .ok_or_else(|| anyhow!("empty landmark set has no extent"))?;
    let tris = triangulate(&set, rect).context("triangulating landmarks")?;
    tracing::info!(landmarks = set.len(), triangles = tris.len(), region = ?region, "mesh");

    let mut target = match canvas {
        Canvas::Photo => img.clone(),
        Canvas::Blank => blank_canvas(img.width(), img.height()),
    };
    render_triangles(&mut target, &tris, Rgb([255, 255, 255]), 1);
    save(&target, out)?;

    let summary = MeshSummary {
        landmarks: set.len(),
        triangles: tris.len(),
        region: [rect.x, rect.y, rect.w, rect.h],
    };
    sidecar::write_sidecar(out, serde_json::to_value(summary)?)?;
    Ok(())
}

fn rotate(input: &Path, out: &Path, x: f64, y: f64, z: f64) -> Result<()> {
    let img = load(input)?;
    let turned = facemesh::project::rotate(&img, x, y, z);
    tracing::info!(x, y, z, "rotate");
    save(&turned, out)?;
    sidecar::write_sidecar(out, json!({"x": x, "y": y, "z": z}))?;
    Ok(())
}
