//! Pseudo-3D rotation of the image plane.
//!
//! Purpose
//! - Produce a plausible "rotated face" image for re-detection by warping
//!   the photo through a composed transform: an in-plane rotation for the
//!   Z axis, then a perspective warp for the X/Y axes obtained by rotating
//!   the four image corners in a synthetic 3D space and projecting them
//!   through a pinhole.
//!
//! This is deliberately an approximation. Only the four corners see the 3D
//! rotation; interior content is carried along by the resulting homography
//! with bilinear resampling. No 3D geometry of the face exists anywhere in
//! the system, so a dense-mesh or model-based rendition would be claiming
//! precision the pipeline does not have.
//!
//! There are no error states: any angle triple produces a valid image of
//! the input dimensions. Degenerate combinations (quads collapsed by
//! rotations near 90 degrees) come back black.

use image::{Rgb, RgbImage};
use nalgebra::{Matrix3, SMatrix, SVector, Vector2, Vector3};

/// Pinhole focal length, in pixels, for the corner projection. The value is
/// a tunable constant rather than derived from the image: it only controls
/// how aggressive the foreshortening looks.
pub const FOCAL_LENGTH: f64 = 500.0;

/// Rotate the image plane by the given angles (degrees) about the X, Y and
/// Z axes. Output dimensions equal input dimensions; corners may clip.
pub fn rotate(image: &RgbImage, angle_x: f64, angle_y: f64, angle_z: f64) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut out = image.clone();
    if angle_z != 0.0 {
        out = warp(&out, rotation_about_center(w, h, angle_z));
    }
    if angle_x != 0.0 || angle_y != 0.0 {
        out = match perspective_homography(w, h, angle_x, angle_y) {
            Some(hm) => warp(&out, hm),
            None => RgbImage::new(w, h),
        };
    }
    out
}

/// In-plane rotation about the image center as a homography with an affine
/// last row.
fn rotation_about_center(width: u32, height: u32, angle_deg: f64) -> Matrix3<f64> {
    let th = angle_deg.to_radians();
    let (s, c) = th.sin_cos();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    // T(center) * R(th) * T(-center)
    Matrix3::new(
        c,
        -s,
        cx - c * cx + s * cy,
        s,
        c,
        cy - s * cx - c * cy,
        0.0,
        0.0,
        1.0,
    )
}

/// Homography sending the image corners to their pinhole projections after
/// the out-of-plane rotation `R = Ry(angle_y) * Rx(angle_x)`.
///
/// `None` when the projected quad is degenerate (a corner swings to or past
/// the camera plane, or the correspondence system is singular).
fn perspective_homography(
    width: u32,
    height: u32,
    angle_x: f64,
    angle_y: f64,
) -> Option<Matrix3<f64>> {
    let w = width as f64;
    let h = height as f64;
    let cx = w / 2.0;
    let cy = h / 2.0;

    let rx = angle_x.to_radians();
    let ry = angle_y.to_radians();
    let (sx, cxr) = rx.sin_cos();
    let (sy, cyr) = ry.sin_cos();
    let rot_x = Matrix3::new(1.0, 0.0, 0.0, 0.0, cxr, -sx, 0.0, sx, cxr);
    let rot_y = Matrix3::new(cyr, 0.0, sy, 0.0, 1.0, 0.0, -sy, 0.0, cyr);
    let r = rot_y * rot_x;

    let src = [
        Vector2::new(0.0, 0.0),
        Vector2::new(w, 0.0),
        Vector2::new(w, h),
        Vector2::new(0.0, h),
    ];
    let mut dst = [Vector2::zeros(); 4];
    for (i, corner) in src.iter().enumerate() {
        // Corner on the z = 0 plane, centered at the origin.
        let p = r * Vector3::new(corner.x - cx, corner.y - cy, 0.0);
        let depth = FOCAL_LENGTH - p.z;
        if depth <= 1e-6 {
            return None;
        }
        let scale = FOCAL_LENGTH / depth;
        dst[i] = Vector2::new(p.x * scale + cx, p.y * scale + cy);
    }
    homography_from_quad(&src, &dst)
}

/// Solve the 8x8 correspondence system mapping four source points to four
/// destination points.
fn homography_from_quad(src: &[Vector2<f64>; 4], dst: &[Vector2<f64>; 4]) -> Option<Matrix3<f64>> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = (dst[i].x, dst[i].y);
        a.set_row(
            2 * i,
            &SMatrix::<f64, 1, 8>::from_row_slice(&[x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u]),
        );
        a.set_row(
            2 * i + 1,
            &SMatrix::<f64, 1, 8>::from_row_slice(&[0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v]),
        );
        b[2 * i] = u;
        b[2 * i + 1] = v;
    }
    let hv = a.lu().solve(&b)?;
    Some(Matrix3::new(
        hv[0], hv[1], hv[2], hv[3], hv[4], hv[5], hv[6], hv[7], 1.0,
    ))
}

/// Inverse-mapped warp with bilinear resampling; samples that fall outside
/// the source come back black.
fn warp(src: &RgbImage, hm: Matrix3<f64>) -> RgbImage {
    let (w, h) = src.dimensions();
    let mut out = RgbImage::new(w, h);
    let inv = match hm.try_inverse() {
        Some(inv) => inv,
        None => return out,
    };
    for y in 0..h {
        for x in 0..w {
            let q = inv * Vector3::new(x as f64, y as f64, 1.0);
            if q.z.abs() < 1e-12 {
                continue;
            }
            if let Some(px) = bilinear(src, q.x / q.z, q.y / q.z) {
                out.put_pixel(x, y, px);
            }
        }
    }
    out
}

fn bilinear(src: &RgbImage, x: f64, y: f64) -> Option<Rgb<u8>> {
    let (w, h) = src.dimensions();
    if x < 0.0 || y < 0.0 || x > (w - 1) as f64 || y > (h - 1) as f64 {
        return None;
    }
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = src.get_pixel(x0, y0).0;
    let p10 = src.get_pixel(x1, y0).0;
    let p01 = src.get_pixel(x0, y1).0;
    let p11 = src.get_pixel(x1, y1).0;
    let mut px = [0u8; 3];
    for ch in 0..3 {
        let top = p00[ch] as f64 * (1.0 - fx) + p10[ch] as f64 * fx;
        let bot = p01[ch] as f64 * (1.0 - fx) + p11[ch] as f64 * fx;
        px[ch] = (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8;
    }
    Some(Rgb(px))
}
