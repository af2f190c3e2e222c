//! Raster rendering of landmark sets and triangle meshes.
//!
//! All drawing mutates a caller-supplied `RgbImage` in place; callers that
//! want the original untouched pass a clone or a `blank_canvas`. Nothing
//! here ever alters a `PointSet` or a triangle list. Overlaps resolve by
//! draw order (last write wins), and shared triangle edges are simply drawn
//! once per owning triangle.

use image::{Rgb, RgbImage};
use nalgebra::Vector2;

use crate::delaunay::{Rect, Triangle};
use crate::landmark::PointSet;

/// All-zero canvas of the given shape, for inspecting points or meshes
/// without the source photograph.
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width, height)
}

/// Draw a filled disc of `radius` at every landmark, in point order.
pub fn render_points(target: &mut RgbImage, points: &PointSet, radius: u32, color: Rgb<u8>) {
    for m in points {
        fill_disc(target, m.at, radius, color);
    }
}

/// Draw the three edges of every triangle as line segments.
pub fn render_triangles(target: &mut RgbImage, triangles: &[Triangle], color: Rgb<u8>, thickness: u32) {
    for t in triangles {
        draw_line(target, t.a, t.b, color, thickness);
        draw_line(target, t.b, t.c, color, thickness);
        draw_line(target, t.c, t.a, color, thickness);
    }
}

/// Draw a rectangle outline (face box on annotated artifacts).
pub fn render_region(target: &mut RgbImage, region: Rect, color: Rgb<u8>, thickness: u32) {
    let [tl, tr, br, bl] = region.corners();
    draw_line(target, tl, tr, color, thickness);
    draw_line(target, tr, br, color, thickness);
    draw_line(target, br, bl, color, thickness);
    draw_line(target, bl, tl, color, thickness);
}

fn fill_disc(img: &mut RgbImage, center: Vector2<f64>, radius: u32, color: Rgb<u8>) {
    let cx = center.x.round() as i64;
    let cy = center.y.round() as i64;
    let r = radius as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put_pixel_checked(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham segment; thickness above one stamps discs along the walk.
fn draw_line(img: &mut RgbImage, from: Vector2<f64>, to: Vector2<f64>, color: Rgb<u8>, thickness: u32) {
    let mut x = from.x.round() as i64;
    let mut y = from.y.round() as i64;
    let x1 = to.x.round() as i64;
    let y1 = to.y.round() as i64;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if thickness <= 1 {
            put_pixel_checked(img, x, y, color);
        } else {
            stamp(img, x, y, thickness / 2, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn stamp(img: &mut RgbImage, cx: i64, cy: i64, r: u32, color: Rgb<u8>) {
    let r = r as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put_pixel_checked(img, cx + dx, cy + dy, color);
            }
        }
    }
}

#[inline]
fn put_pixel_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::PointSet;
    use nalgebra::vector;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn single_point_marks_center_not_corners() {
        let mut canvas = blank_canvas(100, 100);
        let set = PointSet::from_points(vec![vector![50.0, 50.0]]);
        render_points(&mut canvas, &set, 3, WHITE);
        assert_eq!(*canvas.get_pixel(50, 50), WHITE);
        for &(x, y) in &[(0, 0), (99, 0), (0, 99), (99, 99)] {
            assert_eq!(*canvas.get_pixel(x, y), Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn zero_radius_still_marks_one_pixel() {
        let mut canvas = blank_canvas(10, 10);
        let set = PointSet::from_points(vec![vector![4.0, 7.0]]);
        render_points(&mut canvas, &set, 0, WHITE);
        assert_eq!(*canvas.get_pixel(4, 7), WHITE);
        assert_eq!(*canvas.get_pixel(5, 7), Rgb([0, 0, 0]));
    }

    #[test]
    fn discs_clip_at_the_border_without_panicking() {
        let mut canvas = blank_canvas(20, 20);
        let set = PointSet::from_points(vec![vector![0.0, 0.0], vector![19.0, 19.0]]);
        render_points(&mut canvas, &set, 5, WHITE);
        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.get_pixel(19, 19), WHITE);
    }

    #[test]
    fn overlapping_discs_last_write_wins() {
        let mut canvas = blank_canvas(30, 30);
        let red = Rgb([255, 0, 0]);
        let blue = Rgb([0, 0, 255]);
        let a = PointSet::from_points(vec![vector![15.0, 15.0]]);
        let b = PointSet::from_points(vec![vector![16.0, 15.0]]);
        render_points(&mut canvas, &a, 4, red);
        render_points(&mut canvas, &b, 4, blue);
        assert_eq!(*canvas.get_pixel(16, 15), blue);
        // Far side of the first disc is out of the second one's reach.
        assert_eq!(*canvas.get_pixel(11, 15), red);
    }

    #[test]
    fn triangle_edges_land_on_the_canvas() {
        let mut canvas = blank_canvas(50, 50);
        let t = Triangle::new(vector![5.0, 5.0], vector![45.0, 5.0], vector![25.0, 40.0]);
        render_triangles(&mut canvas, &[t], WHITE, 1);
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
        assert_eq!(*canvas.get_pixel(45, 5), WHITE);
        assert_eq!(*canvas.get_pixel(25, 40), WHITE);
        // A point on the horizontal edge.
        assert_eq!(*canvas.get_pixel(25, 5), WHITE);
        // Interior stays unfilled.
        assert_eq!(*canvas.get_pixel(25, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn region_outline_traces_the_corners() {
        let mut canvas = blank_canvas(40, 40);
        render_region(&mut canvas, Rect::new(10.0, 12.0, 20.0, 15.0), WHITE, 1);
        assert_eq!(*canvas.get_pixel(10, 12), WHITE);
        assert_eq!(*canvas.get_pixel(30, 27), WHITE);
        assert_eq!(*canvas.get_pixel(20, 12), WHITE);
        assert_eq!(*canvas.get_pixel(20, 20), Rgb([0, 0, 0]));
    }
}
