//! Badge geometry: filled disc, tilted square and star polygon.
//!
//! Fills are hard-edged point-in-shape tests sampled at pixel centers;
//! the drop shadow, not antialiasing, is what sells the badge against
//! the photo.

use crate::render::stamp::Stamp;

/// Star polygon vertex walk: start pointing up, alternate outer/inner
/// radius advancing `pi/spikes` per step, `2*spikes` vertices in total.
/// The closing edge back to the first vertex is implicit in the fill.
pub fn star_vertices(
    cx: f32,
    cy: f32,
    spikes: u32,
    outer_radius: f32,
    inner_radius: f32,
) -> Vec<(f32, f32)> {
    let mut rot = std::f32::consts::PI / 2.0 * 3.0;
    let step = std::f32::consts::PI / spikes as f32;

    let mut vertices = Vec::with_capacity(spikes as usize * 2);
    for _ in 0..spikes {
        vertices.push((cx + rot.cos() * outer_radius, cy + rot.sin() * outer_radius));
        rot += step;
        vertices.push((cx + rot.cos() * inner_radius, cy + rot.sin() * inner_radius));
        rot += step;
    }
    vertices
}

/// Corners of a square of half-width `half`, rotated by `angle` radians
/// about its center.
pub fn square_vertices(cx: f32, cy: f32, half: f32, angle: f32) -> [(f32, f32); 4] {
    let (sin_a, cos_a) = angle.sin_cos();
    [(-half, -half), (half, -half), (half, half), (-half, half)]
        .map(|(x, y)| (cx + x * cos_a - y * sin_a, cy + x * sin_a + y * cos_a))
}

pub(crate) fn circle_stamp(cx: f32, cy: f32, radius: f32, margin: i32) -> Stamp {
    let x0 = (cx - radius).floor() as i32 - margin;
    let y0 = (cy - radius).floor() as i32 - margin;
    let x1 = (cx + radius).ceil() as i32 + margin;
    let y1 = (cy + radius).ceil() as i32 + margin;

    let mut stamp = Stamp::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32);
    let r2 = radius * radius;
    for ly in 0..stamp.height() as i32 {
        for lx in 0..stamp.width() as i32 {
            let dx = (x0 + lx) as f32 + 0.5 - cx;
            let dy = (y0 + ly) as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                stamp.add(lx, ly, 255);
            }
        }
    }
    stamp
}

/// Even-odd scanline fill of a closed polygon.
pub(crate) fn polygon_stamp(vertices: &[(f32, f32)], margin: i32) -> Stamp {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for &(x, y) in vertices {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let x0 = min_x.floor() as i32 - margin;
    let y0 = min_y.floor() as i32 - margin;
    let x1 = max_x.ceil() as i32 + margin;
    let y1 = max_y.ceil() as i32 + margin;

    let mut stamp = Stamp::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32);
    let n = vertices.len();
    if n < 3 {
        return stamp;
    }

    let mut crossings: Vec<f32> = Vec::with_capacity(8);
    for ly in 0..stamp.height() as i32 {
        let sy = (y0 + ly) as f32 + 0.5;

        crossings.clear();
        for i in 0..n {
            let (ax, ay) = vertices[i];
            let (bx, by) = vertices[(i + 1) % n];
            if (ay > sy) != (by > sy) {
                crossings.push(ax + (sy - ay) * (bx - ax) / (by - ay));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let (start, end) = (pair[0], pair[1]);
            for lx in 0..stamp.width() as i32 {
                let sx = (x0 + lx) as f32 + 0.5;
                if sx >= start && sx < end {
                    stamp.add(lx, ly, 255);
                }
            }
        }
    }
    stamp
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn star_has_two_vertices_per_spike() {
        let v = star_vertices(0.0, 0.0, 12, 168.0, 126.0);
        assert_eq!(v.len(), 24);
        for (i, &(x, y)) in v.iter().enumerate() {
            let r = (x * x + y * y).sqrt();
            let expected = if i % 2 == 0 { 168.0 } else { 126.0 };
            assert_approx_eq!(f32, r, expected, epsilon = 0.001);
        }
    }

    #[test]
    fn star_starts_at_the_top_and_closes() {
        let v = star_vertices(100.0, 100.0, 12, 168.0, 126.0);
        assert_approx_eq!(f32, v[0].0, 100.0, epsilon = 0.001);
        assert_approx_eq!(f32, v[0].1, 100.0 - 168.0, epsilon = 0.001);
        // The walk ends one step before the start; closing it comes back
        // to the first vertex, not to a 25th point.
        let last = *v.last().unwrap();
        assert!(last != v[0]);
    }

    #[test]
    fn square_vertices_keep_their_distance_under_tilt() {
        let half = 140.0;
        let corners = square_vertices(500.0, 500.0, half, (-10.0_f32).to_radians());
        let diag = (2.0_f32).sqrt() * half;
        for (x, y) in corners {
            let d = ((x - 500.0).powi(2) + (y - 500.0).powi(2)).sqrt();
            assert_approx_eq!(f32, d, diag, epsilon = 0.01);
        }
    }

    #[test]
    fn circle_stamp_covers_center_not_corners() {
        let stamp = circle_stamp(10.0, 10.0, 5.0, 0);
        let mut surface =
            image::RgbaImage::from_pixel(20, 20, image::Rgba([255, 255, 255, 255]));
        stamp.composite(&mut surface, image::Rgba([0, 0, 0, 255]), None);
        assert_eq!(surface.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(surface.get_pixel(10, 6).0, [0, 0, 0, 255]);
        assert_eq!(surface.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(surface.get_pixel(16, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn polygon_stamp_fills_an_axis_aligned_square() {
        let verts = [(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)];
        let stamp = polygon_stamp(&verts, 0);
        let mut surface =
            image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 255, 255, 255]));
        stamp.composite(&mut surface, image::Rgba([0, 0, 0, 255]), None);
        assert_eq!(surface.get_pixel(5, 5).0, [0, 0, 0, 255]);
        assert_eq!(surface.get_pixel(2, 2).0, [0, 0, 0, 255]);
        assert_eq!(surface.get_pixel(8, 8).0, [255, 255, 255, 255]);
        assert_eq!(surface.get_pixel(1, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn star_stamp_fills_spikes_and_leaves_gaps() {
        let verts = star_vertices(50.0, 50.0, 12, 40.0, 20.0);
        let stamp = polygon_stamp(&verts, 0);
        let mut surface =
            image::RgbaImage::from_pixel(100, 100, image::Rgba([255, 255, 255, 255]));
        stamp.composite(&mut surface, image::Rgba([0, 0, 0, 255]), None);
        // Center and the top spike are solid.
        assert_eq!(surface.get_pixel(50, 50).0, [0, 0, 0, 255]);
        assert_eq!(surface.get_pixel(50, 15).0, [0, 0, 0, 255]);
        // Outside the outer radius is untouched.
        assert_eq!(surface.get_pixel(95, 50).0, [255, 255, 255, 255]);
    }
}
