//! Coverage-mask stamps.
//!
//! Every draw (a glyph run, a badge shape) is rasterized into its own
//! stamp and composited onto the surface in one step. A stamp owns its
//! placement, fill, shadow and rotation, so no draw can leak transform or
//! shadow state into the next one.

use image::{imageops, GrayImage, Rgba, RgbaImage};

/// Soft drop shadow. Blur is in output pixels and deliberately not scaled
/// with the image, matching the fixed-blur look of the composition.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Shadow {
    pub color: Rgba<u8>,
    pub blur: f32,
}

impl Shadow {
    pub fn soft_black(opacity: f32, blur: f32) -> Self {
        Self {
            color: Rgba([0, 0, 0, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8]),
            blur,
        }
    }

    /// Extra rasterization margin needed so the blur has room to spill.
    pub fn margin(&self) -> i32 {
        (self.blur * 1.5).ceil() as i32 + 1
    }
}

pub(crate) struct Stamp {
    mask: GrayImage,
    x0: i32,
    y0: i32,
}

impl Stamp {
    pub fn new(x0: i32, y0: i32, width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::new(width.max(1), height.max(1)),
            x0,
            y0,
        }
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// Add coverage at local coordinates; overlapping draws keep the max so
    /// adjacent glyphs never double-darken.
    pub fn add(&mut self, lx: i32, ly: i32, coverage: u8) {
        if lx < 0 || ly < 0 {
            return;
        }
        let (lx, ly) = (lx as u32, ly as u32);
        if lx >= self.mask.width() || ly >= self.mask.height() {
            return;
        }
        let p = self.mask.get_pixel_mut(lx, ly);
        p.0[0] = p.0[0].max(coverage);
    }

    pub fn composite(&self, target: &mut RgbaImage, fill: Rgba<u8>, shadow: Option<&Shadow>) {
        if let Some(sh) = shadow {
            let blurred = imageops::blur(&self.mask, sh.blur / 2.0);
            blend_mask(target, &blurred, self.x0, self.y0, sh.color);
        }
        blend_mask(target, &self.mask, self.x0, self.y0, fill);
    }

    /// Composite the stamp rotated by `angle` radians about `pivot`
    /// (surface coordinates). The rotation lives and dies with this call.
    pub fn composite_rotated(
        &self,
        target: &mut RgbaImage,
        fill: Rgba<u8>,
        shadow: Option<&Shadow>,
        angle: f32,
        pivot: (f32, f32),
    ) {
        if let Some(sh) = shadow {
            let blurred = imageops::blur(&self.mask, sh.blur / 2.0);
            self.blend_rotated(target, &blurred, sh.color, angle, pivot);
        }
        self.blend_rotated(target, &self.mask, fill, angle, pivot);
    }

    fn blend_rotated(
        &self,
        target: &mut RgbaImage,
        mask: &GrayImage,
        color: Rgba<u8>,
        angle: f32,
        pivot: (f32, f32),
    ) {
        let (sin_a, cos_a) = angle.sin_cos();
        let (px, py) = pivot;

        // Destination bounds: the stamp rectangle, rotated.
        let corners = [
            (self.x0 as f32, self.y0 as f32),
            (self.x0 as f32 + mask.width() as f32, self.y0 as f32),
            (self.x0 as f32, self.y0 as f32 + mask.height() as f32),
            (
                self.x0 as f32 + mask.width() as f32,
                self.y0 as f32 + mask.height() as f32,
            ),
        ];
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for (x, y) in corners {
            let (dx, dy) = (x - px, y - py);
            let rx = px + dx * cos_a - dy * sin_a;
            let ry = py + dx * sin_a + dy * cos_a;
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }

        let x_start = (min_x.floor() as i32).max(0);
        let y_start = (min_y.floor() as i32).max(0);
        let x_end = (max_x.ceil() as i32).min(target.width() as i32);
        let y_end = (max_y.ceil() as i32).min(target.height() as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                // Inverse-map the destination pixel center into mask space.
                let (dx, dy) = (x as f32 + 0.5 - px, y as f32 + 0.5 - py);
                let sx = px + dx * cos_a + dy * sin_a;
                let sy = py - dx * sin_a + dy * cos_a;
                let coverage = sample_bilinear(mask, sx - self.x0 as f32, sy - self.y0 as f32);
                if coverage <= 0.0 {
                    continue;
                }
                blend_pixel(target, x as u32, y as u32, color, coverage);
            }
        }
    }
}

fn sample_bilinear(mask: &GrayImage, fx: f32, fy: f32) -> f32 {
    // Sample at pixel centers; everything outside the mask is transparent.
    let fx = fx - 0.5;
    let fy = fy - 0.5;
    let x0 = fx.floor() as i32;
    let y0 = fy.floor() as i32;
    let tx = fx - x0 as f32;
    let ty = fy - y0 as f32;

    let at = |x: i32, y: i32| -> f32 {
        if x < 0 || y < 0 || x >= mask.width() as i32 || y >= mask.height() as i32 {
            return 0.0;
        }
        mask.get_pixel(x as u32, y as u32).0[0] as f32 / 255.0
    };

    let top = at(x0, y0) * (1.0 - tx) + at(x0 + 1, y0) * tx;
    let bottom = at(x0, y0 + 1) * (1.0 - tx) + at(x0 + 1, y0 + 1) * tx;
    top * (1.0 - ty) + bottom * ty
}

fn blend_mask(target: &mut RgbaImage, mask: &GrayImage, x0: i32, y0: i32, color: Rgba<u8>) {
    for ly in 0..mask.height() {
        for lx in 0..mask.width() {
            let cov = mask.get_pixel(lx, ly).0[0];
            if cov == 0 {
                continue;
            }
            let x = x0 + lx as i32;
            let y = y0 + ly as i32;
            if x < 0 || y < 0 || x >= target.width() as i32 || y >= target.height() as i32 {
                continue;
            }
            blend_pixel(target, x as u32, y as u32, color, cov as f32 / 255.0);
        }
    }
}

// src over dst, straight alpha
fn blend_pixel(target: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
    let a = coverage * color.0[3] as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    let dst = target.get_pixel_mut(x, y);
    let inv = 1.0 - a;
    dst.0[0] = (color.0[0] as f32 * a + dst.0[0] as f32 * inv).round() as u8;
    dst.0[1] = (color.0[1] as f32 * a + dst.0[1] as f32 * inv).round() as u8;
    dst.0[2] = (color.0[2] as f32 * a + dst.0[2] as f32 * inv).round() as u8;
    dst.0[3] = (255.0 * a + dst.0[3] as f32 * inv).round() as u8;
}
