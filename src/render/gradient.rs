use image::RgbaImage;

use crate::{config::Rgb, layout};

/// Directional linear overlay band: full tint at the outer edge fading to
/// transparent across `GRADIENT_BAND * scale`. Pure white accents tint
/// white, everything else tints black.
pub(crate) fn draw_overlay(
    surface: &mut RgbaImage,
    accent: Rgb,
    opacity: f32,
    is_top: bool,
    scale: f32,
) {
    if opacity <= 0.0 {
        return;
    }

    let height = surface.height();
    let band = ((layout::GRADIENT_BAND * scale).round() as u32).min(height);
    if band == 0 {
        return;
    }

    let tint = if accent == Rgb::WHITE { Rgb::WHITE } else { Rgb::BLACK };
    let band_f = band as f32;

    for row in 0..band {
        let y = if is_top { row } else { height - band + row };
        // Distance of the row center from the transparent edge of the band.
        let t = if is_top {
            1.0 - (row as f32 + 0.5) / band_f
        } else {
            (row as f32 + 0.5) / band_f
        };
        let alpha = opacity * t;
        if alpha <= 0.0 {
            continue;
        }

        let inv = 1.0 - alpha;
        for x in 0..surface.width() {
            let dst = surface.get_pixel_mut(x, y);
            dst.0[0] = (tint.0[0] as f32 * alpha + dst.0[0] as f32 * inv).round() as u8;
            dst.0[1] = (tint.0[1] as f32 * alpha + dst.0[1] as f32 * inv).round() as u8;
            dst.0[2] = (tint.0[2] as f32 * alpha + dst.0[2] as f32 * inv).round() as u8;
            dst.0[3] = (255.0 * alpha + dst.0[3] as f32 * inv).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gray_surface(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn zero_opacity_is_a_no_op() {
        let mut surface = gray_surface(100, 1000);
        let before = surface.clone();
        draw_overlay(&mut surface, Rgb::BLACK, 0.0, false, 1.0);
        assert_eq!(surface.as_raw(), before.as_raw());
    }

    #[test]
    fn bottom_band_darkens_downward_only() {
        let mut surface = gray_surface(10, 1000);
        draw_overlay(&mut surface, Rgb::BLACK, 0.6, false, 1.0);
        // Above the 400px band nothing changes.
        assert_eq!(surface.get_pixel(5, 599).0, [128, 128, 128, 255]);
        // The bottom row carries (almost) the full tint...
        let bottom = surface.get_pixel(5, 999).0[0];
        let expected = (0.0 * 0.6 + 128.0 * 0.4) as u8;
        assert!(bottom.abs_diff(expected) <= 2, "bottom row {bottom} vs {expected}");
        // ...and the band fades towards its inner edge.
        let inner = surface.get_pixel(5, 610).0[0];
        assert!(inner > bottom);
        assert!(inner < 128 + 1);
    }

    #[test]
    fn top_band_darkens_upward_only() {
        let mut surface = gray_surface(10, 1000);
        draw_overlay(&mut surface, Rgb::BLACK, 0.6, true, 1.0);
        assert!(surface.get_pixel(5, 0).0[0] < 80);
        assert_eq!(surface.get_pixel(5, 400).0, [128, 128, 128, 255]);
        assert_eq!(surface.get_pixel(5, 999).0, [128, 128, 128, 255]);
    }

    #[test]
    fn white_accent_tints_white() {
        let mut surface = gray_surface(10, 1000);
        draw_overlay(&mut surface, Rgb::WHITE, 0.6, true, 1.0);
        assert!(surface.get_pixel(5, 0).0[0] > 180);
    }

    #[test]
    fn near_white_accent_still_tints_black() {
        let mut surface = gray_surface(10, 1000);
        draw_overlay(&mut surface, Rgb([0xfe, 0xff, 0xff]), 0.6, true, 1.0);
        assert!(surface.get_pixel(5, 0).0[0] < 128);
    }

    #[test]
    fn band_is_clamped_to_short_images() {
        let mut surface = gray_surface(10, 120);
        // scale pretending the source is large; band would exceed height
        draw_overlay(&mut surface, Rgb::BLACK, 0.6, false, 1.0);
        assert!(surface.get_pixel(5, 119).0[0] < 128);
        assert!(surface.get_pixel(5, 0).0[0] >= 127);
    }
}
