use rusttype::{point, Font, Scale};

use crate::render::stamp::Stamp;

/// Ink width of a line, measured like the canvas: the rightmost glyph
/// pixel when laid out from x = 0.
pub(crate) fn measure(font: &Font<'_>, px: f32, text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);

    let mut width = 0.0_f32;
    for glyph in font.layout(text, scale, point(0.0, v_metrics.ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            width = width.max(bb.max.x as f32);
        }
    }
    width
}

/// Baseline that vertically centers the em square on `center_y`.
pub(crate) fn middle_baseline(font: &Font<'_>, px: f32, center_y: f32) -> f32 {
    let vm = font.v_metrics(Scale::uniform(px));
    // descent is negative; the em middle sits above the baseline.
    center_y + (vm.ascent + vm.descent) / 2.0
}

/// Rasterize one line with its baseline at `(start_x, baseline_y)` in
/// surface coordinates. Returns `None` when the text has no ink.
pub(crate) fn line_stamp(
    font: &Font<'_>,
    px: f32,
    text: &str,
    start_x: f32,
    baseline_y: f32,
    margin: i32,
) -> Option<Stamp> {
    if text.is_empty() || px < 1.0 {
        return None;
    }

    let scale = Scale::uniform(px);
    let glyphs: Vec<_> = font.layout(text, scale, point(start_x, baseline_y)).collect();

    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for g in &glyphs {
        if let Some(bb) = g.pixel_bounding_box() {
            min_x = min_x.min(bb.min.x);
            min_y = min_y.min(bb.min.y);
            max_x = max_x.max(bb.max.x);
            max_y = max_y.max(bb.max.y);
        }
    }
    if min_x > max_x {
        return None;
    }

    let x0 = min_x - margin;
    let y0 = min_y - margin;
    let mut stamp = Stamp::new(
        x0,
        y0,
        (max_x - x0) as u32 + margin as u32,
        (max_y - y0) as u32 + margin as u32,
    );

    for g in &glyphs {
        if let Some(bb) = g.pixel_bounding_box() {
            g.draw(|gx, gy, v| {
                let a = (v * 255.0) as u8;
                if a == 0 {
                    return;
                }
                stamp.add(bb.min.x - x0 + gx as i32, bb.min.y - y0 + gy as i32, a);
            });
        }
    }
    Some(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Option<std::sync::Arc<Font<'static>>> {
        crate::test_support::any_system_font()
    }

    #[test]
    fn empty_text_has_no_ink() {
        let Some(f) = font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        assert_eq!(measure(&f, 40.0, ""), 0.0);
        assert!(line_stamp(&f, 40.0, "", 0.0, 40.0, 0).is_none());
        assert!(line_stamp(&f, 40.0, "   ", 0.0, 40.0, 0).is_none());
    }

    #[test]
    fn longer_text_measures_wider() {
        let Some(f) = font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        let one = measure(&f, 40.0, "A");
        let three = measure(&f, 40.0, "AAA");
        assert!(one > 0.0);
        assert!(three > one * 2.0);
    }

    #[test]
    fn larger_size_measures_wider() {
        let Some(f) = font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        assert!(measure(&f, 80.0, "1500") > measure(&f, 40.0, "1500"));
    }

    #[test]
    fn stamp_lands_on_the_baseline() {
        let Some(f) = font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        let mut surface =
            image::RgbaImage::from_pixel(200, 100, image::Rgba([255, 255, 255, 255]));
        let stamp = line_stamp(&f, 40.0, "1500", 10.0, 70.0, 0).unwrap();
        stamp.composite(&mut surface, image::Rgba([0, 0, 0, 255]), None);

        let dark = surface.pixels().filter(|p| p.0[0] < 128).count();
        assert!(dark > 0, "expected ink on the surface");
        // Digits sit fully above the baseline.
        for y in 72..100 {
            for x in 0..200 {
                assert!(surface.get_pixel(x, y).0[0] > 128, "ink below baseline at {x},{y}");
            }
        }
    }
}
