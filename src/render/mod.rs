//! The compositor: one synchronous pass over the base image.
//!
//! Draw order is fixed and later draws occlude earlier ones:
//! base image, gradient overlay, headline block, price block. A pass
//! has no hidden state; rendering the same config over the same image
//! twice produces identical bytes.

pub(crate) mod gradient;
pub(crate) mod shape;
pub(crate) mod stamp;
pub(crate) mod text;

use image::RgbaImage;
use tracing::debug;

use crate::{
    config::{BadgeShape, Rgb, StyleConfig, AMBER},
    error::EngineError,
    font::{FontStore, FontWeight},
    layout,
};
use stamp::Shadow;

/// Fixed currency suffix on every price draw.
pub const CURRENCY_SUFFIX: &str = "DA";

/// Price text color inside a badge. A fixed rule table, not a contrast
/// computation: amber forces black on any shape, other squares take
/// white, everything else takes black.
pub fn badge_text_color(shape: BadgeShape, primary: Rgb) -> Rgb {
    if primary == AMBER {
        Rgb::BLACK
    } else if shape == BadgeShape::Square {
        Rgb::WHITE
    } else {
        Rgb::BLACK
    }
}

/// Render the full composition onto a copy of `base` at its native
/// resolution. The config must already be normalized.
pub fn render(
    base: &RgbaImage,
    style: &StyleConfig,
    fonts: &FontStore,
) -> Result<RgbaImage, EngineError> {
    let (width, height) = base.dimensions();
    if width == 0 || height == 0 {
        return Err(EngineError::Decode("base image has zero dimension".into()));
    }
    debug_assert!((0.0..=1.0).contains(&style.overlay_opacity));

    let scale = layout::scale_factor(width, height);
    debug!(width, height, scale, "render pass");

    let mut surface = base.clone();

    gradient::draw_overlay(
        &mut surface,
        style.accent_color,
        style.overlay_opacity,
        style.is_top_gradient,
        scale,
    );

    draw_headline_block(&mut surface, style, fonts, scale)?;
    draw_price_block(&mut surface, style, fonts, scale)?;

    Ok(surface)
}

fn draw_headline_block(
    surface: &mut RgbaImage,
    style: &StyleConfig,
    fonts: &FontStore,
    scale: f32,
) -> Result<(), EngineError> {
    let headline = style.headline.to_uppercase();
    let sub = style.sub_headline.as_str();
    if headline.is_empty() && sub.is_empty() {
        return Ok(());
    }

    let (width, height) = surface.dimensions();
    let center_x = width as f32 / 2.0;
    let shadow = Shadow::soft_black(0.5, 10.0);
    let fill = style.secondary_color.rgba(255);

    if !headline.is_empty() {
        let font = fonts.resolve(style.font_family, FontWeight::Bold)?;
        let px = layout::HEADLINE_PX * scale;
        let w = text::measure(&font, px, &headline);
        let baseline = layout::headline_baseline(style.is_top_gradient, height, scale);
        if let Some(stamp) =
            text::line_stamp(&font, px, &headline, center_x - w / 2.0, baseline, shadow.margin())
        {
            stamp.composite(surface, fill, Some(&shadow));
        }
    }

    if !sub.is_empty() {
        let font = fonts.resolve(style.font_family, FontWeight::Regular)?;
        let px = layout::SUB_HEADLINE_PX * scale;
        let w = text::measure(&font, px, sub);
        let baseline = layout::sub_headline_baseline(style.is_top_gradient, height, scale);
        if let Some(stamp) =
            text::line_stamp(&font, px, sub, center_x - w / 2.0, baseline, shadow.margin())
        {
            stamp.composite(surface, fill, Some(&shadow));
        }
    }

    Ok(())
}

fn draw_price_block(
    surface: &mut RgbaImage,
    style: &StyleConfig,
    fonts: &FontStore,
    scale: f32,
) -> Result<(), EngineError> {
    let price = style.display_price.as_str();
    if price.is_empty() {
        return Ok(());
    }

    if style.badge_shape == BadgeShape::None {
        return draw_price_text_only(surface, style, fonts, scale);
    }

    let (width, height) = surface.dimensions();
    let (bx, by) = layout::badge_anchor(style.badge_position, width, height, scale);
    let size = layout::BADGE_SIZE * scale;
    let shadow = Shadow::soft_black(0.3, 15.0);
    let fill = style.primary_color.rgba(255);

    match style.badge_shape {
        BadgeShape::Circle => {
            shape::circle_stamp(bx, by, size, shadow.margin()).composite(surface, fill, Some(&shadow));
        }
        BadgeShape::Square => {
            let verts = shape::square_vertices(bx, by, size, layout::square_tilt_rad());
            shape::polygon_stamp(&verts, shadow.margin()).composite(surface, fill, Some(&shadow));
        }
        BadgeShape::Star => {
            let verts = shape::star_vertices(
                bx,
                by,
                layout::STAR_SPIKES,
                size * layout::STAR_OUTER_RATIO,
                size * layout::STAR_INNER_RATIO,
            );
            shape::polygon_stamp(&verts, shadow.margin()).composite(surface, fill, Some(&shadow));
        }
        BadgeShape::None => unreachable!(),
    }

    // Price number and currency, stacked around the badge center. The
    // square's text follows the badge tilt; the tilt stays inside these
    // two composites.
    let font = fonts.resolve(style.font_family, FontWeight::Bold)?;
    let text_fill = badge_text_color(style.badge_shape, style.primary_color).rgba(255);

    let lines = [
        (layout::BADGE_PRICE_PX, price, -layout::BADGE_PRICE_RAISE),
        (layout::BADGE_CURRENCY_PX, CURRENCY_SUFFIX, layout::BADGE_CURRENCY_DROP),
    ];
    for (design_px, line, design_dy) in lines {
        let px = design_px * scale;
        let w = text::measure(&font, px, line);
        let baseline = text::middle_baseline(&font, px, by + design_dy * scale);
        let Some(stamp) = text::line_stamp(&font, px, line, bx - w / 2.0, baseline, shadow.margin())
        else {
            continue;
        };
        if style.badge_shape == BadgeShape::Square {
            stamp.composite_rotated(
                surface,
                text_fill,
                Some(&shadow),
                layout::square_tilt_rad(),
                (bx, by),
            );
        } else {
            stamp.composite(surface, text_fill, Some(&shadow));
        }
    }

    Ok(())
}

fn draw_price_text_only(
    surface: &mut RgbaImage,
    style: &StyleConfig,
    fonts: &FontStore,
    scale: f32,
) -> Result<(), EngineError> {
    let (width, height) = surface.dimensions();
    let (ax, ay) = layout::price_text_anchor(style.badge_position, width, height, scale);

    let font = fonts.resolve(style.font_family, FontWeight::Bold)?;
    let px = layout::PRICE_TEXT_PX * scale;
    let line = format!("{} {}", style.display_price, CURRENCY_SUFFIX);
    let shadow = Shadow::soft_black(0.8, 4.0);

    let start_x = if style.badge_position.is_left() {
        ax
    } else {
        ax - text::measure(&font, px, &line)
    };

    if let Some(stamp) = text::line_stamp(&font, px, &line, start_x, ay, shadow.margin()) {
        stamp.composite(surface, style.primary_color.rgba(255), Some(&shadow));
    }
    Ok(())
}
