//! Layout math in a 1000-unit design space.
//!
//! Every absolute size below is defined against the short edge of a
//! 1000px image and multiplied by `scale_factor` at render time, so the
//! composition keeps its proportions whatever the source resolution.

use crate::config::BadgePosition;

/// Short edge of the reference design space, in pixels.
pub const DESIGN_UNITS: f32 = 1000.0;

/// Corner inset of the badge anchor.
pub const BADGE_PADDING: f32 = 80.0;
/// Corner inset of the text-only price fallback.
pub const PRICE_TEXT_PADDING: f32 = 60.0;
/// Base badge radius / half-width.
pub const BADGE_SIZE: f32 = 140.0;
/// Height of the gradient overlay band.
pub const GRADIENT_BAND: f32 = 400.0;

/// Headline baseline when the gradient (and text) sit at the top.
pub const HEADLINE_TOP_BASELINE: f32 = 100.0;
/// Headline baseline inset from the bottom edge otherwise.
pub const HEADLINE_BOTTOM_INSET: f32 = 150.0;
/// Sub-headline baseline offset below the headline.
pub const SUB_HEADLINE_OFFSET: f32 = 60.0;

pub const HEADLINE_PX: f32 = 60.0;
pub const SUB_HEADLINE_PX: f32 = 40.0;
pub const BADGE_PRICE_PX: f32 = 50.0;
pub const BADGE_CURRENCY_PX: f32 = 30.0;
pub const PRICE_TEXT_PX: f32 = 60.0;

/// Price number sits above the badge center, the currency below it.
pub const BADGE_PRICE_RAISE: f32 = 15.0;
pub const BADGE_CURRENCY_DROP: f32 = 35.0;

/// Fixed tilt of the square badge.
pub const SQUARE_TILT_DEG: f32 = -10.0;

pub const STAR_SPIKES: u32 = 12;
pub const STAR_OUTER_RATIO: f32 = 1.2;
pub const STAR_INNER_RATIO: f32 = 0.9;

pub fn scale_factor(width: u32, height: u32) -> f32 {
    width.min(height) as f32 / DESIGN_UNITS
}

pub fn square_tilt_rad() -> f32 {
    SQUARE_TILT_DEG.to_radians()
}

fn corner_anchor(pos: BadgePosition, width: u32, height: u32, padding: f32) -> (f32, f32) {
    let (w, h) = (width as f32, height as f32);
    let x = if pos.is_left() { padding } else { w - padding };
    let y = if pos.is_top() { padding } else { h - padding };
    (x, y)
}

/// Center of the badge shape for a given corner.
pub fn badge_anchor(pos: BadgePosition, width: u32, height: u32, scale: f32) -> (f32, f32) {
    corner_anchor(pos, width, height, BADGE_PADDING * scale)
}

/// Baseline anchor of the text-only price fallback.
pub fn price_text_anchor(pos: BadgePosition, width: u32, height: u32, scale: f32) -> (f32, f32) {
    corner_anchor(pos, width, height, PRICE_TEXT_PADDING * scale)
}

pub fn headline_baseline(is_top_gradient: bool, height: u32, scale: f32) -> f32 {
    if is_top_gradient {
        HEADLINE_TOP_BASELINE * scale
    } else {
        height as f32 - HEADLINE_BOTTOM_INSET * scale
    }
}

pub fn sub_headline_baseline(is_top_gradient: bool, height: u32, scale: f32) -> f32 {
    headline_baseline(is_top_gradient, height, scale) + SUB_HEADLINE_OFFSET * scale
}
