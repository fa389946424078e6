//! Style configuration: the single source of truth for one render pass.
//!
//! A `StyleConfig` is owned by the caller and passed by value into each
//! render. Validation (clamping, color parsing) happens here, at the
//! configuration boundary; drawing code assumes a normalized config.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Opaque sRGB color, parsed from `#rrggbb`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0x00, 0x00, 0x00]);
    pub const WHITE: Rgb = Rgb([0xff, 0xff, 0xff]);

    pub fn from_hex(s: &str) -> Result<Self, EngineError> {
        let t = s.trim().trim_start_matches('#');
        if t.len() != 6 {
            return Err(EngineError::InvalidStyle(format!("invalid color: {s}")));
        }
        let b = hex::decode(t).map_err(|_| EngineError::InvalidStyle(format!("invalid color: {s}")))?;
        Ok(Rgb([b[0], b[1], b[2]]))
    }

    pub(crate) fn rgba(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.0[0], self.0[1], self.0[2], alpha])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl TryFrom<String> for Rgb {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Inter,
    Playfair,
    Oswald,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeShape {
    Circle,
    Square,
    Star,
    None,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl BadgePosition {
    pub fn is_left(self) -> bool {
        matches!(self, BadgePosition::TopLeft | BadgePosition::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, BadgePosition::TopLeft | BadgePosition::TopRight)
    }
}

// Preset palette.
const EMERALD: Rgb = Rgb([0x10, 0xb9, 0x81]);
const GOLD: Rgb = Rgb([0xc0, 0xa0, 0x62]);
const RED: Rgb = Rgb([0xef, 0x44, 0x44]);
const PINK: Rgb = Rgb([0xec, 0x48, 0x99]);
const NEAR_BLACK: Rgb = Rgb([0x1a, 0x1a, 0x1a]);

/// Amber badges always take black price text, whatever the shape.
pub(crate) const AMBER: Rgb = Rgb([0xfb, 0xbf, 0x24]);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    /// Drawn uppercased.
    pub headline: String,
    /// Empty string means no sub-headline.
    pub sub_headline: String,
    /// Empty string means no price block at all.
    pub display_price: String,
    pub font_family: FontFamily,
    pub badge_shape: BadgeShape,
    pub badge_position: BadgePosition,
    /// Badge fill; also the fill of the text-only price fallback.
    pub primary_color: Rgb,
    /// Headline and sub-headline fill.
    pub secondary_color: Rgb,
    /// Overlay tint base: pure white tints white, anything else tints black.
    pub accent_color: Rgb,
    pub overlay_opacity: f32,
    /// Gradient direction; also picks the default text anchor (top vs bottom).
    pub is_top_gradient: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            headline: "LIVRAISON GRATUITE".into(),
            sub_headline: "58 Wilayas".into(),
            display_price: String::new(),
            font_family: FontFamily::Inter,
            badge_shape: BadgeShape::Circle,
            badge_position: BadgePosition::BottomRight,
            primary_color: AMBER,
            secondary_color: Rgb::WHITE,
            accent_color: Rgb::BLACK,
            overlay_opacity: 0.6,
            is_top_gradient: false,
        }
    }
}

impl StyleConfig {
    /// Clamp out-of-range values in place. Rejects values that have no
    /// meaningful clamp target.
    pub fn normalize(&mut self) -> Result<(), EngineError> {
        if !self.overlay_opacity.is_finite() {
            return Err(EngineError::InvalidStyle(format!(
                "overlay opacity must be finite, got {}",
                self.overlay_opacity
            )));
        }
        self.overlay_opacity = self.overlay_opacity.clamp(0.0, 1.0);
        Ok(())
    }
}

/// A named style snapshot. Applying one overwrites every style field and the
/// headline in a single step; sub-headline and price are content and survive.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Modern,
    Luxury,
    Sale,
    Street,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Modern, Preset::Luxury, Preset::Sale, Preset::Street];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Modern => "modern",
            Preset::Luxury => "luxury",
            Preset::Sale => "sale",
            Preset::Street => "street",
        }
    }

    pub fn apply_to(self, style: &mut StyleConfig) {
        let snapshot = match self {
            Preset::Modern => StyleConfig {
                headline: "NOUVELLE COLLECTION".into(),
                font_family: FontFamily::Inter,
                badge_shape: BadgeShape::Circle,
                badge_position: BadgePosition::BottomRight,
                primary_color: EMERALD,
                secondary_color: Rgb::WHITE,
                accent_color: Rgb::BLACK,
                overlay_opacity: 0.7,
                is_top_gradient: false,
                ..StyleConfig::default()
            },
            Preset::Luxury => StyleConfig {
                headline: "Premium Quality".into(),
                font_family: FontFamily::Playfair,
                badge_shape: BadgeShape::None,
                badge_position: BadgePosition::BottomLeft,
                primary_color: GOLD,
                secondary_color: Rgb::WHITE,
                accent_color: NEAR_BLACK,
                overlay_opacity: 0.4,
                is_top_gradient: false,
                ..StyleConfig::default()
            },
            Preset::Sale => StyleConfig {
                headline: "PROMO -50%".into(),
                font_family: FontFamily::Oswald,
                badge_shape: BadgeShape::Star,
                badge_position: BadgePosition::TopRight,
                primary_color: RED,
                secondary_color: Rgb::WHITE,
                accent_color: Rgb::BLACK,
                overlay_opacity: 0.3,
                is_top_gradient: true,
                ..StyleConfig::default()
            },
            Preset::Street => StyleConfig {
                headline: "LIMITED DROP".into(),
                font_family: FontFamily::Inter,
                badge_shape: BadgeShape::Square,
                badge_position: BadgePosition::TopLeft,
                primary_color: PINK,
                secondary_color: Rgb::BLACK,
                accent_color: Rgb::WHITE,
                overlay_opacity: 0.1,
                is_top_gradient: true,
                ..StyleConfig::default()
            },
        };

        *style = StyleConfig {
            sub_headline: std::mem::take(&mut style.sub_headline),
            display_price: std::mem::take(&mut style.display_price),
            ..snapshot
        };
    }
}

/// Placeholder shown when no usable price came back from market analysis.
pub const PRICE_PLACEHOLDER: &str = "0000";

/// Reduce a market-analysis price string to something displayable: short
/// strings are stripped to their digits, long prose falls back to the
/// placeholder so the user edits it by hand.
pub fn sanitize_price(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return PRICE_PLACEHOLDER.into();
    }
    if raw.len() < 15 {
        return raw.chars().filter(|c| c.is_ascii_digit()).collect();
    }
    PRICE_PLACEHOLDER.into()
}
