//! Compositing engine for Tijara product-ad designs.
//!
//! Takes a decoded product photo plus a declarative [`StyleConfig`]
//! (text, palette, badge geometry, overlay settings) and deterministically
//! renders the finished ad at the photo's native resolution: base image,
//! directional gradient overlay, headline block, then the price badge.
//! The result exports as a PNG byte stream.
//!
//! The [`Editor`] is the intended entry point: it owns one mutable style,
//! re-renders wholesale on every change, and guards the async image
//! decode against superseded requests. [`render`] is the underlying pure
//! pass for callers that manage their own state.

mod config;
mod editor;
mod error;
mod export;
mod font;
pub mod layout;
mod loader;
mod render;
mod util;

pub use config::{
    sanitize_price, BadgePosition, BadgeShape, FontFamily, Preset, Rgb, StyleConfig,
    PRICE_PLACEHOLDER,
};
pub use editor::{Editor, RenderStatus};
pub use error::EngineError;
pub use export::{encode_png, export_file_name};
pub use font::{default_fonts_dir, FontStore, FontWeight};
pub use loader::{decode_payload, decode_payload_blocking, DecodeTicket, ImageLoader};
pub use render::{badge_text_color, render, CURRENCY_SUFFIX};
pub use render::shape::{square_vertices, star_vertices};
pub use util::{b64_decode, parse_data_uri};
