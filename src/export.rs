use chrono::{DateTime, Utc};
use image::{codecs::png::PngEncoder, ImageEncoder, RgbaImage};

use crate::error::EngineError;

/// Serialize a finished surface to PNG bytes.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, EngineError> {
    let mut buf = Vec::new();
    let enc = PngEncoder::new(&mut buf);
    enc.write_image(
        surface,
        surface.width(),
        surface.height(),
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| EngineError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Suggested download name. The instant is caller-supplied so the render
/// path never reads a clock.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("tijara-design-{}.png", at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn png_roundtrip_keeps_dimensions() {
        let surface = RgbaImage::from_pixel(30, 20, image::Rgba([10, 200, 30, 255]));
        let bytes = encode_png(&surface).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (30, 20));
        assert_eq!(back.get_pixel(15, 10).0, [10, 200, 30, 255]);
    }

    #[test]
    fn file_name_uses_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(export_file_name(at), "tijara-design-1700000000123.png");
    }
}
