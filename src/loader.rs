//! Image decode with supersession.
//!
//! Decode is the only suspending step in the engine, and the only race
//! worth guarding: a slow decode finishing after the user has already
//! picked a different photo must not clobber the newer surface. Requests
//! are keyed by source identity; each new source takes a fresh
//! generation ticket and completions for older tickets are dropped.

use image::RgbaImage;
use tracing::debug;

use crate::{error::EngineError, util};

/// One outstanding decode. Created by [`ImageLoader::request`]; hand it
/// back together with the decode result to find out whether it still
/// matters.
#[derive(Debug)]
pub struct DecodeTicket {
    generation: u64,
    source: String,
}

impl DecodeTicket {
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Default)]
pub struct ImageLoader {
    latest: u64,
    pending: Option<(u64, String)>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a decode for `source`. Returns `None` when the identical
    /// source is already in flight; a different source supersedes the
    /// pending one.
    pub fn request(&mut self, source: &str) -> Option<DecodeTicket> {
        if let Some((_, pending)) = &self.pending {
            if pending == source {
                debug!("decode already pending for this source");
                return None;
            }
        }
        self.latest += 1;
        self.pending = Some((self.latest, source.to_string()));
        Some(DecodeTicket {
            generation: self.latest,
            source: source.to_string(),
        })
    }

    pub fn is_current(&self, ticket: &DecodeTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Settle a completed decode. Returns `false` for stale tickets,
    /// whose results must be discarded.
    pub fn complete(&mut self, ticket: &DecodeTicket) -> bool {
        if ticket.generation != self.latest {
            debug!(generation = ticket.generation, "dropping superseded decode");
            return false;
        }
        self.pending = None;
        true
    }

    /// Forget any pending decode, e.g. when a bitmap is injected directly.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.pending = None;
    }
}

/// Decode an encoded image payload (a `data:` URI or raw base64).
pub fn decode_payload(payload: &str) -> Result<RgbaImage, EngineError> {
    let bytes = util::b64_decode(payload)
        .ok_or_else(|| EngineError::Decode("invalid image payload".into()))?;
    let img = image::load_from_memory(&bytes).map_err(|e| EngineError::Decode(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Same as [`decode_payload`], off the async runtime's worker threads.
pub async fn decode_payload_blocking(payload: String) -> Result<RgbaImage, EngineError> {
    tokio::task::spawn_blocking(move || decode_payload(&payload))
        .await
        .map_err(|e| EngineError::Decode(format!("decode task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn identical_pending_source_is_deduplicated() {
        let mut loader = ImageLoader::new();
        let first = loader.request("img-a").unwrap();
        assert!(loader.request("img-a").is_none());
        assert!(loader.is_current(&first));
    }

    #[test]
    fn newer_source_supersedes_older_ticket() {
        let mut loader = ImageLoader::new();
        let a = loader.request("img-a").unwrap();
        let b = loader.request("img-b").unwrap();
        assert!(!loader.is_current(&a));
        assert!(!loader.complete(&a));
        assert!(loader.complete(&b));
    }

    #[test]
    fn completion_clears_pending() {
        let mut loader = ImageLoader::new();
        let a = loader.request("img-a").unwrap();
        assert!(loader.complete(&a));
        // Same source again is a fresh request now.
        assert!(loader.request("img-a").is_some());
    }

    #[test]
    fn invalidate_drops_in_flight_work() {
        let mut loader = ImageLoader::new();
        let a = loader.request("img-a").unwrap();
        loader.invalidate();
        assert!(!loader.complete(&a));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_payload("not base64 at all!").is_err());
        let bogus = base64::engine::general_purpose::STANDARD.encode(b"not an image");
        assert!(decode_payload(&bogus).is_err());
    }

    #[test]
    fn decode_accepts_a_png_data_uri() {
        let img = RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]));
        let png = crate::export::encode_png(&img).unwrap();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&png);
        let uri = format!("data:image/png;base64,{b64}");
        let decoded = decode_payload(&uri).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
    }
}
