//! The editor shell: one mutable `StyleConfig`, one decoded base image,
//! render-on-change. Everything the UI does funnels through here, which
//! is what serializes style mutations against render passes.

use chrono::{DateTime, Utc};
use image::RgbaImage;
use tracing::{debug, info};

use crate::{
    config::{sanitize_price, Preset, StyleConfig, PRICE_PLACEHOLDER},
    error::EngineError,
    export,
    font::FontStore,
    loader::{decode_payload_blocking, DecodeTicket, ImageLoader},
    render,
};

/// What a render-triggering call actually did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenderStatus {
    /// The surface was re-rendered.
    Rendered,
    /// No base image yet (or the identical decode is already pending);
    /// the surface is unchanged.
    AwaitingImage,
    /// A stale decode completed and was discarded; the surface is
    /// unchanged.
    Superseded,
}

struct BaseImage {
    source: String,
    image: RgbaImage,
}

pub struct Editor {
    style: StyleConfig,
    fonts: FontStore,
    loader: ImageLoader,
    base: Option<BaseImage>,
    surface: Option<RgbaImage>,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_fonts(FontStore::new())
    }

    pub fn with_fonts(fonts: FontStore) -> Self {
        Self {
            style: StyleConfig::default(),
            fonts,
            loader: ImageLoader::new(),
            base: None,
            surface: None,
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn fonts_mut(&mut self) -> &mut FontStore {
        &mut self.fonts
    }

    /// The last rendered surface, if any render has happened yet.
    pub fn surface(&self) -> Option<&RgbaImage> {
        self.surface.as_ref()
    }

    /// Mutate the style and re-render. The edit is applied to a copy,
    /// normalized, and only then swapped in, so a rejected edit leaves
    /// the current style untouched.
    pub fn edit(
        &mut self,
        apply: impl FnOnce(&mut StyleConfig),
    ) -> Result<RenderStatus, EngineError> {
        let mut next = self.style.clone();
        apply(&mut next);
        next.normalize()?;
        self.style = next;
        self.rerender()
    }

    /// Replace the whole style in one step.
    pub fn apply_preset(&mut self, preset: Preset) -> Result<RenderStatus, EngineError> {
        info!(preset = preset.name(), "applying preset");
        preset.apply_to(&mut self.style);
        self.rerender()
    }

    /// Take a price suggestion from market analysis; placeholder values
    /// are ignored so they never overwrite what the user typed.
    pub fn sync_price(&mut self, raw: &str) -> Result<RenderStatus, EngineError> {
        let price = sanitize_price(raw);
        if price.is_empty() || price == PRICE_PLACEHOLDER {
            return Ok(self.current_status());
        }
        self.edit(|style| style.display_price = price)
    }

    /// Decode an encoded payload and, if it is still the latest request
    /// by completion time, install it and re-render with the style
    /// current at that moment.
    pub async fn load_image(&mut self, payload: &str) -> Result<RenderStatus, EngineError> {
        let Some(ticket) = self.begin_load(payload) else {
            return Ok(RenderStatus::AwaitingImage);
        };
        let result = decode_payload_blocking(payload.to_string()).await;
        self.finish_load(ticket, result)
    }

    /// Start a decode without awaiting it. `None` when the identical
    /// source is already pending.
    pub fn begin_load(&mut self, payload: &str) -> Option<DecodeTicket> {
        self.loader.request(payload)
    }

    /// Settle a decode started with [`Editor::begin_load`]. Stale
    /// completions are discarded without touching the surface; a failed
    /// decode likewise leaves the current base image and surface as
    /// they were.
    pub fn finish_load(
        &mut self,
        ticket: DecodeTicket,
        result: Result<RgbaImage, EngineError>,
    ) -> Result<RenderStatus, EngineError> {
        if !self.loader.is_current(&ticket) {
            return Ok(RenderStatus::Superseded);
        }
        match result {
            Ok(image) => {
                self.loader.complete(&ticket);
                debug!(source = ticket.source(), "decoded base image");
                self.base = Some(BaseImage {
                    source: ticket.source().to_string(),
                    image,
                });
                self.rerender()
            }
            Err(e) => {
                self.loader.complete(&ticket);
                Err(e)
            }
        }
    }

    /// Install an already-decoded bitmap, superseding any pending decode.
    pub fn set_image(
        &mut self,
        source: impl Into<String>,
        image: RgbaImage,
    ) -> Result<RenderStatus, EngineError> {
        self.loader.invalidate();
        self.base = Some(BaseImage {
            source: source.into(),
            image,
        });
        self.rerender()
    }

    pub fn image_source(&self) -> Option<&str> {
        self.base.as_ref().map(|b| b.source.as_str())
    }

    fn current_status(&self) -> RenderStatus {
        if self.surface.is_some() {
            RenderStatus::Rendered
        } else {
            RenderStatus::AwaitingImage
        }
    }

    fn rerender(&mut self) -> Result<RenderStatus, EngineError> {
        let Some(base) = &self.base else {
            return Ok(RenderStatus::AwaitingImage);
        };
        let surface = render::render(&base.image, &self.style, &self.fonts)?;
        self.surface = Some(surface);
        Ok(RenderStatus::Rendered)
    }

    /// Export the current surface as PNG bytes. Fails with `NoSurface`
    /// before the first successful render; never produces partial output.
    pub fn export_png(&self) -> Result<Vec<u8>, EngineError> {
        let surface = self.surface.as_ref().ok_or(EngineError::NoSurface)?;
        export::encode_png(surface)
    }

    pub fn export_file_name(&self, at: DateTime<Utc>) -> String {
        export::export_file_name(at)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
