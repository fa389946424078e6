use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;

use crate::{config::FontFamily, error::EngineError};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FontWeight {
    Regular,
    Bold,
}

static FONT_FILE_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn load_font_file(path: &Path) -> Result<Arc<Font<'static>>, EngineError> {
    if let Some(f) = FONT_FILE_CACHE.lock().get(path) {
        return Ok(Arc::clone(f));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| EngineError::Font(format!("failed to read font {}: {e}", path.display())))?;
    let f = Font::try_from_vec(bytes)
        .ok_or_else(|| EngineError::Font(format!("failed to parse font {}", path.display())))?;

    let f = Arc::new(f);
    FONT_FILE_CACHE.lock().insert(path.to_path_buf(), Arc::clone(&f));
    Ok(f)
}

pub fn default_fonts_dir() -> PathBuf {
    if let Ok(p) = std::env::var("TIJARA_FONTS_DIR") {
        return PathBuf::from(p);
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("fonts")
}

fn family_file(family: FontFamily, weight: FontWeight) -> &'static str {
    match (family, weight) {
        (FontFamily::Inter, FontWeight::Bold) => "Inter-Bold.ttf",
        (FontFamily::Inter, FontWeight::Regular) => "Inter-Regular.ttf",
        (FontFamily::Playfair, FontWeight::Bold) => "PlayfairDisplay-Bold.ttf",
        (FontFamily::Playfair, FontWeight::Regular) => "PlayfairDisplay-Regular.ttf",
        (FontFamily::Oswald, FontWeight::Bold) => "Oswald-Bold.ttf",
        (FontFamily::Oswald, FontWeight::Regular) => "Oswald-Regular.ttf",
    }
}

fn generic_files(weight: FontWeight) -> &'static [&'static str] {
    match weight {
        FontWeight::Bold => &["DejaVuSans-Bold.ttf", "DejaVuSans.ttf"],
        FontWeight::Regular => &["DejaVuSans.ttf", "DejaVuSans-Bold.ttf"],
    }
}

/// Resolves style families to concrete fonts, with a generic sans fallback
/// when a family is not installed in the fonts directory.
pub struct FontStore {
    dir: PathBuf,
    overrides: HashMap<(FontFamily, FontWeight), Arc<Font<'static>>>,
    fallback: Option<Arc<Font<'static>>>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::with_dir(default_fonts_dir())
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overrides: HashMap::new(),
            fallback: None,
        }
    }

    /// Install a font for one family/weight without touching the filesystem.
    pub fn register(&mut self, family: FontFamily, weight: FontWeight, font: Arc<Font<'static>>) {
        self.overrides.insert((family, weight), font);
    }

    pub fn register_bytes(
        &mut self,
        family: FontFamily,
        weight: FontWeight,
        bytes: Vec<u8>,
    ) -> Result<(), EngineError> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| EngineError::Font("failed to parse font bytes".into()))?;
        self.register(family, weight, Arc::new(font));
        Ok(())
    }

    /// Last-resort font tried after the generic files.
    pub fn register_fallback(&mut self, font: Arc<Font<'static>>) {
        self.fallback = Some(font);
    }

    fn other(weight: FontWeight) -> FontWeight {
        match weight {
            FontWeight::Regular => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Regular,
        }
    }

    pub fn resolve(
        &self,
        family: FontFamily,
        weight: FontWeight,
    ) -> Result<Arc<Font<'static>>, EngineError> {
        if let Some(f) = self.overrides.get(&(family, weight)) {
            return Ok(Arc::clone(f));
        }

        // Exact file, then the family's other weight, then generic sans.
        let mut candidates = vec![
            family_file(family, weight),
            family_file(family, Self::other(weight)),
        ];
        candidates.extend(generic_files(weight).iter().copied());

        for name in candidates {
            let path = self.dir.join(name);
            if path.is_file() {
                return load_font_file(&path);
            }
        }

        if let Some(f) = self.overrides.get(&(family, Self::other(weight))) {
            return Ok(Arc::clone(f));
        }
        if let Some(f) = &self.fallback {
            return Ok(Arc::clone(f));
        }

        Err(EngineError::Font(format!(
            "no usable font for {family:?} {weight:?} in {}",
            self.dir.display()
        )))
    }
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_fails_without_any_font() {
        let store = FontStore::with_dir("/nonexistent/fonts");
        assert!(store.resolve(FontFamily::Inter, FontWeight::Bold).is_err());
    }

    #[test]
    fn registered_font_wins() {
        let Some(font) = crate::test_support::any_system_font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        let mut store = FontStore::with_dir("/nonexistent/fonts");
        store.register(FontFamily::Oswald, FontWeight::Bold, Arc::clone(&font));
        assert!(store.resolve(FontFamily::Oswald, FontWeight::Bold).is_ok());
        // other weight of a registered family resolves through the override
        assert!(store.resolve(FontFamily::Oswald, FontWeight::Regular).is_ok());
        // unrelated family still fails
        assert!(store.resolve(FontFamily::Inter, FontWeight::Bold).is_err());
    }

    #[test]
    fn fallback_covers_everything() {
        let Some(font) = crate::test_support::any_system_font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        let mut store = FontStore::with_dir("/nonexistent/fonts");
        store.register_fallback(font);
        for family in [FontFamily::Inter, FontFamily::Playfair, FontFamily::Oswald] {
            assert!(store.resolve(family, FontWeight::Bold).is_ok());
        }
    }
}
