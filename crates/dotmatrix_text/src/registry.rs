//! Font registry for named fonts supplied by the host
//!
//! YAFF sources are registered as text and parsed on first load; bitmap
//! fonts are registered ready-built. Loaded fonts are shared as `Arc<Font>`.

use crate::bitmap::BitmapFont;
use crate::font::{Font, YaffFont};
use crate::{Result, TextError};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Registry of named fonts
#[derive(Debug, Default)]
pub struct FontRegistry {
    /// YAFF source text not yet parsed
    sources: FxHashMap<String, String>,
    /// Parsed or directly registered fonts
    fonts: FxHashMap<String, Arc<Font>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register YAFF source text under `name`
    ///
    /// Parsing is deferred until the font is first loaded. Registering an
    /// existing name replaces it.
    pub fn register_yaff(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        self.fonts.remove(&name);
        tracing::debug!("Registered yaff font source: {}", name);
        self.sources.insert(name, source.into());
    }

    /// Register a built bitmap font under its own name
    pub fn register_bitmap(&mut self, font: BitmapFont) -> Arc<Font> {
        let name = font.name().to_string();
        self.sources.remove(&name);
        let font = Arc::new(Font::Bitmap(font));
        tracing::debug!("Registered bitmap font: {}", name);
        self.fonts.insert(name, Arc::clone(&font));
        font
    }

    /// Check if a font is registered, loaded or not
    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name) || self.sources.contains_key(name)
    }

    /// Names of every registered font, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fonts
            .keys()
            .chain(self.sources.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Load a font by name, parsing its source on first use
    pub fn load(&mut self, name: &str) -> Result<Arc<Font>> {
        if let Some(font) = self.fonts.get(name) {
            return Ok(Arc::clone(font));
        }
        let source = self
            .sources
            .get(name)
            .ok_or_else(|| TextError::UnknownFont(name.to_string()))?;

        let font = Arc::new(Font::Yaff(YaffFont::parse(name, source)?));
        self.sources.remove(name);
        self.fonts.insert(name.to_string(), Arc::clone(&font));
        tracing::debug!("Loaded font: {}", name);
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "cell-size: 1x1\n\n'.':\n    @\n";

    #[test]
    fn test_load_parses_once_and_shares() {
        let mut registry = FontRegistry::new();
        registry.register_yaff("tiny", TINY);
        assert!(registry.contains("tiny"));

        let first = registry.load("tiny").unwrap();
        let second = registry.load("tiny").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.height(), 1);
    }

    #[test]
    fn test_unknown_and_broken_fonts() {
        let mut registry = FontRegistry::new();
        assert_eq!(
            registry.load("nope").unwrap_err(),
            TextError::UnknownFont("nope".into())
        );

        registry.register_yaff("broken", "spacing: sideways\n");
        assert!(matches!(
            registry.load("broken"),
            Err(TextError::Format { .. })
        ));
        // The source stays registered
        assert!(registry.contains("broken"));
    }

    #[test]
    fn test_names_include_both_kinds() {
        let mut registry = FontRegistry::new();
        registry.register_yaff("b", TINY);
        registry.register_bitmap(BitmapFont::new("a", 8, 1, ' ', vec![0]).unwrap());
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
