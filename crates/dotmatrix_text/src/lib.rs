//! Bitmap font rendering for dotmatrix
//!
//! This crate provides:
//! - Fixed-width glyph bitmap fonts and text packing
//! - A YAFF font source parser
//! - Fixed-cell and proportional YAFF fonts
//! - A named font registry
//! - Text drawing and measuring on a [`dotmatrix_paint::Rasterizer`]

pub mod bitmap;
pub mod font;
pub mod glyph;
pub mod registry;
pub mod render;
pub mod yaff;

pub use bitmap::{BitmapFont, GlyphRows, PackedText};
pub use font::{Font, YaffFont, YaffLayout};
pub use glyph::{Glyph, Label};
pub use registry::FontRegistry;
pub use render::{draw_text, measure_text, TextOptions};
pub use yaff::YaffSource;

use thiserror::Error;

/// Font loading and rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("Unsupported glyph width {width}, expected 4, 6, 8 or 12")]
    UnsupportedWidth { width: u32 },

    #[error("Invalid font '{resource}': {message}")]
    Format { resource: String, message: String },

    #[error("{resource}:{line}: {message}")]
    Syntax {
        resource: String,
        line: usize,
        message: String,
    },

    #[error("Font '{0}' is not registered")]
    UnknownFont(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
