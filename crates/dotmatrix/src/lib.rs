//! dotmatrix
//!
//! Software canvas for small pixel displays: shapes, polygons, antialiased
//! lines, bitmap and YAFF text, rotation and presenting.
//!
//! # Example
//!
//! ```ignore
//! use dotmatrix::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut fonts = FontRegistry::new();
//!     fonts.register_yaff("tiny", include_str!("tiny.yaff"));
//!
//!     let display = MemoryDisplay::new(128, 64, ColorMode::Format1bpp);
//!     let mut canvas = Canvas::new(display);
//!     canvas.set_font(Some(fonts.load("tiny")?));
//!
//!     canvas.draw_rounded_rectangle(0, 0, 128, 64, 6, Color::WHITE)?;
//!     canvas.draw_text(8, 8, "Hello", &TextOptions::default())?;
//!     canvas.show()
//! }
//! ```

mod canvas;
mod config;
mod display;
mod error;
mod present;

pub use canvas::{Canvas, CanvasState};
pub use config::{CanvasConfig, ConfigError};
pub use display::{Display, DisplayError, MemoryDisplay};
pub use error::{CanvasError, Result};
pub use present::{PresentOutcome, Presenter, PresenterConfig};

pub use dotmatrix_paint as paint;
pub use dotmatrix_text as text;

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::canvas::{Canvas, CanvasState};
    pub use crate::config::CanvasConfig;
    pub use crate::display::{Display, MemoryDisplay};
    pub use crate::error::{CanvasError, Result};
    pub use crate::present::{PresentOutcome, Presenter, PresenterConfig};

    pub use dotmatrix_paint::{
        Bitmap, BlitOptions, Color, ColorMode, HorizontalAlignment, Path, PixelBuffer, Point,
        PointF, Rect, Rotation, Size, VerticalAlignment,
    };
    pub use dotmatrix_text::{BitmapFont, Font, FontRegistry, TextOptions};
}
