//! Canvas error types

use dotmatrix_paint::PaintError;
use dotmatrix_text::TextError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::display::DisplayError;

/// Errors raised through the [`Canvas`](crate::Canvas) facade
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Text was drawn or measured with no current font
    #[error("No font set on the canvas")]
    NoFont,

    /// `restore_state` was called before any `save_state`
    #[error("No saved canvas state to restore")]
    NoSavedState,

    #[error(transparent)]
    Paint(#[from] PaintError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The throttled frame loop panicked or its runtime shut down
    #[error("Present task failed: {0}")]
    PresentTask(#[from] tokio::task::JoinError),
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
