//! Canvas: a rasterizer bound to a display, with a current font and a
//! single saved state slot

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use dotmatrix_paint::{Color, Rasterizer, Rect, Rotation, Size};
use dotmatrix_text::{Font, TextOptions};
use tracing::debug;

use crate::config::CanvasConfig;
use crate::display::Display;
use crate::error::{CanvasError, Result};

/// Snapshot taken by [`Canvas::save_state`]
#[derive(Clone, Debug)]
pub struct CanvasState {
    pub font: Option<Arc<Font>>,
    pub stroke: u32,
    pub rotation: Rotation,
    pub pen_color: Color,
}

/// Drawing surface over a [`Display`]
///
/// Every [`Rasterizer`] primitive is available through `Deref`.
pub struct Canvas<D: Display> {
    raster: Rasterizer<D>,
    font: Option<Arc<Font>>,
    saved: Option<CanvasState>,
}

impl<D: Display> Canvas<D> {
    pub fn new(display: D) -> Self {
        let native = display.native_rotation();
        let pen = display.enabled_color();
        let mut raster = Rasterizer::new(display);
        raster.set_native_rotation(native);
        raster.set_pen_color(pen);
        Self {
            raster,
            font: None,
            saved: None,
        }
    }

    pub fn with_config(display: D, config: &CanvasConfig) -> Result<Self> {
        let mut canvas = Self::new(display);
        canvas.apply_config(config)?;
        Ok(canvas)
    }

    /// Apply rotation, stroke, pen color and the out-of-bounds policy
    pub fn apply_config(&mut self, config: &CanvasConfig) -> Result<()> {
        config.validate()?;
        self.set_rotation(config.rotation()?)?;
        self.raster.set_stroke(config.stroke);
        self.raster.set_pen_color(config.pen_color()?);
        self.raster
            .set_ignore_out_of_bounds(config.ignore_out_of_bounds);
        debug!(?config, "applied canvas config");
        Ok(())
    }

    pub fn display(&self) -> &D {
        self.raster.buffer()
    }

    pub fn display_mut(&mut self) -> &mut D {
        self.raster.buffer_mut()
    }

    pub fn into_display(self) -> D {
        self.raster.into_inner()
    }

    pub fn font(&self) -> Option<&Arc<Font>> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<Arc<Font>>) {
        self.font = font;
    }

    /// Rotate drawing; displays with native rotation rotate themselves
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<()> {
        if self.raster.native_rotation() {
            self.raster.buffer_mut().set_rotation(rotation)?;
        }
        self.raster.set_rotation(rotation);
        Ok(())
    }

    /// Copy font, stroke, rotation and pen color into the saved slot,
    /// replacing any earlier save
    pub fn save_state(&mut self) {
        self.saved = Some(CanvasState {
            font: self.font.clone(),
            stroke: self.raster.stroke(),
            rotation: self.raster.rotation(),
            pen_color: self.raster.pen_color(),
        });
    }

    /// Reapply the saved slot; the slot is kept for later restores
    pub fn restore_state(&mut self) -> Result<()> {
        let state = self.saved.clone().ok_or(CanvasError::NoSavedState)?;
        self.font = state.font;
        self.raster.set_stroke(state.stroke);
        self.raster.set_pen_color(state.pen_color);
        self.set_rotation(state.rotation)
    }

    pub fn saved_state(&self) -> Option<&CanvasState> {
        self.saved.as_ref()
    }

    fn current_font(&self) -> Result<Arc<Font>> {
        self.font.clone().ok_or(CanvasError::NoFont)
    }

    /// Draw text in the pen color with the current font
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, options: &TextOptions) -> Result<()> {
        let font = self.current_font()?;
        let color = self.raster.pen_color();
        dotmatrix_text::draw_text(&mut self.raster, &font, x, y, text, color, options);
        Ok(())
    }

    pub fn measure_text(&self, text: &str, scale: u32) -> Result<Size> {
        let font = self.current_font()?;
        Ok(dotmatrix_text::measure_text(&font, text, scale))
    }

    /// Present the whole buffer
    pub fn show(&mut self) -> Result<()> {
        self.raster.buffer_mut().show()?;
        Ok(())
    }

    pub fn show_region(&mut self, region: Rect) -> Result<()> {
        self.raster.buffer_mut().show_region(region)?;
        Ok(())
    }
}

impl<D: Display> Deref for Canvas<D> {
    type Target = Rasterizer<D>;

    fn deref(&self) -> &Self::Target {
        &self.raster
    }
}

impl<D: Display> DerefMut for Canvas<D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.raster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryDisplay;
    use dotmatrix_paint::{ColorMode, PixelBuffer};

    fn canvas() -> Canvas<MemoryDisplay> {
        Canvas::new(MemoryDisplay::new(16, 8, ColorMode::Format1bpp))
    }

    #[test]
    fn test_restore_without_save_fails() {
        let mut canvas = canvas();
        assert!(matches!(canvas.restore_state(), Err(CanvasError::NoSavedState)));
    }

    #[test]
    fn test_save_set_stroke_restore() {
        let mut canvas = canvas();
        canvas.save_state();
        canvas.set_stroke(3);
        canvas.restore_state().unwrap();
        assert_eq!(canvas.stroke(), 1);
    }

    #[test]
    fn test_text_needs_font() {
        let mut canvas = canvas();
        assert!(matches!(
            canvas.draw_text(0, 0, "hi", &TextOptions::default()),
            Err(CanvasError::NoFont)
        ));
        assert!(matches!(canvas.measure_text("hi", 1), Err(CanvasError::NoFont)));
    }

    #[test]
    fn test_native_rotation_goes_to_display() {
        let display = MemoryDisplay::new(16, 8, ColorMode::Format1bpp).with_native_rotation();
        let mut canvas = Canvas::new(display);
        canvas.set_rotation(Rotation::Rotate90).unwrap();
        assert_eq!(canvas.display().rotation(), Rotation::Rotate90);
        // The display reallocated itself, no remap on top
        assert_eq!((canvas.width(), canvas.height()), (8, 16));
        canvas.draw_pixel(0, 0, Color::WHITE);
        assert_eq!(canvas.display().bitmap().get_pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn test_software_rotation_rejected_by_plain_display_is_not_forwarded() {
        let mut canvas = canvas();
        canvas.set_rotation(Rotation::Rotate180).unwrap();
        assert_eq!(canvas.display().rotation(), Rotation::Normal);
        assert_eq!(canvas.rotation(), Rotation::Rotate180);
    }
}
