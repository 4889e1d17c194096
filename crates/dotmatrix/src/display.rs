//! Display contract and the off-screen [`MemoryDisplay`]

use dotmatrix_paint::{Bitmap, Color, ColorMode, PixelBuffer, Rect, Rotation};
use thiserror::Error;

/// Display-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Pushing pixels to the device failed
    #[error("Display transport failed: {0}")]
    Transport(String),

    /// The display cannot rotate itself to the requested orientation
    #[error("Rotation {0:?} is not supported by this display")]
    RotationUnsupported(Rotation),

    /// A present region does not overlap the display
    #[error("Region {0:?} is outside the display")]
    RegionOutOfBounds(Rect),
}

/// A pixel buffer that can be presented on a physical device
pub trait Display: PixelBuffer {
    /// Push the whole buffer to the device
    fn show(&mut self) -> Result<(), DisplayError>;

    /// Push part of the buffer; defaults to a full present
    fn show_region(&mut self, region: Rect) -> Result<(), DisplayError> {
        let _ = region;
        self.show()
    }

    /// Color of a lit pixel on monochrome devices
    fn enabled_color(&self) -> Color {
        Color::WHITE
    }

    /// Color of an unlit pixel on monochrome devices
    fn disabled_color(&self) -> Color {
        Color::BLACK
    }

    /// Whether the device rotates itself, so drawing skips the coordinate remap
    fn native_rotation(&self) -> bool {
        false
    }

    /// Rotate the device; only meaningful with native rotation
    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        match rotation {
            Rotation::Normal => Ok(()),
            other => Err(DisplayError::RotationUnsupported(other)),
        }
    }
}

/// In-memory display that records what was presented
#[derive(Clone, Debug)]
pub struct MemoryDisplay {
    bitmap: Bitmap,
    native_rotation: bool,
    rotation: Rotation,
    presents: usize,
    last_region: Option<Rect>,
    frame: Option<Bitmap>,
}

impl MemoryDisplay {
    pub fn new(width: usize, height: usize, mode: ColorMode) -> Self {
        Self {
            bitmap: Bitmap::new(width, height, mode),
            native_rotation: false,
            rotation: Rotation::Normal,
            presents: 0,
            last_region: None,
            frame: None,
        }
    }

    /// Emulate a device that rotates itself
    ///
    /// Rotating by a quarter turn reallocates the buffer with swapped
    /// dimensions, clearing its contents.
    pub fn with_native_rotation(mut self) -> Self {
        self.native_rotation = true;
        self
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Number of completed presents
    pub fn presents(&self) -> usize {
        self.presents
    }

    /// Region of the most recent present, `None` for a full present
    pub fn last_region(&self) -> Option<Rect> {
        self.last_region
    }

    /// Snapshot of the buffer at the most recent present
    pub fn presented_frame(&self) -> Option<&Bitmap> {
        self.frame.as_ref()
    }
}

impl PixelBuffer for MemoryDisplay {
    fn width(&self) -> i32 {
        self.bitmap.width()
    }

    fn height(&self) -> i32 {
        self.bitmap.height()
    }

    fn color_mode(&self) -> ColorMode {
        self.bitmap.color_mode()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.bitmap.set_pixel(x, y, color);
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.bitmap.get_pixel(x, y)
    }

    fn invert_pixel(&mut self, x: i32, y: i32) {
        self.bitmap.invert_pixel(x, y);
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        self.bitmap.fill(rect, color);
    }

    fn clear(&mut self) {
        self.bitmap.clear();
    }

    fn write_buffer(&mut self, x: i32, y: i32, source: &dyn PixelBuffer) {
        self.bitmap.write_buffer(x, y, source);
    }

    fn as_bitmap(&self) -> Option<&Bitmap> {
        Some(&self.bitmap)
    }
}

impl Display for MemoryDisplay {
    fn show(&mut self) -> Result<(), DisplayError> {
        self.presents += 1;
        self.last_region = None;
        self.frame = Some(self.bitmap.clone());
        Ok(())
    }

    fn show_region(&mut self, region: Rect) -> Result<(), DisplayError> {
        if !region.intersects(&self.bitmap.bounds()) {
            return Err(DisplayError::RegionOutOfBounds(region));
        }
        self.presents += 1;
        self.last_region = Some(region);
        self.frame = Some(self.bitmap.clone());
        Ok(())
    }

    fn native_rotation(&self) -> bool {
        self.native_rotation
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        if !self.native_rotation {
            return match rotation {
                Rotation::Normal => Ok(()),
                other => Err(DisplayError::RotationUnsupported(other)),
            };
        }
        if rotation.is_transposed() != self.rotation.is_transposed() {
            let (w, h) = (self.bitmap.width() as usize, self.bitmap.height() as usize);
            self.bitmap = Bitmap::new(h, w, self.bitmap.color_mode());
        }
        self.rotation = rotation;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_snapshots_buffer() {
        let mut display = MemoryDisplay::new(4, 4, ColorMode::Format1bpp);
        display.set_pixel(1, 1, Color::WHITE);
        display.show().unwrap();
        display.set_pixel(2, 2, Color::WHITE);

        let frame = display.presented_frame().unwrap();
        assert_eq!(frame.get_pixel(1, 1), Color::WHITE);
        assert_eq!(frame.get_pixel(2, 2), Color::BLACK);
        assert_eq!(display.presents(), 1);
    }

    #[test]
    fn test_region_outside_is_rejected() {
        let mut display = MemoryDisplay::new(4, 4, ColorMode::Format1bpp);
        let region = Rect::new(10, 10, 12, 12);
        assert_eq!(
            display.show_region(region),
            Err(DisplayError::RegionOutOfBounds(region))
        );
        display.show_region(Rect::new(0, 0, 2, 2)).unwrap();
        assert_eq!(display.last_region(), Some(Rect::new(0, 0, 2, 2)));
    }

    #[test]
    fn test_native_rotation_swaps_dimensions() {
        let mut display = MemoryDisplay::new(8, 4, ColorMode::Format1bpp).with_native_rotation();
        display.set_rotation(Rotation::Rotate90).unwrap();
        assert_eq!((display.width(), display.height()), (4, 8));

        let mut plain = MemoryDisplay::new(8, 4, ColorMode::Format1bpp);
        assert!(plain.set_rotation(Rotation::Rotate180).is_err());
    }
}
