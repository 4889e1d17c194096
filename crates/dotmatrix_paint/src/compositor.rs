//! Copying one pixel buffer into another

use tracing::trace;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::Rect;
use crate::raster::Rasterizer;
use crate::rotation::Rotation;

/// Which edge of the source lands on the anchor x coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    /// Offset from the anchor to the left edge of something `width` wide
    pub const fn offset(&self, width: i32) -> i32 {
        match self {
            HorizontalAlignment::Left => 0,
            HorizontalAlignment::Center => -width / 2,
            HorizontalAlignment::Right => -width,
        }
    }
}

/// Which edge of the source lands on the anchor y coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    pub const fn offset(&self, height: i32) -> i32 {
        match self {
            VerticalAlignment::Top => 0,
            VerticalAlignment::Center => -height / 2,
            VerticalAlignment::Bottom => -height,
        }
    }
}

/// How [`Rasterizer::draw_buffer`] places and filters the source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlitOptions {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    /// Source pixels of this color are skipped
    pub transparent: Option<Color>,
}

impl BlitOptions {
    pub fn aligned(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
            transparent: None,
        }
    }

    pub fn with_transparent(mut self, color: Color) -> Self {
        self.transparent = Some(color);
        self
    }
}

impl<B: PixelBuffer> Rasterizer<B> {
    /// Composite `source` anchored at (x, y)
    ///
    /// Without rotation or a transparent color, and with the source fully
    /// inside the target, this is a direct buffer write. Otherwise pixels
    /// are copied one at a time through the rotation and clipping rules.
    pub fn draw_buffer(&mut self, x: i32, y: i32, source: &dyn PixelBuffer, options: BlitOptions) {
        let (width, height) = (source.width(), source.height());
        let x = x + options.horizontal.offset(width);
        let y = y + options.vertical.offset(height);
        let target = Rect::from_origin_size(x, y, width, height);

        if self.effective_rotation() == Rotation::Normal
            && options.transparent.is_none()
            && self.bounds().contains_rect(&target)
        {
            trace!(x, y, width, height, "draw_buffer direct");
            self.buffer_mut().write_buffer(x, y, source);
            return;
        }

        let Some(area) = self.clip(target) else {
            return;
        };
        trace!(x, y, width, height, "draw_buffer per pixel");
        for dy in area.top..area.bottom {
            for dx in area.left..area.right {
                let color = source.get_pixel(dx - x, dy - y);
                if options.transparent == Some(color) {
                    continue;
                }
                self.draw_pixel(dx, dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Bitmap;
    use crate::color::ColorMode;
    use pretty_assertions::assert_eq;

    fn checker(width: usize, height: usize) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height, ColorMode::Format16bppRgb565);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if (x + y) % 2 == 0 {
                    bitmap.set_pixel(x, y, Color::RED);
                }
            }
        }
        bitmap
    }

    #[test]
    fn test_alignment_offsets() {
        assert_eq!(HorizontalAlignment::Center.offset(10), -5);
        assert_eq!(HorizontalAlignment::Right.offset(10), -10);
        assert_eq!(VerticalAlignment::Bottom.offset(4), -4);
    }

    #[test]
    fn test_centered_blit() {
        let mut r = Rasterizer::new(Bitmap::new(8, 8, ColorMode::Format16bppRgb565));
        let options = BlitOptions::aligned(HorizontalAlignment::Center, VerticalAlignment::Center);
        r.draw_buffer(4, 4, &checker(2, 2), options);
        assert_eq!(r.get_pixel(3, 3), Some(Color::RED));
        assert_eq!(r.get_pixel(4, 3), Some(Color::BLACK));
        assert_eq!(r.get_pixel(4, 4), Some(Color::RED));
    }

    #[test]
    fn test_transparent_pixels_keep_destination() {
        let mut r = Rasterizer::new(Bitmap::new(4, 4, ColorMode::Format16bppRgb565));
        r.fill(Color::BLUE);
        let options = BlitOptions::default().with_transparent(Color::BLACK);
        r.draw_buffer(0, 0, &checker(4, 4), options);
        assert_eq!(r.get_pixel(0, 0), Some(Color::RED));
        assert_eq!(r.get_pixel(1, 0), Some(Color::BLUE));
    }

    #[test]
    fn test_partially_outside_is_clipped() {
        let mut r = Rasterizer::new(Bitmap::new(4, 4, ColorMode::Format16bppRgb565));
        r.draw_buffer(3, 3, &checker(4, 4), BlitOptions::default());
        assert_eq!(r.get_pixel(3, 3), Some(Color::RED));
        assert_eq!(r.get_pixel(2, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_rotated_blit_goes_through_remap() {
        let mut r = Rasterizer::new(Bitmap::new(4, 4, ColorMode::Format16bppRgb565));
        r.set_rotation(Rotation::Rotate180);
        r.draw_buffer(0, 0, &checker(1, 1), BlitOptions::default());
        assert_eq!(r.buffer().get_pixel(3, 3), Color::RED);
        assert_eq!(r.get_pixel(0, 0), Some(Color::RED));
    }
}
