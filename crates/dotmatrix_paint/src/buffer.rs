//! Pixel buffer contract and the packed in-memory [`Bitmap`]

use crate::color::{Color, ColorMode};
use crate::error::{PaintError, Result};
use crate::geometry::Rect;

/// An addressable 2D color surface
///
/// Coordinates are physical buffer coordinates; rotation is applied by the
/// [`Rasterizer`](crate::Rasterizer) before calls reach the buffer.
pub trait PixelBuffer {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn color_mode(&self) -> ColorMode;

    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    fn get_pixel(&self, x: i32, y: i32) -> Color;

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    fn invert_pixel(&mut self, x: i32, y: i32) {
        let color = self.get_pixel(x, y);
        self.set_pixel(x, y, color.invert());
    }

    /// Alpha-composite `color` over the existing pixel with the given coverage
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        let background = self.get_pixel(x, y);
        self.set_pixel(x, y, background.blend(color, alpha));
    }

    /// Fill a rectangle, clipped to the buffer
    fn fill(&mut self, rect: Rect, color: Color) {
        let Some(area) = rect.normalized().intersect(&self.bounds()) else {
            return;
        };
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Reset every pixel to zero (black / off)
    fn clear(&mut self) {
        let bounds = self.bounds();
        self.fill(bounds, Color::BLACK);
    }

    /// Copy `source` so its top-left pixel lands on (x, y), clipped to the buffer
    fn write_buffer(&mut self, x: i32, y: i32, source: &dyn PixelBuffer) {
        let target = Rect::from_origin_size(x, y, source.width(), source.height());
        let Some(area) = target.intersect(&self.bounds()) else {
            return;
        };
        for dy in area.top..area.bottom {
            for dx in area.left..area.right {
                self.set_pixel(dx, dy, source.get_pixel(dx - x, dy - y));
            }
        }
    }

    /// Access to the packed representation, when there is one
    fn as_bitmap(&self) -> Option<&Bitmap> {
        None
    }
}

impl<T: PixelBuffer + ?Sized> PixelBuffer for &mut T {
    fn width(&self) -> i32 {
        (**self).width()
    }

    fn height(&self) -> i32 {
        (**self).height()
    }

    fn color_mode(&self) -> ColorMode {
        (**self).color_mode()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        (**self).set_pixel(x, y, color)
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        (**self).get_pixel(x, y)
    }

    fn invert_pixel(&mut self, x: i32, y: i32) {
        (**self).invert_pixel(x, y)
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        (**self).blend_pixel(x, y, color, alpha)
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        (**self).fill(rect, color)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn write_buffer(&mut self, x: i32, y: i32, source: &dyn PixelBuffer) {
        (**self).write_buffer(x, y, source)
    }

    fn as_bitmap(&self) -> Option<&Bitmap> {
        (**self).as_bitmap()
    }
}

/// In-memory pixel buffer stored packed in its [`ColorMode`]
///
/// Rows are padded to whole bytes. Within a row pixels are stored MSB-first,
/// so for sub-byte formats the leftmost pixel occupies the high bits of the
/// first byte. Multi-byte formats are big-endian, the wire order most small
/// display controllers expect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    mode: ColorMode,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    #[must_use]
    pub fn new(width: usize, height: usize, mode: ColorMode) -> Self {
        let stride = mode.stride(width);
        Self {
            width,
            height,
            mode,
            stride,
            data: vec![0; stride * height],
        }
    }

    /// Wrap raw packed bytes laid out as described on [`Bitmap`]
    pub fn from_bytes(width: usize, height: usize, mode: ColorMode, data: Vec<u8>) -> Result<Self> {
        let stride = mode.stride(width);
        if data.len() != stride * height {
            return Err(PaintError::BufferSize {
                expected: stride * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mode,
            stride,
            data,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Return `true` if the coordinates are inside the bitmap
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Bit offset of a pixel from the start of the data
    fn bit_offset(&self, x: i32, y: i32) -> usize {
        assert!(
            self.contains(x, y),
            "pixel ({x}, {y}) outside {}x{} bitmap",
            self.width,
            self.height
        );
        y as usize * self.stride * 8 + x as usize * self.mode.bits_per_pixel() as usize
    }

    /// Read the raw encoded value of a pixel
    ///
    /// # Panics
    /// Panics if the coordinates are outside the bitmap
    #[must_use]
    pub fn get_raw(&self, x: i32, y: i32) -> u32 {
        let bpp = self.mode.bits_per_pixel() as usize;
        let bit = self.bit_offset(x, y);
        let index = bit / 8;

        if bpp % 8 == 0 {
            return self.data[index..index + bpp / 8]
                .iter()
                .fold(0u32, |acc, &byte| (acc << 8) | byte as u32);
        }

        // Sub-byte and 12-bit pixels fit inside a 16-bit window
        let window =
            (self.data[index] as u32) << 8 | *self.data.get(index + 1).unwrap_or(&0) as u32;
        let shift = 16 - bpp - bit % 8;
        (window >> shift) & ((1 << bpp) - 1)
    }

    /// Write a raw encoded value to a pixel
    ///
    /// # Panics
    /// Panics if the coordinates are outside the bitmap
    pub fn set_raw(&mut self, x: i32, y: i32, raw: u32) {
        let bpp = self.mode.bits_per_pixel() as usize;
        let bit = self.bit_offset(x, y);
        let index = bit / 8;

        if bpp % 8 == 0 {
            let bytes = bpp / 8;
            for i in 0..bytes {
                self.data[index + i] = (raw >> (8 * (bytes - 1 - i))) as u8;
            }
            return;
        }

        let shift = 16 - bpp - bit % 8;
        let mask = ((1u32 << bpp) - 1) << shift;
        let value = (raw << shift) & mask;

        let high = &mut self.data[index];
        *high = (*high & !((mask >> 8) as u8)) | (value >> 8) as u8;
        if mask & 0xFF != 0 {
            let low = &mut self.data[index + 1];
            *low = (*low & !(mask as u8)) | value as u8;
        }
    }

    /// Re-encode every pixel into another pixel format
    #[must_use]
    pub fn convert(&self, mode: ColorMode) -> Bitmap {
        let mut converted = Bitmap::new(self.width, self.height, mode);
        converted.write_buffer(0, 0, self);
        converted
    }

    fn copy_rows(&mut self, x: i32, y: i32, source: &Bitmap, area: Rect) {
        let bytes_per_pixel = self.mode.bits_per_pixel() as usize / 8;
        let span = area.width() as usize * bytes_per_pixel;
        for row in area.top..area.bottom {
            let src_start =
                (row - y) as usize * source.stride + (area.left - x) as usize * bytes_per_pixel;
            let dst_start = row as usize * self.stride + area.left as usize * bytes_per_pixel;
            self.data[dst_start..dst_start + span]
                .copy_from_slice(&source.data[src_start..src_start + span]);
        }
    }
}

impl PixelBuffer for Bitmap {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn color_mode(&self) -> ColorMode {
        self.mode
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.set_raw(x, y, color.encode(self.mode));
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        Color::decode(self.get_raw(x, y), self.mode)
    }

    fn invert_pixel(&mut self, x: i32, y: i32) {
        let bpp = self.mode.bits_per_pixel();
        let raw = self.get_raw(x, y);
        let inverted = match self.mode {
            // Keep alpha untouched
            ColorMode::Format32bppRgba8888 => raw ^ 0xFFFF_FF00,
            _ => !raw & ((1u64 << bpp) - 1) as u32,
        };
        self.set_raw(x, y, inverted);
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let Some(area) = rect.normalized().intersect(&self.bounds()) else {
            return;
        };
        let raw = color.encode(self.mode);
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                self.set_raw(x, y, raw);
            }
        }
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn write_buffer(&mut self, x: i32, y: i32, source: &dyn PixelBuffer) {
        let target = Rect::from_origin_size(x, y, source.width(), source.height());
        let Some(area) = target.intersect(&self.bounds()) else {
            return;
        };

        match source.as_bitmap() {
            Some(bitmap) if bitmap.mode == self.mode && self.mode.bits_per_pixel() % 8 == 0 => {
                self.copy_rows(x, y, bitmap, area);
            }
            Some(bitmap) if bitmap.mode == self.mode => {
                for dy in area.top..area.bottom {
                    for dx in area.left..area.right {
                        self.set_raw(dx, dy, bitmap.get_raw(dx - x, dy - y));
                    }
                }
            }
            _ => {
                for dy in area.top..area.bottom {
                    for dx in area.left..area.right {
                        self.set_pixel(dx, dy, source.get_pixel(dx - x, dy - y));
                    }
                }
            }
        }
    }

    fn as_bitmap(&self) -> Option<&Bitmap> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stride_padding() {
        assert_eq!(Bitmap::new(10, 2, ColorMode::Format1bpp).stride(), 2);
        assert_eq!(Bitmap::new(3, 2, ColorMode::Format12bppRgb444).stride(), 5);
        assert_eq!(Bitmap::new(3, 2, ColorMode::Format24bppRgb888).as_bytes().len(), 18);
    }

    #[test]
    fn test_1bpp_is_msb_first() {
        let mut bitmap = Bitmap::new(10, 1, ColorMode::Format1bpp);
        bitmap.set_pixel(0, 0, Color::WHITE);
        bitmap.set_pixel(9, 0, Color::WHITE);
        assert_eq!(bitmap.as_bytes(), &[0b1000_0000, 0b0100_0000]);
        assert_eq!(bitmap.get_pixel(9, 0), Color::WHITE);
        assert_eq!(bitmap.get_pixel(8, 0), Color::BLACK);
    }

    #[test]
    fn test_12bpp_pixels_share_a_byte() {
        let mut bitmap = Bitmap::new(2, 1, ColorMode::Format12bppRgb444);
        bitmap.set_raw(0, 0, 0xABC);
        bitmap.set_raw(1, 0, 0x123);
        assert_eq!(bitmap.as_bytes(), &[0xAB, 0xC1, 0x23]);
        assert_eq!(bitmap.get_raw(0, 0), 0xABC);
        assert_eq!(bitmap.get_raw(1, 0), 0x123);
    }

    #[test]
    fn test_565_is_big_endian() {
        let mut bitmap = Bitmap::new(1, 1, ColorMode::Format16bppRgb565);
        bitmap.set_pixel(0, 0, Color::RED);
        assert_eq!(bitmap.as_bytes(), &[0xF8, 0x00]);
    }

    #[test]
    fn test_invert_pixel() {
        let mut bitmap = Bitmap::new(4, 4, ColorMode::Format4bppGray);
        bitmap.invert_pixel(1, 1);
        assert_eq!(bitmap.get_pixel(1, 1), Color::WHITE);
        bitmap.invert_pixel(1, 1);
        assert_eq!(bitmap.get_pixel(1, 1), Color::BLACK);
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut bitmap = Bitmap::new(4, 4, ColorMode::Format8bppGray);
        bitmap.fill(Rect::new(-2, -2, 2, 2), Color::WHITE);
        assert_eq!(bitmap.get_pixel(1, 1), Color::WHITE);
        assert_eq!(bitmap.get_pixel(2, 2), Color::BLACK);
    }

    #[test]
    fn test_write_buffer_row_copy_and_conversion() {
        let mut source = Bitmap::new(2, 2, ColorMode::Format24bppRgb888);
        source.set_pixel(0, 0, Color::RED);
        source.set_pixel(1, 1, Color::BLUE);

        let mut same = Bitmap::new(4, 4, ColorMode::Format24bppRgb888);
        same.write_buffer(1, 1, &source);
        assert_eq!(same.get_pixel(1, 1), Color::RED);
        assert_eq!(same.get_pixel(2, 2), Color::BLUE);

        let converted = same.convert(ColorMode::Format16bppRgb565);
        assert_eq!(converted.get_pixel(1, 1), Color::RED);
        assert_eq!(converted.get_pixel(2, 2), Color::BLUE);
        assert_eq!(converted.get_pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_from_bytes_checks_length() {
        let err = Bitmap::from_bytes(8, 2, ColorMode::Format1bpp, vec![0; 3]).unwrap_err();
        assert_eq!(
            err,
            PaintError::BufferSize {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_write_panics() {
        let mut bitmap = Bitmap::new(2, 2, ColorMode::Format8bppGray);
        bitmap.set_pixel(2, 0, Color::WHITE);
    }
}
