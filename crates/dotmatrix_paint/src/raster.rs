//! Rasterizer - the main drawing API
//!
//! Every write goes through [`Rasterizer::draw_pixel`] or one of the span
//! helpers below, which apply the active [`Rotation`] and the out-of-bounds
//! policy before touching the [`PixelBuffer`].

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::rotation::Rotation;

/// Scan converter drawing into an owned pixel buffer
#[derive(Clone, Debug)]
pub struct Rasterizer<B> {
    buffer: B,
    stroke: u32,
    pen_color: Color,
    rotation: Rotation,
    native_rotation: bool,
    ignore_out_of_bounds: bool,
}

impl<B: PixelBuffer> Rasterizer<B> {
    pub fn new(buffer: B) -> Self {
        Self {
            buffer,
            stroke: 1,
            pen_color: Color::WHITE,
            rotation: Rotation::Normal,
            native_rotation: false,
            ignore_out_of_bounds: true,
        }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_inner(self) -> B {
        self.buffer
    }

    // === State ===

    pub fn stroke(&self) -> u32 {
        self.stroke
    }

    /// Line and outline thickness in pixels, at least 1
    pub fn set_stroke(&mut self, stroke: u32) {
        self.stroke = stroke.max(1);
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.pen_color = color;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Whether the target rotates itself, bypassing the coordinate remap
    pub fn native_rotation(&self) -> bool {
        self.native_rotation
    }

    pub fn set_native_rotation(&mut self, native: bool) {
        self.native_rotation = native;
    }

    pub fn ignore_out_of_bounds(&self) -> bool {
        self.ignore_out_of_bounds
    }

    pub fn set_ignore_out_of_bounds(&mut self, ignore: bool) {
        self.ignore_out_of_bounds = ignore;
    }

    /// The rotation actually applied to coordinates
    pub fn effective_rotation(&self) -> Rotation {
        if self.native_rotation {
            Rotation::Normal
        } else {
            self.rotation
        }
    }

    /// Logical width, taking the rotation into account
    pub fn width(&self) -> i32 {
        self.logical_size().0
    }

    /// Logical height, taking the rotation into account
    pub fn height(&self) -> i32 {
        self.logical_size().1
    }

    fn logical_size(&self) -> (i32, i32) {
        self.effective_rotation()
            .logical_size(self.buffer.width(), self.buffer.height())
    }

    /// Logical drawing area
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        self.bounds().contains(x, y)
    }

    fn to_physical(&self, x: i32, y: i32) -> (i32, i32) {
        self.effective_rotation()
            .apply(x, y, self.buffer.width(), self.buffer.height())
    }

    // === Pixels ===

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.ignore_out_of_bounds && !self.is_in_bounds(x, y) {
            return;
        }
        let (px, py) = self.to_physical(x, y);
        self.buffer.set_pixel(px, py, color);
    }

    pub fn draw_point(&mut self, point: Point, color: Color) {
        self.draw_pixel(point.x, point.y, color);
    }

    /// Read back a logical pixel, `None` outside the drawing area
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        let (px, py) = self.to_physical(x, y);
        Some(self.buffer.get_pixel(px, py))
    }

    /// Alpha-composite `color` over a logical pixel
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if self.ignore_out_of_bounds && !self.is_in_bounds(x, y) {
            return;
        }
        let (px, py) = self.to_physical(x, y);
        self.buffer.blend_pixel(px, py, color, alpha);
    }

    pub fn invert_pixel(&mut self, x: i32, y: i32) {
        if self.ignore_out_of_bounds && !self.is_in_bounds(x, y) {
            return;
        }
        let (px, py) = self.to_physical(x, y);
        self.buffer.invert_pixel(px, py);
    }

    pub fn invert_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let Some(area) = self.clip(Rect::from_origin_size(x, y, width, height).normalized()) else {
            return;
        };
        for py in area.top..area.bottom {
            for px in area.left..area.right {
                self.invert_pixel(px, py);
            }
        }
    }

    /// Reset the whole buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Paint the whole buffer with one color
    pub fn fill(&mut self, color: Color) {
        let bounds = self.buffer.bounds();
        self.buffer.fill(bounds, color);
    }

    /// Restrict a logical rectangle to the drawing area when the
    /// out-of-bounds policy is active
    pub(crate) fn clip(&self, rect: Rect) -> Option<Rect> {
        if self.ignore_out_of_bounds {
            rect.intersect(&self.bounds())
        } else {
            (!rect.is_empty()).then_some(rect)
        }
    }

    // === Rectangles ===

    /// Fill a logical rectangle; negative sizes extend up/left from (x, y)
    pub fn fill_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let rect = Rect::from_origin_size(x, y, width, height).normalized();
        let Some(area) = self.clip(rect) else {
            return;
        };
        let physical = self.effective_rotation().apply_rect(
            area,
            self.buffer.width(),
            self.buffer.height(),
        );
        self.buffer.fill(physical, color);
    }

    /// Fill the inclusive span `x0..=x1` on row `y`, ignoring stroke
    pub(crate) fn fill_span(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        let (x0, x1) = if self.ignore_out_of_bounds {
            if y < 0 || y >= self.height() {
                return;
            }
            (x0.max(0), x1.min(self.width() - 1))
        } else {
            (x0, x1)
        };
        if x1 < x0 {
            return;
        }
        let width = (i64::from(x1) - i64::from(x0) + 1).min(i64::from(i32::MAX)) as i32;
        self.fill_rectangle(x0, y, width, 1, color);
    }

    /// Rectangle outline, `stroke` pixels thick and inset into the rectangle
    pub fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let rect = Rect::from_origin_size(x, y, width, height).normalized();
        let s = self.stroke as i32;
        if rect.is_empty() {
            return;
        }
        if 2 * s >= rect.width() || 2 * s >= rect.height() {
            self.fill_rectangle(rect.left, rect.top, rect.width(), rect.height(), color);
            return;
        }
        let (l, t, w, h) = (rect.left, rect.top, rect.width(), rect.height());
        self.fill_rectangle(l, t, w, s, color);
        self.fill_rectangle(l, t + h - s, w, s, color);
        self.fill_rectangle(l, t + s, s, h - 2 * s, color);
        self.fill_rectangle(l + w - s, t + s, s, h - 2 * s, color);
    }

    // === Lines ===

    /// Horizontal line of `length` pixels; a negative length extends left
    pub fn draw_horizontal_line(&mut self, x: i32, y: i32, length: i32, color: Color) {
        let (x, length) = if length < 0 {
            (x + length + 1, -length)
        } else {
            (x, length)
        };
        let s = self.stroke as i32;
        self.fill_rectangle(x, y - s / 2, length, s, color);
    }

    /// Vertical line of `length` pixels; a negative length extends up
    pub fn draw_vertical_line(&mut self, x: i32, y: i32, length: i32, color: Color) {
        let (y, length) = if length < 0 {
            (y + length + 1, -length)
        } else {
            (y, length)
        };
        let s = self.stroke as i32;
        self.fill_rectangle(x - s / 2, y, s, length, color);
    }

    /// Line between two points, inclusive of both endpoints
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if y0 == y1 {
            self.draw_horizontal_line(x0.min(x1), y0, (x1 - x0).abs() + 1, color);
            return;
        }
        if x0 == x1 {
            self.draw_vertical_line(x0, y0.min(y1), (y1 - y0).abs() + 1, color);
            return;
        }
        if self.stroke == 1 {
            self.draw_single_width_line(x0, y0, x1, y1, color);
            return;
        }

        // Parallel 1px lines spread along the minor axis
        let s = self.stroke as i32;
        let shallow = (x1 - x0).abs() > (y1 - y0).abs();
        for i in 0..s {
            let offset = i - s / 2;
            if shallow {
                self.draw_single_width_line(x0, y0 + offset, x1, y1 + offset, color);
            } else {
                self.draw_single_width_line(x0 + offset, y0, x1 + offset, y1, color);
            }
        }
    }

    pub fn draw_line_between(&mut self, from: Point, to: Point, color: Color) {
        self.draw_line(from.x, from.y, to.x, to.y, color);
    }

    /// Bresenham's algorithm
    ///
    /// Endpoints are ordered along the major axis first so both drawing
    /// directions produce the same pixels.
    fn draw_single_width_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let reversed = if steep { y0 > y1 } else { x0 > x1 };
        let (x0, y0, x1, y1) = if reversed {
            (x1, y1, x0, y0)
        } else {
            (x0, y0, x1, y1)
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.draw_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    // === Triangles ===

    pub fn draw_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Color) {
        self.draw_line_between(p0, p1, color);
        self.draw_line_between(p1, p2, color);
        self.draw_line_between(p2, p0, color);
    }

    /// Filled triangle, stepping both active edges with integer slopes
    ///
    /// Row `y` of an edge from `(xa, ya)` sits at `xa + dx * (y - ya) / dy`,
    /// truncated. Products are taken in `i128` so extreme vertices cannot
    /// overflow, and only on-screen rows are walked under the out-of-bounds
    /// policy.
    pub fn fill_triangle(&mut self, p0: Point, p1: Point, p2: Point, color: Color) {
        let mut v = [p0, p1, p2];
        v.sort_by_key(|p| p.y);
        let [Point { x: x0, y: y0 }, Point { x: x1, y: y1 }, Point { x: x2, y: y2 }] = v;

        if y0 == y2 {
            let a = x0.min(x1).min(x2);
            let b = x0.max(x1).max(x2);
            self.fill_span(a, b, y0, color);
            return;
        }

        // Include the middle row in the upper half only when the lower
        // half is flat
        let last = if y1 == y2 {
            i64::from(y1)
        } else {
            i64::from(y1) - 1
        };
        let (first, end) = if self.ignore_out_of_bounds {
            (y0.max(0), y2.min(self.height() - 1))
        } else {
            (y0, y2)
        };

        let edge_x = |xa: i32, ya: i32, xb: i32, yb: i32, y: i32| -> i32 {
            let dx = i128::from(xb) - i128::from(xa);
            let dy = i128::from(yb) - i128::from(ya);
            let x = i128::from(xa) + dx * (i128::from(y) - i128::from(ya)) / dy;
            x.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
        };

        for y in first..=end {
            let a = if i64::from(y) <= last {
                edge_x(x0, y0, x1, y1, y)
            } else {
                edge_x(x1, y1, x2, y2, y)
            };
            let b = edge_x(x0, y0, x2, y2, y);
            self.fill_span(a.min(b), a.max(b), y, color);
        }
    }

    // === Bitmaps ===

    /// Draw a 1-bit image, `scale` x `scale` pixels per set bit
    ///
    /// Clear bits are left untouched.
    pub fn draw_bitmap(&mut self, x: i32, y: i32, image: BitImage<'_>, color: Color, scale: u32) {
        let scale = scale.max(1) as i32;
        for row in 0..image.height {
            for col in 0..image.width {
                if !image.get(col, row) {
                    continue;
                }
                let px = x + col as i32 * scale;
                let py = y + row as i32 * scale;
                if scale == 1 {
                    self.draw_pixel(px, py, color);
                } else {
                    self.fill_rectangle(px, py, scale, scale, color);
                }
            }
        }
    }
}

/// A borrowed 1-bit image
///
/// Each row is `stride` bytes and bits are LSB-first, so bit 0 of a row's
/// first byte is its leftmost pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitImage<'a> {
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub bits: &'a [u8],
}

impl<'a> BitImage<'a> {
    /// Image with tightly packed rows of `(width + 7) / 8` bytes
    pub fn new(width: usize, height: usize, bits: &'a [u8]) -> Self {
        Self {
            width,
            height,
            stride: (width + 7) / 8,
            bits,
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Whether the bit at (x, y) is set; missing bytes read as clear
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits
            .get(y * self.stride + x / 8)
            .is_some_and(|byte| byte & (1 << (x % 8)) != 0)
    }
}
