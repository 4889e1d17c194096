//! Circles, quadrants, arcs and rounded rectangles
//!
//! All curves come from the midpoint circle algorithm. Each step yields one
//! octant point which is mirrored eight ways; with `center_between_pixels`
//! the mirrored coordinates on the positive side are pulled in by one pixel
//! so the shape is centered on the corner between four pixels.

use std::f32::consts::TAU;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::{PaintError, Result};
use crate::raster::Rasterizer;

/// Octant points `(x, y)` with `0 <= x <= y` for a circle of `radius`
fn octant(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    let mut x = 0;
    let mut y = radius;
    let mut d = 1 - radius;
    std::iter::from_fn(move || {
        if x > y {
            return None;
        }
        let point = (x, y);
        x += 1;
        if d < 0 {
            d += 2 * x + 1;
        } else {
            y -= 1;
            d += 2 * (x - y) + 1;
        }
        Some(point)
    })
}

/// The eight mirrored points of an octant step, tagged with the quadrant
/// (clockwise from top-right) each one lies in
fn mirrored(cx: i32, cy: i32, x: i32, y: i32, o: i32) -> [(u8, i32, i32); 8] {
    [
        (1, cx + x - o, cy + y - o),
        (1, cx + y - o, cy + x - o),
        (2, cx - y, cy + x - o),
        (2, cx - x, cy + y - o),
        (3, cx - x, cy - y),
        (3, cx - y, cy - x),
        (0, cx + x - o, cy - y),
        (0, cx + y - o, cy - x),
    ]
}

fn check_quadrant(quadrant: i32) -> Result<u8> {
    match quadrant {
        0..=3 => Ok(quadrant as u8),
        _ => Err(PaintError::invalid(
            "quadrant",
            format!("{quadrant} is not in 0..=3"),
        )),
    }
}

impl<B: PixelBuffer> Rasterizer<B> {
    /// Circle outline, `stroke` concentric rings thick
    pub fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        center_between_pixels: bool,
        color: Color,
    ) {
        self.stroke_rings(cx, cy, radius, None, center_between_pixels, color);
    }

    pub fn fill_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        center_between_pixels: bool,
        color: Color,
    ) {
        if radius < 0 {
            return;
        }
        let o = center_between_pixels as i32;
        for (x, y) in octant(radius) {
            self.fill_span(cx - x, cx + x - o, cy + y - o, color);
            self.fill_span(cx - x, cx + x - o, cy - y, color);
            self.fill_span(cx - y, cx + y - o, cy + x - o, color);
            self.fill_span(cx - y, cx + y - o, cy - x, color);
        }
    }

    /// One quarter of a circle
    ///
    /// Quadrants run clockwise from the top-right: 0 is (+x, -y), 1 is
    /// (+x, +y), 2 is (-x, +y) and 3 is (-x, -y).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_circle_quadrant(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        quadrant: i32,
        filled: bool,
        center_between_pixels: bool,
        color: Color,
    ) -> Result<()> {
        let quadrant = check_quadrant(quadrant)?;
        if filled {
            self.fill_quadrant(cx, cy, radius, quadrant, center_between_pixels, color);
        } else {
            self.stroke_rings(cx, cy, radius, Some(quadrant), center_between_pixels, color);
        }
        Ok(())
    }

    fn stroke_rings(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        quadrant: Option<u8>,
        center_between_pixels: bool,
        color: Color,
    ) {
        let s = self.stroke() as i32;
        let o = center_between_pixels as i32;
        for ring in 0..s {
            let r = radius - s / 2 + ring;
            if r < 0 {
                continue;
            }
            for (x, y) in octant(r) {
                for (q, px, py) in mirrored(cx, cy, x, y, o) {
                    if quadrant.map_or(true, |wanted| wanted == q) {
                        self.draw_pixel(px, py, color);
                    }
                }
            }
        }
    }

    fn fill_quadrant(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        quadrant: u8,
        center_between_pixels: bool,
        color: Color,
    ) {
        if radius < 0 {
            return;
        }
        let o = center_between_pixels as i32;
        for (x, y) in octant(radius) {
            let (near_row, far_row) = match quadrant {
                0 | 3 => (cy - x, cy - y),
                _ => (cy + x - o, cy + y - o),
            };
            match quadrant {
                0 | 1 => {
                    self.fill_span(cx, cx + x - o, far_row, color);
                    self.fill_span(cx, cx + y - o, near_row, color);
                }
                _ => {
                    self.fill_span(cx - x, cx - o, far_row, color);
                    self.fill_span(cx - y, cx - o, near_row, color);
                }
            }
        }
    }

    /// Circle outline restricted to the angles `start..=end`, in radians
    ///
    /// Angles are measured with `atan2` in screen space and normalized to
    /// `[0, 2π)`, so 0 points right and π/2 points down. Reversed bounds are
    /// swapped.
    pub fn draw_arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        start: f32,
        end: f32,
        color: Color,
    ) {
        if radius < 0 {
            return;
        }
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let s = self.stroke() as i32;
        for (x, y) in octant(radius) {
            for (_, px, py) in mirrored(cx, cy, x, y, 0) {
                let mut angle = ((py - cy) as f32).atan2((px - cx) as f32);
                if angle < 0.0 {
                    angle += TAU;
                }
                if angle < start || angle > end {
                    continue;
                }
                if s > 1 {
                    self.fill_circle(px, py, s / 2, false, color);
                } else {
                    self.draw_pixel(px, py, color);
                }
            }
        }
    }

    /// Rounded rectangle outline
    ///
    /// The corner radius is capped at half the shorter side.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rounded_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        corner_radius: i32,
        color: Color,
    ) -> Result<()> {
        let Some(r) = self.corner_radius(width, height, corner_radius)? else {
            return Ok(());
        };
        if r == 0 {
            self.draw_rectangle(x, y, width, height, color);
            return Ok(());
        }
        let (right, bottom) = (x + width - r - 1, y + height - r - 1);
        self.stroke_rings(right, y + r, r, Some(0), false, color);
        self.stroke_rings(right, bottom, r, Some(1), false, color);
        self.stroke_rings(x + r, bottom, r, Some(2), false, color);
        self.stroke_rings(x + r, y + r, r, Some(3), false, color);

        self.draw_horizontal_line(x + r, y, width - 2 * r, color);
        self.draw_horizontal_line(x + r, y + height - 1, width - 2 * r, color);
        self.draw_vertical_line(x, y + r, height - 2 * r, color);
        self.draw_vertical_line(x + width - 1, y + r, height - 2 * r, color);
        Ok(())
    }

    pub fn fill_rounded_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        corner_radius: i32,
        color: Color,
    ) -> Result<()> {
        let Some(r) = self.corner_radius(width, height, corner_radius)? else {
            return Ok(());
        };
        if r == 0 {
            self.fill_rectangle(x, y, width, height, color);
            return Ok(());
        }
        let (right, bottom) = (x + width - r - 1, y + height - r - 1);
        self.fill_quadrant(right, y + r, r, 0, false, color);
        self.fill_quadrant(right, bottom, r, 1, false, color);
        self.fill_quadrant(x + r, bottom, r, 2, false, color);
        self.fill_quadrant(x + r, y + r, r, 3, false, color);

        self.fill_rectangle(x + r, y, width - 2 * r, height, color);
        self.fill_rectangle(x, y + r, r, height - 2 * r, color);
        self.fill_rectangle(x + width - r, y + r, r, height - 2 * r, color);
        Ok(())
    }

    /// Validated corner radius, `None` when there is nothing to draw
    fn corner_radius(&self, width: i32, height: i32, radius: i32) -> Result<Option<i32>> {
        if radius < 0 {
            return Err(PaintError::invalid(
                "corner_radius",
                format!("{radius} is negative"),
            ));
        }
        if width <= 0 || height <= 0 {
            return Ok(None);
        }
        Ok(Some(radius.min(width / 2).min(height / 2)))
    }
}
