//! Xiaolin Wu antialiased lines

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::{Point, PointF};
use crate::raster::Rasterizer;

fn fpart(v: f32) -> f32 {
    v - v.floor()
}

fn rfpart(v: f32) -> f32 {
    1.0 - fpart(v)
}

impl<B: PixelBuffer> Rasterizer<B> {
    /// Single-width line with coverage blended into the existing pixels
    pub fn draw_antialiased_line(&mut self, from: PointF, to: PointF, color: Color) {
        let steep = (to.y - from.y).abs() > (to.x - from.x).abs();
        let (mut x0, mut y0, mut x1, mut y1) = if steep {
            (from.y, from.x, to.y, to.x)
        } else {
            (from.x, from.y, to.x, to.y)
        };
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let gradient = if dx == 0.0 { 1.0 } else { (y1 - y0) / dx };

        let plot = |r: &mut Self, x: i32, y: i32, coverage: f32| {
            if steep {
                r.blend_pixel(y, x, color, coverage);
            } else {
                r.blend_pixel(x, y, color, coverage);
            }
        };

        let x_start = (x0 + 0.5).floor();
        let y_start = y0 + gradient * (x_start - x0);
        let gap = rfpart(x0 + 0.5);
        let (xa, ya) = (x_start as i32, y_start.floor() as i32);
        plot(self, xa, ya, rfpart(y_start) * gap);
        plot(self, xa, ya + 1, fpart(y_start) * gap);

        let x_end = (x1 + 0.5).floor();
        let y_end = y1 + gradient * (x_end - x1);
        let gap = fpart(x1 + 0.5);
        let (xb, yb) = (x_end as i32, y_end.floor() as i32);
        plot(self, xb, yb, rfpart(y_end) * gap);
        plot(self, xb, yb + 1, fpart(y_end) * gap);

        let mut intery = y_start + gradient;
        for x in xa + 1..xb {
            let y = intery.floor() as i32;
            plot(self, x, y, rfpart(intery));
            plot(self, x, y + 1, fpart(intery));
            intery += gradient;
        }
    }

    /// Triangle with antialiased edges, optionally filled with the
    /// opaque scanline fill
    pub fn draw_antialiased_triangle(
        &mut self,
        p0: Point,
        p1: Point,
        p2: Point,
        filled: bool,
        color: Color,
    ) {
        for (a, b) in [(p0, p1), (p1, p2), (p2, p0)] {
            self.draw_antialiased_line(a.into(), b.into(), color);
        }
        if filled {
            self.fill_polygon(&[p0, p1, p2], color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Bitmap;
    use crate::color::ColorMode;

    fn raster() -> Rasterizer<Bitmap> {
        Rasterizer::new(Bitmap::new(16, 16, ColorMode::Format8bppGray))
    }

    #[test]
    fn test_horizontal_interior_is_opaque() {
        let mut r = raster();
        r.draw_antialiased_line(PointF::new(0.0, 2.0), PointF::new(4.0, 2.0), Color::WHITE);
        for x in 1..4 {
            assert_eq!(r.get_pixel(x, 2), Some(Color::WHITE));
            assert_eq!(r.get_pixel(x, 3), Some(Color::BLACK));
        }
        // Endpoints carry half coverage
        assert_eq!(r.get_pixel(0, 2), Some(Color::rgb(128, 128, 128)));
    }

    #[test]
    fn test_half_pixel_offset_splits_coverage() {
        let mut r = raster();
        r.draw_antialiased_line(PointF::new(0.0, 2.5), PointF::new(6.0, 2.5), Color::WHITE);
        let upper = r.get_pixel(3, 2).unwrap();
        let lower = r.get_pixel(3, 3).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_steep_line_touches_every_row() {
        let mut r = raster();
        r.draw_antialiased_line(PointF::new(3.0, 1.0), PointF::new(5.0, 9.0), Color::WHITE);
        for y in 2..9 {
            let row_lit = (0..16).any(|x| r.get_pixel(x, y) != Some(Color::BLACK));
            assert!(row_lit, "row {y} untouched");
        }
    }

    #[test]
    fn test_filled_triangle_interior() {
        let mut r = raster();
        r.draw_antialiased_triangle(
            Point::new(1, 1),
            Point::new(12, 2),
            Point::new(5, 12),
            true,
            Color::WHITE,
        );
        assert_eq!(r.get_pixel(6, 5), Some(Color::WHITE));
        assert_eq!(r.get_pixel(14, 14), Some(Color::BLACK));
    }
}
