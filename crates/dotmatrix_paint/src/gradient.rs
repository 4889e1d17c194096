//! Linear gradient fills

use smallvec::{smallvec, SmallVec};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::Rect;
use crate::raster::Rasterizer;

/// A gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32, // 0.0 to 1.0
    pub color: Color,
}

/// Axis a gradient varies along
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientDirection {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

/// Axis-aligned gradient with sorted stops
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub direction: GradientDirection,
    stops: SmallVec<[GradientStop; 4]>,
}

impl LinearGradient {
    pub fn new(direction: GradientDirection, stops: &[GradientStop]) -> Self {
        let mut stops: SmallVec<[GradientStop; 4]> = stops.iter().copied().collect();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { direction, stops }
    }

    /// Create a simple gradient between two colors
    pub fn two_color(direction: GradientDirection, from: Color, to: Color) -> Self {
        Self {
            direction,
            stops: smallvec![
                GradientStop {
                    offset: 0.0,
                    color: from,
                },
                GradientStop {
                    offset: 1.0,
                    color: to,
                },
            ],
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Interpolated color at `t`, clamped to the outer stops
    pub fn color_at(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.blend(b.color, local);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

impl<B: PixelBuffer> Rasterizer<B> {
    /// Fill a rectangle one column or row at a time, with the color at
    /// `t = i / extent` for the i-th line
    pub fn fill_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        let rect = rect.normalized();
        if rect.is_empty() {
            return;
        }
        match gradient.direction {
            GradientDirection::Horizontal => {
                let extent = rect.width();
                for i in 0..extent {
                    let color = gradient.color_at(i as f32 / extent as f32);
                    self.fill_rectangle(rect.left + i, rect.top, 1, rect.height(), color);
                }
            }
            GradientDirection::Vertical => {
                let extent = rect.height();
                for i in 0..extent {
                    let color = gradient.color_at(i as f32 / extent as f32);
                    self.fill_rectangle(rect.left, rect.top + i, rect.width(), 1, color);
                }
            }
        }
    }

    pub fn draw_horizontal_gradient(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        from: Color,
        to: Color,
    ) {
        let gradient = LinearGradient::two_color(GradientDirection::Horizontal, from, to);
        self.fill_gradient(Rect::from_origin_size(x, y, width, height), &gradient);
    }

    pub fn draw_vertical_gradient(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        from: Color,
        to: Color,
    ) {
        let gradient = LinearGradient::two_color(GradientDirection::Vertical, from, to);
        self.fill_gradient(Rect::from_origin_size(x, y, width, height), &gradient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Bitmap;
    use crate::color::ColorMode;

    #[test]
    fn test_color_at_interpolates_between_stops() {
        let gradient = LinearGradient::new(
            GradientDirection::Horizontal,
            &[
                GradientStop {
                    offset: 1.0,
                    color: Color::WHITE,
                },
                GradientStop {
                    offset: 0.0,
                    color: Color::BLACK,
                },
            ],
        );
        assert_eq!(gradient.stops()[0].color, Color::BLACK);
        assert_eq!(gradient.color_at(-1.0), Color::BLACK);
        assert_eq!(gradient.color_at(0.5), Color::rgb(128, 128, 128));
        assert_eq!(gradient.color_at(2.0), Color::WHITE);
    }

    #[test]
    fn test_horizontal_gradient_starts_at_from_color() {
        let mut r = Rasterizer::new(Bitmap::new(4, 2, ColorMode::Format8bppGray));
        r.draw_horizontal_gradient(0, 0, 4, 2, Color::BLACK, Color::WHITE);
        assert_eq!(r.get_pixel(0, 1), Some(Color::BLACK));
        // i / extent never reaches 1.0
        assert_eq!(r.get_pixel(3, 0), Some(Color::rgb(191, 191, 191)));
    }

    #[test]
    fn test_vertical_gradient_rows_are_uniform() {
        let mut r = Rasterizer::new(Bitmap::new(3, 4, ColorMode::Format8bppGray));
        r.draw_vertical_gradient(0, 0, 3, 4, Color::BLACK, Color::WHITE);
        for y in 0..4 {
            let first = r.get_pixel(0, y);
            assert_eq!(r.get_pixel(2, y), first);
        }
        assert_eq!(r.get_pixel(0, 2), Some(Color::rgb(128, 128, 128)));
    }
}
