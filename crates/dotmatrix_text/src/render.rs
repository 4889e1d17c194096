//! Drawing and measuring text

use dotmatrix_paint::{Color, HorizontalAlignment, PixelBuffer, Rasterizer, Size};

use crate::bitmap::BitmapFont;
use crate::font::{Font, YaffFont, YaffLayout};
use crate::glyph::Glyph;

/// Text drawing options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextOptions {
    /// Pixel replication factor, at least 1
    pub scale: u32,
    /// Break lines that would run past the right edge of the drawing area
    pub word_wrap: bool,
    /// Placement of each line relative to the x coordinate
    pub align: HorizontalAlignment,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            word_wrap: false,
            align: HorizontalAlignment::Left,
        }
    }
}

impl TextOptions {
    pub fn scaled(scale: u32) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    pub fn with_word_wrap(mut self, word_wrap: bool) -> Self {
        self.word_wrap = word_wrap;
        self
    }

    pub fn with_align(mut self, align: HorizontalAlignment) -> Self {
        self.align = align;
        self
    }
}

/// Vertical distance between the tops of consecutive lines
fn line_advance(font: &Font, scale: i32) -> i32 {
    match font {
        Font::Yaff(yaff) if matches!(yaff.layout(), YaffLayout::Proportional { .. }) => {
            (yaff.line_height() + 1) * scale
        }
        _ => font.height() * scale,
    }
}

fn line_width(font: &Font, line: &str, scale: i32) -> i32 {
    line.chars().map(|c| font.advance(c)).sum::<i32>() * scale
}

/// Size of `text` when drawn without wrapping
pub fn measure_text(font: &Font, text: &str, scale: u32) -> Size {
    if text.is_empty() {
        return Size::new(0, 0);
    }
    let scale = scale.max(1) as i32;
    let lines = text.split('\n');
    let (count, width) = lines.fold((0, 0), |(count, width), line| {
        (count + 1, width.max(line_width(font, line, scale)))
    });
    Size::new(
        width,
        (count - 1) * line_advance(font, scale) + font.height() * scale,
    )
}

/// Draw `text` with its top-left corner at (x, y)
///
/// `\n` always starts a new line at `x`.
pub fn draw_text<B: PixelBuffer>(
    raster: &mut Rasterizer<B>,
    font: &Font,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
    options: &TextOptions,
) {
    let scale = options.scale.max(1) as i32;
    let advance = line_advance(font, scale);
    let mut top = y;
    for line in text.split('\n') {
        let left = x + options.align.offset(line_width(font, line, scale));
        top = match font {
            Font::Bitmap(bitmap) => draw_bitmap_line(
                raster,
                bitmap,
                left,
                top,
                line,
                color,
                scale,
                options.word_wrap,
            ),
            Font::Yaff(yaff) => draw_yaff_line(
                raster,
                yaff,
                left,
                top,
                line,
                color,
                scale,
                options.word_wrap,
            ),
        };
        top += advance;
    }
}

/// Returns the top of the last row drawn
#[allow(clippy::too_many_arguments)]
fn draw_bitmap_line<B: PixelBuffer>(
    raster: &mut Rasterizer<B>,
    font: &BitmapFont,
    x: i32,
    y: i32,
    line: &str,
    color: Color,
    scale: i32,
    word_wrap: bool,
) -> i32 {
    let cell = font.width() as i32 * scale;
    let chars: Vec<char> = line.chars().collect();
    let per_row = if word_wrap {
        ((raster.width() - x) / cell).max(1) as usize
    } else {
        chars.len().max(1)
    };
    let mut top = y;
    for (i, chunk) in chars.chunks(per_row).enumerate() {
        if i > 0 {
            top += font.height() as i32 * scale;
        }
        let text: String = chunk.iter().collect();
        let packed = font.pack_text(&text);
        raster.draw_bitmap(x, top, packed.image(), color, scale as u32);
    }
    top
}

fn blit_glyph<B: PixelBuffer>(
    raster: &mut Rasterizer<B>,
    glyph: &Glyph,
    x: i32,
    y: i32,
    color: Color,
    scale: i32,
) {
    for (gx, gy) in glyph.ink() {
        let (px, py) = (x + gx * scale, y + gy * scale);
        if scale == 1 {
            raster.draw_pixel(px, py, color);
        } else {
            raster.fill_rectangle(px, py, scale, scale, color);
        }
    }
}

/// Returns the top of the last row drawn
#[allow(clippy::too_many_arguments)]
fn draw_yaff_line<B: PixelBuffer>(
    raster: &mut Rasterizer<B>,
    font: &YaffFont,
    x: i32,
    y: i32,
    line: &str,
    color: Color,
    scale: i32,
    word_wrap: bool,
) -> i32 {
    let wrap_step = match font.layout() {
        YaffLayout::Fixed { cell } => cell.height * scale,
        YaffLayout::Proportional { height } => (height + 1) * scale,
    };
    let mut cursor = x;
    let mut top = y;
    for c in line.chars() {
        let Some(glyph) = font.glyph_or_default(c) else {
            continue;
        };
        let full_advance = font.advance(c) * scale;
        if word_wrap && cursor > x && cursor + full_advance > raster.width() {
            cursor = x;
            top += wrap_step;
        }
        match font.layout() {
            YaffLayout::Fixed { .. } => {
                blit_glyph(raster, glyph, cursor, top, color, scale);
            }
            YaffLayout::Proportional { .. } => {
                let left = cursor + glyph.left_bearing * scale;
                blit_glyph(raster, glyph, left, top, color, scale);
            }
        }
        cursor += full_advance;
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotmatrix_paint::{Bitmap, ColorMode};
    use pretty_assertions::assert_eq;

    fn raster(width: usize, height: usize) -> Rasterizer<Bitmap> {
        Rasterizer::new(Bitmap::new(width, height, ColorMode::Format1bpp))
    }

    fn lit(r: &Rasterizer<Bitmap>) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..r.height() {
            for x in 0..r.width() {
                if r.get_pixel(x, y) == Some(Color::WHITE) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// 'A' is a 2x2 block with one bearing column on each side, 'B' a
    /// single dot
    fn proportional() -> Font {
        let source = "\
spacing: proportional

'A':
    @@
    @@
    left-bearing: 1
    right-bearing: 1

'B':
    @.
";
        Font::Yaff(YaffFont::parse("prop", source).unwrap())
    }

    #[test]
    fn test_proportional_advance_and_bearing() {
        let font = proportional();
        let mut r = raster(16, 8);
        draw_text(&mut r, &font, 0, 0, "AB", Color::WHITE, &TextOptions::default());
        assert_eq!(lit(&r), vec![(1, 0), (2, 0), (4, 0), (1, 1), (2, 1)]);
        assert_eq!(measure_text(&font, "AB", 1), Size::new(6, 2));
        assert_eq!(measure_text(&font, "A\nA", 2), Size::new(8, 10));
    }

    #[test]
    fn test_word_wrap_moves_down_by_height_plus_one() {
        let font = proportional();
        let mut r = raster(6, 8);
        let options = TextOptions::default().with_word_wrap(true);
        draw_text(&mut r, &font, 0, 0, "AA", Color::WHITE, &options);
        // Second 'A' would end at x = 8, so it wraps to y = 3
        assert_eq!(r.get_pixel(1, 3), Some(Color::WHITE));
        assert_eq!(r.get_pixel(5, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_fixed_cell_scaled() {
        let source = "cell-size: 3x2\n\n'x':\n    @..\n    .@.\n";
        let font = Font::Yaff(YaffFont::parse("fixed", source).unwrap());
        let mut r = raster(16, 8);
        draw_text(&mut r, &font, 0, 0, "xx", Color::WHITE, &TextOptions::scaled(2));
        assert_eq!(r.get_pixel(1, 1), Some(Color::WHITE));
        assert_eq!(r.get_pixel(3, 3), Some(Color::WHITE));
        // Second glyph starts at 3 * 2
        assert_eq!(r.get_pixel(6, 0), Some(Color::WHITE));
        assert_eq!(measure_text(&font, "xx", 2), Size::new(12, 4));
    }

    #[test]
    fn test_bitmap_font_and_alignment() {
        // Width 8, height 2: '!' is a full top row
        let font = Font::Bitmap(
            BitmapFont::new("b", 8, 2, ' ', vec![0, 0, 0xFF, 0]).unwrap(),
        );
        let mut r = raster(32, 4);
        let options = TextOptions::default().with_align(HorizontalAlignment::Right);
        draw_text(&mut r, &font, 32, 0, " !", Color::WHITE, &options);
        let expected: Vec<(i32, i32)> = (24..32).map(|x| (x, 0)).collect();
        assert_eq!(lit(&r), expected);
    }

    #[test]
    fn test_newline_restarts_at_x() {
        let font = proportional();
        let mut r = raster(16, 16);
        draw_text(&mut r, &font, 2, 0, "B\nB", Color::WHITE, &TextOptions::default());
        assert_eq!(lit(&r), vec![(2, 0), (2, 3)]);
    }
}
