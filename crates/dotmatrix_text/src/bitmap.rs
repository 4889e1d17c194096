//! Fixed-width glyph bitmap fonts and text packing
//!
//! Glyphs are stored back to back starting at `first_char`. Bits are
//! LSB-first, so bit 0 is the leftmost pixel of a row. Storage per glyph
//! depends on the width:
//!
//! | width | layout                                   |
//! |-------|------------------------------------------|
//! | 8     | one byte per row                         |
//! | 6     | one byte per row, low 6 bits             |
//! | 4     | one byte per two rows, low nibble first  |
//! | 12    | three bytes per two rows                 |

use dotmatrix_paint::BitImage;
use smallvec::SmallVec;

use crate::{Result, TextError};

/// Decoded glyph rows, one right-aligned bit mask per row
pub type GlyphRows = SmallVec<[u16; 16]>;

/// A font of equally sized glyph bitmaps for a contiguous character range
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapFont {
    name: String,
    width: u32,
    height: u32,
    first_char: char,
    default_char: char,
    data: Vec<u8>,
}

impl BitmapFont {
    /// Validate and wrap raw glyph data
    ///
    /// `data` must hold a whole number of glyphs; widths 4 and 12 also need
    /// an even height since they store rows in pairs.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        first_char: char,
        data: Vec<u8>,
    ) -> Result<Self> {
        let name = name.into();
        if !matches!(width, 4 | 6 | 8 | 12) {
            return Err(TextError::UnsupportedWidth { width });
        }
        let format = |message: String| TextError::Format {
            resource: name.clone(),
            message,
        };
        if height == 0 {
            return Err(format("glyph height is zero".to_string()));
        }
        if matches!(width, 4 | 12) && height % 2 != 0 {
            return Err(format(format!(
                "width {width} needs an even height, got {height}"
            )));
        }
        let glyph_bytes = Self::glyph_bytes_for(width, height);
        if data.is_empty() || data.len() % glyph_bytes != 0 {
            return Err(format(format!(
                "{} bytes is not a whole number of {glyph_bytes}-byte glyphs",
                data.len()
            )));
        }
        Ok(Self {
            name,
            width,
            height,
            first_char,
            default_char: ' ',
            data,
        })
    }

    /// Character drawn in place of characters the font lacks
    pub fn with_default_char(mut self, c: char) -> Self {
        self.default_char = c;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn first_char(&self) -> char {
        self.first_char
    }

    pub fn default_char(&self) -> char {
        self.default_char
    }

    const fn glyph_bytes_for(width: u32, height: u32) -> usize {
        let h = height as usize;
        match width {
            4 => h / 2,
            12 => h / 2 * 3,
            _ => h,
        }
    }

    pub fn glyph_bytes(&self) -> usize {
        Self::glyph_bytes_for(self.width, self.height)
    }

    pub fn glyph_count(&self) -> usize {
        self.data.len() / self.glyph_bytes()
    }

    fn index_of(&self, c: char) -> Option<usize> {
        let index = (c as u32).checked_sub(self.first_char as u32)? as usize;
        (index < self.glyph_count()).then_some(index)
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    /// Raw stored bytes for `c`, falling back to the default character and
    /// then to the first glyph
    pub fn glyph_data(&self, c: char) -> &[u8] {
        let index = self
            .index_of(c)
            .or_else(|| self.index_of(self.default_char))
            .unwrap_or(0);
        let size = self.glyph_bytes();
        &self.data[index * size..(index + 1) * size]
    }

    /// Decode the rows of `c`
    pub fn glyph_rows(&self, c: char) -> GlyphRows {
        let m = self.glyph_data(c);
        (0..self.height as usize)
            .map(|row| match self.width {
                8 => m[row] as u16,
                6 => (m[row] & 0x3F) as u16,
                4 => {
                    let byte = m[row / 2];
                    if row % 2 == 0 {
                        (byte & 0x0F) as u16
                    } else {
                        (byte >> 4) as u16
                    }
                }
                _ => {
                    let i = row / 2 * 3;
                    if row % 2 == 0 {
                        m[i] as u16 | ((m[i + 1] & 0x0F) as u16) << 8
                    } else {
                        (m[i + 1] >> 4) as u16 | (m[i + 2] as u16) << 4
                    }
                }
            })
            .collect()
    }

    /// Lay `text` out as one packed 1-bit strip
    ///
    /// Glyphs are grouped so every group ends on a byte boundary: 4 glyphs
    /// per 3 bytes at width 6, 2 glyphs per byte at width 4 and 2 glyphs per
    /// 3 bytes at width 12. A trailing partial group is padded with the
    /// default character.
    pub fn pack_text(&self, text: &str) -> PackedText {
        let glyphs: SmallVec<[&[u8]; 32]> = text.chars().map(|c| self.glyph_data(c)).collect();
        let count = glyphs.len();
        let height = self.height as usize;
        let pad = self.glyph_data(self.default_char);
        let group = match self.width {
            6 => 4,
            4 | 12 => 2,
            _ => 1,
        };
        let groups = count.div_ceil(group);
        let stride = match self.width {
            6 | 12 => groups * 3,
            4 => groups,
            _ => count,
        };
        let mut data = vec![0u8; stride * height];
        let glyph = |i: usize| glyphs.get(i).copied().unwrap_or(pad);

        for g in 0..groups {
            let first = g * group;
            match self.width {
                8 => {
                    let m = glyph(first);
                    for row in 0..height {
                        data[row * stride + g] = m[row];
                    }
                }
                6 => {
                    let (m1, m2, m3, m4) = (
                        glyph(first),
                        glyph(first + 1),
                        glyph(first + 2),
                        glyph(first + 3),
                    );
                    let col = g * 3;
                    for row in 0..height {
                        let (c1, c2, c3, c4) = (m1[row], m2[row], m3[row], m4[row]);
                        let out = &mut data[row * stride + col..row * stride + col + 3];
                        out[0] = (c1 & 0x3F) | (c2 << 6);
                        out[1] = ((c2 >> 2) & 0x0F) | (c3 << 4);
                        out[2] = ((c3 >> 4) & 0x03) | (c4 << 2);
                    }
                }
                4 => {
                    let (m1, m2) = (glyph(first), glyph(first + 1));
                    for pair in 0..height / 2 {
                        let (c1, c2) = (m1[pair], m2[pair]);
                        data[2 * pair * stride + g] = (c1 & 0x0F) | ((c2 & 0x0F) << 4);
                        data[(2 * pair + 1) * stride + g] = (c1 >> 4) | (c2 & 0xF0);
                    }
                }
                _ => {
                    let (m1, m2) = (glyph(first), glyph(first + 1));
                    let col = g * 3;
                    for pair in 0..height / 2 {
                        let i = pair * 3;
                        let even = 2 * pair * stride + col;
                        let odd = (2 * pair + 1) * stride + col;
                        data[even] = m1[i];
                        data[even + 1] = (m1[i + 1] & 0x0F) | (m2[i] << 4);
                        data[even + 2] = (m2[i] >> 4) | (m2[i + 1] << 4);
                        data[odd] = (m1[i + 1] >> 4) | (m1[i + 2] << 4);
                        data[odd + 1] = (m1[i + 2] >> 4) | (m2[i + 1] & 0xF0);
                        data[odd + 2] = m2[i + 2];
                    }
                }
            }
        }

        PackedText {
            glyph_width: self.width as usize,
            len: count,
            height,
            stride,
            data,
        }
    }
}

/// Text packed into a 1-bit strip by [`BitmapFont::pack_text`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedText {
    glyph_width: usize,
    len: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl PackedText {
    /// Number of packed characters, excluding padding
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Width of the packed characters in pixels
    pub fn width(&self) -> usize {
        self.len * self.glyph_width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn image(&self) -> BitImage<'_> {
        BitImage::new(self.width(), self.height, &self.data).with_stride(self.stride)
    }

    /// Recover the rows of the character at `index`
    pub fn unpack_glyph(&self, index: usize) -> GlyphRows {
        let image = self.image();
        let x0 = index * self.glyph_width;
        (0..self.height)
            .map(|y| {
                (0..self.glyph_width).fold(0u16, |acc, bit| {
                    acc | (image.get(x0 + bit, y) as u16) << bit
                })
            })
            .collect()
    }
}
