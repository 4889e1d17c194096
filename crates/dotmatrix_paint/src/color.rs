//! Color types and pixel formats

/// RGBA color with u8 components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create from hex value (0xRRGGBB or 0xRRGGBBAA)
    pub fn from_hex(hex: u32) -> Self {
        if hex > 0xFFFFFF {
            Self::new(
                ((hex >> 24) & 0xFF) as u8,
                ((hex >> 16) & 0xFF) as u8,
                ((hex >> 8) & 0xFF) as u8,
                (hex & 0xFF) as u8,
            )
        } else {
            Self::rgb(
                ((hex >> 16) & 0xFF) as u8,
                ((hex >> 8) & 0xFF) as u8,
                (hex & 0xFF) as u8,
            )
        }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` or the same without the leading `#`
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 && digits.len() != 8 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(if digits.len() == 8 {
            Self::new(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )
        } else {
            Self::from_hex(value)
        })
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Perceived brightness (ITU-R BT.601 weights)
    pub fn luminance(&self) -> u8 {
        ((self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000) as u8
    }

    pub fn invert(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }

    /// Linear blend towards `other`; `ratio` 0.0 keeps `self`, 1.0 yields `other`
    pub fn blend(&self, other: Color, ratio: f32) -> Self {
        let t = ratio.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Encode into the raw pixel value for `mode` (right-aligned bits)
    pub fn encode(&self, mode: ColorMode) -> u32 {
        let (r, g, b) = (self.r as u32, self.g as u32, self.b as u32);
        match mode {
            ColorMode::Format1bpp => (self.luminance() >= 0x80) as u32,
            ColorMode::Format2bppGray => self.luminance() as u32 >> 6,
            ColorMode::Format4bppGray => self.luminance() as u32 >> 4,
            ColorMode::Format8bppGray => self.luminance() as u32,
            ColorMode::Format8bppRgb332 => (r & 0xE0) | ((g & 0xE0) >> 3) | (b >> 6),
            ColorMode::Format12bppRgb444 => ((r >> 4) << 8) | ((g >> 4) << 4) | (b >> 4),
            ColorMode::Format16bppRgb565 => ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3),
            ColorMode::Format24bppRgb888 => (r << 16) | (g << 8) | b,
            ColorMode::Format32bppRgba8888 => (r << 24) | (g << 16) | (b << 8) | self.a as u32,
        }
    }

    /// Decode a raw pixel value produced by [`Color::encode`]
    pub fn decode(raw: u32, mode: ColorMode) -> Self {
        // Expand an n-bit channel to 8 bits by bit replication
        fn expand(value: u32, bits: u32) -> u8 {
            let value = value & ((1 << bits) - 1);
            let mut out = 0u32;
            let mut filled = 0;
            while filled < 8 {
                out = (out << bits) | value;
                filled += bits;
            }
            (out >> (filled - 8)) as u8
        }

        match mode {
            ColorMode::Format1bpp => {
                if raw & 1 == 1 {
                    Self::WHITE
                } else {
                    Self::BLACK
                }
            }
            ColorMode::Format2bppGray => {
                let v = expand(raw, 2);
                Self::rgb(v, v, v)
            }
            ColorMode::Format4bppGray => {
                let v = expand(raw, 4);
                Self::rgb(v, v, v)
            }
            ColorMode::Format8bppGray => {
                let v = raw as u8;
                Self::rgb(v, v, v)
            }
            ColorMode::Format8bppRgb332 => {
                Self::rgb(expand(raw >> 5, 3), expand(raw >> 2, 3), expand(raw, 2))
            }
            ColorMode::Format12bppRgb444 => {
                Self::rgb(expand(raw >> 8, 4), expand(raw >> 4, 4), expand(raw, 4))
            }
            ColorMode::Format16bppRgb565 => {
                Self::rgb(expand(raw >> 11, 5), expand(raw >> 5, 6), expand(raw, 5))
            }
            ColorMode::Format24bppRgb888 => {
                Self::rgb((raw >> 16) as u8, (raw >> 8) as u8, raw as u8)
            }
            ColorMode::Format32bppRgba8888 => Self::new(
                (raw >> 24) as u8,
                (raw >> 16) as u8,
                (raw >> 8) as u8,
                raw as u8,
            ),
        }
    }
}

/// Declared pixel format of a buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Monochrome, one bit per pixel
    Format1bpp,
    Format2bppGray,
    Format4bppGray,
    Format8bppGray,
    Format8bppRgb332,
    Format12bppRgb444,
    #[default]
    Format16bppRgb565,
    Format24bppRgb888,
    Format32bppRgba8888,
}

impl ColorMode {
    pub const fn bits_per_pixel(&self) -> u32 {
        match self {
            ColorMode::Format1bpp => 1,
            ColorMode::Format2bppGray => 2,
            ColorMode::Format4bppGray => 4,
            ColorMode::Format8bppGray | ColorMode::Format8bppRgb332 => 8,
            ColorMode::Format12bppRgb444 => 12,
            ColorMode::Format16bppRgb565 => 16,
            ColorMode::Format24bppRgb888 => 24,
            ColorMode::Format32bppRgba8888 => 32,
        }
    }

    /// Number of bytes needed to store one row of `width` pixels
    pub const fn stride(&self, width: usize) -> usize {
        (width * self.bits_per_pixel() as usize + 7) / 8
    }

    pub const fn is_grayscale(&self) -> bool {
        matches!(
            self,
            ColorMode::Format1bpp
                | ColorMode::Format2bppGray
                | ColorMode::Format4bppGray
                | ColorMode::Format8bppGray
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [ColorMode; 9] = [
        ColorMode::Format1bpp,
        ColorMode::Format2bppGray,
        ColorMode::Format4bppGray,
        ColorMode::Format8bppGray,
        ColorMode::Format8bppRgb332,
        ColorMode::Format12bppRgb444,
        ColorMode::Format16bppRgb565,
        ColorMode::Format24bppRgb888,
        ColorMode::Format32bppRgba8888,
    ];

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex(0xFF8000), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex(0x11223344), Color::new(0x11, 0x22, 0x33, 0x44));
        assert_eq!(Color::parse_hex("#00FF00"), Some(Color::GREEN));
        assert_eq!(Color::parse_hex("nope"), None);
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(Color::BLACK.blend(Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::BLACK.blend(Color::WHITE, 1.0), Color::WHITE);
        assert_eq!(Color::BLACK.blend(Color::WHITE, 0.5), Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_primary_colors_survive_every_mode() {
        for mode in ALL_MODES {
            for color in [Color::BLACK, Color::WHITE] {
                assert_eq!(
                    Color::decode(color.encode(mode), mode),
                    color,
                    "mode {mode:?}"
                );
            }
        }
        for mode in ALL_MODES.into_iter().filter(|m| !m.is_grayscale()) {
            for color in [Color::RED, Color::GREEN, Color::BLUE] {
                assert_eq!(Color::decode(color.encode(mode), mode), color);
            }
        }
    }

    #[test]
    fn test_encode_fits_bit_depth() {
        let color = Color::rgb(201, 77, 140);
        for mode in ALL_MODES {
            let bits = mode.bits_per_pixel();
            if bits < 32 {
                assert!(color.encode(mode) < (1 << bits), "mode {mode:?}");
            }
        }
    }

    #[test]
    fn test_rgb565_precision() {
        let color = Color::rgb(201, 77, 140);
        let decoded = Color::decode(
            color.encode(ColorMode::Format16bppRgb565),
            ColorMode::Format16bppRgb565,
        );
        assert!(decoded.r.abs_diff(color.r) < 8);
        assert!(decoded.g.abs_diff(color.g) < 4);
        assert!(decoded.b.abs_diff(color.b) < 8);
    }
}
