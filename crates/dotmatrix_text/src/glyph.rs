//! Glyph model shared by the YAFF parser and renderer

use smallvec::SmallVec;

/// Ink symbol in glyph rows
pub const INK: char = '@';
/// Paper symbol in glyph rows
pub const PAPER: char = '.';
/// A row consisting of this symbol alone marks a glyph with no pixels
pub const EMPTY: char = '-';

/// What a glyph renders for
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// A Unicode character, from `u+XXXX` or a single-quoted `'c'`
    Char(char),
    /// An encoding-specific code point, from `0x41` or `65`
    Codepoint(u32),
    /// A free-form name, from `"name"` or a multi-character quoted label
    Tag(String),
}

impl Label {
    /// Parse the text of a label line, without its trailing colon
    pub fn parse(text: &str) -> Option<Label> {
        let text = text.trim();
        if let Some(inner) = strip_quotes(text, '\'') {
            let mut chars = inner.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Label::Char(c)),
                (Some(_), Some(_)) => Some(Label::Tag(inner.to_string())),
                _ => None,
            };
        }
        if let Some(inner) = strip_quotes(text, '"') {
            return Some(Label::Tag(inner.to_string()));
        }
        let lower = text.to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix("u+") {
            let value = u32::from_str_radix(hex, 16).ok()?;
            return char::from_u32(value).map(Label::Char);
        }
        if let Some(hex) = lower.strip_prefix("0x") {
            return u32::from_str_radix(hex, 16).ok().map(Label::Codepoint);
        }
        lower.parse::<u32>().ok().map(Label::Codepoint)
    }
}

fn strip_quotes(text: &str, quote: char) -> Option<&str> {
    if text.len() >= 2 {
        text.strip_prefix(quote)?.strip_suffix(quote)
    } else {
        None
    }
}

/// A single glyph bitmap with its metrics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Rows of [`INK`] / [`PAPER`] symbols, top to bottom
    pub rows: Vec<String>,
    pub labels: SmallVec<[Label; 2]>,
    /// Blank columns before the bitmap
    pub left_bearing: i32,
    /// Blank columns after the bitmap
    pub right_bearing: i32,
    pub shift_up: i32,
    pub comment: String,
    /// Per-glyph properties other than the metrics above
    pub properties: Vec<(String, String)>,
}

impl Glyph {
    pub fn width(&self) -> i32 {
        self.rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0) as i32
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn is_ink(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.chars().nth(x as usize))
            == Some(INK)
    }

    /// Ink positions, row by row
    pub fn ink(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.chars()
                .enumerate()
                .filter(|(_, c)| *c == INK)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    /// Horizontal distance the cursor moves past this glyph
    pub fn advance(&self) -> i32 {
        self.left_bearing + self.width() + self.right_bearing
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
