//! Font types
//!
//! A [`Font`] is either a packed [`BitmapFont`] or a [`YaffFont`] built from
//! YAFF source. Both are immutable once built.

use dotmatrix_paint::Size;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::bitmap::BitmapFont;
use crate::glyph::{Glyph, Label};
use crate::yaff::{self, YaffSource};
use crate::{Result, TextError};

/// Any font the renderer can draw with
#[derive(Clone, Debug)]
pub enum Font {
    Bitmap(BitmapFont),
    Yaff(YaffFont),
}

impl Font {
    pub fn name(&self) -> &str {
        match self {
            Font::Bitmap(font) => font.name(),
            Font::Yaff(font) => font.name(),
        }
    }

    /// Height of one line of glyphs, unscaled
    pub fn height(&self) -> i32 {
        match self {
            Font::Bitmap(font) => font.height() as i32,
            Font::Yaff(font) => font.line_height(),
        }
    }

    /// Horizontal advance of `c`, unscaled
    pub fn advance(&self, c: char) -> i32 {
        match self {
            Font::Bitmap(font) => font.width() as i32,
            Font::Yaff(font) => font.advance(c),
        }
    }
}

impl From<BitmapFont> for Font {
    fn from(font: BitmapFont) -> Self {
        Font::Bitmap(font)
    }
}

impl From<YaffFont> for Font {
    fn from(font: YaffFont) -> Self {
        Font::Yaff(font)
    }
}

/// How a YAFF font positions its glyphs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YaffLayout {
    /// Every glyph occupies the same cell
    Fixed { cell: Size },
    /// Glyphs advance by their own width and bearings
    Proportional { height: i32 },
}

/// A font parsed from YAFF source
#[derive(Clone, Debug)]
pub struct YaffFont {
    name: String,
    comment: String,
    layout: YaffLayout,
    properties: FxHashMap<String, String>,
    glyphs: Vec<Glyph>,
    by_char: FxHashMap<char, usize>,
    by_codepoint: FxHashMap<u32, usize>,
    by_tag: FxHashMap<String, usize>,
    default_glyph: Option<usize>,
}

impl YaffFont {
    /// Parse YAFF text; `resource` names the source in errors
    pub fn parse(resource: &str, source: &str) -> Result<Self> {
        Self::from_source(resource, yaff::parse(resource, source)?)
    }

    /// Build a font from already parsed records
    pub fn from_source(resource: &str, source: YaffSource) -> Result<Self> {
        let format = |message: String| TextError::Format {
            resource: resource.to_string(),
            message,
        };
        let spacing = source.property("spacing").unwrap_or("character-cell");
        let layout = match spacing {
            "character-cell" | "monospace" => YaffLayout::Fixed {
                cell: cell_size(&source).map_err(format)?,
            },
            "proportional" | "multi-cell" => YaffLayout::Proportional {
                height: proportional_height(&source).map_err(format)?,
            },
            other => return Err(format(format!("unsupported spacing `{other}`"))),
        };

        let mut by_char = FxHashMap::default();
        let mut by_codepoint = FxHashMap::default();
        let mut by_tag = FxHashMap::default();
        for (index, glyph) in source.glyphs.iter().enumerate() {
            for label in &glyph.labels {
                match label {
                    Label::Char(c) => by_char.entry(*c).or_insert(index),
                    Label::Codepoint(cp) => by_codepoint.entry(*cp).or_insert(index),
                    Label::Tag(tag) => by_tag.entry(tag.clone()).or_insert(index),
                };
            }
        }

        let mut font = Self {
            name: source.property("name").unwrap_or(resource).to_string(),
            comment: source.comment,
            layout,
            properties: source.properties.into_iter().collect(),
            glyphs: source.glyphs,
            by_char,
            by_codepoint,
            by_tag,
            default_glyph: None,
        };
        font.default_glyph = match font.properties.get("default-char") {
            Some(value) => Label::parse(value).and_then(|label| font.index_of_label(&label)),
            None => None,
        }
        .or_else(|| font.index_of(' '));

        debug!(
            name = %font.name,
            glyphs = font.glyphs.len(),
            layout = ?font.layout,
            "built yaff font"
        );
        Ok(font)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn layout(&self) -> YaffLayout {
        self.layout
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    fn index_of(&self, c: char) -> Option<usize> {
        self.by_char
            .get(&c)
            .or_else(|| self.by_codepoint.get(&(c as u32)))
            .copied()
    }

    fn index_of_label(&self, label: &Label) -> Option<usize> {
        match label {
            Label::Char(c) => self.index_of(*c),
            Label::Codepoint(cp) => self.by_codepoint.get(cp).copied(),
            Label::Tag(tag) => self.by_tag.get(tag).copied(),
        }
    }

    /// Glyph for `c`, by Unicode label first and code point second
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.index_of(c).map(|i| &self.glyphs[i])
    }

    pub fn glyph_by_tag(&self, tag: &str) -> Option<&Glyph> {
        self.by_tag.get(tag).map(|&i| &self.glyphs[i])
    }

    /// Glyph for `c`, or the default glyph when the font lacks it
    pub fn glyph_or_default(&self, c: char) -> Option<&Glyph> {
        self.index_of(c)
            .or(self.default_glyph)
            .map(|i| &self.glyphs[i])
    }

    pub fn default_glyph(&self) -> Option<&Glyph> {
        self.default_glyph.map(|i| &self.glyphs[i])
    }

    pub fn line_height(&self) -> i32 {
        match self.layout {
            YaffLayout::Fixed { cell } => cell.height,
            YaffLayout::Proportional { height } => height,
        }
    }

    /// Unscaled advance of `c`
    pub fn advance(&self, c: char) -> i32 {
        match self.layout {
            YaffLayout::Fixed { cell } => cell.width,
            YaffLayout::Proportional { .. } => {
                self.glyph_or_default(c).map_or(0, Glyph::advance)
            }
        }
    }
}

/// Parse `WxH` or `W H`
fn parse_size(value: &str) -> Option<Size> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .or_else(|| value.trim().split_once(char::is_whitespace))?;
    Some(Size::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn numeric(source: &YaffSource, key: &str) -> std::result::Result<Option<i32>, String> {
    source
        .property(key)
        .map(|v| {
            v.trim()
                .parse::<i32>()
                .map_err(|_| format!("`{key}` is not a number: `{v}`"))
        })
        .transpose()
}

fn sized(source: &YaffSource, key: &str) -> std::result::Result<Option<Size>, String> {
    source
        .property(key)
        .map(|v| parse_size(v).ok_or_else(|| format!("`{key}` is not a size: `{v}`")))
        .transpose()
}

fn cell_size(source: &YaffSource) -> std::result::Result<Size, String> {
    if let Some(size) = sized(source, "raster-size")? {
        return Ok(size);
    }
    if let Some(size) = sized(source, "cell-size")? {
        return Ok(size);
    }
    let (Some(first), Some(last)) = (source.glyphs.first(), source.glyphs.last()) else {
        return Err("no glyphs to infer a cell size from".to_string());
    };
    let bearings = numeric(source, "left-bearing")?.unwrap_or(0)
        + numeric(source, "right-bearing")?.unwrap_or(0);
    Ok(Size::new(
        first.width().max(last.width()) + bearings,
        first.height(),
    ))
}

fn proportional_height(source: &YaffSource) -> std::result::Result<i32, String> {
    if let Some(size) = sized(source, "bounding-box")? {
        return Ok(size.height);
    }
    if let Some(height) = numeric(source, "line-height")? {
        return Ok(height);
    }
    Ok(source.glyphs.iter().map(Glyph::height).max().unwrap_or(0))
}
