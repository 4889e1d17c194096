//! YAFF font source parser
//!
//! A YAFF file is plain text made of blank-line separated records:
//!
//! ```text
//! # global comment
//! name: Tiny
//! spacing: character-cell
//!
//! u+0041:
//!     .@.
//!     @.@
//!     @@@
//! ```
//!
//! Each line is classified on its own, with one line of lookahead to tell a
//! glyph label from the key of a multi-line property. This module only
//! produces the raw records; [`crate::font::YaffFont`] turns them into a
//! usable font.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::glyph::{Glyph, Label, EMPTY, INK, PAPER};
use crate::{Result, TextError};

/// Parsed contents of a YAFF source
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YaffSource {
    pub comment: String,
    /// Global properties in source order, keys normalized
    pub properties: Vec<(String, String)>,
    pub glyphs: Vec<Glyph>,
}

impl YaffSource {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Lowercase with `_` replaced by `-`
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('_', "-")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line<'a> {
    Comment(&'a str),
    Blank,
    GlyphRow(&'a str),
    Label(&'a str),
    /// Key whose value follows on indented lines
    MultilineKey(&'a str),
    Property(&'a str, &'a str),
    /// Indented text that is not part of a glyph
    Continuation(&'a str),
    Unknown(&'a str),
}

fn is_indented(line: &str) -> bool {
    line.starts_with(|c: char| c == ' ' || c == '\t')
}

/// Bytes of leading space and tab
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn is_glyph_row(line: &str) -> bool {
    is_indented(line)
        && !line.trim().is_empty()
        && line
            .chars()
            .all(|c| c == INK || c == PAPER || c == EMPTY || c.is_whitespace())
}

fn classify<'a>(line: &'a str, next: Option<&str>) -> Line<'a> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(comment) = trimmed.strip_prefix('#') {
        return Line::Comment(comment.strip_prefix(' ').unwrap_or(comment));
    }
    if is_glyph_row(line) {
        return Line::GlyphRow(trimmed);
    }
    if let Some(head) = trimmed.strip_suffix(':') {
        let continued =
            next.is_some_and(|n| is_indented(n) && !n.trim().is_empty() && !is_glyph_row(n));
        return if continued {
            Line::MultilineKey(head)
        } else {
            Line::Label(head)
        };
    }
    if let Some((key, value)) = trimmed.split_once(':') {
        return Line::Property(key, value.trim());
    }
    if is_indented(line) {
        return Line::Continuation(line);
    }
    Line::Unknown(trimmed)
}

/// Glyph record being assembled between blank lines
#[derive(Default)]
struct Record {
    labels: SmallVec<[Label; 2]>,
    rows: Vec<String>,
    properties: Vec<(String, String)>,
    comment: Vec<String>,
}

struct Parser<'r> {
    resource: &'r str,
    out: YaffSource,
    record: Record,
    global_comment: Vec<String>,
}

impl Parser<'_> {
    /// Nothing but comments has been seen so far
    fn at_start(&self) -> bool {
        self.out.glyphs.is_empty()
            && self.out.properties.is_empty()
            && self.record.labels.is_empty()
            && self.record.rows.is_empty()
            && self.record.properties.is_empty()
    }

    fn flush(&mut self) {
        let record = std::mem::take(&mut self.record);
        if !record.rows.is_empty() {
            let mut glyph = Glyph {
                rows: if record.rows.iter().all(|r| r.chars().all(|c| c == EMPTY)) {
                    Vec::new()
                } else {
                    record.rows
                },
                labels: record.labels,
                comment: record.comment.join("\n"),
                ..Default::default()
            };
            apply_glyph_properties(&mut glyph, record.properties);
            self.out.glyphs.push(glyph);
        } else if !record.properties.is_empty() {
            match self.out.glyphs.last_mut() {
                None => {
                    self.out.properties.extend(record.properties);
                    self.global_comment.extend(record.comment);
                }
                Some(previous) => {
                    apply_glyph_properties(previous, record.properties);
                    if !record.comment.is_empty() {
                        if !previous.comment.is_empty() {
                            previous.comment.push('\n');
                        }
                        previous.comment.push_str(&record.comment.join("\n"));
                    }
                }
            }
            // Labels separated from their rows by a blank line stay pending
            self.record.labels = record.labels;
        } else {
            self.record.labels = record.labels;
            self.record.comment = record.comment;
        }
    }

    fn syntax(&self, line: usize, message: impl Into<String>) -> TextError {
        TextError::Syntax {
            resource: self.resource.to_string(),
            line,
            message: message.into(),
        }
    }
}

fn apply_glyph_properties(glyph: &mut Glyph, properties: Vec<(String, String)>) {
    for (key, value) in properties {
        let metric = match key.as_str() {
            "left-bearing" => Some(&mut glyph.left_bearing),
            "right-bearing" => Some(&mut glyph.right_bearing),
            "shift-up" => Some(&mut glyph.shift_up),
            _ => None,
        };
        match (metric, value.trim().parse::<i32>()) {
            (Some(slot), Ok(parsed)) => *slot = parsed,
            (Some(_), Err(_)) => {
                warn!(key = %key, value = %value, "ignoring non-numeric glyph metric");
            }
            (None, _) => glyph.properties.push((key, value)),
        }
    }
}

/// Parse YAFF text into raw records
///
/// `resource` names the source in error messages.
pub fn parse(resource: &str, source: &str) -> Result<YaffSource> {
    let lines: Vec<&str> = source.lines().collect();
    let mut parser = Parser {
        resource,
        out: YaffSource::default(),
        record: Record::default(),
        global_comment: Vec::new(),
    };

    let mut idx = 0;
    while idx < lines.len() {
        let line_no = idx + 1;
        let line = lines[idx];
        let next = lines.get(idx + 1).copied();
        idx += 1;

        match classify(line, next) {
            Line::Blank => parser.flush(),
            Line::Comment(text) => {
                if parser.at_start() {
                    parser.global_comment.push(text.to_string());
                } else {
                    parser.record.comment.push(text.to_string());
                }
            }
            Line::GlyphRow(row) => {
                if parser.record.labels.is_empty() {
                    return Err(parser.syntax(line_no, "glyph row without a label"));
                }
                parser.record.rows.push(row.to_string());
            }
            Line::Label(text) => {
                // A label after rows or properties starts a new record
                if !parser.record.rows.is_empty()
                    || (!parser.record.properties.is_empty() && parser.record.labels.is_empty())
                {
                    parser.flush();
                }
                match Label::parse(text) {
                    Some(label) => parser.record.labels.push(label),
                    None => warn!(
                        resource,
                        line = line_no,
                        label = text,
                        "unrecognized glyph label"
                    ),
                }
            }
            Line::Property(key, value) => {
                parser
                    .record
                    .properties
                    .push((normalize_key(key), value.to_string()));
            }
            Line::MultilineKey(key) => {
                let mut value: Vec<&str> = Vec::new();
                let mut margin = None;
                while let Some(&cont) = lines.get(idx) {
                    if !is_indented(cont) || cont.trim().is_empty() {
                        break;
                    }
                    let own = indent_width(cont);
                    let strip = (*margin.get_or_insert(own)).min(own);
                    value.push(cont[strip..].trim_end());
                    idx += 1;
                }
                parser
                    .record
                    .properties
                    .push((normalize_key(key), value.join("\n")));
            }
            Line::Continuation(text) => {
                return Err(parser.syntax(
                    line_no,
                    format!("unexpected indented text `{}`", text.trim()),
                ));
            }
            Line::Unknown(text) => {
                return Err(parser.syntax(line_no, format!("cannot parse `{text}`")));
            }
        }
    }
    parser.flush();

    let mut out = parser.out;
    out.comment = parser.global_comment.join("\n");
    debug!(
        resource,
        glyphs = out.glyphs.len(),
        properties = out.properties.len(),
        "parsed yaff source"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# Tiny test font
# two lines

name: Tiny
spacing: character-cell
Cell_Size: 3x3
notice:
    Line one
      indented two

u+0041:
'a':
    .@.
    @.@
    @@@

0x42:
    @@.
    @@@
    left-bearing: 1
    shift_up: -1

\"blank\":
    -

right-bearing: 2
";

    #[test]
    fn test_classify() {
        assert_eq!(classify("", None), Line::Blank);
        assert_eq!(classify("# hi", None), Line::Comment("hi"));
        assert_eq!(classify("    .@@.", None), Line::GlyphRow(".@@."));
        assert_eq!(classify("u+0041:", Some("    .@.")), Line::Label("u+0041"));
        assert_eq!(classify("notice:", Some("    text")), Line::MultilineKey("notice"));
        assert_eq!(classify("name: Tiny", None), Line::Property("name", "Tiny"));
        assert_eq!(
            classify("    left-bearing: 1", None),
            Line::Property("left-bearing", "1")
        );
    }

    #[test]
    fn test_parse_sample() {
        let font = parse("sample", SAMPLE).unwrap();
        assert_eq!(font.comment, "Tiny test font\ntwo lines");
        assert_eq!(font.property("name"), Some("Tiny"));
        assert_eq!(font.property("cell-size"), Some("3x3"));
        assert_eq!(font.property("notice"), Some("Line one\n  indented two"));
        assert_eq!(font.glyphs.len(), 3);

        let a = &font.glyphs[0];
        assert_eq!(a.labels.as_slice(), &[Label::Char('A'), Label::Char('a')]);
        assert_eq!(a.rows, vec![".@.", "@.@", "@@@"]);

        let b = &font.glyphs[1];
        assert_eq!(b.labels.as_slice(), &[Label::Codepoint(0x42)]);
        assert_eq!((b.left_bearing, b.shift_up), (1, -1));

        // Empty glyph with properties attached from the following record
        let blank = &font.glyphs[2];
        assert_eq!(blank.height(), 0);
        assert_eq!(blank.right_bearing, 2);
    }

    #[test]
    fn test_multiline_value_with_wide_space_indent() {
        let font = parse("p", "notice:\n  first\n \u{3000}second\n").unwrap();
        assert_eq!(font.property("notice"), Some("first\n\u{3000}second"));
    }

    #[test]
    fn test_labels_survive_blank_line() {
        let source = "'x':\n\n    @\n";
        let font = parse("split", source).unwrap();
        assert_eq!(font.glyphs.len(), 1);
        assert_eq!(font.glyphs[0].labels.as_slice(), &[Label::Char('x')]);
    }

    #[test]
    fn test_syntax_errors_name_the_line() {
        let err = parse("broken", "name: x\nwhat is this\n").unwrap_err();
        assert_eq!(
            err,
            TextError::Syntax {
                resource: "broken".into(),
                line: 2,
                message: "cannot parse `what is this`".into(),
            }
        );
        assert!(matches!(
            parse("rows", "    @@\n"),
            Err(TextError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_label_is_skipped() {
        let font = parse("odd", "u+zzzz:\n'q':\n    @\n").unwrap();
        assert_eq!(font.glyphs[0].labels.as_slice(), &[Label::Char('q')]);
    }
}
