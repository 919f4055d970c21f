//! Parsers for the two glyph layouts written by [`crate::serialize`]
//!
//! Glyph references may be numeric ids, `gidN`, or names looked up in the
//! font's `post` table. Parsing is all-or-nothing: the engine only commits
//! glyphs when the whole input was understood.

use serde::Deserialize;
use shapebuf_core::error::SerializeError;
use shapebuf_core::types::{GlyphInfo, GlyphPosition, SerializeFormat};
use shapebuf_core::FontData;

/// Glyphs recovered from serialized text
pub type ParsedGlyphs = (Vec<GlyphInfo>, Vec<GlyphPosition>);

pub fn deserialize_glyphs(
    text: &str,
    font: Option<&FontData>,
    format: SerializeFormat,
) -> Result<ParsedGlyphs, SerializeError> {
    if text.trim().is_empty() {
        return Err(SerializeError::Parse {
            offset: 0,
            reason: "empty input".to_string(),
        });
    }
    match format {
        SerializeFormat::Text => TextParser::new(text, font).parse(),
        SerializeFormat::Json => parse_json(text, font),
    }
}

fn resolve_glyph(name: &str, font: Option<&FontData>) -> Option<u32> {
    if let Ok(gid) = name.parse::<u32>() {
        return Some(gid);
    }
    if let Some(gid) = font.and_then(|font| font.glyph_from_name(name)) {
        return Some(gid);
    }
    name.strip_prefix("gid").and_then(|id| id.parse().ok())
}

struct TextParser<'a> {
    text: &'a str,
    pos: usize,
    font: Option<&'a FontData>,
}

impl<'a> TextParser<'a> {
    fn new(text: &'a str, font: Option<&'a FontData>) -> Self {
        Self { text, pos: 0, font }
    }

    fn error(&self, reason: impl Into<String>) -> SerializeError {
        SerializeError::Parse {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek().filter(|&c| keep(c)) {
            self.pos += c.len_utf8();
        }
        &self.text[start..self.pos]
    }

    fn int(&mut self) -> Result<i32, SerializeError> {
        let start = self.pos;
        self.eat('-');
        self.take_while(|c| c.is_ascii_digit());
        self.text[start..self.pos]
            .parse()
            .map_err(|_| self.error("expected an integer"))
    }

    fn uint(&mut self) -> Result<u32, SerializeError> {
        self.take_while(|c| c.is_ascii_digit())
            .parse()
            .map_err(|_| self.error("expected an unsigned integer"))
    }

    fn hex(&mut self) -> Result<u32, SerializeError> {
        let digits = self.take_while(|c| c.is_ascii_hexdigit());
        u32::from_str_radix(digits, 16).map_err(|_| self.error("expected hex glyph flags"))
    }

    fn expect(&mut self, c: char) -> Result<(), SerializeError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn parse(mut self) -> Result<ParsedGlyphs, SerializeError> {
        let mut infos = Vec::new();
        let mut positions = Vec::new();

        self.skip_whitespace();
        let bracketed = self.eat('[');
        self.skip_whitespace();

        let empty_list = bracketed && self.peek() == Some(']');
        if !empty_list {
            loop {
                let (info, position) = self.glyph()?;
                infos.push(info);
                positions.push(position);
                self.skip_whitespace();
                if !self.eat('|') {
                    break;
                }
                self.skip_whitespace();
            }
        }

        if bracketed {
            self.expect(']')?;
        }
        self.skip_whitespace();
        if self.pos != self.text.len() {
            return Err(self.error("trailing characters"));
        }
        Ok((infos, positions))
    }

    fn glyph(&mut self) -> Result<(GlyphInfo, GlyphPosition), SerializeError> {
        let name = self.take_while(|c| !c.is_whitespace() && !"=@+#<|[]".contains(c));
        if name.is_empty() {
            return Err(self.error("expected a glyph"));
        }
        let codepoint = resolve_glyph(name, self.font)
            .ok_or_else(|| self.error(format!("unknown glyph {name:?}")))?;

        let mut info = GlyphInfo::new(codepoint, 0);
        let mut position = GlyphPosition::default();

        if self.eat('=') {
            info.cluster = self.uint()?;
        }
        if self.eat('@') {
            position.x_offset = self.int()?;
            self.expect(',')?;
            position.y_offset = self.int()?;
        }
        if self.eat('+') {
            position.x_advance = self.int()?;
            if self.eat(',') {
                position.y_advance = self.int()?;
            }
        }
        if self.eat('#') {
            info.mask = self.hex()?;
        }
        if self.eat('<') {
            // extents are derived from the font, not stored
            for i in 0..4 {
                self.int()?;
                if i < 3 {
                    self.expect(',')?;
                }
            }
            self.expect('>')?;
        }
        Ok((info, position))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonGlyphRef {
    Id(u32),
    Name(String),
}

#[derive(Deserialize)]
struct JsonGlyph {
    g: JsonGlyphRef,
    #[serde(default)]
    cl: u32,
    #[serde(default)]
    dx: i32,
    #[serde(default)]
    dy: i32,
    #[serde(default)]
    ax: i32,
    #[serde(default)]
    ay: i32,
    #[serde(default)]
    fl: u32,
}

fn parse_json(text: &str, font: Option<&FontData>) -> Result<ParsedGlyphs, SerializeError> {
    let glyphs: Vec<JsonGlyph> = serde_json::from_str(text).map_err(|err| SerializeError::Parse {
        offset: byte_offset(text, err.line(), err.column()),
        reason: err.to_string(),
    })?;

    let mut infos = Vec::with_capacity(glyphs.len());
    let mut positions = Vec::with_capacity(glyphs.len());
    for (index, glyph) in glyphs.into_iter().enumerate() {
        let codepoint = match glyph.g {
            JsonGlyphRef::Id(gid) => gid,
            JsonGlyphRef::Name(name) => {
                resolve_glyph(&name, font).ok_or_else(|| SerializeError::Parse {
                    offset: 0,
                    reason: format!("unknown glyph {name:?} at index {index}"),
                })?
            },
        };
        infos.push(GlyphInfo {
            codepoint,
            mask: glyph.fl,
            cluster: glyph.cl,
        });
        positions.push(GlyphPosition {
            x_advance: glyph.ax,
            y_advance: glyph.ay,
            x_offset: glyph.dx,
            y_offset: glyph.dy,
        });
    }
    Ok((infos, positions))
}

/// serde_json reports 1-based line/column; turn that back into a byte offset
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}
