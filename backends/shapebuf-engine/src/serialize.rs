//! Glyph text output, written in bounded chunks
//!
//! Two layouts share one record builder:
//!
//! ```text
//! text: [gid36=0+1176|gid72=1@-20,0+1024#1]
//! json: [{"g":"gid36","cl":0,"dx":0,"dy":0,"ax":1176,"ay":0},...]
//! ```
//!
//! The opening bracket belongs to glyph 0 and the closing one to the last
//! glyph of the range, so consecutive chunks concatenate into one document.

use std::fmt::Write;

use shapebuf_core::types::{
    GlyphExtents, GlyphInfo, GlyphPosition, SerializeFlags, SerializeFormat,
};
use shapebuf_core::FontData;

/// Writes whole records for `start..end` into `scratch`, stopping at the
/// first one that does not fit. Returns `(bytes_written, glyphs_written)`.
#[allow(clippy::too_many_arguments)]
pub fn serialize_glyphs(
    infos: &[GlyphInfo],
    positions: &[GlyphPosition],
    start: usize,
    end: usize,
    scratch: &mut [u8],
    font: Option<&FontData>,
    format: SerializeFormat,
    flags: SerializeFlags,
) -> (usize, usize) {
    let end = end.min(infos.len()).min(positions.len());
    if start >= end {
        return (0, 0);
    }

    // Absolute pen position of glyph `start`, used when advances are folded into offsets
    let (mut pen_x, mut pen_y) = if flags.contains(SerializeFlags::NO_ADVANCES) {
        positions[..start].iter().fold((0i32, 0i32), |(x, y), pos| {
            (x.wrapping_add(pos.x_advance), y.wrapping_add(pos.y_advance))
        })
    } else {
        (0, 0)
    };

    let mut written = 0;
    let mut record = String::with_capacity(64);

    for i in start..end {
        record.clear();
        let glyph = Record {
            index: i,
            is_last: i + 1 == end,
            info: &infos[i],
            position: &positions[i],
            pen: (pen_x, pen_y),
            font,
            flags,
        };
        match format {
            SerializeFormat::Text => glyph.write_text(&mut record),
            SerializeFormat::Json => glyph.write_json(&mut record),
        }

        let bytes = record.as_bytes();
        if written + bytes.len() > scratch.len() {
            return (written, i - start);
        }
        scratch[written..written + bytes.len()].copy_from_slice(bytes);
        written += bytes.len();

        if flags.contains(SerializeFlags::NO_ADVANCES) {
            pen_x = pen_x.wrapping_add(positions[i].x_advance);
            pen_y = pen_y.wrapping_add(positions[i].y_advance);
        }
    }

    (written, end - start)
}

struct Record<'a> {
    index: usize,
    is_last: bool,
    info: &'a GlyphInfo,
    position: &'a GlyphPosition,
    pen: (i32, i32),
    font: Option<&'a FontData>,
    flags: SerializeFlags,
}

impl Record<'_> {
    fn name(&self) -> String {
        self.font
            .and_then(|font| font.glyph_name(self.info.codepoint))
            .unwrap_or_else(|| format!("gid{}", self.info.codepoint))
    }

    fn extents(&self) -> GlyphExtents {
        self.font
            .and_then(|font| font.glyph_extents(self.info.codepoint))
            .unwrap_or_default()
    }

    fn offset(&self) -> (i32, i32) {
        (
            self.pen.0.wrapping_add(self.position.x_offset),
            self.pen.1.wrapping_add(self.position.y_offset),
        )
    }

    fn defined_flags(&self) -> u32 {
        self.info.glyph_flags().bits()
    }

    // Writing into a String cannot fail, so the fmt results are dropped
    fn write_text(&self, out: &mut String) {
        out.push(if self.index == 0 { '[' } else { '|' });

        if self.flags.contains(SerializeFlags::NO_GLYPH_NAMES) {
            let _ = write!(out, "{}", self.info.codepoint);
        } else {
            out.push_str(&self.name());
        }

        if !self.flags.contains(SerializeFlags::NO_CLUSTERS) {
            let _ = write!(out, "={}", self.info.cluster);
        }

        if !self.flags.contains(SerializeFlags::NO_POSITIONS) {
            let (dx, dy) = self.offset();
            if dx != 0 || dy != 0 {
                let _ = write!(out, "@{dx},{dy}");
            }
            if !self.flags.contains(SerializeFlags::NO_ADVANCES) {
                let _ = write!(out, "+{}", self.position.x_advance);
                if self.position.y_advance != 0 {
                    let _ = write!(out, ",{}", self.position.y_advance);
                }
            }
        }

        if self.flags.contains(SerializeFlags::GLYPH_FLAGS) && self.defined_flags() != 0 {
            let _ = write!(out, "#{:X}", self.defined_flags());
        }

        if self.flags.contains(SerializeFlags::GLYPH_EXTENTS) {
            let e = self.extents();
            let _ = write!(
                out,
                "<{},{},{},{}>",
                e.x_bearing, e.y_bearing, e.width, e.height
            );
        }

        if self.is_last {
            out.push(']');
        }
    }

    fn write_json(&self, out: &mut String) {
        out.push(if self.index == 0 { '[' } else { ',' });
        out.push_str("{\"g\":");

        if self.flags.contains(SerializeFlags::NO_GLYPH_NAMES) {
            let _ = write!(out, "{}", self.info.codepoint);
        } else {
            let name = self.name();
            match serde_json::to_string(&name) {
                Ok(quoted) => out.push_str(&quoted),
                Err(_) => {
                    let _ = write!(out, "\"gid{}\"", self.info.codepoint);
                },
            }
        }

        if !self.flags.contains(SerializeFlags::NO_CLUSTERS) {
            let _ = write!(out, ",\"cl\":{}", self.info.cluster);
        }

        if !self.flags.contains(SerializeFlags::NO_POSITIONS) {
            let (dx, dy) = self.offset();
            let _ = write!(out, ",\"dx\":{dx},\"dy\":{dy}");
            if !self.flags.contains(SerializeFlags::NO_ADVANCES) {
                let _ = write!(
                    out,
                    ",\"ax\":{},\"ay\":{}",
                    self.position.x_advance, self.position.y_advance
                );
            }
        }

        if self.flags.contains(SerializeFlags::GLYPH_FLAGS) && self.defined_flags() != 0 {
            let _ = write!(out, ",\"fl\":{}", self.defined_flags());
        }

        if self.flags.contains(SerializeFlags::GLYPH_EXTENTS) {
            let e = self.extents();
            let _ = write!(
                out,
                ",\"xb\":{},\"yb\":{},\"w\":{},\"h\":{}",
                e.x_bearing, e.y_bearing, e.width, e.height
            );
        }

        out.push('}');
        if self.is_last {
            out.push(']');
        }
    }
}
