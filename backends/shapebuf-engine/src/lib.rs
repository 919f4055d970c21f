//! Pure Rust buffer engine
//!
//! [`EngineBuffer`] is the storage a [`ShapingBuffer`] drives: codepoints or
//! glyphs with their positions, the segment properties, and the shaping
//! context around the last added item. It decodes all three UTF forms,
//! guesses segment properties from ICU script data, and reads and writes
//! the HarfBuzz glyph text format.
//!
//! ```rust
//! use shapebuf_engine::EngineBuffer;
//! use shapebuf_core::{types::ContentType, ShapingBuffer};
//!
//! let mut buffer: ShapingBuffer<EngineBuffer> = ShapingBuffer::new();
//! buffer.add_str("héllo").unwrap();
//! assert_eq!(buffer.len(), 5);
//! assert_eq!(buffer.glyph_infos()[2].cluster, 3);
//! assert_eq!(buffer.content_type(), ContentType::Unicode);
//! ```
//!
//! [`ShapingBuffer`]: shapebuf_core::ShapingBuffer

pub mod decode;
pub mod deserialize;
pub mod script;
pub mod serialize;

use shapebuf_core::config;
use shapebuf_core::error::Result;
use shapebuf_core::traits::BufferEngine;
use shapebuf_core::types::*;
use shapebuf_core::FontData;

use decode::{decode_item, Decode};
use script::ScriptLookup;

/// In-process buffer storage with HarfBuzz buffer semantics
pub struct EngineBuffer {
    content_type: ContentType,
    direction: Direction,
    script: Script,
    language: Language,
    flags: BufferFlags,
    cluster_level: ClusterLevel,
    replacement: u32,
    infos: Vec<GlyphInfo>,
    positions: Vec<GlyphPosition>,
    pre_context: Vec<u32>,
    post_context: Vec<u32>,
    scripts: ScriptLookup,
    destroyed: bool,
}

impl EngineBuffer {
    pub fn new() -> Self {
        Self {
            content_type: ContentType::Empty,
            direction: Direction::Invalid,
            script: Script::INVALID,
            language: Language::INVALID,
            flags: BufferFlags::empty(),
            cluster_level: ClusterLevel::default(),
            replacement: DEFAULT_REPLACEMENT_CODEPOINT,
            infos: Vec::new(),
            positions: Vec::new(),
            pre_context: Vec::new(),
            post_context: Vec::new(),
            scripts: ScriptLookup::new(),
            destroyed: false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn push(&mut self, codepoint: u32, cluster: u32) {
        self.infos.push(GlyphInfo::new(codepoint, cluster));
        self.positions.push(GlyphPosition::default());
    }

    fn add_decoded<T: Decode>(&mut self, text: &[T], item_offset: usize, item_length: usize) {
        let item = decode_item(text, item_offset, item_length, self.replacement);

        if self.infos.is_empty() {
            self.pre_context = item.pre_context;
        }
        self.infos.reserve(item.codepoints.len());
        self.positions.reserve(item.codepoints.len());
        for (cluster, codepoint) in item.codepoints {
            self.push(codepoint, cluster);
        }
        self.post_context = item.post_context;
        self.content_type = ContentType::Unicode;
    }

    fn clear_items(&mut self) {
        self.infos.clear();
        self.positions.clear();
        self.pre_context.clear();
        self.post_context.clear();
        self.content_type = ContentType::Empty;
    }
}

impl Default for EngineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferEngine for EngineBuffer {
    fn name(&self) -> &'static str {
        "Rust"
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        log::trace!("Destroying engine buffer with {} items", self.infos.len());
        self.infos = Vec::new();
        self.positions = Vec::new();
        self.pre_context = Vec::new();
        self.post_context = Vec::new();
        self.content_type = ContentType::Empty;
        self.destroyed = true;
    }

    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn script(&self) -> Script {
        self.script
    }

    fn set_script(&mut self, script: Script) {
        self.script = script;
    }

    fn language(&self) -> Language {
        self.language.clone()
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    fn flags(&self) -> BufferFlags {
        self.flags
    }

    fn set_flags(&mut self, flags: BufferFlags) {
        self.flags = flags;
    }

    fn cluster_level(&self) -> ClusterLevel {
        self.cluster_level
    }

    fn set_cluster_level(&mut self, level: ClusterLevel) {
        self.cluster_level = level;
    }

    fn replacement_codepoint(&self) -> u32 {
        self.replacement
    }

    fn set_replacement_codepoint(&mut self, codepoint: u32) {
        self.replacement = codepoint;
    }

    fn len(&self) -> usize {
        self.infos.len()
    }

    fn set_len(&mut self, len: usize) {
        if len == 0 {
            self.clear_items();
            return;
        }
        self.infos.resize(len, GlyphInfo::default());
        self.positions.resize(len, GlyphPosition::default());
    }

    fn add(&mut self, codepoint: u32, cluster: u32) {
        self.push(codepoint, cluster);
    }

    fn add_utf8(&mut self, text: &[u8], item_offset: usize, item_length: usize) {
        self.add_decoded(text, item_offset, item_length);
    }

    fn add_utf16(&mut self, text: &[u16], item_offset: usize, item_length: usize) {
        self.add_decoded(text, item_offset, item_length);
    }

    fn add_utf32(&mut self, text: &[u32], item_offset: usize, item_length: usize) {
        self.add_decoded(text, item_offset, item_length);
    }

    fn pre_context(&self) -> &[u32] {
        &self.pre_context
    }

    fn post_context(&self) -> &[u32] {
        &self.post_context
    }

    fn guess_segment_properties(&mut self) {
        if !self.script.is_valid() && self.content_type == ContentType::Unicode {
            if let Some(script) = self
                .scripts
                .first_significant(self.infos.iter().map(|info| info.codepoint))
            {
                self.script = script;
            }
        }

        if !self.direction.is_valid() {
            self.direction = match self.script.horizontal_direction() {
                Direction::Invalid => Direction::Ltr,
                direction => direction,
            };
        }

        if !self.language.is_valid() {
            self.language = config::default_language();
        }
    }

    fn clear_contents(&mut self) {
        self.clear_items();
    }

    fn reset(&mut self) {
        self.clear_items();
        self.direction = Direction::Invalid;
        self.script = Script::INVALID;
        self.language = Language::INVALID;
        self.flags = BufferFlags::empty();
        self.cluster_level = ClusterLevel::default();
        self.replacement = DEFAULT_REPLACEMENT_CODEPOINT;
    }

    fn glyph_infos(&self) -> &[GlyphInfo] {
        &self.infos
    }

    fn glyph_positions(&self) -> &[GlyphPosition] {
        &self.positions
    }

    fn load_glyphs(&mut self, infos: Vec<GlyphInfo>, positions: Vec<GlyphPosition>) {
        self.infos = infos;
        self.positions = positions;
    }

    fn serialize_glyphs(
        &self,
        start: usize,
        end: usize,
        scratch: &mut [u8],
        font: Option<&FontData>,
        format: SerializeFormat,
        flags: SerializeFlags,
    ) -> Result<(usize, usize)> {
        Ok(serialize::serialize_glyphs(
            &self.infos,
            &self.positions,
            start,
            end,
            scratch,
            font,
            format,
            flags,
        ))
    }

    fn deserialize_glyphs(
        &mut self,
        text: &str,
        font: Option<&FontData>,
        format: SerializeFormat,
    ) -> Result<usize> {
        let (infos, positions) = deserialize::deserialize_glyphs(text, font, format)?;
        log::trace!("Parsed {} glyphs from {format}", infos.len());
        self.infos.extend(infos);
        self.positions.extend(positions);
        Ok(text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_defaults() {
        let engine = EngineBuffer::new();
        assert_eq!(engine.content_type(), ContentType::Empty);
        assert_eq!(engine.direction(), Direction::Invalid);
        assert_eq!(engine.script(), Script::INVALID);
        assert_eq!(engine.replacement_codepoint(), 0xFFFD);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_context_is_captured_around_item() {
        let mut engine = EngineBuffer::new();
        let text = "abcdefgh".as_bytes();
        engine.add_utf8(text, 3, 2);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.pre_context(), &[0x63, 0x62, 0x61]);
        assert_eq!(engine.post_context(), &[0x66, 0x67, 0x68]);

        // a second item keeps the first pre-context
        engine.add_utf8(text, 5, 1);
        assert_eq!(engine.pre_context(), &[0x63, 0x62, 0x61]);
        assert_eq!(engine.post_context(), &[0x67, 0x68]);
    }

    #[test]
    fn test_set_len() {
        let mut engine = EngineBuffer::new();
        engine.add_utf32(&[0x41, 0x42], 0, 2);
        engine.set_len(4);
        assert_eq!(engine.glyph_infos()[3], GlyphInfo::default());
        assert_eq!(engine.glyph_positions().len(), 4);
        engine.set_len(0);
        assert_eq!(engine.content_type(), ContentType::Empty);
    }

    #[test]
    fn test_guess_keeps_explicit_values() {
        let mut engine = EngineBuffer::new();
        engine.set_content_type(ContentType::Unicode);
        engine.add_utf8("שלום".as_bytes(), 0, "שלום".len());
        engine.set_direction(Direction::Ttb);
        engine.set_language(Language::new("he"));
        engine.guess_segment_properties();
        assert_eq!(engine.script(), Script::HEBREW);
        assert_eq!(engine.direction(), Direction::Ttb);
        assert_eq!(engine.language(), Language::new("he"));
    }

    #[test]
    fn test_guess_without_content_falls_back_to_ltr() {
        let mut engine = EngineBuffer::new();
        engine.set_language(Language::new("fr"));
        engine.guess_segment_properties();
        assert_eq!(engine.script(), Script::INVALID);
        assert_eq!(engine.direction(), Direction::Ltr);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut engine = EngineBuffer::new();
        engine.add(0x41, 0);
        engine.destroy();
        engine.destroy();
        assert!(engine.is_destroyed());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_deserialize_appends_and_reports_bytes() {
        let mut engine = EngineBuffer::new();
        let consumed = engine
            .deserialize_glyphs("[gid5=0+100|gid6=1+200]", None, SerializeFormat::Text)
            .unwrap();
        assert_eq!(consumed, 23);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.glyph_positions()[1].x_advance, 200);
    }
}
