//! The shaping buffer: one engine handle behind a content-type state machine
//!
//! ```text
//! Empty   --add*-----------------> Unicode
//! Empty   --deserialize_glyphs---> Glyphs
//! Unicode --Shaper::shape--------> Glyphs
//! any     --clear_contents/reset-> Empty
//! Glyphs  --add*-----------------> error (InvalidState)
//! ```
//!
//! Every precondition is checked here before the engine is called, so a
//! failing operation leaves the buffer exactly as it was.

use std::fmt;

use crate::config;
use crate::error::{Result, SerializeError, ShapeBufError, StateError};
use crate::font::FontData;
use crate::text::{CodeUnit, TextWindow};
use crate::traits::BufferEngine;
use crate::types::*;

/// Text on its way to a shaper, or glyphs on their way back
pub struct ShapingBuffer<E: BufferEngine> {
    engine: E,
    /// Restored by `reset`, captured when the buffer was created
    default_language: Language,
    released: bool,
}

impl<E: BufferEngine + Default> ShapingBuffer<E> {
    /// Empty buffer with the process default language
    pub fn new() -> Self {
        Self::with_engine(E::default())
    }
}

impl<E: BufferEngine + Default> Default for ShapingBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BufferEngine> ShapingBuffer<E> {
    /// Takes ownership of `engine`; the buffer destroys it exactly once
    pub fn with_engine(mut engine: E) -> Self {
        let language = config::default_language();
        engine.set_language(language.clone());
        log::debug!(
            "Created shaping buffer on {} engine, language {:?}",
            engine.name(),
            language.as_str()
        );
        Self {
            engine,
            default_language: language,
            released: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn content_type(&self) -> ContentType {
        self.engine.content_type()
    }

    /// Overrides the content type without touching the items
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.engine.set_content_type(content_type);
    }

    pub fn direction(&self) -> Direction {
        self.engine.direction()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.engine.set_direction(direction);
    }

    pub fn script(&self) -> Script {
        self.engine.script()
    }

    pub fn set_script(&mut self, script: Script) {
        self.engine.set_script(script);
    }

    pub fn language(&self) -> Language {
        self.engine.language()
    }

    pub fn set_language(&mut self, language: Language) {
        self.engine.set_language(language);
    }

    pub fn flags(&self) -> BufferFlags {
        self.engine.flags()
    }

    pub fn set_flags(&mut self, flags: BufferFlags) {
        self.engine.set_flags(flags);
    }

    pub fn cluster_level(&self) -> ClusterLevel {
        self.engine.cluster_level()
    }

    pub fn set_cluster_level(&mut self, level: ClusterLevel) {
        self.engine.set_cluster_level(level);
    }

    pub fn replacement_codepoint(&self) -> u32 {
        self.engine.replacement_codepoint()
    }

    pub fn set_replacement_codepoint(&mut self, codepoint: u32) {
        self.engine.set_replacement_codepoint(codepoint);
    }

    /// Number of codepoints or glyphs held
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Truncates or zero-extends the items; zero empties the buffer
    pub fn set_length(&mut self, len: usize) {
        self.engine.set_len(len);
    }

    fn check_appendable(&self) -> Result<()> {
        let content_type = self.engine.content_type();
        if self.engine.len() != 0 && content_type != ContentType::Unicode {
            return Err(StateError::NonUnicodeContent(content_type).into());
        }
        if content_type == ContentType::Glyphs {
            return Err(StateError::GlyphContent.into());
        }
        Ok(())
    }

    fn mark_unicode(&mut self) {
        if self.engine.content_type() != ContentType::Unicode {
            log::trace!("Buffer content type -> Unicode");
            self.engine.set_content_type(ContentType::Unicode);
        }
    }

    /// Appends one codepoint tagged with `cluster`
    pub fn add(&mut self, codepoint: u32, cluster: u32) -> Result<()> {
        self.check_appendable()?;
        self.engine.add(codepoint, cluster);
        self.mark_unicode();
        Ok(())
    }

    /// Appends `text` codepoint by codepoint, clusters counting chars from zero
    pub fn add_chars(&mut self, text: &str) -> Result<()> {
        self.check_appendable()?;
        for (cluster, ch) in (0u32..).zip(text.chars()) {
            self.engine.add(u32::from(ch), cluster);
        }
        self.mark_unicode();
        Ok(())
    }

    /// Decodes the window's item and appends it
    ///
    /// The item range is validated first, then the content type. Clusters are
    /// code-unit offsets from the start of the whole text, and ill-formed
    /// sequences become the replacement codepoint.
    pub fn add_text<T: CodeUnit>(&mut self, window: &TextWindow<'_, T>) -> Result<()> {
        let (offset, length) = window.resolve()?;
        self.check_appendable()?;
        log::trace!(
            "Adding {} item {}..{} of {} code units",
            T::ENCODING,
            offset,
            offset + length,
            window.units().len()
        );
        T::add_to(&mut self.engine, window.units(), offset, length);
        self.mark_unicode();
        Ok(())
    }

    /// UTF-8 text: a `&str`, raw bytes, or a [`TextWindow`] with an item range
    pub fn add_utf8<'a>(&mut self, text: impl Into<TextWindow<'a, u8>>) -> Result<()> {
        self.add_text(&text.into())
    }

    /// UTF-16 code units, or [`TextWindow::utf16`] for a `&str`
    pub fn add_utf16<'a>(&mut self, text: impl Into<TextWindow<'a, u16>>) -> Result<()> {
        self.add_text(&text.into())
    }

    /// UTF-32 code units, or [`TextWindow::utf32`] for a `&str`
    pub fn add_utf32<'a>(&mut self, text: impl Into<TextWindow<'a, u32>>) -> Result<()> {
        self.add_text(&text.into())
    }

    /// Shorthand for [`ShapingBuffer::add_utf8`] on a whole string
    pub fn add_str(&mut self, text: &str) -> Result<()> {
        self.add_text(&TextWindow::utf8(text))
    }

    /// Text preceding the added items, nearest codepoint first
    pub fn pre_context(&self) -> &[u32] {
        self.engine.pre_context()
    }

    /// Text following the last added item
    pub fn post_context(&self) -> &[u32] {
        self.engine.post_context()
    }

    /// Fills in unset direction, script and language from the content
    pub fn guess_segment_properties(&mut self) {
        self.engine.guess_segment_properties();
        log::debug!(
            "Guessed segment properties: direction={}, script={}, language={:?}",
            self.engine.direction(),
            self.engine.script(),
            self.engine.language().as_str()
        );
    }

    /// Empties the buffer; direction, script, language, flags and cluster level stay
    pub fn clear_contents(&mut self) {
        self.engine.clear_contents();
        log::trace!("Buffer contents cleared");
    }

    /// Empties the buffer and puts every setting back to how `new` left it
    pub fn reset(&mut self) {
        self.engine.reset();
        self.engine.set_language(self.default_language.clone());
        log::trace!("Buffer reset");
    }

    /// Codepoints before shaping, glyph ids after
    pub fn glyph_infos(&self) -> &[GlyphInfo] {
        self.engine.glyph_infos()
    }

    /// Positions, parallel to [`ShapingBuffer::glyph_infos`] once shaped
    pub fn glyph_positions(&self) -> &[GlyphPosition] {
        self.engine.glyph_positions()
    }

    /// Stores a shaper's output and flips the content to glyphs
    pub fn apply_shaping(
        &mut self,
        infos: Vec<GlyphInfo>,
        positions: Vec<GlyphPosition>,
    ) -> Result<()> {
        let content_type = self.engine.content_type();
        if content_type != ContentType::Unicode {
            return Err(StateError::NotUnicode(content_type).into());
        }
        if infos.len() != positions.len() {
            return Err(StateError::LengthMismatch {
                infos: infos.len(),
                positions: positions.len(),
            }
            .into());
        }
        log::debug!("Loading {} shaped glyphs", infos.len());
        self.engine.load_glyphs(infos, positions);
        self.engine.set_content_type(ContentType::Glyphs);
        Ok(())
    }

    /// Glyphs `start..end` (`None` = to the end) in the engine's text format
    ///
    /// The engine serializes into a fixed-size scratch buffer (see
    /// [`config::scratch_size`]) and reports how many glyphs fit, so this
    /// drains it repeatedly until the whole range is written.
    pub fn serialize_glyphs(
        &self,
        start: usize,
        end: Option<usize>,
        font: Option<&FontData>,
        format: SerializeFormat,
        flags: SerializeFlags,
    ) -> Result<String> {
        let len = self.engine.len();
        if len == 0 {
            return Err(StateError::EmptyBuffer.into());
        }
        let content_type = self.engine.content_type();
        if content_type != ContentType::Glyphs {
            return Err(StateError::NotGlyphs(content_type).into());
        }
        let end = end.unwrap_or(len);
        if end > len {
            return Err(ShapeBufError::out_of_range("end", end, len));
        }
        if start > end {
            return Err(ShapeBufError::out_of_range("start", start, end));
        }

        let mut scratch = vec![0u8; config::scratch_size()];
        let mut output = String::with_capacity(scratch.len());
        let mut position = start;

        while position < end {
            let (written, consumed) = self.engine.serialize_glyphs(
                position,
                end,
                &mut scratch,
                font,
                format,
                flags,
            )?;
            if consumed == 0 {
                // a single record larger than the scratch buffer
                if scratch.len() >= config::MAX_SCRATCH_SIZE {
                    return Err(SerializeError::NoProgress {
                        index: position,
                        capacity: scratch.len(),
                    }
                    .into());
                }
                let grown = (scratch.len() * 2).min(config::MAX_SCRATCH_SIZE);
                log::debug!(
                    "Glyph {position} does not fit {} bytes, growing to {grown}",
                    scratch.len()
                );
                scratch.resize(grown, 0);
                continue;
            }
            let chunk = scratch.get(..written).ok_or(SerializeError::Overrun {
                written,
                capacity: scratch.len(),
            })?;
            output.push_str(std::str::from_utf8(chunk).map_err(|_| SerializeError::Encoding)?);
            log::trace!(
                "Serialized glyphs {}..{} ({written} bytes)",
                position,
                position + consumed
            );
            position += consumed;
        }

        Ok(output)
    }

    /// Whole buffer as text with default flags
    pub fn serialize(&self) -> Result<String> {
        self.serialize_glyphs(0, None, None, SerializeFormat::Text, SerializeFlags::empty())
    }

    /// Parses serialized glyphs into this empty buffer
    pub fn deserialize_glyphs(
        &mut self,
        text: &str,
        font: Option<&FontData>,
        format: SerializeFormat,
    ) -> Result<()> {
        let len = self.engine.len();
        if len != 0 {
            return Err(StateError::NotEmpty(len).into());
        }
        if self.engine.content_type() == ContentType::Glyphs {
            return Err(StateError::GlyphContent.into());
        }
        let consumed = self.engine.deserialize_glyphs(text, font, format)?;
        self.engine.set_content_type(ContentType::Glyphs);
        log::debug!(
            "Deserialized {} glyphs from {consumed} bytes of {format}",
            self.engine.len()
        );
        Ok(())
    }

    /// Releases the engine now rather than at end of scope
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.engine.destroy();
            log::debug!("Released {} buffer", self.engine.name());
        }
    }
}

impl<E: BufferEngine> Drop for ShapingBuffer<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: BufferEngine> fmt::Debug for ShapingBuffer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapingBuffer")
            .field("engine", &self.engine.name())
            .field("content_type", &self.engine.content_type())
            .field("len", &self.engine.len())
            .field("direction", &self.engine.direction())
            .field("script", &self.engine.script())
            .field("language", &self.engine.language())
            .finish()
    }
}
