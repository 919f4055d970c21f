//! The two collaborators a shaping buffer talks to
//!
//! - [`BufferEngine`] - owns the storage behind one buffer: codepoints,
//!   glyphs, segment properties, the UTF decoders and the glyph text format
//! - [`Shaper`] - turns a buffer's codepoints into positioned glyphs
//!
//! [`ShapingBuffer`](crate::buffer::ShapingBuffer) checks every precondition
//! before it calls into an engine, so engines can assume well-formed calls.

use crate::buffer::ShapingBuffer;
use crate::error::Result;
use crate::font::FontData;
use crate::types::*;

/// Storage and codecs behind one shaping buffer
///
/// An engine value is the buffer's native handle: created once per buffer,
/// destroyed once when the buffer goes away. Getters never fail; setters
/// and mutations are only called after the buffer validated them.
pub trait BufferEngine {
    /// Who are you? Used in logs
    fn name(&self) -> &'static str;

    /// Releases whatever the handle owns; later calls must be no-ops
    fn destroy(&mut self);

    fn content_type(&self) -> ContentType;
    fn set_content_type(&mut self, content_type: ContentType);

    fn direction(&self) -> Direction;
    fn set_direction(&mut self, direction: Direction);

    fn script(&self) -> Script;
    fn set_script(&mut self, script: Script);

    fn language(&self) -> Language;
    fn set_language(&mut self, language: Language);

    fn flags(&self) -> BufferFlags;
    fn set_flags(&mut self, flags: BufferFlags);

    fn cluster_level(&self) -> ClusterLevel;
    fn set_cluster_level(&mut self, level: ClusterLevel);

    fn replacement_codepoint(&self) -> u32;
    fn set_replacement_codepoint(&mut self, codepoint: u32);

    /// Number of items (codepoints or glyphs)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Truncates, or grows with zeroed items
    fn set_len(&mut self, len: usize);

    /// Appends one codepoint with its cluster
    fn add(&mut self, codepoint: u32, cluster: u32);

    /// Decodes `text[item_offset..item_offset + item_length]`; clusters are
    /// code-unit indices into the whole of `text`
    fn add_utf8(&mut self, text: &[u8], item_offset: usize, item_length: usize);
    fn add_utf16(&mut self, text: &[u16], item_offset: usize, item_length: usize);
    fn add_utf32(&mut self, text: &[u32], item_offset: usize, item_length: usize);

    /// Codepoints before the first item, closest first
    fn pre_context(&self) -> &[u32] {
        &[]
    }

    /// Codepoints after the last item
    fn post_context(&self) -> &[u32] {
        &[]
    }

    /// Fills in whichever of direction, script and language are unset
    fn guess_segment_properties(&mut self);

    /// Drops the items, keeps the settings
    fn clear_contents(&mut self);

    /// Drops the items and the settings
    fn reset(&mut self);

    fn glyph_infos(&self) -> &[GlyphInfo];
    fn glyph_positions(&self) -> &[GlyphPosition];

    /// Replaces the contents with shaped glyphs
    fn load_glyphs(&mut self, infos: Vec<GlyphInfo>, positions: Vec<GlyphPosition>);

    /// Writes whole glyph records from `start..end` into `scratch` until the
    /// next one would not fit; returns `(bytes_written, items_consumed)`
    fn serialize_glyphs(
        &self,
        start: usize,
        end: usize,
        scratch: &mut [u8],
        font: Option<&FontData>,
        format: SerializeFormat,
        flags: SerializeFlags,
    ) -> Result<(usize, usize)>;

    /// Parses serialized glyphs and appends them; returns the bytes consumed
    fn deserialize_glyphs(
        &mut self,
        text: &str,
        font: Option<&FontData>,
        format: SerializeFormat,
    ) -> Result<usize>;
}

/// Where codepoints become positioned glyphs
///
/// A shaper reads the buffer's Unicode content and segment properties and
/// hands the result back through
/// [`ShapingBuffer::apply_shaping`](crate::buffer::ShapingBuffer::apply_shaping).
pub trait Shaper {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Shapes `buffer` in place with `font`
    fn shape<E: BufferEngine>(
        &self,
        font: &FontData,
        buffer: &mut ShapingBuffer<E>,
        features: &[Feature],
    ) -> Result<()>;

    /// Can you handle this script?
    fn supports_script(&self, _script: Script) -> bool {
        true
    }
}
