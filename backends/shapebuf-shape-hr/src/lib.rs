//! Pure Rust shaping backend using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz, so buffers shaped here come
//! out the same as with the C library without any C toolchain involved.
//! Every buffer setting carries over: direction, script, language, flags,
//! cluster level and the context around the item.

use std::str::FromStr;

use harfrust::{
    BufferClusterLevel, BufferFlags as HrBufferFlags, Direction as HrDirection,
    Feature as HrFeature, FontRef as HrFontRef, Language as HrLanguage, Script as HrScript,
    ShaperData, Tag as HrTag, UnicodeBuffer,
};

use shapebuf_core::{
    error::{Result, ShapingError, StateError},
    traits::{BufferEngine, Shaper},
    types::{
        ClusterLevel, ContentType, Direction, Feature, GlyphFlags, GlyphInfo, GlyphPosition,
        Language, Script,
    },
    FontData, ShapingBuffer,
};

/// Pure Rust text shaping powered by harfrust
#[derive(Debug, Default, Clone, Copy)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    pub fn new() -> Self {
        Self
    }

    fn to_hr_direction(direction: Direction) -> Option<HrDirection> {
        match direction {
            Direction::Invalid => None,
            Direction::Ltr => Some(HrDirection::LeftToRight),
            Direction::Rtl => Some(HrDirection::RightToLeft),
            Direction::Ttb => Some(HrDirection::TopToBottom),
            Direction::Btt => Some(HrDirection::BottomToTop),
        }
    }

    fn to_hr_script(script: Script) -> Option<HrScript> {
        if !script.is_valid() {
            return None;
        }
        HrScript::from_iso15924_tag(HrTag::new(script.tag().as_bytes()))
    }

    fn to_hr_language(language: &Language) -> Option<HrLanguage> {
        language
            .as_str()
            .and_then(|tag| HrLanguage::from_str(tag).ok())
    }

    fn to_hr_cluster_level(level: ClusterLevel) -> BufferClusterLevel {
        match level {
            ClusterLevel::MonotoneGraphemes => BufferClusterLevel::MonotoneGraphemes,
            ClusterLevel::MonotoneCharacters => BufferClusterLevel::MonotoneCharacters,
            ClusterLevel::Characters => BufferClusterLevel::Characters,
        }
    }

    fn to_hr_features(features: &[Feature]) -> Vec<HrFeature> {
        features
            .iter()
            .map(|feature| HrFeature {
                tag: HrTag::new(feature.tag.as_bytes()),
                value: feature.value,
                start: u32::try_from(feature.start).unwrap_or(u32::MAX),
                end: u32::try_from(feature.end).unwrap_or(u32::MAX),
            })
            .collect()
    }

    /// Context codepoints in logical order
    fn context_string(codepoints: impl Iterator<Item = u32>) -> String {
        codepoints.filter_map(char::from_u32).collect()
    }

    /// Unicode buffer carrying the codepoints and every setting of `buffer`
    fn unicode_buffer<E: BufferEngine>(buffer: &ShapingBuffer<E>) -> UnicodeBuffer {
        let mut hr_buffer = UnicodeBuffer::new();
        hr_buffer.set_pre_context(&Self::context_string(
            buffer.pre_context().iter().rev().copied(),
        ));
        for info in buffer.glyph_infos() {
            let ch = char::from_u32(info.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
            hr_buffer.add(ch, info.cluster);
        }
        hr_buffer.set_post_context(&Self::context_string(
            buffer.post_context().iter().copied(),
        ));

        if let Some(direction) = Self::to_hr_direction(buffer.direction()) {
            hr_buffer.set_direction(direction);
        }
        if let Some(script) = Self::to_hr_script(buffer.script()) {
            hr_buffer.set_script(script);
        }
        if let Some(language) = Self::to_hr_language(&buffer.language()) {
            hr_buffer.set_language(language);
        }
        hr_buffer.set_flags(HrBufferFlags::from_bits_truncate(buffer.flags().bits()));
        hr_buffer.set_cluster_level(Self::to_hr_cluster_level(buffer.cluster_level()));

        // whatever is still unset gets guessed, as HarfBuzz does before shaping
        hr_buffer.guess_segment_properties();
        hr_buffer
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "Harfrust"
    }

    fn shape<E: BufferEngine>(
        &self,
        font: &FontData,
        buffer: &mut ShapingBuffer<E>,
        features: &[Feature],
    ) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        let content_type = buffer.content_type();
        if content_type != ContentType::Unicode {
            return Err(StateError::NotUnicode(content_type).into());
        }

        let hr_font = HrFontRef::from_index(font.data(), font.face_index())
            .map_err(|e| ShapingError::BackendError(format!("harfrust: {e}")))?;
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data.shaper(&hr_font).build();

        let hr_buffer = Self::unicode_buffer(buffer);
        let hr_features = Self::to_hr_features(features);
        let output = shaper.shape(hr_buffer, &hr_features);

        let infos: Vec<GlyphInfo> = output
            .glyph_infos()
            .iter()
            .map(|info| {
                let mut flags = GlyphFlags::empty();
                flags.set(GlyphFlags::UNSAFE_TO_BREAK, info.unsafe_to_break());
                flags.set(GlyphFlags::UNSAFE_TO_CONCAT, info.unsafe_to_concat());
                GlyphInfo {
                    codepoint: info.glyph_id,
                    mask: flags.bits(),
                    cluster: info.cluster,
                }
            })
            .collect();
        let positions: Vec<GlyphPosition> = output
            .glyph_positions()
            .iter()
            .map(|pos| GlyphPosition {
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
            })
            .collect();

        log::debug!(
            "Harfrust shaped {} codepoints into {} glyphs",
            buffer.len(),
            infos.len()
        );
        buffer.apply_shaping(infos, positions)
    }
}
