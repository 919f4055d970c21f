//! HarfBuzz shaping backend for shapebuf

use std::str::FromStr;

use harfbuzz_rs::{
    ClusterLevel as HbClusterLevel, Direction as HbDirection, Face, Feature as HbFeature,
    Font as HbFont, Language as HbLanguage, Tag as HbTag, UnicodeBuffer,
};

use shapebuf_core::{
    error::{Result, StateError},
    traits::{BufferEngine, Shaper},
    types::{
        ClusterLevel, ContentType, Direction, Feature, GlyphFlags, GlyphInfo, GlyphPosition, Tag,
    },
    FontData, ShapingBuffer,
};

/// HarfBuzz shaping backend
///
/// Positions come back in font units: the HarfBuzz font is left at its
/// default scale, which is the face's units per em.
#[derive(Debug, Default, Clone, Copy)]
pub struct HarfBuzzShaper;

impl HarfBuzzShaper {
    pub fn new() -> Self {
        Self
    }

    fn to_hb_direction(direction: Direction) -> Option<HbDirection> {
        match direction {
            Direction::Invalid => None,
            Direction::Ltr => Some(HbDirection::Ltr),
            Direction::Rtl => Some(HbDirection::Rtl),
            Direction::Ttb => Some(HbDirection::Ttb),
            Direction::Btt => Some(HbDirection::Btt),
        }
    }

    fn to_hb_cluster_level(level: ClusterLevel) -> HbClusterLevel {
        match level {
            ClusterLevel::MonotoneGraphemes => HbClusterLevel::MonotoneGraphemes,
            ClusterLevel::MonotoneCharacters => HbClusterLevel::MonotoneCharacters,
            ClusterLevel::Characters => HbClusterLevel::Characters,
        }
    }

    fn to_hb_tag(tag: Tag) -> HbTag {
        let [a, b, c, d] = *tag.as_bytes();
        HbTag::new(char::from(a), char::from(b), char::from(c), char::from(d))
    }

    fn to_hb_feature(feature: &Feature) -> HbFeature {
        let tag = Self::to_hb_tag(feature.tag);
        if feature.is_global() {
            HbFeature::new(tag, feature.value, ..)
        } else {
            HbFeature::new(tag, feature.value, feature.start..feature.end)
        }
    }

    /// Unicode buffer with the codepoints and the settings harfbuzz_rs can carry
    fn unicode_buffer<E: BufferEngine>(buffer: &ShapingBuffer<E>) -> UnicodeBuffer {
        // harfbuzz_rs has no setters for buffer flags or context
        if !buffer.flags().is_empty() {
            log::debug!("HarfBuzz backend ignores buffer flags {:?}", buffer.flags());
        }
        if !buffer.pre_context().is_empty() || !buffer.post_context().is_empty() {
            log::debug!(
                "HarfBuzz backend ignores {} pre-context and {} post-context codepoints",
                buffer.pre_context().len(),
                buffer.post_context().len()
            );
        }

        let mut hb_buffer = buffer
            .glyph_infos()
            .iter()
            .fold(UnicodeBuffer::new(), |hb_buffer, info| {
                let ch = char::from_u32(info.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
                hb_buffer.add(ch as u32, info.cluster)
            });

        if let Some(direction) = Self::to_hb_direction(buffer.direction()) {
            hb_buffer = hb_buffer.set_direction(direction);
        }
        if buffer.script().is_valid() {
            hb_buffer = hb_buffer.set_script(Self::to_hb_tag(buffer.script().tag()));
        }
        if let Some(tag) = buffer.language().as_str() {
            if let Ok(language) = HbLanguage::from_str(tag) {
                hb_buffer = hb_buffer.set_language(language);
            }
        }
        hb_buffer
            .set_cluster_level(Self::to_hb_cluster_level(buffer.cluster_level()))
            .guess_segment_properties()
    }
}

impl Shaper for HarfBuzzShaper {
    fn name(&self) -> &'static str {
        "HarfBuzz"
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

        let face = Face::from_bytes(font.data(), font.face_index());
        let hb_font = HbFont::new(face);

        let hb_buffer = Self::unicode_buffer(buffer);
        let hb_features: Vec<HbFeature> = features.iter().map(Self::to_hb_feature).collect();
        let output = harfbuzz_rs::shape(&hb_font, hb_buffer, &hb_features);

        let infos: Vec<GlyphInfo> = output
            .get_glyph_infos()
            .iter()
            .map(|info| GlyphInfo {
                codepoint: info.codepoint,
                mask: info.glyph_flags().0 & GlyphFlags::all().bits(),
                cluster: info.cluster,
            })
            .collect();
        let positions: Vec<GlyphPosition> = output
            .get_glyph_positions()
            .iter()
            .map(|pos| GlyphPosition {
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
            })
            .collect();

        log::debug!(
            "HarfBuzz shaped {} codepoints into {} glyphs",
            buffer.len(),
            infos.len()
        );
        buffer.apply_shaping(infos, positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_mapping() {
        assert!(HarfBuzzShaper::to_hb_direction(Direction::Invalid).is_none());
        assert!(matches!(
            HarfBuzzShaper::to_hb_direction(Direction::Btt),
            Some(HbDirection::Btt)
        ));
    }

    #[test]
    fn test_cluster_level_reaches_harfbuzz() {
        let mut buffer = ShapingBuffer::<shapebuf_engine::EngineBuffer>::new();
        buffer.set_cluster_level(ClusterLevel::Characters);
        buffer.add_str("ab").unwrap();
        let hb_buffer = HarfBuzzShaper::unicode_buffer(&buffer);
        assert!(matches!(
            hb_buffer.get_cluster_level(),
            HbClusterLevel::Characters
        ));
        assert!(matches!(
            HarfBuzzShaper::to_hb_cluster_level(ClusterLevel::MonotoneCharacters),
            HbClusterLevel::MonotoneCharacters
        ));
    }

    #[test]
    fn test_tag_conversion() {
        let tag = HarfBuzzShaper::to_hb_tag(Tag::new(b"kern"));
        assert_eq!(tag, HbTag::new('k', 'e', 'r', 'n'));
    }
}
