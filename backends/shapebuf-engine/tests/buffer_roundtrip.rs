//! Buffer behaviour end to end on the Rust engine

use shapebuf_core::error::{ShapeBufError, StateError};
use shapebuf_core::types::*;
use shapebuf_core::{ShapingBuffer, TextWindow};
use shapebuf_engine::EngineBuffer;

type Buffer = ShapingBuffer<EngineBuffer>;

/// Pretends to shape: one glyph per codepoint, advance grows with the index
fn fake_shape(buffer: &mut Buffer) {
    let infos: Vec<GlyphInfo> = buffer
        .glyph_infos()
        .iter()
        .map(|info| GlyphInfo::new(info.codepoint - 29, info.cluster))
        .collect();
    let positions = (0..infos.len() as i32)
        .map(|i| GlyphPosition {
            x_advance: 500 + i * 10,
            x_offset: if i == 1 { -15 } else { 0 },
            ..Default::default()
        })
        .collect();
    buffer.apply_shaping(infos, positions).unwrap();
}

#[test]
fn test_codepoints_then_glyphs() {
    let mut buffer = Buffer::new();
    buffer.add(65, 0).unwrap();
    buffer.add(66, 1).unwrap();
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer.content_type(), ContentType::Unicode);

    buffer.set_content_type(ContentType::Glyphs);
    let err = buffer.add(67, 2).unwrap_err();
    assert!(matches!(err, ShapeBufError::InvalidState(_)));
    assert_eq!(buffer.len(), 2);
}

#[test]
fn test_utf16_item_clusters_and_context() {
    let mut buffer = Buffer::new();
    let window = TextWindow::utf16("x😀yz").with_item(1, Some(3));
    buffer.add_utf16(window).unwrap();

    let clusters: Vec<u32> = buffer.glyph_infos().iter().map(|i| i.cluster).collect();
    let codepoints: Vec<u32> = buffer.glyph_infos().iter().map(|i| i.codepoint).collect();
    assert_eq!(codepoints, vec![0x1F600, 0x79]);
    assert_eq!(clusters, vec![1, 3]);
    assert_eq!(buffer.pre_context(), &[0x78]);
    assert_eq!(buffer.post_context(), &[0x7A]);
}

#[test]
fn test_invalid_utf8_uses_replacement() {
    let mut buffer = Buffer::new();
    buffer.set_replacement_codepoint(0x3F);
    buffer.add_utf8(&b"a\xFFb"[..]).unwrap();
    let codepoints: Vec<u32> = buffer.glyph_infos().iter().map(|i| i.codepoint).collect();
    assert_eq!(codepoints, vec![0x61, 0x3F, 0x62]);
}

#[test]
fn test_text_round_trip() {
    let mut buffer = Buffer::new();
    buffer.add_str("Hello").unwrap();
    fake_shape(&mut buffer);

    let text = buffer.serialize().unwrap();
    assert_eq!(
        text,
        "[gid43=0+500|gid72=1@-15,0+510|gid79=2+520|gid79=3+530|gid82=4+540]"
    );

    let mut copy = Buffer::new();
    copy.deserialize_glyphs(&text, None, SerializeFormat::Text)
        .unwrap();
    assert_eq!(copy.content_type(), ContentType::Glyphs);
    assert_eq!(copy.glyph_infos(), buffer.glyph_infos());
    assert_eq!(copy.glyph_positions(), buffer.glyph_positions());
}

#[test]
fn test_json_round_trip() {
    let mut buffer = Buffer::new();
    buffer.add_str("abc").unwrap();
    fake_shape(&mut buffer);

    let json = buffer
        .serialize_glyphs(0, None, None, SerializeFormat::Json, SerializeFlags::empty())
        .unwrap();
    let mut copy = Buffer::new();
    copy.deserialize_glyphs(&json, None, SerializeFormat::Json)
        .unwrap();
    assert_eq!(copy.glyph_infos(), buffer.glyph_infos());
    assert_eq!(copy.glyph_positions(), buffer.glyph_positions());
}

#[test]
fn test_failed_deserialize_leaves_buffer_empty() {
    let mut buffer = Buffer::new();
    let err = buffer
        .deserialize_glyphs("[gid1=0+10|gid2=", None, SerializeFormat::Text)
        .unwrap_err();
    assert!(matches!(err, ShapeBufError::Serialize(_)));
    assert!(buffer.is_empty());
    assert_eq!(buffer.content_type(), ContentType::Empty);
}

#[test]
fn test_deserialize_into_glyph_buffer_is_refused() {
    let mut buffer = Buffer::new();
    buffer
        .deserialize_glyphs("[1=0+10]", None, SerializeFormat::Text)
        .unwrap();
    let err = buffer
        .deserialize_glyphs("[2=0+10]", None, SerializeFormat::Text)
        .unwrap_err();
    assert!(matches!(
        err,
        ShapeBufError::InvalidState(StateError::NotEmpty(1))
    ));
}

#[test]
fn test_guess_segment_properties() {
    let mut arabic = Buffer::new();
    arabic.add_str("123 مرحبا").unwrap();
    arabic.guess_segment_properties();
    assert_eq!(arabic.script(), Script::ARABIC);
    assert_eq!(arabic.direction(), Direction::Rtl);

    let mut pinned = Buffer::new();
    pinned.set_script(Script::LATIN);
    pinned.add_str("Ωμέγα").unwrap();
    pinned.guess_segment_properties();
    assert_eq!(pinned.script(), Script::LATIN);
    assert_eq!(pinned.direction(), Direction::Ltr);

    // a second call with unchanged content changes nothing
    let before = (pinned.direction(), pinned.script(), pinned.language());
    pinned.guess_segment_properties();
    assert_eq!(before, (pinned.direction(), pinned.script(), pinned.language()));
}

#[test]
fn test_guess_covers_every_unicode_script() {
    let guess = |text: &str| {
        let mut buffer = Buffer::new();
        buffer.add_str(text).unwrap();
        buffer.guess_segment_properties();
        (buffer.script().to_string(), buffer.direction())
    };
    assert_eq!(guess("𐴀𐴁𐴂"), ("Rohg".to_string(), Direction::Rtl));
    assert_eq!(guess("𐨐𐨑𐨒"), ("Khar".to_string(), Direction::Rtl));
    assert_eq!(guess("𐤀𐤁"), ("Phnx".to_string(), Direction::Rtl));
    assert_eq!(guess("ሰላም"), ("Ethi".to_string(), Direction::Ltr));
    assert_eq!(guess("𐐀𐐁"), ("Dsrt".to_string(), Direction::Ltr));
}

#[test]
fn test_clear_and_reset() {
    let mut buffer = Buffer::new();
    let language = buffer.language();
    buffer.set_direction(Direction::Rtl);
    buffer.set_script(Script::HEBREW);
    buffer.set_language(Language::new("he"));
    buffer.set_flags(BufferFlags::BEGINNING_OF_TEXT);
    buffer.set_cluster_level(ClusterLevel::Characters);
    buffer.set_replacement_codepoint(0x3F);
    buffer.add_str("שלום").unwrap();

    buffer.clear_contents();
    assert!(buffer.is_empty());
    assert_eq!(buffer.content_type(), ContentType::Empty);
    assert_eq!(buffer.direction(), Direction::Rtl);
    assert_eq!(buffer.script(), Script::HEBREW);
    assert_eq!(buffer.language(), Language::new("he"));
    assert_eq!(buffer.cluster_level(), ClusterLevel::Characters);

    buffer.add_str("שלום").unwrap();
    buffer.reset();
    assert!(buffer.is_empty());
    assert_eq!(buffer.direction(), Direction::Invalid);
    assert_eq!(buffer.script(), Script::INVALID);
    assert_eq!(buffer.language(), language);
    assert_eq!(buffer.flags(), BufferFlags::empty());
    assert_eq!(buffer.cluster_level(), ClusterLevel::MonotoneGraphemes);
    assert_eq!(buffer.replacement_codepoint(), DEFAULT_REPLACEMENT_CODEPOINT);
}

#[test]
fn test_set_length_zero_empties() {
    let mut buffer = Buffer::new();
    buffer.add_str("abc").unwrap();
    buffer.set_length(1);
    assert_eq!(buffer.len(), 1);
    buffer.set_length(0);
    assert_eq!(buffer.content_type(), ContentType::Empty);
    buffer
        .deserialize_glyphs("[3=0+1]", None, SerializeFormat::Text)
        .unwrap();
}
