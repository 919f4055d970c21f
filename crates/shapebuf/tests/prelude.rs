//! The facade on its own, no fonts needed

use shapebuf::prelude::*;

#[test]
fn test_text_in_glyphs_out() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut buffer = Buffer::new();
    buffer.add_utf32(TextWindow::utf32("abc")).unwrap();
    assert_eq!(buffer.content_type(), ContentType::Unicode);

    // stand-in for a shaper: glyph id = codepoint, fixed advance
    let infos = buffer.glyph_infos().to_vec();
    let positions = vec![
        GlyphPosition {
            x_advance: 600,
            ..Default::default()
        };
        infos.len()
    ];
    buffer.apply_shaping(infos, positions).unwrap();

    let json = buffer
        .serialize_glyphs(
            0,
            None,
            None,
            SerializeFormat::Json,
            SerializeFlags::NO_GLYPH_NAMES | SerializeFlags::NO_POSITIONS,
        )
        .unwrap();
    assert_eq!(json, r#"[{"g":97,"cl":0},{"g":98,"cl":1},{"g":99,"cl":2}]"#);

    buffer.close();
}

#[test]
fn test_add_after_glyphs_is_invalid_state() {
    let mut buffer = Buffer::new();
    buffer
        .deserialize_glyphs("[1=0+10]", None, SerializeFormat::Text)
        .unwrap();
    let err = buffer.add_str("x").unwrap_err();
    assert!(err.is_invalid_state());
    assert!(matches!(err, ShapeBufError::InvalidState(_)));
}
