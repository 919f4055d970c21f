//! Serialization through the smallest transfer buffer allowed
//!
//! Kept in its own test binary since the scratch size is process-wide.

use shapebuf_core::config;
use shapebuf_core::types::*;
use shapebuf_core::ShapingBuffer;
use shapebuf_engine::EngineBuffer;

fn glyph_buffer(positions: Vec<GlyphPosition>) -> ShapingBuffer<EngineBuffer> {
    let mut buffer = ShapingBuffer::new();
    for cluster in 0..positions.len() as u32 {
        buffer.add(0x41, cluster).unwrap();
    }
    let infos = (0..positions.len() as u32)
        .map(|i| GlyphInfo::new(i + 1, i))
        .collect();
    buffer.apply_shaping(infos, positions).unwrap();
    buffer
}

#[test]
fn test_many_chunks_make_one_document() {
    config::set_scratch_size(config::MIN_SCRATCH_SIZE);
    let positions = vec![
        GlyphPosition {
            x_advance: 100,
            ..Default::default()
        };
        10
    ];
    let buffer = glyph_buffer(positions);

    let expected: String = (0..10)
        .map(|i| {
            let open = if i == 0 { "[" } else { "|" };
            let close = if i == 9 { "]" } else { "" };
            format!("{open}gid{}={i}+100{close}", i + 1)
        })
        .collect();
    assert_eq!(buffer.serialize().unwrap(), expected);

    let tail = buffer
        .serialize_glyphs(8, None, None, SerializeFormat::Text, SerializeFlags::empty())
        .unwrap();
    assert_eq!(tail, "|gid9=8+100|gid10=9+100]");
}

#[test]
fn test_record_larger_than_scratch_still_serializes() {
    config::set_scratch_size(config::MIN_SCRATCH_SIZE);
    let buffer = glyph_buffer(vec![GlyphPosition {
        x_advance: 100000,
        y_advance: 0,
        x_offset: -1234,
        y_offset: 5678,
    }]);
    assert_eq!(buffer.serialize().unwrap(), "[gid1=0@-1234,5678+100000]");
}
