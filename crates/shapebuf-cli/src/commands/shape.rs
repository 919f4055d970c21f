//! Shape command implementation
//!
//! Loads the text into a buffer the way the options say, shapes it and
//! prints the glyphs in the requested format.

use std::str::FromStr;

use shapebuf::error::{Result, ShapingError};
use shapebuf::prelude::*;

use crate::cli::{Encoding, ShapeArgs, ShaperKind};
use crate::commands::{input_text, load_font};

pub fn run(args: &ShapeArgs) -> Result<()> {
    let text = input_text(args.text.as_deref())?;
    let font = load_font(&args.font_file, args.face_index)?;
    let features = parse_features(args.features.as_deref())?;

    let mut buffer = Buffer::new();
    configure(&mut buffer, args)?;
    add_text(&mut buffer, &text, args)?;
    buffer.guess_segment_properties();

    log::info!(
        "Shaping {} codepoints with {:?}: direction={}, script={}, language={}",
        buffer.len(),
        args.shaper,
        buffer.direction(),
        buffer.script(),
        buffer.language()
    );
    shape_with(args.shaper, &font, &mut buffer, &features)?;

    if buffer.is_empty() {
        println!("[]");
        return Ok(());
    }
    let output = buffer.serialize_glyphs(
        0,
        None,
        Some(&font),
        args.output.format.into(),
        args.output.flags(),
    )?;
    println!("{output}");
    Ok(())
}

fn configure(buffer: &mut Buffer, args: &ShapeArgs) -> Result<()> {
    if args.direction != "auto" {
        buffer.set_direction(Direction::from_str(&args.direction)?);
    }
    if args.script != "auto" {
        buffer.set_script(Script::from_str(&args.script)?);
    }
    if let Some(language) = &args.language {
        buffer.set_language(Language::new(language));
    }
    buffer.set_cluster_level(ClusterLevel::from_str(&args.cluster_level)?);

    let mut flags = BufferFlags::empty();
    flags.set(BufferFlags::BEGINNING_OF_TEXT, args.beginning_of_text);
    flags.set(BufferFlags::END_OF_TEXT, args.end_of_text);
    buffer.set_flags(flags);
    Ok(())
}

fn add_text(buffer: &mut Buffer, text: &str, args: &ShapeArgs) -> Result<()> {
    let (offset, length) = (args.item_offset, args.item_length);
    match args.encoding {
        Encoding::Utf8 => buffer.add_utf8(TextWindow::utf8(text).with_item(offset, length)),
        Encoding::Utf16 => buffer.add_utf16(TextWindow::utf16(text).with_item(offset, length)),
        Encoding::Utf32 => buffer.add_utf32(TextWindow::utf32(text).with_item(offset, length)),
    }
}

/// Comma or space separated feature list
pub fn parse_features(spec: Option<&str>) -> Result<Vec<Feature>> {
    let Some(spec) = spec else {
        return Ok(Vec::new());
    };
    spec.split([',', ' '])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Feature::from_str(part).map_err(Into::into))
        .collect()
}

fn shape_with(
    kind: ShaperKind,
    font: &FontData,
    buffer: &mut Buffer,
    features: &[Feature],
) -> Result<()> {
    match kind {
        #[cfg(feature = "shaping-hr")]
        ShaperKind::Hr => HarfrustShaper::new().shape(font, buffer, features),

        #[cfg(feature = "shaping-hb")]
        ShaperKind::Hb => HarfBuzzShaper::new().shape(font, buffer, features),

        #[allow(unreachable_patterns)]
        other => Err(ShapingError::BackendError(format!(
            "shaper {other:?} was not compiled in"
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_features() {
        let features = parse_features(Some("kern, -liga aalt=2")).unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[1].value, 0);
        assert_eq!(features[2].value, 2);
        assert!(parse_features(None).unwrap().is_empty());
        assert!(parse_features(Some("toolong")).is_err());
    }
}
