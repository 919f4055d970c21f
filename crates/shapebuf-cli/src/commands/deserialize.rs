//! Deserialize command implementation
//!
//! Reads glyphs in either format into an empty buffer and writes them out
//! again, which doubles as a format converter (`-I json -O text`).

use shapebuf::error::Result;
use shapebuf::prelude::*;

use crate::cli::DeserializeArgs;
use crate::commands::{input_text, load_font};

pub fn run(args: &DeserializeArgs) -> Result<()> {
    let data = input_text(args.data.as_deref())?;
    let font = args
        .font_file
        .as_deref()
        .map(|path| load_font(path, args.face_index))
        .transpose()?;

    let mut buffer = Buffer::new();
    buffer.deserialize_glyphs(&data, font.as_ref(), args.input_format.into())?;

    println!("glyphs: {}", buffer.len());
    if buffer.is_empty() {
        println!("[]");
        return Ok(());
    }
    let output = buffer.serialize_glyphs(
        0,
        None,
        font.as_ref(),
        args.output.format.into(),
        args.output.flags(),
    )?;
    println!("{output}");
    Ok(())
}
