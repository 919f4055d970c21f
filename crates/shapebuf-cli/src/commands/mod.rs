//! Subcommand implementations and the input plumbing they share

pub mod deserialize;
pub mod guess;
pub mod shape;

use std::io::{self, Read};
use std::path::Path;

use shapebuf::error::Result;
use shapebuf::FontData;

/// Positional text if given, stdin otherwise
pub fn input_text(arg: Option<&str>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(decode_unicode_escapes(text));
    }
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

/// Expands `\uXXXX` and `\u{X...}`; anything malformed is kept as typed
pub fn decode_unicode_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("\\u") {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];

        let (hex, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .char_indices()
                .nth(4)
                .map_or(after.len(), |(i, _)| i);
            (&after[..end], end)
        };

        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(ch) if !hex.is_empty() => {
                result.push(ch);
                rest = &after[consumed..];
            },
            _ => {
                result.push_str("\\u");
                rest = after;
            },
        }
    }
    result.push_str(rest);
    result
}

pub fn load_font(path: &Path, face_index: u32) -> Result<FontData> {
    log::info!("Loading font from {} (face {face_index})", path.display());
    FontData::from_file_index(path, face_index)
}
