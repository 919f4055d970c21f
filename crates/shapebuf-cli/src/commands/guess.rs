//! Guess command implementation

use shapebuf::error::Result;
use shapebuf::prelude::*;

use crate::cli::GuessArgs;
use crate::commands::input_text;

pub fn run(args: &GuessArgs) -> Result<()> {
    let text = input_text(args.text.as_deref())?;

    let mut buffer = Buffer::new();
    buffer.add_str(&text)?;
    buffer.guess_segment_properties();

    if args.json {
        let report = serde_json::json!({
            "direction": buffer.direction().to_string(),
            "script": buffer.script().to_string(),
            "language": buffer.language().as_str(),
        });
        println!("{report}");
    } else {
        println!("direction: {}", buffer.direction());
        println!("script: {}", buffer.script());
        println!("language: {}", buffer.language());
    }
    Ok(())
}
