//! CLI Smoke Tests
//!
//! Integration tests for the shapebuf CLI commands:
//! - `guess`: segment property guessing
//! - `deserialize`: glyph text parsing and re-serialization
//! - `shape`: shaping with a system font, skipped when none is installed
//!
//! Tests cover both success cases and failure cases (bad input, missing fonts).

use std::path::Path;
use std::process::{Command, Output};

fn shapebuf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shapebuf"))
        .args(args)
        .env("SHAPEBUF_LANGUAGE", "en")
        .output()
        .expect("Failed to execute shapebuf")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn system_font() -> Option<&'static str> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    ]
    .into_iter()
    .find(|path| Path::new(path).exists())
}

// ============================================================================
// Guess Command Tests
// ============================================================================

#[test]
fn test_guess_help() {
    let output = shapebuf(&["guess", "--help"]);
    assert!(output.status.success(), "guess --help should succeed");
    assert!(stdout(&output).contains("guessed"));
}

#[test]
fn test_guess_arabic() {
    let output = shapebuf(&["guess", "مرحبا"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("direction: rtl"), "got: {text}");
    assert!(text.contains("script: Arab"), "got: {text}");
    assert!(text.contains("language: en"), "got: {text}");
}

#[test]
fn test_guess_json() {
    let output = shapebuf(&["guess", "--json", "Hello"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(value["direction"], "ltr");
    assert_eq!(value["script"], "Latn");
}

// ============================================================================
// Deserialize Command Tests
// ============================================================================

#[test]
fn test_deserialize_text_to_json() {
    let output = shapebuf(&[
        "deserialize",
        "[gid5=0+100|gid6=1@10,0+200]",
        "--format",
        "json",
        "--no-glyph-names",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("glyphs: 2\n"), "got: {text}");
    assert!(text.contains(r#"[{"g":5,"cl":0,"dx":0,"dy":0,"ax":100,"ay":0},"#));
}

#[test]
fn test_deserialize_round_trips_text() {
    let input = "[gid5=0+100|gid6=1@10,0+200]";
    let output = shapebuf(&["deserialize", input]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(input));
}

#[test]
fn test_deserialize_malformed_fails() {
    let output = shapebuf(&["deserialize", "[gid5=0+100|"]);
    assert!(!output.status.success(), "malformed input should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "got: {stderr}");
}

// ============================================================================
// Shape Command Tests
// ============================================================================

#[test]
fn test_shape_missing_font_fails() {
    let output = shapebuf(&["shape", "Hello", "-f", "/nonexistent/font.ttf"]);
    assert!(!output.status.success(), "missing font should fail");
}

#[test]
fn test_shape_requires_font() {
    let output = shapebuf(&["shape", "Hello"]);
    assert!(!output.status.success());
}

#[test]
fn test_shape_with_system_font() {
    let Some(font) = system_font() else {
        return;
    };
    let output = shapebuf(&["shape", "Test", "-f", font, "--no-glyph-names"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.trim().starts_with('[') && text.trim().ends_with(']'));
    assert_eq!(text.matches('|').count(), 3, "got: {text}");
}

#[test]
fn test_shape_item_window_keeps_text_clusters() {
    let Some(font) = system_font() else {
        return;
    };
    let output = shapebuf(&[
        "shape",
        "abcd",
        "-f",
        font,
        "--utf",
        "16",
        "--item-offset",
        "2",
        "--no-positions",
        "--no-glyph-names",
    ]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("=2") && text.contains("=3"), "got: {text}");
}

#[test]
fn test_shape_bad_item_offset_fails() {
    let Some(font) = system_font() else {
        return;
    };
    let output = shapebuf(&["shape", "ab", "-f", font, "--item-offset", "9"]);
    assert!(!output.status.success());
}
