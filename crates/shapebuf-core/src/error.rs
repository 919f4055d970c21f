//! Error types for shapebuf

use thiserror::Error;

use crate::types::ContentType;

pub type Result<T> = std::result::Result<T, ShapeBufError>;

/// Main error type for shapebuf
#[derive(Debug, Error)]
pub enum ShapeBufError {
    #[error("Argument `{name}` out of range: {value} (limit {limit})")]
    OutOfRange {
        name: &'static str,
        value: usize,
        limit: usize,
    },

    #[error("Invalid buffer state: {0}")]
    InvalidState(#[from] StateError),

    #[error("Glyph serialization failed: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Shaping failed: {0}")]
    Shaping(#[from] ShapingError),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShapeBufError {
    /// Builds an out-of-range fault for argument `name`
    pub fn out_of_range(name: &'static str, value: usize, limit: usize) -> Self {
        Self::OutOfRange { name, value, limit }
    }

    /// True for faults raised by argument validation
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// True for content-type / emptiness precondition violations
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

/// Content-type precondition violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("non empty buffer's content type must be Unicode, found {0}")]
    NonUnicodeContent(ContentType),

    #[error("content type must not be Glyphs")]
    GlyphContent,

    #[error("buffer should not be empty")]
    EmptyBuffer,

    #[error("content type should be Glyphs, found {0}")]
    NotGlyphs(ContentType),

    #[error("buffer must be empty, holds {0} items")]
    NotEmpty(usize),

    #[error("shaping requires Unicode content, found {0}")]
    NotUnicode(ContentType),

    #[error("glyph infos ({infos}) and positions ({positions}) differ in length")]
    LengthMismatch { infos: usize, positions: usize },
}

/// Failures reported by the engine's serializer and parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    #[error("scratch buffer of {capacity} bytes cannot hold glyph {index}")]
    NoProgress { index: usize, capacity: usize },

    #[error("engine reported {written} bytes written into a {capacity} byte scratch buffer")]
    Overrun { written: usize, capacity: usize },

    #[error("malformed glyph data at byte {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    #[error("unknown serialize format: {0}")]
    UnknownFormat(String),

    #[error("serialized output is not valid UTF-8")]
    Encoding,
}

/// Shaping backend errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Invalid feature string: {0}")]
    InvalidFeature(String),

    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),

    #[error("Script not supported: {0}")]
    ScriptNotSupported(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font face {index} out of range")]
    FaceIndex { index: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classes() {
        let range = ShapeBufError::out_of_range("item_offset", 9, 4);
        assert!(range.is_out_of_range());
        assert!(!range.is_invalid_state());

        let state: ShapeBufError = StateError::GlyphContent.into();
        assert!(state.is_invalid_state());
        assert!(state.to_string().contains("Glyphs"));
    }

    #[test]
    fn test_messages_name_the_argument() {
        let err = ShapeBufError::out_of_range("end", 12, 10);
        assert_eq!(
            err.to_string(),
            "Argument `end` out of range: 12 (limit 10)"
        );
    }
}
