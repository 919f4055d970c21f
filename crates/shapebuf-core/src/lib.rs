//! Shapebuf Core: the buffer between text and a shaper
//!
//! A [`ShapingBuffer`] collects codepoints (added one by one or decoded from
//! UTF-8, UTF-16 or UTF-32 text) together with the segment properties a
//! shaper needs: direction, script, language, flags and cluster level. A
//! [`Shaper`] then replaces the codepoints with positioned glyphs, which can
//! be read back directly or written out in the glyph text format.
//!
//! The buffer itself stores nothing. Each one owns a single
//! [`BufferEngine`], the handle that holds the items and implements the
//! decoders and the serializer, and guards every call into it with the
//! content-type rules:
//!
//! - text can only be appended while the buffer is empty or holds Unicode
//! - glyphs can only be serialized from a non-empty glyph buffer
//! - glyphs can only be deserialized into an empty, non-glyph buffer
//!
//! ```rust,ignore
//! use shapebuf_core::{ShapingBuffer, types::ContentType};
//!
//! let mut buffer: ShapingBuffer<MyEngine> = ShapingBuffer::new();
//! buffer.add(65, 0)?;
//! buffer.add(66, 1)?;
//! assert_eq!(buffer.len(), 2);
//! assert_eq!(buffer.content_type(), ContentType::Unicode);
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod font;
pub mod text;
pub mod traits;
pub mod types;

pub use buffer::ShapingBuffer;
pub use error::{Result, ShapeBufError};
pub use font::FontData;
pub use text::TextWindow;
pub use traits::{BufferEngine, Shaper};
