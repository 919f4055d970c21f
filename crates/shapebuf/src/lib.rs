//! Shapebuf - a text shaping buffer with HarfBuzz semantics
//!
//! A [`Buffer`] takes Unicode text in any of the three encoding forms,
//! carries the segment properties a shaper needs, and after shaping holds
//! positioned glyphs that can be written out in the HarfBuzz glyph text or
//! JSON format and read back again.
//!
//! # Example
//!
//! ```
//! use shapebuf::prelude::*;
//!
//! let mut buffer = Buffer::new();
//! buffer.add_str("Hello").unwrap();
//! buffer.guess_segment_properties();
//! assert_eq!(buffer.script(), Script::LATIN);
//! assert_eq!(buffer.direction(), Direction::Ltr);
//! ```
//!
//! # Feature Flags
//!
//! - `shaping-hr`: pure Rust shaping through harfrust (default)
//! - `shaping-hb`: shaping through the HarfBuzz C library
//! - `full`: every shaper

pub use shapebuf_core::{config, error, font, text, traits, types};
pub use shapebuf_core::{FontData, ShapeBufError, ShapingBuffer, TextWindow};
pub use shapebuf_engine as engine;
pub use shapebuf_engine::EngineBuffer;

#[cfg(feature = "shaping-hb")]
pub use shapebuf_shape_hb as shape_hb;

#[cfg(feature = "shaping-hr")]
pub use shapebuf_shape_hr as shape_hr;

/// A shaping buffer on the pure Rust engine
pub type Buffer = ShapingBuffer<EngineBuffer>;

/// Common imports for typical usage
pub mod prelude {
    pub use crate::Buffer;
    pub use shapebuf_core::{
        error::{Result, ShapeBufError},
        traits::{BufferEngine, Shaper},
        types::{
            BufferFlags, ClusterLevel, ContentType, Direction, Feature, GlyphInfo, GlyphPosition,
            Language, Script, SerializeFlags, SerializeFormat, Tag,
        },
        FontData, TextWindow,
    };

    #[cfg(feature = "shaping-hb")]
    pub use shapebuf_shape_hb::HarfBuzzShaper;

    #[cfg(feature = "shaping-hr")]
    pub use shapebuf_shape_hr::HarfrustShaper;
}
