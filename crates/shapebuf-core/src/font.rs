//! Font bytes shared between shapers and the glyph serializer
//!
//! Fonts keep their raw data and build a parser view on demand, so a
//! `FontData` is cheap to clone and safe to hand to any backend. For TTC
//! collections the face index picks the face. Glyph names are read from
//! the `post` table once, on first use, and shared between clones.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use read_fonts::types::GlyphId16;
use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::instance::{LocationRef, Size};
use skrifa::MetadataProvider;

use crate::error::{FontLoadError, Result};
use crate::types::{GlyphExtents, GlyphId};

/// A font face in memory
#[derive(Clone)]
pub struct FontData {
    data: Arc<[u8]>,
    face_index: u32,
    units_per_em: u16,
    glyph_count: u32,
    names: Arc<OnceLock<GlyphNames>>,
}

/// Both directions of the `post` table's glyph names
#[derive(Default)]
struct GlyphNames {
    by_id: Vec<Option<String>>,
    by_name: HashMap<String, GlyphId>,
}

impl GlyphNames {
    fn read(font: &ReadFontRef<'_>, glyph_count: u32) -> Self {
        let Ok(post) = font.post() else {
            return Self::default();
        };
        let count = u16::try_from(glyph_count).unwrap_or(u16::MAX);
        let by_id: Vec<Option<String>> = (0..count)
            .map(|gid| {
                post.glyph_name(GlyphId16::new(gid))
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();

        let mut by_name = HashMap::with_capacity(by_id.len());
        for (gid, name) in (0u32..).zip(&by_id) {
            if let Some(name) = name {
                // duplicated names resolve to the lowest glyph id
                by_name.entry(name.clone()).or_insert(gid);
            }
        }
        log::debug!("Read {} glyph names from post table", by_name.len());
        Self { by_id, by_name }
    }
}

impl FontData {
    /// Opens a font file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens one face of a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;
        Self::from_bytes_index(data, face_index)
    }

    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        Self::from_bytes_index(data, 0)
    }

    /// Validates the bytes by parsing them once and caches the basic metrics
    pub fn from_bytes_index(data: impl Into<Arc<[u8]>>, face_index: u32) -> Result<Self> {
        let data: Arc<[u8]> = data.into();
        let font = ReadFontRef::from_index(&data, face_index).map_err(|err| {
            log::debug!("Rejecting font face {face_index}: {err}");
            FontLoadError::InvalidData
        })?;

        let units_per_em = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);
        let glyph_count = font
            .maxp()
            .map(|maxp| maxp.num_glyphs() as u32)
            .unwrap_or(0);

        Ok(Self {
            data,
            face_index,
            units_per_em,
            glyph_count,
            names: Arc::new(OnceLock::new()),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }

    fn names(&self) -> &GlyphNames {
        self.names.get_or_init(|| match self.font_ref() {
            Some(font) => GlyphNames::read(&font, self.glyph_count),
            None => GlyphNames::default(),
        })
    }

    /// PostScript name of a glyph from the `post` table, when the font has one
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<String> {
        let index = usize::try_from(glyph_id).ok()?;
        self.names().by_id.get(index)?.clone()
    }

    /// Reverse of [`FontData::glyph_name`]
    pub fn glyph_from_name(&self, name: &str) -> Option<GlyphId> {
        self.names().by_name.get(name).copied()
    }

    /// Ink extents in font units
    pub fn glyph_extents(&self, glyph_id: GlyphId) -> Option<GlyphExtents> {
        let font = skrifa::FontRef::from_index(&self.data, self.face_index).ok()?;
        let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let bounds = metrics.bounds(skrifa::GlyphId::new(glyph_id))?;
        Some(GlyphExtents {
            x_bearing: bounds.x_min.round() as i32,
            y_bearing: bounds.y_max.round() as i32,
            width: (bounds.x_max - bounds.x_min).round() as i32,
            height: (bounds.y_min - bounds.y_max).round() as i32,
        })
    }
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("len", &self.data.len())
            .field("face_index", &self.face_index)
            .field("units_per_em", &self.units_per_em)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}
