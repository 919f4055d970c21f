//! The values a shaping buffer carries and the knobs that steer it

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::{SerializeError, ShapingError};

/// Glyph identifier within a font
pub type GlyphId = u32;

/// The replacement codepoint a fresh buffer substitutes for ill-formed text
pub const DEFAULT_REPLACEMENT_CODEPOINT: u32 = 0xFFFD;

/// What the buffer currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// Nothing yet (or cleared)
    #[default]
    Empty,
    /// Codepoints waiting to be shaped
    Unicode,
    /// Shaped glyph ids with positions
    Glyphs,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::Empty => "Empty",
            ContentType::Unicode => "Unicode",
            ContentType::Glyphs => "Glyphs",
        })
    }
}

/// Which way the text flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Not set; `guess_segment_properties` fills it in
    #[default]
    Invalid,
    Ltr,
    Rtl,
    Ttb,
    Btt,
}

impl Direction {
    pub fn is_valid(self) -> bool {
        self != Direction::Invalid
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Ltr | Direction::Rtl)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Ttb | Direction::Btt)
    }

    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Ltr | Direction::Ttb)
    }

    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Rtl | Direction::Btt)
    }

    /// The opposite direction on the same axis
    pub fn reverse(self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
            Direction::Ttb => Direction::Btt,
            Direction::Btt => Direction::Ttb,
            Direction::Invalid => Direction::Invalid,
        }
    }
}

impl FromStr for Direction {
    type Err = ShapingError;

    /// Only the first letter matters, so `ltr`, `l` and `LeftToRight` all parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('l') => Ok(Direction::Ltr),
            Some('r') => Ok(Direction::Rtl),
            Some('t') => Ok(Direction::Ttb),
            Some('b') => Ok(Direction::Btt),
            _ => Err(ShapingError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Invalid => "invalid",
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
            Direction::Ttb => "ttb",
            Direction::Btt => "btt",
        })
    }
}

/// Four-byte OpenType / ISO 15924 tag
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// The all-zero tag
    pub const NONE: Tag = Tag([0; 4]);

    pub const fn new(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }

    pub const fn from_u32(value: u32) -> Self {
        Tag(value.to_be_bytes())
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl FromStr for Tag {
    type Err = ShapingError;

    /// Accepts one to four ASCII characters; short tags are padded with spaces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !s.is_ascii() {
            return Err(ShapingError::InvalidTag(s.to_string()));
        }
        let mut tag = [b' '; 4];
        tag[..bytes.len()].copy_from_slice(bytes);
        Ok(Tag(tag))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b == 0 {
                break;
            }
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.to_string())
    }
}

/// Writing system, identified by its ISO 15924 tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Script(Tag);

/// Scripts whose horizontal direction is right-to-left
const RTL_SCRIPTS: &[&[u8; 4]] = &[
    b"Arab", b"Hebr", b"Syrc", b"Thaa", b"Cprt", b"Khar", b"Phnx", b"Nkoo", b"Lydi", b"Avst",
    b"Armi", b"Phli", b"Prti", b"Sarb", b"Orkh", b"Samr", b"Mand", b"Merc", b"Mero", b"Mani",
    b"Mend", b"Nbat", b"Narb", b"Palm", b"Phlp", b"Hatr", b"Hung", b"Adlm", b"Rohg", b"Sogo",
    b"Sogd", b"Elym", b"Chrs", b"Yezi", b"Ougr",
];

impl Script {
    pub const INVALID: Script = Script(Tag::NONE);
    pub const COMMON: Script = Script(Tag::new(b"Zyyy"));
    pub const INHERITED: Script = Script(Tag::new(b"Zinh"));
    pub const UNKNOWN: Script = Script(Tag::new(b"Zzzz"));
    pub const LATIN: Script = Script(Tag::new(b"Latn"));
    pub const ARABIC: Script = Script(Tag::new(b"Arab"));
    pub const HEBREW: Script = Script(Tag::new(b"Hebr"));
    pub const CYRILLIC: Script = Script(Tag::new(b"Cyrl"));
    pub const GREEK: Script = Script(Tag::new(b"Grek"));
    pub const DEVANAGARI: Script = Script(Tag::new(b"Deva"));
    pub const HAN: Script = Script(Tag::new(b"Hani"));

    /// Canonicalizes the casing (`latn` becomes `Latn`) and maps the
    /// pre-standard private tags onto their registered successors
    pub fn from_iso15924_tag(tag: Tag) -> Self {
        if tag == Tag::NONE {
            return Script::INVALID;
        }
        let canonical = Tag::from_u32((tag.to_u32() & 0xDFDF_DFDF) | 0x0020_2020);
        match canonical.as_bytes() {
            b"Qaai" => Script::INHERITED,
            b"Qaac" => Script(Tag::new(b"Copt")),
            _ => Script(canonical),
        }
    }

    pub fn tag(self) -> Tag {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Script::INVALID
    }

    /// Common, Inherited and Unknown say nothing about the run they sit in
    pub fn is_significant(self) -> bool {
        self.is_valid()
            && self != Script::COMMON
            && self != Script::INHERITED
            && self != Script::UNKNOWN
    }

    /// The direction text in this script runs when laid out horizontally
    pub fn horizontal_direction(self) -> Direction {
        if !self.is_significant() {
            return Direction::Invalid;
        }
        if RTL_SCRIPTS.contains(&self.0.as_bytes()) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

impl FromStr for Script {
    type Err = ShapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::from_str(s).map(Script::from_iso15924_tag)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// BCP 47 derived language tag, lower-cased with `_` folded to `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Language(Option<String>);

impl Language {
    pub const INVALID: Language = Language(None);

    /// Normalizes `tag`; strings with no usable characters yield [`Language::INVALID`]
    pub fn new(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter_map(|c| match c {
                '_' | '-' => Some('-'),
                c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
                _ => None,
            })
            .collect();
        let normalized = normalized.trim_matches('-');
        if normalized.is_empty() {
            Language::INVALID
        } else {
            Language(Some(normalized.to_string()))
        }
    }

    /// Turns a POSIX locale name (`en_US.UTF-8@euro`) into a language tag
    pub fn from_posix_locale(locale: &str) -> Self {
        let name = locale
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();
        if name.is_empty() || name == "C" || name == "POSIX" {
            return Language::INVALID;
        }
        Language::new(name)
    }

    /// The language of the process locale, from `LC_ALL`, `LC_MESSAGES` or `LANG`
    pub fn from_locale() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .map(|value| Language::from_posix_locale(&value))
            .unwrap_or(Language::INVALID)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// The primary subtag (`pt` for `pt-br`)
    pub fn primary(&self) -> Option<&str> {
        self.as_str().and_then(|tag| tag.split('-').next())
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::new(s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(""))
    }
}

bitflags! {
    /// Shaping behaviour modifiers carried by the buffer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u32 {
        const BEGINNING_OF_TEXT = 1 << 0;
        const END_OF_TEXT = 1 << 1;
        const PRESERVE_DEFAULT_IGNORABLES = 1 << 2;
        const REMOVE_DEFAULT_IGNORABLES = 1 << 3;
        const DO_NOT_INSERT_DOTTED_CIRCLE = 1 << 4;
    }
}

/// How codepoints are grouped into clusters while shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterLevel {
    #[default]
    MonotoneGraphemes,
    MonotoneCharacters,
    Characters,
}

impl ClusterLevel {
    pub fn as_u32(self) -> u32 {
        match self {
            ClusterLevel::MonotoneGraphemes => 0,
            ClusterLevel::MonotoneCharacters => 1,
            ClusterLevel::Characters => 2,
        }
    }
}

impl FromStr for ClusterLevel {
    type Err = ShapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "monotone-graphemes" => Ok(ClusterLevel::MonotoneGraphemes),
            "1" | "monotone-characters" => Ok(ClusterLevel::MonotoneCharacters),
            "2" | "characters" => Ok(ClusterLevel::Characters),
            _ => Err(ShapingError::BackendError(format!(
                "unknown cluster level: {s}"
            ))),
        }
    }
}

bitflags! {
    /// Per-glyph flags a shaper stores in the low bits of [`GlyphInfo::mask`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GlyphFlags: u32 {
        const UNSAFE_TO_BREAK = 1 << 0;
        const UNSAFE_TO_CONCAT = 1 << 1;
        const SAFE_TO_INSERT_TATWEEL = 1 << 2;
    }
}

/// One buffer item: a codepoint before shaping, a glyph id after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphInfo {
    pub codepoint: u32,
    pub mask: u32,
    pub cluster: u32,
}

impl GlyphInfo {
    pub fn new(codepoint: u32, cluster: u32) -> Self {
        Self {
            codepoint,
            mask: 0,
            cluster,
        }
    }

    pub fn glyph_flags(&self) -> GlyphFlags {
        GlyphFlags::from_bits_truncate(self.mask)
    }
}

/// Where a glyph sits relative to the pen and how far it moves the pen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphPosition {
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// Ink bounds of a glyph, y-up, bearing measured from the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphExtents {
    pub x_bearing: i32,
    pub y_bearing: i32,
    pub width: i32,
    pub height: i32,
}

/// Text layouts the glyph serializer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SerializeFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for SerializeFormat {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(SerializeFormat::Text),
            "json" => Ok(SerializeFormat::Json),
            _ => Err(SerializeError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SerializeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SerializeFormat::Text => "text",
            SerializeFormat::Json => "json",
        })
    }
}

bitflags! {
    /// Which glyph fields the serializer leaves out or adds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SerializeFlags: u32 {
        const NO_CLUSTERS = 1 << 0;
        const NO_POSITIONS = 1 << 1;
        const NO_GLYPH_NAMES = 1 << 2;
        const GLYPH_EXTENTS = 1 << 3;
        const GLYPH_FLAGS = 1 << 4;
        /// Offsets become absolute pen positions. The pen starts at glyph 0
        /// of the buffer even when a call covers a later range, so a range
        /// prints the same offsets as in a full dump; HarfBuzz restarts the
        /// pen at the first glyph of each call.
        const NO_ADVANCES = 1 << 5;
    }
}

/// An OpenType feature switched on, off or to a value over a cluster range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature {
    pub tag: Tag,
    pub value: u32,
    pub start: usize,
    pub end: usize,
}

impl Feature {
    /// Applies to the whole buffer
    pub fn new(tag: Tag, value: u32) -> Self {
        Self {
            tag,
            value,
            start: 0,
            end: usize::MAX,
        }
    }

    pub fn is_global(&self) -> bool {
        self.start == 0 && self.end == usize::MAX
    }
}

impl FromStr for Feature {
    type Err = ShapingError;

    /// Parses `kern`, `-liga`, `+smcp`, `aalt=2`, `kern[3:5]` and `liga[2]=0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ShapingError::InvalidFeature(s.to_string());
        let mut rest = s.trim();

        let mut value = 1;
        if let Some(stripped) = rest.strip_prefix('-') {
            value = 0;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped;
        }

        let (head, explicit_value) = match rest.split_once('=') {
            Some((head, v)) => (head, Some(v)),
            None => (rest, None),
        };
        if let Some(v) = explicit_value {
            value = match v.trim() {
                "on" | "true" => 1,
                "off" | "false" => 0,
                number => number.parse().map_err(|_| invalid())?,
            };
        }

        let (tag_str, range) = match head.split_once('[') {
            Some((tag, range)) => (tag, Some(range.strip_suffix(']').ok_or_else(invalid)?)),
            None => (head, None),
        };
        let tag = Tag::from_str(tag_str.trim()).map_err(|_| invalid())?;

        let mut feature = Feature::new(tag, value);
        if let Some(range) = range {
            let parse_bound = |b: &str, default: usize| -> Result<usize, ShapingError> {
                let b = b.trim();
                if b.is_empty() {
                    Ok(default)
                } else {
                    b.parse().map_err(|_| invalid())
                }
            };
            match range.split_once(':') {
                Some((start, end)) => {
                    feature.start = parse_bound(start, 0)?;
                    feature.end = parse_bound(end, usize::MAX)?;
                },
                None => {
                    feature.start = parse_bound(range, 0)?;
                    feature.end = feature.start.saturating_add(1);
                },
            }
        }
        Ok(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_and_reverse() {
        assert_eq!("RTL".parse::<Direction>().unwrap(), Direction::Rtl);
        assert_eq!("ttb".parse::<Direction>().unwrap(), Direction::Ttb);
        assert!("x".parse::<Direction>().is_err());
        assert_eq!(Direction::Ltr.reverse(), Direction::Rtl);
        assert!(Direction::Btt.is_backward());
        assert!(!Direction::Invalid.is_horizontal());
    }

    #[test]
    fn test_tag_padding() {
        let tag: Tag = "ss1".parse().unwrap();
        assert_eq!(tag.as_bytes(), b"ss1 ");
        assert!("toolong".parse::<Tag>().is_err());
        assert_eq!(Tag::from_u32(Tag::new(b"kern").to_u32()), Tag::new(b"kern"));
    }

    #[test]
    fn test_script_canonical_case() {
        let script: Script = "LATN".parse().unwrap();
        assert_eq!(script, Script::LATIN);
        assert_eq!(script.to_string(), "Latn");
        assert_eq!("qaai".parse::<Script>().unwrap(), Script::INHERITED);
    }

    #[test]
    fn test_script_direction() {
        assert_eq!(Script::ARABIC.horizontal_direction(), Direction::Rtl);
        assert_eq!(Script::HEBREW.horizontal_direction(), Direction::Rtl);
        assert_eq!(Script::LATIN.horizontal_direction(), Direction::Ltr);
        assert_eq!(Script::COMMON.horizontal_direction(), Direction::Invalid);
        assert_eq!(Script::INVALID.horizontal_direction(), Direction::Invalid);
    }

    #[test]
    fn test_language_normalization() {
        assert_eq!(Language::new("en_US").as_str(), Some("en-us"));
        assert_eq!(Language::new("zh-Hant").primary(), Some("zh"));
        assert_eq!(Language::new(""), Language::INVALID);
        assert_eq!(
            Language::from_posix_locale("de_DE.UTF-8@euro").as_str(),
            Some("de-de")
        );
        assert_eq!(Language::from_posix_locale("C"), Language::INVALID);
        assert_eq!(Language::from_posix_locale("POSIX.UTF-8"), Language::INVALID);
    }

    #[test]
    fn test_feature_syntax() {
        let kern: Feature = "kern".parse().unwrap();
        assert_eq!(kern.value, 1);
        assert!(kern.is_global());

        let liga: Feature = "-liga".parse().unwrap();
        assert_eq!(liga.value, 0);

        let aalt: Feature = "aalt=2".parse().unwrap();
        assert_eq!(aalt.value, 2);

        let ranged: Feature = "kern[3:5]".parse().unwrap();
        assert_eq!((ranged.start, ranged.end), (3, 5));

        let single: Feature = "liga[2]=off".parse().unwrap();
        assert_eq!((single.start, single.end, single.value), (2, 3, 0));

        assert!("".parse::<Feature>().is_err());
        assert!("kern[1".parse::<Feature>().is_err());
    }

    #[test]
    fn test_glyph_flags_from_mask() {
        let info = GlyphInfo {
            codepoint: 4,
            mask: 0x8000_0003,
            cluster: 0,
        };
        assert_eq!(
            info.glyph_flags(),
            GlyphFlags::UNSAFE_TO_BREAK | GlyphFlags::UNSAFE_TO_CONCAT
        );
    }

    #[test]
    fn test_serialize_format_parse() {
        assert_eq!("JSON".parse::<SerializeFormat>().unwrap(), SerializeFormat::Json);
        assert!("xml".parse::<SerializeFormat>().is_err());
    }
}
