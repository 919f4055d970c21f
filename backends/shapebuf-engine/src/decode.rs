//! UTF-8, UTF-16 and UTF-32 decoding with replacement
//!
//! Each decoder yields `(index, codepoint)` pairs where `index` is the
//! code-unit offset of the character inside the slice it was given. An
//! ill-formed sequence turns into one replacement codepoint per maximal
//! ill-formed subpart, so decoding never fails and never skips input.

/// Codepoints kept on either side of the item for shaping context
pub const CONTEXT_LENGTH: usize = 5;

/// Code units scanned on either side of the item; enough for
/// [`CONTEXT_LENGTH`] codepoints in any encoding form
const CONTEXT_UNITS: usize = 4 * CONTEXT_LENGTH;

/// Code units the engine knows how to decode
pub trait Decode: Copy {
    fn decode(units: &[Self], replacement: u32) -> Vec<(usize, u32)>;

    /// Leading units to skip so decoding starts on a character boundary
    fn sync_offset(_units: &[Self]) -> usize {
        0
    }
}

impl Decode for u8 {
    fn decode(units: &[Self], replacement: u32) -> Vec<(usize, u32)> {
        let mut decoded = Vec::with_capacity(units.len());
        let mut index = 0;
        for chunk in units.utf8_chunks() {
            let valid = chunk.valid();
            decoded.extend(valid.char_indices().map(|(i, ch)| (index + i, u32::from(ch))));
            index += valid.len();

            let invalid = chunk.invalid();
            if !invalid.is_empty() {
                decoded.push((index, replacement));
                index += invalid.len();
            }
        }
        decoded
    }

    // a lead byte always starts a fresh sequence; past three continuation
    // bytes the next one is a lone subpart of its own
    fn sync_offset(units: &[Self]) -> usize {
        units
            .iter()
            .take(3)
            .take_while(|&&byte| byte & 0xC0 == 0x80)
            .count()
    }
}

impl Decode for u16 {
    fn decode(units: &[Self], replacement: u32) -> Vec<(usize, u32)> {
        let mut decoded = Vec::with_capacity(units.len());
        let mut index = 0;
        for result in char::decode_utf16(units.iter().copied()) {
            match result {
                Ok(ch) => {
                    decoded.push((index, u32::from(ch)));
                    index += ch.len_utf16();
                },
                Err(_) => {
                    decoded.push((index, replacement));
                    index += 1;
                },
            }
        }
        decoded
    }

    fn sync_offset(units: &[Self]) -> usize {
        usize::from(units.first().is_some_and(|unit| (0xDC00..=0xDFFF).contains(unit)))
    }
}

impl Decode for u32 {
    fn decode(units: &[Self], replacement: u32) -> Vec<(usize, u32)> {
        units
            .iter()
            .enumerate()
            .map(|(i, &unit)| {
                let codepoint = char::from_u32(unit).map_or(replacement, u32::from);
                (i, codepoint)
            })
            .collect()
    }
}

/// An item decoded out of a larger text
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DecodedItem {
    /// `(cluster, codepoint)`, clusters counted from the start of the whole text
    pub codepoints: Vec<(u32, u32)>,
    /// Closest codepoint first
    pub pre_context: Vec<u32>,
    pub post_context: Vec<u32>,
}

/// Decodes `text[offset..offset + length]` plus up to [`CONTEXT_LENGTH`]
/// codepoints of context on each side
pub fn decode_item<T: Decode>(
    text: &[T],
    offset: usize,
    length: usize,
    replacement: u32,
) -> DecodedItem {
    let end = offset + length;

    let codepoints = T::decode(&text[offset..end], replacement)
        .into_iter()
        .map(|(i, cp)| (cluster_of(offset + i), cp))
        .collect();

    let start = offset.saturating_sub(CONTEXT_UNITS);
    let mut before = &text[start..offset];
    if start > 0 {
        before = &before[T::sync_offset(before)..];
    }
    let pre_context = T::decode(before, replacement)
        .into_iter()
        .rev()
        .take(CONTEXT_LENGTH)
        .map(|(_, cp)| cp)
        .collect();

    let after = &text[end..text.len().min(end + CONTEXT_UNITS)];
    let post_context = T::decode(after, replacement)
        .into_iter()
        .take(CONTEXT_LENGTH)
        .map(|(_, cp)| cp)
        .collect();

    DecodedItem {
        codepoints,
        pre_context,
        post_context,
    }
}

fn cluster_of(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
