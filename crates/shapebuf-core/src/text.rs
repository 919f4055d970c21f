//! Windows onto encoded text
//!
//! Whatever shape the caller's text has (a `&str`, raw bytes, UTF-16 code
//! units, a little-endian byte dump) it becomes one [`TextWindow`]: the
//! complete text plus the item range that should land in the buffer. The
//! text outside the item still matters, since it supplies shaping context
//! and the cluster values count from its start.

use std::borrow::Cow;

use crate::error::{Result, ShapeBufError};
use crate::traits::BufferEngine;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A code unit of one of the three Unicode encoding forms
pub trait CodeUnit: Copy + sealed::Sealed + 'static {
    /// Human readable name for logs
    const ENCODING: &'static str;

    /// Hands the resolved item to the matching engine decoder
    fn add_to<E: BufferEngine>(engine: &mut E, text: &[Self], offset: usize, length: usize);
}

impl CodeUnit for u8 {
    const ENCODING: &'static str = "UTF-8";

    fn add_to<E: BufferEngine>(engine: &mut E, text: &[Self], offset: usize, length: usize) {
        engine.add_utf8(text, offset, length);
    }
}

impl CodeUnit for u16 {
    const ENCODING: &'static str = "UTF-16";

    fn add_to<E: BufferEngine>(engine: &mut E, text: &[Self], offset: usize, length: usize) {
        engine.add_utf16(text, offset, length);
    }
}

impl CodeUnit for u32 {
    const ENCODING: &'static str = "UTF-32";

    fn add_to<E: BufferEngine>(engine: &mut E, text: &[Self], offset: usize, length: usize) {
        engine.add_utf32(text, offset, length);
    }
}

/// Encoded text plus the item range to append from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow<'a, T: CodeUnit> {
    text: Cow<'a, [T]>,
    item_offset: usize,
    item_length: Option<usize>,
}

impl<'a, T: CodeUnit> TextWindow<'a, T> {
    /// The whole of `units` is the item
    pub fn new(units: &'a [T]) -> Self {
        Self {
            text: Cow::Borrowed(units),
            item_offset: 0,
            item_length: None,
        }
    }

    fn owned(units: Vec<T>) -> Self {
        Self {
            text: Cow::Owned(units),
            item_offset: 0,
            item_length: None,
        }
    }

    /// Narrows the item to `length` code units from `offset`; `None` runs to the end
    pub fn with_item(mut self, offset: usize, length: Option<usize>) -> Self {
        self.item_offset = offset;
        self.item_length = length;
        self
    }

    pub fn units(&self) -> &[T] {
        &self.text
    }

    pub fn item_offset(&self) -> usize {
        self.item_offset
    }

    pub fn item_length(&self) -> Option<usize> {
        self.item_length
    }

    /// Checks the item against the text and returns `(offset, length)`
    pub fn resolve(&self) -> Result<(usize, usize)> {
        let total = self.text.len();
        if self.item_offset > total {
            return Err(ShapeBufError::out_of_range(
                "item_offset",
                self.item_offset,
                total,
            ));
        }
        let available = total - self.item_offset;
        let length = match self.item_length {
            None => available,
            Some(length) if length <= available => length,
            Some(length) => {
                return Err(ShapeBufError::out_of_range("item_length", length, available))
            },
        };
        Ok((self.item_offset, length))
    }
}

impl<'a> TextWindow<'a, u8> {
    /// UTF-8 view of a string, borrowed
    pub fn utf8(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl TextWindow<'static, u16> {
    /// Encodes a string as UTF-16
    pub fn utf16(text: &str) -> Self {
        Self::owned(text.encode_utf16().collect())
    }

    /// Reinterprets little-endian bytes as UTF-16 code units; a trailing odd byte is dropped
    pub fn utf16_le_bytes(bytes: &[u8]) -> Self {
        Self::owned(
            bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect(),
        )
    }
}

impl TextWindow<'static, u32> {
    /// Encodes a string as UTF-32
    pub fn utf32(text: &str) -> Self {
        Self::owned(text.chars().map(u32::from).collect())
    }

    pub fn from_chars(chars: &[char]) -> Self {
        Self::owned(chars.iter().map(|&c| u32::from(c)).collect())
    }

    /// Reinterprets little-endian bytes as UTF-32 code units; trailing bytes are dropped
    pub fn utf32_le_bytes(bytes: &[u8]) -> Self {
        Self::owned(
            bytes
                .chunks_exact(4)
                .map(|quad| u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
                .collect(),
        )
    }
}

impl<'a> From<&'a str> for TextWindow<'a, u8> {
    fn from(text: &'a str) -> Self {
        Self::utf8(text)
    }
}

impl<'a, T: CodeUnit> From<&'a [T]> for TextWindow<'a, T> {
    fn from(units: &'a [T]) -> Self {
        Self::new(units)
    }
}

impl<'a, T: CodeUnit, const N: usize> From<&'a [T; N]> for TextWindow<'a, T> {
    fn from(units: &'a [T; N]) -> Self {
        Self::new(units.as_slice())
    }
}

impl<T: CodeUnit> From<Vec<T>> for TextWindow<'static, T> {
    fn from(units: Vec<T>) -> Self {
        Self::owned(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_text_by_default() {
        let window = TextWindow::utf8("héllo");
        assert_eq!(window.resolve().unwrap(), (0, 6));
    }

    #[test]
    fn test_item_to_end() {
        let window = TextWindow::utf8("abcdef").with_item(2, None);
        assert_eq!(window.resolve().unwrap(), (2, 4));
    }

    #[test]
    fn test_item_out_of_range() {
        let past_end = TextWindow::utf8("abc").with_item(4, None);
        assert!(past_end.resolve().unwrap_err().is_out_of_range());

        let too_long = TextWindow::utf8("abc").with_item(1, Some(3));
        assert!(too_long.resolve().unwrap_err().is_out_of_range());

        let at_end = TextWindow::utf8("abc").with_item(3, None);
        assert_eq!(at_end.resolve().unwrap(), (3, 0));
    }

    #[test]
    fn test_utf16_adapters_agree() {
        let from_str = TextWindow::utf16("a😀");
        let bytes: Vec<u8> = from_str
            .units()
            .iter()
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        let from_bytes = TextWindow::utf16_le_bytes(&bytes);
        assert_eq!(from_str.units(), from_bytes.units());
        assert_eq!(from_str.units().len(), 3);
    }

    #[test]
    fn test_utf32_adapters_agree() {
        let from_str = TextWindow::utf32("ab");
        let from_chars = TextWindow::from_chars(&['a', 'b']);
        let from_bytes = TextWindow::utf32_le_bytes(&[0x61, 0, 0, 0, 0x62, 0, 0, 0, 0xFF]);
        assert_eq!(from_str.units(), &[0x61, 0x62]);
        assert_eq!(from_chars.units(), from_str.units());
        assert_eq!(from_bytes.units(), from_str.units());
    }
}
