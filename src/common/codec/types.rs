use std::borrow::Cow;

use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(char.is_ascii_digit(), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char as char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        match self {
            Self::Numeric => ch.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(ch, '0'..='9' | 'A'..='Z' | ' ' | '$' | '%' | '*' | '+' | '-' | '.' | '/' | ':')
            }
            Self::Byte => true,
        }
    }

    // Narrowest mode covering every character of the text
    pub fn classify(text: &str) -> Self {
        MODES.iter().copied().find(|m| text.chars().all(|c| m.contains(c))).unwrap_or(Mode::Byte)
    }

    // Bits needed for `len` characters, excluding the segment header
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub mode: Mode,
    // Numeric and alphanumeric data is the ASCII text itself
    pub data: Cow<'a, [u8]>,
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, text: &'a str) -> QRResult<Self> {
        if let Some(ch) = text.chars().find(|&c| !mode.contains(c)) {
            return Err(QRError::UnsupportedCharacter { ch, mode });
        }
        let data = match mode {
            Mode::Byte => byte_data(text),
            _ => Cow::Borrowed(text.as_bytes()),
        };
        Ok(Self { mode, data })
    }

    // Segment in the narrowest mode covering the whole text
    pub fn classify(text: &'a str) -> QRResult<Self> {
        Self::new(Mode::classify(text), text)
    }

    pub fn char_count(&self) -> usize {
        self.data.len()
    }

    pub fn bit_len(&self, ver: Version) -> usize {
        let encoded_bits = self.mode.encoded_len(self.char_count());
        ver.mode_bits() + ver.char_cnt_bits(self.mode) + encoded_bits
    }
}

// ISO-8859-1 when every char fits in a byte, UTF-8 otherwise
fn byte_data(text: &str) -> Cow<'_, [u8]> {
    if text.is_ascii() {
        return Cow::Borrowed(text.as_bytes());
    }
    if text.chars().all(|c| (c as u32) <= 0xFF) {
        return Cow::Owned(text.chars().map(|c| c as u8).collect());
    }
    Cow::Borrowed(text.as_bytes())
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

// Ordered from the most compact encoding
pub static MODES: [Mode; 3] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte];
