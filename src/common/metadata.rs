use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use super::codec::Mode;
use super::error::{OptionError, QRError, QRResult};
use super::mask::MaskPattern;

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(version: u8) -> QRResult<Self> {
        match version {
            1..=40 => Ok(Self(version)),
            _ => Err(OptionError::Version(version).into()),
        }
    }

    // Versions from self through max, ascending
    pub fn up_to(self, max: Version) -> impl Iterator<Item = Version> {
        (self.0..=max.0).map(Version)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.index()]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ec_codewords(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn ec_codewords(self, ecl: ECLevel) -> usize {
        let (_, count1, _, count2) = self.data_codewords_per_block(ecl);
        self.ecc_per_block(ecl) * (count1 + count2)
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        EC_BLOCK_TABLE[self.index()][ecl as usize].0
    }

    // (Group 1 block size, Group 1 block count, Group 2 block size, Group 2 block count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let (_, count1, size1, count2, size2) = EC_BLOCK_TABLE[self.index()][ecl as usize];
        (size1, count1, size2, count2)
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.index()]
    }

    pub fn remainder_bits(self) -> usize {
        REMAINDER_BITS[self.index()]
    }

    pub const fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (self.0, mode) {
            (1..=9, Mode::Numeric) => 10,
            (1..=9, Mode::Alphanumeric) => 9,
            (1..=9, Mode::Byte) => 8,
            (10..=26, Mode::Numeric) => 12,
            (10..=26, Mode::Alphanumeric) => 11,
            (10..=26, Mode::Byte) => 16,
            (_, Mode::Numeric) => 14,
            (_, Mode::Alphanumeric) => 13,
            (_, Mode::Byte) => 16,
        }
    }

    // 18 bit version information, present from version 7 onwards
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is only drawn from version 7: {}", self.0);

        let data = self.0 as u32;
        (data << VERSION_ERROR_BIT_LEN) | bch_remainder(data, VERSION_GENERATOR, VERSION_ERROR_BIT_LEN)
    }
}

impl Deref for Version {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::{ECLevel, Version};
    use crate::common::codec::Mode;
    use crate::common::error::{OptionError, QRError};

    #[test]
    fn test_new() {
        assert_eq!(*Version::new(1).unwrap(), 1);
        assert_eq!(*Version::new(40).unwrap(), 40);
        assert_eq!(Version::new(0), Err(QRError::InvalidOption(OptionError::Version(0))));
        assert_eq!(Version::new(41), Err(QRError::InvalidOption(OptionError::Version(41))));
    }

    #[test]
    fn test_up_to() {
        let vers = Version::new(3).unwrap().up_to(Version::new(6).unwrap()).collect::<Vec<_>>();
        assert_eq!(vers.iter().map(|v| **v).collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert_eq!(Version::MIN.up_to(Version::MAX).count(), 40);
        assert_eq!(Version::MAX.up_to(Version::MIN).count(), 0);
    }

    #[test]
    fn test_width() {
        assert_eq!(Version::MIN.width(), 21);
        assert_eq!(Version::new(7).unwrap().width(), 45);
        assert_eq!(Version::MAX.width(), 177);
    }

    #[test]
    fn test_codeword_tables_are_consistent() {
        for v in 1..=40 {
            let ver = Version::new(v).unwrap();
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                assert_eq!(
                    ver.data_codewords(ecl) + ver.ec_codewords(ecl),
                    ver.total_codewords(),
                    "Version {v}, {ecl:?}"
                );

                let (size1, count1, size2, count2) = ver.data_codewords_per_block(ecl);
                assert_eq!(size1 * count1 + size2 * count2, ver.data_codewords(ecl));
                if count2 > 0 {
                    assert_eq!(size2, size1 + 1, "Version {v}, {ecl:?}");
                }
            }
        }
    }

    #[test]
    fn test_total_codewords_fill_encoding_region() {
        for v in 1..=40 {
            let ver = Version::new(v).unwrap();
            let w = ver.width();
            let aligns = ver.alignment_pattern().len();
            let align_count = match aligns {
                0 => 0,
                n => n * n - 3,
            };
            let timing_overlap = match aligns {
                0 | 1 => 0,
                n => (n - 2) * 2 * 5,
            };
            let version_info = if v >= 7 { 36 } else { 0 };
            let func = 3 * 64 + 2 * (w - 16) + align_count * 25 - timing_overlap + 31 + version_info;
            let raw = w * w - func;
            assert_eq!(raw >> 3, ver.total_codewords(), "Version {v}");
            assert_eq!(raw & 7, ver.remainder_bits(), "Version {v}");
        }
    }

    #[test]
    fn test_alignment_positions() {
        assert!(Version::new(1).unwrap().alignment_pattern().is_empty());
        assert_eq!(Version::new(2).unwrap().alignment_pattern(), &[6, 18]);
        assert_eq!(Version::new(7).unwrap().alignment_pattern(), &[6, 22, 38]);
        assert_eq!(Version::new(32).unwrap().alignment_pattern(), &[6, 34, 60, 86, 112, 138]);
        assert_eq!(Version::MAX.alignment_pattern(), &[6, 30, 58, 86, 114, 142, 170]);
        for v in 2..=40 {
            let ver = Version::new(v).unwrap();
            let last = *ver.alignment_pattern().last().unwrap();
            assert_eq!(last as usize, ver.width() - 7);
        }
    }

    #[test_case(1, ECLevel::L, 19)]
    #[test_case(1, ECLevel::H, 9)]
    #[test_case(2, ECLevel::H, 16)]
    #[test_case(5, ECLevel::Q, 62)]
    #[test_case(10, ECLevel::M, 216)]
    #[test_case(40, ECLevel::L, 2956)]
    #[test_case(40, ECLevel::H, 1276)]
    fn test_data_codewords(ver: u8, ecl: ECLevel, exp: usize) {
        assert_eq!(Version::new(ver).unwrap().data_codewords(ecl), exp);
    }

    #[test_case(9, Mode::Numeric, 10)]
    #[test_case(9, Mode::Alphanumeric, 9)]
    #[test_case(9, Mode::Byte, 8)]
    #[test_case(10, Mode::Numeric, 12)]
    #[test_case(26, Mode::Alphanumeric, 11)]
    #[test_case(26, Mode::Byte, 16)]
    #[test_case(27, Mode::Numeric, 14)]
    #[test_case(40, Mode::Alphanumeric, 13)]
    #[test_case(40, Mode::Byte, 16)]
    fn test_char_cnt_bits(ver: u8, mode: Mode, exp: usize) {
        assert_eq!(Version::new(ver).unwrap().char_cnt_bits(mode), exp);
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version::new(7).unwrap().info(), 0x07C94);
        assert_eq!(Version::new(21).unwrap().info(), 0x15683);
        assert_eq!(Version::MAX.info(), 0x28C69);
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // Two bit indicator used in format info
    pub fn format_bits(self) -> u32 {
        (self as u32) ^ 1
    }
}

impl TryFrom<char> for ECLevel {
    type Error = QRError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'L' => Ok(Self::L),
            'M' => Ok(Self::M),
            'Q' => Ok(Self::Q),
            'H' => Ok(Self::H),
            _ => Err(OptionError::ECLevel(c.to_string()).into()),
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(OptionError::ECLevel(s.to_string()).into()),
        }
    }
}


// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Format information
//------------------------------------------------------------------------------

// Remainder of data * x^err_len divided by the generator, in GF(2)
pub const fn bch_remainder(data: u32, generator: u32, err_len: usize) -> u32 {
    let mut rem = data;
    let mut i = 0;
    while i < err_len {
        rem = (rem << 1) ^ ((rem >> (err_len - 1)) * generator);
        i += 1;
    }
    rem & ((1 << err_len) - 1)
}

pub fn format_info(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | *mask as u32;
    let rem = bch_remainder(data, FORMAT_GENERATOR, FORMAT_ERROR_BIT_LEN);
    ((data << FORMAT_ERROR_BIT_LEN) | rem) ^ FORMAT_MASK
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static FORMAT_ERROR_BIT_LEN: usize = 10;

pub static FORMAT_GENERATOR: u32 = 0b101_0011_0111;

pub static FORMAT_MASK: u32 = 0b101_0100_0001_0010;

pub static VERSION_INFO_BIT_LEN: usize = 18;

pub static VERSION_ERROR_BIT_LEN: usize = 12;

pub static VERSION_GENERATOR: u32 = 0b1_1111_0010_0101;

// Coordinates are (row, col); negative values wrap from the far edge.
// Listed from the most significant bit.
pub static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

pub(crate) static TOTAL_CODEWORDS: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346,
    404, 466, 532, 581, 655, 733, 815, 901, 991, 1085,
    1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185,
    2323, 2465, 2611, 2761, 2876, 3034, 3196, 3362, 3532, 3706,
];

pub(crate) static REMAINDER_BITS: [usize; 40] = [
    0, 7, 7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3, 3, 3,
    4, 4, 4, 4, 4, 4, 4, 3, 3, 3, 3, 3, 3, 3, 0, 0, 0, 0, 0, 0,
];

// (ecc per block, group 1 block count, group 1 data size, group 2 block count, group 2 data size)
// Columns are ordered L, M, Q, H
pub(crate) static EC_BLOCK_TABLE: [[(usize, usize, usize, usize, usize); 4]; 40] = [
    [(7, 1, 19, 0, 0), (10, 1, 16, 0, 0), (13, 1, 13, 0, 0), (17, 1, 9, 0, 0)],
    [(10, 1, 34, 0, 0), (16, 1, 28, 0, 0), (22, 1, 22, 0, 0), (28, 1, 16, 0, 0)],
    [(15, 1, 55, 0, 0), (26, 1, 44, 0, 0), (18, 2, 17, 0, 0), (22, 2, 13, 0, 0)],
    [(20, 1, 80, 0, 0), (18, 2, 32, 0, 0), (26, 2, 24, 0, 0), (16, 4, 9, 0, 0)],
    [(26, 1, 108, 0, 0), (24, 2, 43, 0, 0), (18, 2, 15, 2, 16), (22, 2, 11, 2, 12)],
    [(18, 2, 68, 0, 0), (16, 4, 27, 0, 0), (24, 4, 19, 0, 0), (28, 4, 15, 0, 0)],
    [(20, 2, 78, 0, 0), (18, 4, 31, 0, 0), (18, 2, 14, 4, 15), (26, 4, 13, 1, 14)],
    [(24, 2, 97, 0, 0), (22, 2, 38, 2, 39), (22, 4, 18, 2, 19), (26, 4, 14, 2, 15)],
    [(30, 2, 116, 0, 0), (22, 3, 36, 2, 37), (20, 4, 16, 4, 17), (24, 4, 12, 4, 13)],
    [(18, 2, 68, 2, 69), (26, 4, 43, 1, 44), (24, 6, 19, 2, 20), (28, 6, 15, 2, 16)],
    [(20, 4, 81, 0, 0), (30, 1, 50, 4, 51), (28, 4, 22, 4, 23), (24, 3, 12, 8, 13)],
    [(24, 2, 92, 2, 93), (22, 6, 36, 2, 37), (26, 4, 20, 6, 21), (28, 7, 14, 4, 15)],
    [(26, 4, 107, 0, 0), (22, 8, 37, 1, 38), (24, 8, 20, 4, 21), (22, 12, 11, 4, 12)],
    [(30, 3, 115, 1, 116), (24, 4, 40, 5, 41), (20, 11, 16, 5, 17), (24, 11, 12, 5, 13)],
    [(22, 5, 87, 1, 88), (24, 5, 41, 5, 42), (30, 5, 24, 7, 25), (24, 11, 12, 7, 13)],
    [(24, 5, 98, 1, 99), (28, 7, 45, 3, 46), (24, 15, 19, 2, 20), (30, 3, 15, 13, 16)],
    [(28, 1, 107, 5, 108), (28, 10, 46, 1, 47), (28, 1, 22, 15, 23), (28, 2, 14, 17, 15)],
    [(30, 5, 120, 1, 121), (26, 9, 43, 4, 44), (28, 17, 22, 1, 23), (28, 2, 14, 19, 15)],
    [(28, 3, 113, 4, 114), (26, 3, 44, 11, 45), (26, 17, 21, 4, 22), (26, 9, 13, 16, 14)],
    [(28, 3, 107, 5, 108), (26, 3, 41, 13, 42), (30, 15, 24, 5, 25), (28, 15, 15, 10, 16)],
    [(28, 4, 116, 4, 117), (26, 17, 42, 0, 0), (28, 17, 22, 6, 23), (30, 19, 16, 6, 17)],
    [(28, 2, 111, 7, 112), (28, 17, 46, 0, 0), (30, 7, 24, 16, 25), (24, 34, 13, 0, 0)],
    [(30, 4, 121, 5, 122), (28, 4, 47, 14, 48), (30, 11, 24, 14, 25), (30, 16, 15, 14, 16)],
    [(30, 6, 117, 4, 118), (28, 6, 45, 14, 46), (30, 11, 24, 16, 25), (30, 30, 16, 2, 17)],
    [(26, 8, 106, 4, 107), (28, 8, 47, 13, 48), (30, 7, 24, 22, 25), (30, 22, 15, 13, 16)],
    [(28, 10, 114, 2, 115), (28, 19, 46, 4, 47), (28, 28, 22, 6, 23), (30, 33, 16, 4, 17)],
    [(30, 8, 122, 4, 123), (28, 22, 45, 3, 46), (30, 8, 23, 26, 24), (30, 12, 15, 28, 16)],
    [(30, 3, 117, 10, 118), (28, 3, 45, 23, 46), (30, 4, 24, 31, 25), (30, 11, 15, 31, 16)],
    [(30, 7, 116, 7, 117), (28, 21, 45, 7, 46), (30, 1, 23, 37, 24), (30, 19, 15, 26, 16)],
    [(30, 5, 115, 10, 116), (28, 19, 47, 10, 48), (30, 15, 24, 25, 25), (30, 23, 15, 25, 16)],
    [(30, 13, 115, 3, 116), (28, 2, 46, 29, 47), (30, 42, 24, 1, 25), (30, 23, 15, 28, 16)],
    [(30, 17, 115, 0, 0), (28, 10, 46, 23, 47), (30, 10, 24, 35, 25), (30, 19, 15, 35, 16)],
    [(30, 17, 115, 1, 116), (28, 14, 46, 21, 47), (30, 29, 24, 19, 25), (30, 11, 15, 46, 16)],
    [(30, 13, 115, 6, 116), (28, 14, 46, 23, 47), (30, 44, 24, 7, 25), (30, 59, 16, 1, 17)],
    [(30, 12, 121, 7, 122), (28, 12, 47, 26, 48), (30, 39, 24, 14, 25), (30, 22, 15, 41, 16)],
    [(30, 6, 121, 14, 122), (28, 6, 47, 34, 48), (30, 46, 24, 10, 25), (30, 2, 15, 64, 16)],
    [(30, 17, 122, 4, 123), (28, 29, 46, 14, 47), (30, 49, 24, 10, 25), (30, 24, 15, 46, 16)],
    [(30, 4, 122, 18, 123), (28, 13, 46, 32, 47), (30, 48, 24, 14, 25), (30, 42, 15, 32, 16)],
    [(30, 20, 117, 4, 118), (28, 40, 47, 7, 48), (30, 43, 24, 22, 25), (30, 10, 15, 67, 16)],
    [(30, 19, 118, 6, 119), (28, 18, 47, 31, 48), (30, 34, 24, 34, 25), (30, 20, 15, 61, 16)],
];

pub(crate) static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];
