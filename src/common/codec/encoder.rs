pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::debug;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::Segment;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    // Encodes the segment into the smallest version within [min, max]
    pub fn encode(
        seg: &Segment,
        ecl: ECLevel,
        min: Version,
        max: Version,
    ) -> QRResult<(BitStream, Version)> {
        let ver = find_version(seg, ecl, min, max)?;
        let bs = encode_with_version(seg, ver, ecl)?;
        Ok((bs, ver))
    }

    pub fn encode_with_version(seg: &Segment, ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
        if !fits(seg, ver, ecl) {
            return Err(data_too_long(seg, ver, ecl));
        }

        let bcap = ver.data_bit_capacity(ecl);
        let mut bs = BitStream::new(bcap);
        push_segment(seg, ver, &mut bs);
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);

        debug_assert!(
            bs.len() == bcap,
            "Encoded stream doesn't fill data capacity: Len {}, Capacity {bcap}",
            bs.len()
        );
        Ok(bs)
    }

    pub fn find_version(
        seg: &Segment,
        ecl: ECLevel,
        min: Version,
        max: Version,
    ) -> QRResult<Version> {
        match min.up_to(max).find(|&v| fits(seg, v, ecl)) {
            Some(ver) => {
                debug!(version = *ver, ?ecl, bits = seg.bit_len(ver), "Selected version");
                Ok(ver)
            }
            None => Err(data_too_long(seg, max, ecl)),
        }
    }

    // Terminator bits are left out, they are truncated when capacity runs out
    fn fits(seg: &Segment, ver: Version, ecl: ECLevel) -> bool {
        let max_chars = (1 << ver.char_cnt_bits(seg.mode)) - 1;
        seg.char_count() <= max_chars && seg.bit_len(ver) <= ver.data_bit_capacity(ecl)
    }

    fn data_too_long(seg: &Segment, ver: Version, ecl: ECLevel) -> QRError {
        QRError::DataTooLong {
            required: seg.bit_len(ver).div_ceil(8),
            available: ver.data_codewords(ecl),
        }
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use std::cmp::min;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};
    use crate::common::metadata::Version;

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitStream) {
        push_header(seg, ver, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(&seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(&seg.data, out),
            Mode::Byte => push_byte_data(&seg.data, out),
        }
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, ver.mode_bits());
        let char_cnt = seg.char_count();
        let len_bits = ver.char_cnt_bits(seg.mode);
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            let data = Mode::Numeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(offset == 0, "Bit offset should be zero before padding codewords: {offset}");

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

    #[cfg(test)]
    mod writer_tests {
        use test_case::test_case;

        use super::{
            push_alphanumeric_data, push_byte_data, push_header, push_numeric_data,
            push_padding_bits, push_padding_codewords, push_terminator,
        };
        use crate::common::bit_utils::BitStream;
        use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};
        use crate::common::metadata::{ECLevel, Version};

        fn v1_stream() -> BitStream {
            BitStream::new(Version::MIN.data_bit_capacity(ECLevel::L))
        }

        #[test_case(1, Mode::Numeric, 1023, vec![0b00011111, 0b11111100])]
        #[test_case(1, Mode::Alphanumeric, 511, vec![0b00101111, 0b11111000])]
        #[test_case(1, Mode::Byte, 255, vec![0b01001111, 0b11110000])]
        #[test_case(10, Mode::Numeric, 4095, vec![0b00011111, 0b11111111])]
        #[test_case(10, Mode::Alphanumeric, 2047, vec![0b00101111, 0b11111110])]
        #[test_case(10, Mode::Byte, 65535, vec![0b01001111, 0b11111111, 0b11110000])]
        #[test_case(27, Mode::Numeric, 16383, vec![0b00011111, 0b11111111, 0b11000000])]
        #[test_case(27, Mode::Alphanumeric, 8191, vec![0b00101111, 0b11111111, 0b10000000])]
        #[test_case(27, Mode::Byte, 65535, vec![0b01001111, 0b11111111, 0b11110000])]
        fn test_push_header(ver: u8, mode: Mode, count: usize, exp_vec: Vec<u8>) {
            let ver = Version::new(ver).unwrap();
            let text = "0".repeat(count);
            let seg = Segment::new(mode, &text).unwrap();
            let mut bs = BitStream::new(ver.data_bit_capacity(ECLevel::L));
            push_header(&seg, ver, &mut bs);
            assert_eq!(bs.data(), exp_vec);
        }

        #[test]
        fn test_push_numeric_data() {
            let mut bs = v1_stream();
            push_numeric_data("01234567".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b00000011, 0b00010101, 0b10011000, 0b01100000]);
            let mut bs = v1_stream();
            push_numeric_data("8".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len(), 4);
        }

        #[test]
        fn test_push_alphanumeric_data() {
            let mut bs = v1_stream();
            push_alphanumeric_data("AC-42".as_bytes(), &mut bs);
            assert_eq!(bs.data(), vec![0b00111001, 0b11011100, 0b11100100, 0b00100000])
        }

        #[test]
        fn test_push_byte_data() {
            let mut bs = v1_stream();
            push_byte_data(&[b'a', 0xFC], &mut bs);
            assert_eq!(bs.data(), vec![0b01100001, 0b11111100])
        }

        #[test]
        fn test_push_terminator() {
            let bit_capacity = Version::MIN.data_bit_capacity(ECLevel::L);
            let capacity = bit_capacity >> 3;
            let mut bs = v1_stream();
            bs.push_bits(0b1u8, 1);
            push_terminator(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len(), 5);
            for _ in 0..capacity - 1 {
                bs.push_bits(0b11111111u8, 8);
            }
            bs.push_bits(0b1u8, 1);
            assert_eq!(bs.len(), bit_capacity - 2);
            push_terminator(&mut bs);
            assert_eq!(bs.len(), bit_capacity);
        }

        #[test]
        fn test_push_padding_bits() {
            let mut bs = v1_stream();
            bs.push_bits(0b1u8, 1);
            push_padding_bits(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 0);
        }

        #[test]
        fn test_push_padding_codewords() {
            let mut bs = v1_stream();
            bs.push_bits(0b1u8, 1);
            push_padding_bits(&mut bs);
            push_padding_codewords(&mut bs);
            let mut output = vec![0b10000000];
            output.extend(PADDING_CODEWORDS.iter().cycle().take(18));
            assert_eq!(bs.data(), output);
        }
    }
}
