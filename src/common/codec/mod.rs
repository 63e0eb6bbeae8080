pub mod encoder;
pub mod types;

pub use encoder::*;
pub use types::*;

// Codec proptesting
//------------------------------------------------------------------------------

#[cfg(test)]
mod codec_proptests {

    use proptest::prelude::*;

    use super::{encode, Mode, Segment};
    use crate::common::metadata::{ECLevel, Version};

    pub fn ec_level_strategy() -> BoxedStrategy<ECLevel> {
        prop_oneof![Just(ECLevel::L), Just(ECLevel::M), Just(ECLevel::Q), Just(ECLevel::H)].boxed()
    }

    proptest! {
        #[test]
        fn proptest_numeric_header(data in "[0-9]{0,500}", ecl in ec_level_strategy()) {
            let seg = Segment::classify(&data).unwrap();
            prop_assert_eq!(seg.mode, Mode::Numeric);

            let (mut bs, ver) = encode(&seg, ecl, Version::MIN, Version::MAX).unwrap();
            prop_assert_eq!(bs.data().len(), ver.data_codewords(ecl));
            prop_assert_eq!(bs.take_bits(4), Some(Mode::Numeric as u16));
            prop_assert_eq!(bs.take_bits(ver.char_cnt_bits(Mode::Numeric)), Some(data.len() as u16));
        }

        #[test]
        fn proptest_smallest_version(data in "\\PC{0,300}", ecl in ec_level_strategy()) {
            let seg = Segment::classify(&data).unwrap();
            let (bs, ver) = encode(&seg, ecl, Version::MIN, Version::MAX).unwrap();
            prop_assert_eq!(bs.len(), ver.data_bit_capacity(ecl));
            prop_assert!(seg.bit_len(ver) <= ver.data_bit_capacity(ecl));
            if *ver > 1 {
                let prev = Version::new(*ver - 1).unwrap();
                prop_assert!(seg.bit_len(prev) > prev.data_bit_capacity(ecl));
            }
        }
    }
}
