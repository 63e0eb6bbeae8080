mod qr;

pub use qr::{Module, QR, QUIET_ZONE};

use tracing::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, Mode, Segment},
    ec::{blockify, interleave_blocks},
    error::{OptionError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a str,
    ec_level: ECLevel,
    min_version: Version,
    max_version: Version,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            data,
            ec_level: ECLevel::M,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
        }
    }

    pub fn data(&mut self, data: &'a str) -> &mut Self {
        self.data = data;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn min_version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self
    }

    pub fn max_version(&mut self, version: Version) -> &mut Self {
        self.max_version = version;
        self
    }

    // Pins the symbol to a single version
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self.max_version = version;
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.min_version = Version::MIN;
        self.max_version = Version::MAX;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let ver = if self.min_version == self.max_version {
            format!("{}", self.min_version)
        } else {
            format!("{}..={}", self.min_version, self.max_version)
        };
        let mask = match self.mask {
            Some(m) => format!("{}", *m),
            None => "Auto".to_string(),
        };
        format!("{{ Version: {ver}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        if self.min_version > self.max_version {
            let (min, max) = (*self.min_version, *self.max_version);
            return Err(OptionError::VersionRange { min, max }.into());
        }

        debug!(builder = %self.metadata(), "Generating QR");

        let ecl = self.ec_level;
        let seg = Segment::new(Mode::classify(self.data), self.data)?;
        debug!(mode = ?seg.mode, chars = seg.char_count(), "Classified input");

        let (encoded_data, version) = encode(&seg, ecl, self.min_version, self.max_version)?;

        // Codewords and function patterns don't depend on each other
        let (payload, mut qr) = rayon::join(
            || {
                let blocks = blockify(encoded_data.data(), version, ecl);
                BitStream::from(&interleave_blocks(&blocks))
            },
            || {
                let mut qr = QR::new(version, ecl);
                qr.draw_all_function_patterns();
                qr
            },
        );

        let filled = qr.draw_encoding_region(payload);
        debug_assert!(
            filled == version.remainder_bits(),
            "Cells left after payload don't match remainder bits: Filled {filled}, Remainder {}",
            version.remainder_bits()
        );

        let qr = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                qr
            }
            None => apply_best_mask(&qr),
        };

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            metadata = %qr.metadata(),
            data_capacity = version.data_codewords(ecl),
            ec_capacity = Self::ec_capacity(version, ecl),
            encoded_size = seg.bit_len(version).div_ceil(8),
            dark = dark_modules,
            light = total_modules - dark_modules,
            balance = dark_modules * 100 / total_modules,
            "QR generated"
        );

        Ok(qr)
    }

    // Codeword errors the symbol can correct. A few codewords of the smallest
    // symbols are spent on misdecode protection instead.
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        let p = match (*version, ec_level) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };

        (version.ec_codewords(ec_level) - p) / 2
    }
}
