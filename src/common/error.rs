use thiserror::Error;

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    /// Capacities are counted in data codewords (bytes)
    #[error("Data too long: {required} codewords required, at most {available} available")]
    DataTooLong { required: usize, available: usize },

    #[error("Unsupported character {ch:?} in {mode:?} mode")]
    UnsupportedCharacter { ch: char, mode: Mode },

    #[error("Invalid option: {0}")]
    InvalidOption(#[from] OptionError),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum OptionError {
    #[error("version {0} is outside 1..=40")]
    Version(u8),

    #[error("min version {min} is greater than max version {max}")]
    VersionRange { min: u8, max: u8 },

    #[error("unknown error correction level {0:?}")]
    ECLevel(String),

    #[error("masking pattern {0} is outside 0..=7")]
    MaskPattern(u8),
}

pub type QRResult<T> = Result<T, QRError>;
