//! # qrweave
//!
//! A Rust library for encoding text into QR codes as defined by ISO/IEC 18004,
//! with Reed-Solomon error correction, automatic version selection and
//! penalty-based mask selection.
//!
//! ## Features
//!
//! - **Mode selection**: Input is encoded in the narrowest of numeric, alphanumeric or byte mode
//! - **Version selection**: Picks the smallest version between configurable bounds that fits the data
//! - **Reed-Solomon error correction**: All four levels (L, M, Q, H) with standard block interleaving
//! - **Masking**: Scores all 8 mask patterns in parallel and keeps the one with the lowest penalty
//! - **Rendering**: Grayscale images through the `image` crate, or plain strings for terminals
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrweave::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Only data is required, every other setting has a default
//! let qr = QRBuilder::new("Hello, World!").build()?;
//!
//! assert_eq!(*qr.version(), 1);
//! let img = qr.to_image(4); // 4 pixels per module
//! assert_eq!(img.width(), (21 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrweave::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("HELLO WORLD")
//!     .ec_level(ECLevel::Q)               // Defaults to ECLevel::M
//!     .min_version(Version::new(2)?)      // Defaults to 1
//!     .max_version(Version::new(10)?)     // Defaults to 40
//!     .mask(MaskPattern::new(3)?)         // Defaults to the lowest penalty mask
//!     .build()?;
//!
//! assert_eq!(*qr.version(), 2);
//! for row in qr.modules() {
//!     let line: String = row.iter().map(|&dark| if dark { '#' } else { ' ' }).collect();
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Errors
//!
//! ```rust
//! use qrweave::{ECLevel, QRBuilder, QRError, Version};
//!
//! let res = QRBuilder::new(&"a".repeat(18)).ec_level(ECLevel::L).max_version(Version::MIN).build();
//! assert_eq!(res, Err(QRError::DataTooLong { required: 20, available: 19 }));
//! ```
//!
//! ## Error Correction Levels
//!
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Logging
//!
//! Pipeline stages emit `tracing` events at `debug` and `trace` level. No
//! subscriber is installed by the library.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::{Mode, Segment};
pub use common::error::{OptionError, QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
