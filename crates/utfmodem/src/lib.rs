//! Streaming UTF transcoder and validator for YAML input.
//!
//! A YAML stream may arrive as UTF-8, UTF-16 (BE/LE), or UTF-32 (BE/LE).
//! [`UtfDecoder`] detects the encoding from the first bytes (BOM or zero-byte
//! heuristic), transcodes 16/32-bit input to UTF-8 (surrogate pairs
//! included), and strictly validates the result per RFC 3629, incrementally:
//! a read can suspend mid-character and resume on the next one.
//! The tokenizer above pulls canonical UTF-8 through [`UtfDecoder::read`] and
//! advances by the returned codepoint count.
//!
//! # Examples
//!
//! ```rust
//! use utfmodem::{Encoding, ReadStatus, UtfDecoder};
//!
//! let mut decoder = UtfDecoder::from_slice(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]);
//! let mut out = [0u8; 16];
//!
//! let decoded = decoder.read(&mut out);
//! assert_eq!(decoder.encoding, Encoding::Utf16Be);
//! assert_eq!(&out[..decoded.bytes], b"AB");
//! assert_eq!(decoded.runes, 2);
//! assert_eq!(decoded.status, ReadStatus::Ok);
//!
//! assert_eq!(decoder.read(&mut out).status, ReadStatus::EndOfStream);
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod decoder;
mod encoding;
mod error;
mod source;
mod transform;
mod validate;

pub use decoder::{ReadOutcome, ReadStatus, UtfDecoder};
pub use encoding::Encoding;
pub use error::{DecodeError, SourceError};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{ByteSource, Empty};
