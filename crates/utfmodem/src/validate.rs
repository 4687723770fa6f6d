//! Strict UTF-8 validation. Check RFC 3629
//! (<http://www.ietf.org/rfc/rfc3629.txt>) for more details.
//!
//! The following table (taken from the RFC) drives the scan:
//!
//! ```text
//!    Char. number range |        UTF-8 octet sequence
//!      (hexadecimal)    |              (binary)
//!   --------------------+------------------------------------
//!   0000 0000-0000 007F | 0xxxxxxx
//!   0000 0080-0000 07FF | 110xxxxx 10xxxxxx
//!   0000 0800-0000 FFFF | 1110xxxx 10xxxxxx 10xxxxxx
//!   0001 0000-0010 FFFF | 11110xxx 10xxxxxx 10xxxxxx 10xxxxxx
//! ```
//!
//! Over-long encodings, the surrogate block 0xD800–0xDFFF, and scalars above
//! 0x10FFFF are rejected. All of those constraints reduce to bit tests on
//! the leader and the first continuation byte, so the scan never assembles
//! the full scalar value.

/// How a byte run classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf8Status {
    /// The whole slice is valid UTF-8.
    Ok,
    /// The slice ends inside a multibyte sequence and more input may arrive.
    Truncated,
    /// A malformed sequence starts at the reported byte offset.
    Invalid,
}

/// Result of a [`check_utf8`] scan: the longest valid prefix in bytes, the
/// scalar count of that prefix, and how the scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Utf8Check {
    pub bytes: usize,
    pub runes: usize,
    pub status: Utf8Status,
}

/// Scan `buf` for the longest valid UTF-8 prefix.
///
/// With `at_eof` set, a trailing partial sequence is a hard error rather
/// than [`Utf8Status::Truncated`]: no bytes will ever arrive to finish it.
pub(crate) fn check_utf8(buf: &[u8], at_eof: bool) -> Utf8Check {
    let mut bytes = 0;
    let mut runes = 0;

    while bytes < buf.len() {
        let leader = buf[bytes];

        // ASCII needs none of the checks below.
        if leader < 0x80 {
            bytes += 1;
            runes += 1;
            continue;
        }

        let width = if leader & 0b1110_0000 == 0b1100_0000 {
            2
        } else if leader & 0b1111_0000 == 0b1110_0000 {
            3
        } else if leader & 0b1111_1000 == 0b1111_0000 {
            4
        } else {
            // Continuation byte or 11111xxx leader.
            return Utf8Check { bytes, runes, status: Utf8Status::Invalid };
        };

        if bytes + width > buf.len() {
            let status = if at_eof { Utf8Status::Invalid } else { Utf8Status::Truncated };
            return Utf8Check { bytes, runes, status };
        }

        let well_formed = match width {
            2 => {
                buf[bytes + 1] & 0b1100_0000 == 0b1000_0000
                    // value >= 0x80
                    && leader & 0b0001_1110 != 0
            }
            3 => {
                let follow1 = buf[bytes + 1];
                follow1 & 0b1100_0000 == 0b1000_0000
                    && buf[bytes + 2] & 0b1100_0000 == 0b1000_0000
                    // value >= 0x800
                    && (leader & 0b0000_1111 != 0 || follow1 & 0b0010_0000 != 0)
                    // !(0xD800 <= value <= 0xDFFF)
                    && (leader & 0b0000_1111 != 0b0000_1101 || follow1 & 0b0010_0000 == 0)
            }
            _ => {
                let follow1 = buf[bytes + 1];
                follow1 & 0b1100_0000 == 0b1000_0000
                    && buf[bytes + 2] & 0b1100_0000 == 0b1000_0000
                    && buf[bytes + 3] & 0b1100_0000 == 0b1000_0000
                    // value >= 0x10000
                    && (leader & 0b0000_0111 != 0 || follow1 & 0b0011_0000 != 0)
                    // value <= 0x10FFFF
                    && (leader & 0b0000_0100 == 0
                        || (leader & 0b0000_0011 == 0 && follow1 & 0b0011_0000 == 0))
            }
        };

        if !well_formed {
            return Utf8Check { bytes, runes, status: Utf8Status::Invalid };
        }

        bytes += width;
        runes += 1;
    }

    Utf8Check { bytes, runes, status: Utf8Status::Ok }
}
