//! UTF-16 and UTF-32 to UTF-8 transformation. Check RFC 2781
//! (<http://www.ietf.org/rfc/rfc2781.txt>) for the surrogate-pair scheme:
//!
//! ```text
//!  U  = U' + 0x10000   (0x01 00 00 <= U <= 0x10 FF FF)
//!  U' = yyyyyyyyyyxxxxxxxxxx
//!  W1 = 110110yyyyyyyyyy    (high surrogate, 0xD800-0xDBFF)
//!  W2 = 110111xxxxxxxxxx    (low surrogate,  0xDC00-0xDFFF)
//! ```
//!
//! Both transformers consume whole code units only and emit whole scalars
//! only, so a caller can stop at any reported boundary and resume later.
//! Scalars that cannot be encoded (unpaired surrogates and out-of-range
//! UTF-32 units) are replaced with U+FFFD rather than treated as fatal.

/// Byte order of the 16/32-bit code units in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    fn unit16(self, bytes: [u8; 2]) -> u32 {
        u32::from(match self {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        })
    }

    fn unit32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Big => u32::from_be_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
        }
    }
}

/// Why a transformation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransformStatus {
    /// All of `src` was consumed.
    Done,
    /// The next scalar's UTF-8 form does not fit in what remains of `dst`.
    DstFull,
    /// `src` ends inside a code unit or surrogate pair; retry with more.
    NeedMore,
    /// `src` ends inside a code unit or surrogate pair at end of stream.
    Invalid,
}

/// Progress report of a single transformation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transform {
    /// UTF-8 bytes appended to `dst`.
    pub wrote: usize,
    /// Source bytes consumed.
    pub read: usize,
    pub status: TransformStatus,
}

/// Decode 16-bit code units from `src` and append their UTF-8 encoding to
/// `dst`.
///
/// A unit in the surrogate block looks ahead one more unit; when the pair
/// completes, the combined supplementary scalar is emitted, otherwise the
/// lone unit degrades to U+FFFD (two bytes consumed). The lookahead means a
/// trailing surrogate-block unit needs four bytes before anything is
/// decided; with `at_eof` set, failing that is [`TransformStatus::Invalid`].
pub(crate) fn transform_utf16(
    dst: &mut [u8],
    src: &[u8],
    order: ByteOrder,
    at_eof: bool,
) -> Transform {
    let mut wrote = 0;
    let mut read = 0;

    while read < src.len() {
        if read + 2 > src.len() {
            return truncated(wrote, read, at_eof);
        }

        let unit = order.unit16([src[read], src[read + 1]]);
        let mut scalar = unit;
        let mut size = 2;

        if unit & 0xF800 == 0xD800 {
            if read + 4 > src.len() {
                return truncated(wrote, read, at_eof);
            }

            let next = order.unit16([src[read + 2], src[read + 3]]);
            if next & 0xFC00 == 0xDC00 {
                scalar = ((unit & 0x3FF) << 10 | (next & 0x3FF)) + 0x10000;
                size = 4;
            }
        }

        match encode_scalar(&mut dst[wrote..], scalar) {
            Some(n) => wrote += n,
            None => return Transform { wrote, read, status: TransformStatus::DstFull },
        }
        read += size;
    }

    Transform { wrote, read, status: TransformStatus::Done }
}

/// Decode 4-byte code units from `src` and append their UTF-8 encoding to
/// `dst`. Units outside the Unicode scalar range degrade to U+FFFD.
pub(crate) fn transform_utf32(
    dst: &mut [u8],
    src: &[u8],
    order: ByteOrder,
    at_eof: bool,
) -> Transform {
    let mut wrote = 0;
    let mut read = 0;

    while read < src.len() {
        if read + 4 > src.len() {
            return truncated(wrote, read, at_eof);
        }

        let scalar = order.unit32([src[read], src[read + 1], src[read + 2], src[read + 3]]);
        match encode_scalar(&mut dst[wrote..], scalar) {
            Some(n) => wrote += n,
            None => return Transform { wrote, read, status: TransformStatus::DstFull },
        }
        read += 4;
    }

    Transform { wrote, read, status: TransformStatus::Done }
}

fn truncated(wrote: usize, read: usize, at_eof: bool) -> Transform {
    let status = if at_eof { TransformStatus::Invalid } else { TransformStatus::NeedMore };
    Transform { wrote, read, status }
}

/// Encode `scalar` into the front of `dst`, substituting U+FFFD when it is a
/// surrogate or above 0x10FFFF. Returns `None` when `dst` is too short.
fn encode_scalar(dst: &mut [u8], scalar: u32) -> Option<usize> {
    let ch = char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER);
    if ch.len_utf8() > dst.len() {
        return None;
    }
    Some(ch.encode_utf8(dst).len())
}
