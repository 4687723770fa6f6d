/// Character encodings recognised on a YAML input stream.
///
/// A decoder starts in [`AutoDetect`](Encoding::AutoDetect) and resolves to
/// one of the five concrete encodings on its first read, either from a
/// byte-order mark or from the zero-byte pattern of the first characters.
/// Note the heuristic is fallible by construction: BOM-less UTF-8 text whose
/// first or second byte is NUL is indistinguishable from 16/32-bit input and
/// will be classified as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Resolve the encoding from the stream's first bytes.
    AutoDetect,
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

impl Default for Encoding {
    fn default() -> Self {
        Self::AutoDetect
    }
}

impl Encoding {
    /// Inspect up to four leading bytes and pick an encoding; first match
    /// wins. Returns the encoding and the number of leading bytes to
    /// discard: the BOM's length, or zero for a heuristic match, which must
    /// keep the inspected bytes as data.
    pub(crate) fn detect(prefix: &[u8]) -> (Encoding, usize) {
        match *prefix {
            [0x00, 0x00, 0xFE, 0xFF, ..] => (Encoding::Utf32Be, 4),
            [0x00, 0x00, 0x00, _, ..] => (Encoding::Utf32Be, 0),
            [0xFF, 0xFE, 0x00, 0x00, ..] => (Encoding::Utf32Le, 4),
            [_, 0x00, 0x00, 0x00, ..] => (Encoding::Utf32Le, 0),
            [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
            [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
            [0x00, _, ..] => (Encoding::Utf16Be, 0),
            [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
            [_, 0x00, ..] => (Encoding::Utf16Le, 0),
            _ => (Encoding::Utf8, 0),
        }
    }
}
