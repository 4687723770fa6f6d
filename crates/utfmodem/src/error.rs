use alloc::string::String;

use thiserror::Error;

/// Errors surfaced by [`UtfDecoder::read`](crate::UtfDecoder::read).
///
/// Invalid-input errors are permanent: retrying the read does not make the
/// input well-formed. Source errors are surfaced verbatim and the caller
/// decides whether the upstream is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid utf8 character encountered")]
    InvalidUtf8,
    #[error("invalid utf16 character encountered")]
    InvalidUtf16,
    #[error("invalid utf32 character encountered")]
    InvalidUtf32,
    #[error("input error: {0}")]
    Source(#[from] SourceError),
}

/// Error reported by an upstream [`ByteSource`](crate::ByteSource), carrying
/// the source's own message unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        SourceError(message.into())
    }
}
