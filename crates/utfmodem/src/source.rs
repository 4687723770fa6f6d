use crate::error::SourceError;

/// A pull-style byte source feeding a [`UtfDecoder`](crate::UtfDecoder).
///
/// The decoder latches end-of-stream the first time a read returns fewer
/// bytes than `buf.len()`, and never consults the source again afterwards.
/// Implementations must therefore fill `buf` completely on every call except
/// the one that drains the stream. Sources backed by in-memory data (such as
/// the `&[u8]` impl) satisfy this naturally; readers that can legitimately
/// short-read mid-stream should be wrapped in [`IoSource`] (feature `std`),
/// which loops until the buffer is full.
pub trait ByteSource {
    /// Read into `buf`, returning the number of bytes written.
    ///
    /// `Ok(0)`, and more generally any count below `buf.len()`, means the
    /// stream is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;
}

/// A source with no bytes.
///
/// This is the source type of buffer-backed decoders, which never consult a
/// source at all; it exists so [`UtfDecoder::from_slice`](crate::UtfDecoder::from_slice)
/// can name a concrete type parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl ByteSource for Empty {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, SourceError> {
        Ok(0)
    }
}

impl ByteSource for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let n = self.len().min(buf.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

#[cfg(feature = "std")]
mod io {
    use alloc::string::ToString;

    use super::ByteSource;
    use crate::error::SourceError;

    /// Adapts a [`std::io::Read`] to the [`ByteSource`] contract.
    ///
    /// `std` readers may return short counts mid-stream; this adapter keeps
    /// reading until the buffer is full or the reader reports end of stream,
    /// so a short count reaching the decoder really does mean EOF.
    #[derive(Debug)]
    pub struct IoSource<R>(pub R);

    impl<R: std::io::Read> ByteSource for IoSource<R> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
            let mut filled = 0;
            while filled < buf.len() {
                match self.0.read(&mut buf[filled..]) {
                    Ok(0) => break,
                    Ok(n) => filled += n,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(SourceError::new(e.to_string())),
                }
            }
            Ok(filled)
        }
    }
}

#[cfg(feature = "std")]
pub use io::IoSource;
