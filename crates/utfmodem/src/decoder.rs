//! Decoder state and the unified read loop.
//!
//! [`UtfDecoder`] owns the input buffering for every encoding path: UTF-8
//! input is copied (or read) straight into the caller's buffer and validated
//! in place, while 16/32-bit input is framed through an internal raw buffer,
//! transformed to UTF-8, and then validated the same way. The validator runs
//! on every path so all malformed input funnels into one error site.

use alloc::vec;
use alloc::vec::Vec;

use crate::{
    encoding::Encoding,
    error::DecodeError,
    source::{ByteSource, Empty},
    transform::{transform_utf16, transform_utf32, ByteOrder, TransformStatus},
    validate::{check_utf8, Utf8Status},
};

/// Capacity of the lazily-allocated raw buffer framing 16/32-bit input.
const RAW_CAPACITY: usize = 512;

/// Terminal status of a [`UtfDecoder::read`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// The read completed; more input may remain.
    Ok,
    /// The input is exhausted. Terminal: every later read reports it again.
    EndOfStream,
    /// Decoding failed. Any bytes reported alongside are still good UTF-8
    /// and should be consumed before acting on the error.
    Failed(DecodeError),
}

impl From<DecodeError> for ReadStatus {
    fn from(error: DecodeError) -> Self {
        ReadStatus::Failed(error)
    }
}

/// What a single [`UtfDecoder::read`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a read may report an error or end-of-stream in its status"]
pub struct ReadOutcome {
    /// UTF-8 bytes written into the caller's buffer.
    pub bytes: usize,
    /// Unicode scalars encoded by those bytes.
    pub runes: usize,
    pub status: ReadStatus,
}

impl ReadOutcome {
    fn new(bytes: usize, runes: usize, status: ReadStatus) -> Self {
        ReadOutcome { bytes, runes, status }
    }
}

/// The currently-unconsumed input bytes.
///
/// Exactly one backing store is live at a time: the caller's slice (buffer
/// mode), the inline spill store (BOM prefetch, partial scalars), or the raw
/// buffer (framed 16/32-bit reader input). The owned stores are addressed by
/// range so the window never borrows from the decoder it lives in.
#[derive(Debug, Clone, Copy)]
enum Window<'src> {
    /// Unread tail of a caller-supplied slice.
    Caller(&'src [u8]),
    /// Live range of the four-byte spill store.
    Spill { start: usize, end: usize },
    /// Live range of the raw buffer.
    Raw { start: usize, end: usize },
}

/// Streaming decoder canonicalising a UTF-8/UTF-16/UTF-32 byte stream into
/// validated UTF-8.
///
/// Constructed either over a borrowed byte slice ([`UtfDecoder::from_slice`])
/// or over a pull source ([`UtfDecoder::from_reader`]), then driven by
/// [`UtfDecoder::read`] until it reports [`ReadStatus::EndOfStream`].
#[derive(Debug)]
pub struct UtfDecoder<'src, R = Empty> {
    source: Option<R>,
    eof: bool,
    raw: Vec<u8>,
    spill: [u8; 4],
    window: Window<'src>,
    /// The stream's encoding. Assign a concrete value before the first read
    /// to suppress auto-detection; after the first read the field only
    /// reports what was detected.
    pub encoding: Encoding,
}

impl<'src> UtfDecoder<'src, Empty> {
    /// Decode from an in-memory byte slice. End-of-stream is latched up
    /// front and no internal buffer is ever allocated.
    pub fn from_slice(input: &'src [u8]) -> Self {
        UtfDecoder {
            source: None,
            eof: true,
            raw: Vec::new(),
            spill: [0; 4],
            window: Window::Caller(input),
            encoding: Encoding::AutoDetect,
        }
    }
}

impl<R: ByteSource> UtfDecoder<'static, R> {
    /// Decode from a pull source. See [`ByteSource`] for the short-read
    /// contract: a read below the requested length latches end-of-stream.
    pub fn from_reader(source: R) -> Self {
        UtfDecoder {
            source: Some(source),
            eof: false,
            raw: Vec::new(),
            spill: [0; 4],
            window: Window::Spill { start: 0, end: 0 },
            encoding: Encoding::AutoDetect,
        }
    }
}

impl<'src, R: ByteSource> UtfDecoder<'src, R> {
    /// Fill `out` with validated UTF-8 and report how far decoding got.
    ///
    /// The outcome carries the byte count, the codepoint count (the YAML
    /// tokenizer advances by codepoints), and a status. Produced bytes and a
    /// failure status can arrive together; consume the bytes first. Callers
    /// should pass `out` of at least 4 bytes: smaller buffers cannot fail,
    /// but may observe zero-progress reads whenever the next codepoint's
    /// UTF-8 form does not fit.
    pub fn read(&mut self, out: &mut [u8]) -> ReadOutcome {
        if out.is_empty() {
            return ReadOutcome::new(0, 0, ReadStatus::Ok);
        }

        if self.eof && self.input().is_empty() {
            return ReadOutcome::new(0, 0, ReadStatus::EndOfStream);
        }

        if self.encoding == Encoding::AutoDetect {
            if let Err(error) = self.detect_encoding() {
                return ReadOutcome::new(0, 0, ReadStatus::Failed(error));
            }
        }

        let mut outcome = match self.encoding {
            Encoding::Utf8 => self.read_utf8(out),
            Encoding::Utf16Be | Encoding::Utf16Le | Encoding::Utf32Be | Encoding::Utf32Le => {
                self.read_wide(out)
            }
            Encoding::AutoDetect => unreachable!("detection ran above"),
        };

        if self.eof && self.input().is_empty() {
            // Terminal: release the source and owned buffers.
            self.source = None;
            self.raw = Vec::new();
            self.window = Window::Caller(&[]);
            if outcome.bytes == 0 && outcome.status == ReadStatus::Ok {
                outcome.status = ReadStatus::EndOfStream;
            }
        }

        outcome
    }

    /// The unconsumed input bytes, wherever they currently live.
    fn input(&self) -> &[u8] {
        match self.window {
            Window::Caller(slice) => slice,
            Window::Spill { start, end } => &self.spill[start..end],
            Window::Raw { start, end } => &self.raw[start..end],
        }
    }

    fn input_len(&self) -> usize {
        match self.window {
            Window::Caller(slice) => slice.len(),
            Window::Spill { start, end } | Window::Raw { start, end } => end - start,
        }
    }

    fn advance(&mut self, n: usize) {
        match &mut self.window {
            Window::Caller(slice) => *slice = &slice[n..],
            Window::Spill { start, .. } | Window::Raw { start, .. } => *start += n,
        }
    }

    /// Resolve [`Encoding::AutoDetect`] from the stream's first bytes,
    /// prefetching up to four of them in reader mode.
    fn detect_encoding(&mut self) -> Result<(), DecodeError> {
        if !self.eof {
            if let Some(source) = self.source.as_mut() {
                let mut prefix = [0u8; 4];
                let n = source.read(&mut prefix).map_err(DecodeError::Source)?;
                if n < prefix.len() {
                    self.eof = true;
                }
                self.spill = prefix;
                self.window = Window::Spill { start: 0, end: n };
            }
        }

        let (encoding, bom_len) = Encoding::detect(self.input());
        self.encoding = encoding;
        self.advance(bom_len);
        Ok(())
    }

    /// UTF-8 path: move bytes into `out` (buffered first, then straight from
    /// the source) and validate them in place.
    fn read_utf8(&mut self, out: &mut [u8]) -> ReadOutcome {
        let mut status = ReadStatus::Ok;

        let window_len = self.input_len();
        let buffered = window_len.min(out.len());
        out[..buffered].copy_from_slice(&self.input()[..buffered]);
        let mut filled = buffered;

        if filled < out.len() && !self.eof {
            if let Some(source) = self.source.as_mut() {
                match source.read(&mut out[filled..]) {
                    Ok(n) => {
                        if n < out.len() - filled {
                            self.eof = true;
                        }
                        filled += n;
                    }
                    Err(error) => {
                        self.eof = true;
                        status = DecodeError::Source(error).into();
                    }
                }
            }
        }

        // No byte beyond `out` can exist once the window was drained and EOF
        // is latched; only then is a trailing partial scalar final.
        let at_eof = self.eof && window_len == buffered;

        let check = check_utf8(&out[..filled], at_eof);
        match check.status {
            Utf8Status::Ok => self.advance(buffered),
            Utf8Status::Invalid => {
                self.advance(buffered);
                status = DecodeError::InvalidUtf8.into();
            }
            Utf8Status::Truncated => {
                let tail_len = filled - check.bytes;
                match self.window {
                    // The caller's slice still holds the partial scalar,
                    // contiguous with the unread remainder: rewind to it.
                    Window::Caller(_) => self.advance(check.bytes),
                    // Reader mode: stash the partial scalar plus whatever
                    // prefetch is still unread (at most four bytes total).
                    _ => {
                        let mut spill = [0u8; 4];
                        spill[..tail_len].copy_from_slice(&out[check.bytes..filled]);
                        self.advance(buffered);
                        let rest = self.input();
                        let total = tail_len + rest.len();
                        spill[tail_len..total].copy_from_slice(rest);
                        self.spill = spill;
                        self.window = Window::Spill { start: 0, end: total };
                    }
                }
            }
        }

        ReadOutcome::new(check.bytes, check.runes, status)
    }

    /// UTF-16/UTF-32 path: frame code units through the raw buffer,
    /// transform them into `out`, and validate the result.
    fn read_wide(&mut self, out: &mut [u8]) -> ReadOutcome {
        // First framed read on a streaming source: allocate the raw buffer
        // once and migrate the pending prefetch into it.
        if self.source.is_some() && self.raw.is_empty() {
            let mut raw = vec![0u8; RAW_CAPACITY];
            let pending = self.input();
            let pending_len = pending.len();
            raw[..pending_len].copy_from_slice(pending);
            self.raw = raw;
            self.window = Window::Raw { start: 0, end: pending_len };
        }

        let (unit, order, invalid) = match self.encoding {
            Encoding::Utf16Be => (2, ByteOrder::Big, DecodeError::InvalidUtf16),
            Encoding::Utf16Le => (2, ByteOrder::Little, DecodeError::InvalidUtf16),
            Encoding::Utf32Be => (4, ByteOrder::Big, DecodeError::InvalidUtf32),
            Encoding::Utf32Le => (4, ByteOrder::Little, DecodeError::InvalidUtf32),
            Encoding::Utf8 | Encoding::AutoDetect => unreachable!("wide path"),
        };

        // Worst case every code unit is ASCII, so decoding can consume
        // `unit` input bytes per output byte; keeping that much on hand
        // avoids refilling inside the loop. The clamp to 4 keeps a surrogate
        // pair completable even for undersized out buffers.
        let want = out.len().saturating_mul(unit).max(4);

        let mut wrote = 0;
        let mut status = ReadStatus::Ok;

        while wrote < out.len() {
            if !self.eof && self.source.is_some() && self.input_len() < want {
                if let Some(error) = self.fill_raw() {
                    status = DecodeError::Source(error).into();
                }
            }

            let src = self.input();
            if src.is_empty() {
                break;
            }

            let transformed = if unit == 2 {
                transform_utf16(&mut out[wrote..], src, order, self.eof)
            } else {
                transform_utf32(&mut out[wrote..], src, order, self.eof)
            };
            wrote += transformed.wrote;
            self.advance(transformed.read);

            match transformed.status {
                // Done: go round again to refill or fall out at EOF.
                // NeedMore: the next refill supplies the missing unit bytes
                // or latches EOF, turning it into Invalid.
                TransformStatus::Done | TransformStatus::NeedMore => {}
                TransformStatus::DstFull => break,
                TransformStatus::Invalid => {
                    status = invalid.into();
                    break;
                }
            }
        }

        // The transformers only emit whole scalars, so this pass is a
        // defence-in-depth re-validation that doubles as the rune counter.
        let check = check_utf8(&out[..wrote], self.eof);
        if check.status == Utf8Status::Invalid {
            status = DecodeError::InvalidUtf8.into();
        }

        ReadOutcome::new(check.bytes, check.runes, status)
    }

    /// Compact the raw buffer and top it up from the source. Returns the
    /// source error, if any; a short read latches EOF either way.
    fn fill_raw(&mut self) -> Option<crate::error::SourceError> {
        let Window::Raw { start, end } = self.window else {
            return None;
        };

        if start > 0 {
            self.raw.copy_within(start..end, 0);
        }
        let len = end - start;
        let free = RAW_CAPACITY - len;
        if free == 0 {
            self.window = Window::Raw { start: 0, end: len };
            return None;
        }

        let Some(source) = self.source.as_mut() else {
            return None;
        };

        let mut failure = None;
        let n = match source.read(&mut self.raw[len..]) {
            Ok(n) => {
                if n < free {
                    self.eof = true;
                }
                n
            }
            Err(error) => {
                self.eof = true;
                failure = Some(error);
                0
            }
        };
        self.window = Window::Raw { start: 0, end: len + n };
        failure
    }
}
