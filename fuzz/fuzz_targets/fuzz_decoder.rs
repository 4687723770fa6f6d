#![no_main]

use libfuzzer_sys::fuzz_target;
use utfmodem::{ByteSource, ReadStatus, UtfDecoder};

fuzz_target!(|data: &[u8]| run(data));

/// First byte picks the out-buffer size (4..=67), the rest is the stream.
/// Whatever the bytes are, the decoder must not panic, must terminate, must
/// only ever hand out valid UTF-8, and must decode identically from a slice
/// and from a reader.
fn run(data: &[u8]) {
    let Some((&flags, payload)) = data.split_first() else {
        return;
    };
    let out_len = 4 + usize::from(flags & 0x3F);

    let buffered = decode(UtfDecoder::from_slice(payload), out_len, payload.len());
    let streamed = decode(UtfDecoder::from_reader(payload), out_len, payload.len());
    assert_eq!(buffered, streamed);
}

fn decode<R: ByteSource>(
    mut decoder: UtfDecoder<'_, R>,
    out_len: usize,
    input_len: usize,
) -> (Vec<u8>, usize, Option<String>) {
    let mut out = vec![0u8; out_len];
    let mut collected = Vec::new();
    let mut runes = 0;

    // Every read either makes progress or goes terminal; anything else is a
    // stuck read loop.
    for _ in 0..=input_len + 1 {
        let decoded = decoder.read(&mut out);
        collected.extend_from_slice(&out[..decoded.bytes]);
        runes += decoded.runes;
        match decoded.status {
            ReadStatus::Ok => {}
            ReadStatus::EndOfStream => {
                finish(&collected, runes);
                return (collected, runes, None);
            }
            ReadStatus::Failed(error) => {
                finish(&collected, runes);
                return (collected, runes, Some(error.to_string()));
            }
        }
    }
    panic!("decoder did not terminate within {} reads", input_len + 2);
}

/// The produced stream must be valid UTF-8 with the reported scalar count,
/// whether or not decoding ended in an error.
fn finish(collected: &[u8], runes: usize) {
    let text = std::str::from_utf8(collected).expect("decoder produced invalid UTF-8");
    assert_eq!(text.chars().count(), runes);
}
