// ============================================================
// ENCODING DETECTOR
// ============================================================
// Guess the character encoding of raw bytes and decode strictly

use std::borrow::Cow;

use chardetng::EncodingDetector as CharsetGuesser;
use encoding_rs::{Encoding, UTF_8};

use crate::domain::error::{AppError, Result};
use crate::domain::source::DetectedEncoding;

const BOM_CONFIDENCE: f32 = 1.0;
const ASCII_CONFIDENCE: f32 = 1.0;
const UTF8_CONFIDENCE: f32 = 0.99;
const GUESS_CONFIDENCE: f32 = 0.75;
const FALLBACK_CONFIDENCE: f32 = 0.25;

/// Best-effort encoding detection; never fails.
pub struct EncodingDetector;

impl EncodingDetector {
    /// Estimate the encoding of `bytes`.
    ///
    /// A byte order mark wins outright, then valid UTF-8. Anything else is
    /// handed to chardetng; its guess scores lower when the bytes still do
    /// not decode cleanly under it.
    pub fn detect(bytes: &[u8]) -> DetectedEncoding {
        if bytes.is_empty() {
            return DetectedEncoding::new(UTF_8.name(), ASCII_CONFIDENCE);
        }

        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return DetectedEncoding::new(encoding.name(), BOM_CONFIDENCE);
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            let confidence = if text.is_ascii() {
                ASCII_CONFIDENCE
            } else {
                UTF8_CONFIDENCE
            };
            return DetectedEncoding::new(UTF_8.name(), confidence);
        }

        let mut guesser = CharsetGuesser::new();
        guesser.feed(bytes, true);
        let encoding = guesser.guess(None, true);

        let confidence = if decode_without_replacement(bytes, encoding).is_some() {
            GUESS_CONFIDENCE
        } else {
            FALLBACK_CONFIDENCE
        };

        DetectedEncoding::new(encoding.name(), confidence)
    }
}

/// Look up an encoding by WHATWG label (`utf-8`, `latin1`, `windows-1252`...)
pub fn resolve_encoding(name: &str) -> Result<&'static Encoding> {
    Encoding::for_label(name.trim().as_bytes())
        .ok_or_else(|| AppError::Decode(format!("Unknown encoding: {}", name)))
}

/// Decode `bytes` as `encoding`, failing on the first malformed sequence.
/// A leading BOM for the same encoding is skipped.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    decode_without_replacement(bytes, encoding)
        .map(Cow::into_owned)
        .ok_or_else(|| {
            AppError::Decode(format!("Input is not valid {}", encoding.name()))
        })
}

fn decode_without_replacement<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Option<Cow<'a, str>> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding.decode_without_bom_handling_and_without_replacement(body)
}
