//! Text encodings accepted for result files and the fallback combinator.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A text encoding a result file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "iso-8859-1")]
    Iso88591,
    #[serde(rename = "cp1252")]
    Cp1252,
}

/// Encodings tried, in order, when no preference is configured.
pub const DEFAULT_ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Iso88591,
    TextEncoding::Cp1252,
];

impl TextEncoding {
    /// Conventional label of the encoding.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Iso88591 => "iso-8859-1",
            Self::Cp1252 => "cp1252",
        }
    }

    /// Decode raw bytes, failing on byte sequences invalid in this encoding.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, String> {
        match self {
            Self::Utf8 => {
                let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
                Ok(Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)))
            }
            // ISO-8859-1 maps every byte to the code point of the same value.
            Self::Latin1 | Self::Iso88591 => {
                Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
            }
            Self::Cp1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or_else(|| "invalid cp1252 byte sequence".to_string()),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed attempt: the encoding and why it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub encoding: TextEncoding,
    pub message: String,
}

/// Run `attempt` for each encoding in order and return the first success.
///
/// If every attempt fails, all failures are returned in attempt order. An
/// empty encoding list yields an empty failure list.
pub fn first_success<T, F>(
    encodings: &[TextEncoding],
    mut attempt: F,
) -> Result<(TextEncoding, T), Vec<AttemptFailure>>
where
    F: FnMut(TextEncoding) -> Result<T, String>,
{
    let mut failures = Vec::with_capacity(encodings.len());
    for &encoding in encodings {
        match attempt(encoding) {
            Ok(value) => return Ok((encoding, value)),
            Err(message) => {
                log::debug!("Decoding as {} failed: {}", encoding, message);
                failures.push(AttemptFailure { encoding, message });
            }
        }
    }
    Err(failures)
}
