//! Encoding rendered HTML for hosts that need bytes in a specific charset.
//!
//! The composer's HTML is a Rust `String`, so UTF-8 and UTF-16 always succeed. Narrow charsets
//! fail with [`EncodingError`] as soon as one character cannot be represented.

use std::fmt;

use crate::error::EncodingError;

/// Character encodings a host may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// UTF-8.
    Utf8,
    /// UTF-16, little endian, without a byte order mark.
    Utf16,
    /// 7-bit ASCII.
    Ascii,
    /// ISO 8859-1.
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "Unicode (UTF-8)",
            Encoding::Utf16 => "Unicode (UTF-16)",
            Encoding::Ascii => "Western (ASCII)",
            Encoding::Latin1 => "Western (ISO Latin 1)",
        };
        f.write_str(name)
    }
}

/// Encode `html` as bytes in `encoding`.
pub fn encode_html(html: &str, encoding: Encoding) -> Result<Vec<u8>, EncodingError> {
    match encoding {
        Encoding::Utf8 => Ok(html.as_bytes().to_vec()),
        Encoding::Utf16 => Ok(html.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        Encoding::Ascii => narrow(html, encoding, 0x7f),
        Encoding::Latin1 => narrow(html, encoding, 0xff),
    }
}

fn narrow(html: &str, encoding: Encoding, max: u32) -> Result<Vec<u8>, EncodingError> {
    html.chars()
        .map(|ch| {
            u8::try_from(u32::from(ch))
                .ok()
                .filter(|&byte| u32::from(byte) <= max)
                .ok_or(EncodingError::Unencodable { encoding })
        })
        .collect()
}
