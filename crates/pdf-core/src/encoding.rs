//! WinAnsiEncoding for the standard Type1 fonts

use crate::{PdfError, Result};

/// Characters WinAnsiEncoding places in 0x80..=0x9F
const WIN_ANSI_EXTRAS: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{00A0}'..='\u{00FF}' => Some(c as u32 as u8),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, byte)| *byte),
    }
}

/// Encode text as WinAnsiEncoding bytes
///
/// Fails on the first character the encoding cannot represent,
/// including control characters.
///
/// # Examples
/// ```
/// use pdf_core::encode_win_ansi;
/// assert_eq!(encode_win_ansi("A\u{e9}").unwrap(), vec![0x41, 0xE9]);
/// assert!(encode_win_ansi("\u{0E01}").is_err());
/// ```
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            win_ansi_byte(ch).ok_or_else(|| PdfError::EncodingError {
                text: text.to_string(),
                ch,
                position,
            })
        })
        .collect()
}

/// Format bytes as a PDF hex string (e.g., "<414243>")
pub fn to_hex_string(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2 + 2);
    hex.push('<');
    for byte in bytes {
        hex.push_str(&format!("{byte:02X}"));
    }
    hex.push('>');
    hex
}
