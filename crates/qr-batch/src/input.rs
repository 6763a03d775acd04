//! Data file decoding.
//!
//! Text files come from spreadsheets and editors on every platform, so the
//! encoding is detected: UTF-8 (optional BOM), then UTF-16 (BOM or
//! little-endian), then Latin-1 which accepts any byte sequence.

use std::path::Path;

use tracing::debug;

use crate::BatchError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Read a TXT/CSV file and return its lines without terminators.
pub fn read_input_file(path: &Path) -> Result<Vec<String>, BatchError> {
    let bytes = std::fs::read(path).map_err(|source| BatchError::ReadInput {
        path: path.display().to_string(),
        source,
    })?;
    let lines = decode_lines(&bytes);
    debug!(path = %path.display(), lines = lines.len(), "Read data file");
    Ok(lines)
}

/// Decode raw bytes and split them into lines.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    split_lines(&decode_text(bytes))
}

fn decode_text(bytes: &[u8]) -> String {
    let utf8_body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(utf8_body) {
        return text.to_string();
    }
    if let Some(text) = decode_utf16(bytes) {
        debug!("Data file decoded as UTF-16");
        return text;
    }
    debug!("Data file decoded as Latin-1");
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (body, big_endian) = if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        (rest, false)
    } else if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        (rest, true)
    } else {
        (bytes, false)
    };
    if body.len() % 2 != 0 {
        return None;
    }
    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

/// Split on `\r\n` and every single-character line boundary: `\n`, `\r`,
/// vertical tab, form feed, the file/group/record separators, NEL and the
/// Unicode line and paragraph separators. A trailing terminator adds no line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}' => lines.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
