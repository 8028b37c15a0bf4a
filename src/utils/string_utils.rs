//! String utility functions
//!
//! Utilities for working with strings and text data.

/// Decodes an ASCII field, stopping at the first NUL
///
/// Bytes outside UTF-8 are replaced rather than rejected, as camera
/// firmware often writes Latin-1 into ASCII fields.
pub fn ascii_from_bytes(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Trims trailing null characters and whitespace from a string
pub fn trim_trailing_nulls(value: &str) -> &str {
    value.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}
