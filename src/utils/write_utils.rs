//! Exif writing utilities
//!
//! Helpers for the alignment rules of the TIFF block layout.

use crate::exif::constants::ifd_layout;

/// Calculate padding required to align to a word (2-byte) boundary
///
/// TIFF requires values referenced by offset to begin on a word boundary.
pub fn calculate_word_padding(data_len: usize) -> usize {
    data_len % 2
}

/// Calculate padding that fills an entry's inline value field
pub fn calculate_inline_padding(value_len: usize) -> usize {
    ifd_layout::INLINE_VALUE_SIZE.saturating_sub(value_len)
}
