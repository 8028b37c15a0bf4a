//! JPEG container handling
//!
//! This module parses the marker segments of a JPEG stream and splices
//! Exif APP1 segments in and out without touching the image data.

pub mod segment;
pub mod splicer;

pub use segment::{locate_exif, JpegFile, MarkerSegment};
pub use splicer::{extract, insert, remove};
