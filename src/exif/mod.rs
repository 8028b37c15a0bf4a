//! Exif metadata codec
//!
//! This module provides the document model for Exif metadata together with
//! the decoder and encoder for the TIFF block carried in a JPEG APP1 segment.

pub mod errors;
pub mod constants;
pub mod rational;
pub mod types;
pub mod registry;
pub mod decoder;
pub mod encoder;
#[cfg(test)]
mod tests;

pub use errors::{ExifError, ExifResult};
pub use rational::{rational_to_decimal, Rational, SRational};
pub use types::{ExifDocument, IfdKind, IfdSection, TagValue};
pub use registry::{get_tag_name, tag_descriptor, CountRule, TagDescriptor};
pub use decoder::{decode_tiff, DecodedIfd, IfdDecoder};
pub use encoder::{encode_tiff, EncodeOptions};
