//! Custom error types for Exif processing

use std::fmt;
use std::io;

/// Exif and JPEG codec error types
#[derive(Debug)]
pub enum ExifError {
    /// I/O error
    IoError(io::Error),
    /// Byte stream does not begin with the SOI marker
    NotAJpeg,
    /// JPEG marker segment could not be parsed
    MalformedSegment { offset: usize, reason: String },
    /// Invalid Exif signature or TIFF header
    InvalidHeader(String),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// IFD header, entry table or entry value lies outside the buffer
    MalformedIfd { ifd: String, offset: usize, reason: String },
    /// Field type code outside the supported set (value kept as opaque bytes)
    UnsupportedType { ifd: String, tag: u16, type_code: u16 },
    /// Read past the end of a buffer
    OutOfBounds { offset: usize, len: usize, size: usize },
    /// Zero denominator on decode or non-finite input on encode
    InvalidRational(String),
    /// Value does not match the registered type or count for its tag
    InvalidValue(String),
    /// Exif payload too large for a single APP1 segment
    SegmentTooLarge(usize),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for ExifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExifError::IoError(e) => write!(f, "I/O error: {}", e),
            ExifError::NotAJpeg => write!(f, "Not a JPEG: missing SOI marker"),
            ExifError::MalformedSegment { offset, reason } =>
                write!(f, "Malformed JPEG segment at offset {}: {}", offset, reason),
            ExifError::InvalidHeader(msg) => write!(f, "Invalid Exif header: {}", msg),
            ExifError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            ExifError::MalformedIfd { ifd, offset, reason } =>
                write!(f, "Malformed {} IFD at offset {}: {}", ifd, offset, reason),
            ExifError::UnsupportedType { ifd, tag, type_code } =>
                write!(f, "Unsupported field type {} for tag {} in {} IFD", type_code, tag, ifd),
            ExifError::OutOfBounds { offset, len, size } =>
                write!(f, "Read of {} bytes at offset {} exceeds buffer of {} bytes", len, offset, size),
            ExifError::InvalidRational(msg) => write!(f, "Invalid rational: {}", msg),
            ExifError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            ExifError::SegmentTooLarge(len) =>
                write!(f, "Exif payload of {} bytes does not fit in an APP1 segment", len),
            ExifError::GenericError(msg) => write!(f, "Exif error: {}", msg),
        }
    }
}

impl std::error::Error for ExifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExifError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExifError {
    fn from(error: io::Error) -> Self {
        ExifError::IoError(error)
    }
}

/// Result type for Exif operations
pub type ExifResult<T> = Result<T, ExifError>;

impl From<String> for ExifError {
    fn from(msg: String) -> Self {
        ExifError::GenericError(msg)
    }
}
