//! Exif and JPEG format constants
//!
//! This module defines constants used throughout the codec, replacing
//! magic numbers with descriptive names.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// Size of the TIFF header (byte order, version, first IFD offset)
    pub const TIFF_HEADER_SIZE: usize = 8;

    /// Signature preceding the TIFF block inside an APP1 payload
    pub const EXIF_SIGNATURE: &[u8; 6] = b"Exif\0\0";
}

/// JPEG marker codes (second byte after 0xFF)
pub mod markers {
    pub const PREFIX: u8 = 0xFF;
    pub const SOI: u8 = 0xD8;
    pub const EOI: u8 = 0xD9;
    pub const SOS: u8 = 0xDA;
    pub const APP0: u8 = 0xE0;
    pub const APP1: u8 = 0xE1;
    pub const TEM: u8 = 0x01;
    pub const RST0: u8 = 0xD0;
    pub const RST7: u8 = 0xD7;

    /// Largest payload a length-prefixed segment can carry
    pub const MAX_SEGMENT_PAYLOAD: usize = 0xFFFF - 2;
}

/// IFD layout constants
pub mod ifd_layout {
    /// Size of the entry count field
    pub const ENTRY_COUNT_SIZE: usize = 2;
    /// Size of one entry record (tag, type, count, value/offset)
    pub const ENTRY_SIZE: usize = 12;
    /// Largest value stored inline in an entry
    pub const INLINE_VALUE_SIZE: usize = 4;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// 0th and 1st IFD tags
pub mod image_tags {
    pub const IMAGE_DESCRIPTION: u16 = 270;
    pub const MAKE: u16 = 271;
    pub const MODEL: u16 = 272;
    pub const ORIENTATION: u16 = 274;
    pub const X_RESOLUTION: u16 = 282;
    pub const Y_RESOLUTION: u16 = 283;
    pub const RESOLUTION_UNIT: u16 = 296;
    pub const SOFTWARE: u16 = 305;
    pub const DATE_TIME: u16 = 306;
    pub const ARTIST: u16 = 315;
    pub const JPEG_INTERCHANGE_FORMAT: u16 = 513;
    pub const JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 514;
    pub const Y_CB_CR_POSITIONING: u16 = 531;
    pub const COPYRIGHT: u16 = 33432;
    pub const EXIF_IFD_POINTER: u16 = 34665;
    pub const GPS_IFD_POINTER: u16 = 34853;
}

/// Exif sub-IFD tags
pub mod exif_tags {
    pub const EXPOSURE_TIME: u16 = 33434;
    pub const F_NUMBER: u16 = 33437;
    pub const ISO_SPEED_RATINGS: u16 = 34855;
    pub const EXIF_VERSION: u16 = 36864;
    pub const DATE_TIME_ORIGINAL: u16 = 36867;
    pub const DATE_TIME_DIGITIZED: u16 = 36868;
    pub const FOCAL_LENGTH: u16 = 37386;
    pub const MAKER_NOTE: u16 = 37500;
    pub const USER_COMMENT: u16 = 37510;
    pub const SUB_SEC_TIME_ORIGINAL: u16 = 37521;
    pub const PIXEL_X_DIMENSION: u16 = 40962;
    pub const PIXEL_Y_DIMENSION: u16 = 40963;
    pub const INTEROP_IFD_POINTER: u16 = 40965;
    pub const LENS_MODEL: u16 = 42036;
}

/// GPS IFD tags
pub mod gps_tags {
    pub const GPS_VERSION_ID: u16 = 0;
    pub const GPS_LATITUDE_REF: u16 = 1;
    pub const GPS_LATITUDE: u16 = 2;
    pub const GPS_LONGITUDE_REF: u16 = 3;
    pub const GPS_LONGITUDE: u16 = 4;
    pub const GPS_ALTITUDE_REF: u16 = 5;
    pub const GPS_ALTITUDE: u16 = 6;
    pub const GPS_TIME_STAMP: u16 = 7;
    pub const GPS_SPEED_REF: u16 = 12;
    pub const GPS_SPEED: u16 = 13;
    pub const GPS_IMG_DIRECTION_REF: u16 = 16;
    pub const GPS_IMG_DIRECTION: u16 = 17;
    pub const GPS_MAP_DATUM: u16 = 18;
    pub const GPS_DATE_STAMP: u16 = 29;
}

/// Interoperability IFD tags
pub mod interop_tags {
    pub const INTEROPERABILITY_INDEX: u16 = 1;
    pub const INTEROPERABILITY_VERSION: u16 = 2;
}

/// Returns the size in bytes of one value of the given field type,
/// or None if the type code is not defined by TIFF 6.0
pub fn field_type_size(field_type: u16) -> Option<usize> {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => Some(1),
        field_types::SHORT | field_types::SSHORT => Some(2),
        field_types::LONG | field_types::SLONG | field_types::FLOAT => Some(4),
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => Some(8),
        _ => None,
    }
}
