//! Byte order handling for Exif data
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) declared by the TIFF header
//! embedded in an Exif segment.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

use crate::exif::constants::header;
use crate::exif::errors::{ExifError, ExifResult};

/// Represents the byte order of a TIFF block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the first two bytes of a TIFF header
    pub fn detect(data: &[u8]) -> ExifResult<Self> {
        if data.len() < 2 {
            return Err(ExifError::OutOfBounds { offset: 0, len: 2, size: data.len() });
        }

        match [data[0], data[1]] {
            header::LITTLE_ENDIAN_MARKER => Ok(ByteOrder::LittleEndian),
            header::BIG_ENDIAN_MARKER => Ok(ByteOrder::BigEndian),
            _ => Err(ExifError::InvalidByteOrder(BigEndian::read_u16(&data[..2]))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// The two marker bytes written at the start of a TIFF header
    pub fn marker(&self) -> [u8; 2] {
        match self {
            ByteOrder::LittleEndian => header::LITTLE_ENDIAN_MARKER,
            ByteOrder::BigEndian => header::BIG_ENDIAN_MARKER,
        }
    }

    /// Copies a run of fixed-size elements from `from` order into this order
    pub fn convert_elements(&self, data: &[u8], element_size: usize, from: ByteOrder) -> Vec<u8> {
        let mut converted = data.to_vec();
        if *self != from && element_size > 1 {
            converted.chunks_exact_mut(element_size).for_each(|element| element.reverse());
        }
        converted
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
///
/// Readers take slices that the caller has already bounds-checked;
/// see `ByteCursor` for the checked entry points.
pub trait ByteOrderHandler: Send + Sync {
    /// Read a u16 value from the first two bytes of `buf`
    fn read_u16(&self, buf: &[u8]) -> u16;

    /// Read a u32 value from the first four bytes of `buf`
    fn read_u32(&self, buf: &[u8]) -> u32;

    /// Read an i32 value from the first four bytes of `buf`
    fn read_i32(&self, buf: &[u8]) -> i32;

    /// Encode a u16 value
    fn u16_bytes(&self, value: u16) -> [u8; 2];

    /// Encode a u32 value
    fn u32_bytes(&self, value: u32) -> [u8; 4];

    /// Encode an i32 value
    fn i32_bytes(&self, value: i32) -> [u8; 4] {
        self.u32_bytes(value as u32)
    }
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn read_u16(&self, buf: &[u8]) -> u16 {
        LittleEndian::read_u16(buf)
    }

    fn read_u32(&self, buf: &[u8]) -> u32 {
        LittleEndian::read_u32(buf)
    }

    fn read_i32(&self, buf: &[u8]) -> i32 {
        LittleEndian::read_i32(buf)
    }

    fn u16_bytes(&self, value: u16) -> [u8; 2] {
        let mut out = [0u8; 2];
        LittleEndian::write_u16(&mut out, value);
        out
    }

    fn u32_bytes(&self, value: u32) -> [u8; 4] {
        let mut out = [0u8; 4];
        LittleEndian::write_u32(&mut out, value);
        out
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn read_u16(&self, buf: &[u8]) -> u16 {
        BigEndian::read_u16(buf)
    }

    fn read_u32(&self, buf: &[u8]) -> u32 {
        BigEndian::read_u32(buf)
    }

    fn read_i32(&self, buf: &[u8]) -> i32 {
        BigEndian::read_i32(buf)
    }

    fn u16_bytes(&self, value: u16) -> [u8; 2] {
        let mut out = [0u8; 2];
        BigEndian::write_u16(&mut out, value);
        out
    }

    fn u32_bytes(&self, value: u32) -> [u8; 4] {
        let mut out = [0u8; 4];
        BigEndian::write_u32(&mut out, value);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_elements_swaps_each_element() {
        let shorts = [0xFE, 0xFF, 0x2C, 0x01];
        assert_eq!(ByteOrder::BigEndian.convert_elements(&shorts, 2, ByteOrder::LittleEndian),
                   vec![0xFF, 0xFE, 0x01, 0x2C]);
        assert_eq!(ByteOrder::LittleEndian.convert_elements(&shorts, 2, ByteOrder::LittleEndian),
                   shorts.to_vec());
        assert_eq!(ByteOrder::BigEndian.convert_elements(&shorts, 1, ByteOrder::LittleEndian),
                   shorts.to_vec());
    }
}
