//! Bounds-checked reader over an in-memory TIFF block
//!
//! Offsets stored inside IFD entries are absolute positions in the TIFF
//! block, so the cursor supports both sequential reads and random access
//! reads at arbitrary offsets without moving the read position.

use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::rational::{Rational, SRational};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};

/// Sequential and random-access reader over a byte slice
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    byte_order: ByteOrder,
    handler: Box<dyn ByteOrderHandler>,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        ByteCursor {
            data,
            pos: 0,
            byte_order,
            handler: byte_order.create_handler(),
        }
    }

    /// Byte order used for multi-byte reads
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Moves the read position, failing if it lies past the end of the buffer
    pub fn seek(&mut self, offset: usize) -> ExifResult<()> {
        if offset > self.data.len() {
            return Err(ExifError::OutOfBounds { offset, len: 0, size: self.data.len() });
        }
        self.pos = offset;
        Ok(())
    }

    /// Returns `len` bytes starting at `offset` without moving the cursor
    pub fn bytes_at(&self, offset: usize, len: usize) -> ExifResult<&'a [u8]> {
        let end = offset.checked_add(len)
            .ok_or(ExifError::OutOfBounds { offset, len, size: self.data.len() })?;

        if end > self.data.len() {
            return Err(ExifError::OutOfBounds { offset, len, size: self.data.len() });
        }

        Ok(&self.data[offset..end])
    }

    /// Reads `len` bytes at the current position and advances past them
    pub fn read_bytes(&mut self, len: usize) -> ExifResult<&'a [u8]> {
        let bytes = self.bytes_at(self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> ExifResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> ExifResult<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(self.handler.read_u16(bytes))
    }

    pub fn read_u32(&mut self) -> ExifResult<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(self.handler.read_u32(bytes))
    }

    pub fn read_i32(&mut self) -> ExifResult<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(self.handler.read_i32(bytes))
    }

    /// Reads an unsigned rational (two u32 values as numerator/denominator)
    pub fn read_rational(&mut self) -> ExifResult<Rational> {
        let num = self.read_u32()?;
        let denom = self.read_u32()?;
        Ok(Rational::new(num, denom))
    }

    /// Reads a signed rational (two i32 values as numerator/denominator)
    pub fn read_srational(&mut self) -> ExifResult<SRational> {
        let num = self.read_i32()?;
        let denom = self.read_i32()?;
        Ok(SRational::new(num, denom))
    }

    /// Reads a u16 at an absolute offset without moving the cursor
    pub fn read_u16_at(&self, offset: usize) -> ExifResult<u16> {
        Ok(self.handler.read_u16(self.bytes_at(offset, 2)?))
    }

    /// Reads a u32 at an absolute offset without moving the cursor
    pub fn read_u32_at(&self, offset: usize) -> ExifResult<u32> {
        Ok(self.handler.read_u32(self.bytes_at(offset, 4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_follow_declared_byte_order() {
        let data = [0x12, 0x34, 0x00, 0x00, 0x00, 0x08];

        let mut be = ByteCursor::new(&data, ByteOrder::BigEndian);
        assert_eq!(be.read_u16().unwrap(), 0x1234);
        assert_eq!(be.read_u32().unwrap(), 8);

        let mut le = ByteCursor::new(&data, ByteOrder::LittleEndian);
        assert_eq!(le.read_u16().unwrap(), 0x3412);
        assert_eq!(le.read_u32().unwrap(), 0x0800_0000);
    }

    #[test]
    fn random_access_does_not_move_position() {
        let data = [0, 0, 0, 0, 0, 0x2A];
        let cursor = ByteCursor::new(&data, ByteOrder::BigEndian);

        assert_eq!(cursor.read_u16_at(4).unwrap(), 0x2A);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn reading_past_end_is_out_of_bounds() {
        let data = [1, 2, 3];
        let mut cursor = ByteCursor::new(&data, ByteOrder::LittleEndian);

        assert!(matches!(cursor.read_u32(), Err(ExifError::OutOfBounds { offset: 0, len: 4, size: 3 })));
        assert!(matches!(cursor.bytes_at(usize::MAX, 2), Err(ExifError::OutOfBounds { .. })));
        assert!(cursor.seek(4).is_err());
    }

    #[test]
    fn reads_rationals() {
        let data = [0, 0, 0, 37, 0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 2];
        let mut cursor = ByteCursor::new(&data, ByteOrder::BigEndian);

        assert_eq!(cursor.read_rational().unwrap(), Rational::new(37, 1));
        assert_eq!(cursor.read_srational().unwrap(), SRational::new(-1, 2));
    }
}
