//! Growable byte writer with patch-back support
//!
//! IFD entries whose values do not fit inline store an offset that is only
//! known once the value area has been laid out. The writer hands out
//! `PatchSlot`s for such fields and fills them in later.

use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::rational::{Rational, SRational};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::utils::write_utils;

/// Location of a reserved 4-byte field awaiting its final value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSlot(usize);

impl PatchSlot {
    /// Position of the reserved field in the output buffer
    pub fn position(&self) -> usize {
        self.0
    }
}

/// Sequential writer over a growing buffer
pub struct ByteWriter {
    buf: Vec<u8>,
    byte_order: ByteOrder,
    handler: Box<dyn ByteOrderHandler>,
}

impl ByteWriter {
    /// Creates an empty writer using the given byte order
    pub fn new(byte_order: ByteOrder) -> Self {
        ByteWriter {
            buf: Vec::new(),
            byte_order,
            handler: byte_order.create_handler(),
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Current write position (equal to the number of bytes written)
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Current position as a 32-bit TIFF offset
    pub fn offset(&self) -> ExifResult<u32> {
        u32::try_from(self.buf.len())
            .map_err(|_| ExifError::GenericError(format!("Offset {} does not fit in 32 bits", self.buf.len())))
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        let bytes = self.handler.u16_bytes(value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        let bytes = self.handler.u32_bytes(value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i32(&mut self, value: i32) {
        let bytes = self.handler.i32_bytes(value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_rational(&mut self, value: Rational) {
        self.write_u32(value.num);
        self.write_u32(value.denom);
    }

    pub fn write_srational(&mut self, value: SRational) {
        self.write_i32(value.num);
        self.write_i32(value.denom);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pads with zero bytes up to the next word (2-byte) boundary
    pub fn align_to_word(&mut self) {
        let padding = write_utils::calculate_word_padding(self.buf.len());
        self.buf.extend(std::iter::repeat(0u8).take(padding));
    }

    /// Reserves a 4-byte field to be patched later
    pub fn reserve_u32(&mut self) -> PatchSlot {
        let slot = PatchSlot(self.buf.len());
        self.buf.extend_from_slice(&[0u8; 4]);
        slot
    }

    /// Fills a previously reserved field
    pub fn patch_u32(&mut self, slot: PatchSlot, value: u32) -> ExifResult<()> {
        let start = slot.position();
        let size = self.buf.len();
        let target = self.buf.get_mut(start..start + 4)
            .ok_or(ExifError::OutOfBounds { offset: start, len: 4, size })?;
        target.copy_from_slice(&self.handler.u32_bytes(value));
        Ok(())
    }

    /// Consumes the writer and returns the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
